//! Recipe MCP Tools
//!
//! Tools for managing recipes and their ingredient, supply and equipment lines.

use serde::Serialize;

use crate::catalog::{Cascade, Session};
use crate::models::{
    Recipe, RecipeEquipment, RecipeEquipmentUpsert, RecipeIngredient, RecipeIngredientUpsert,
    RecipeSupply, RecipeSupplyUpsert, RecipeUpsert,
};
use crate::tools::catalog::{name_matches, UpsertResponse};

/// One component line of a recipe
#[derive(Debug, Serialize)]
pub struct ComponentLine {
    pub link_id: String,
    pub item_id: String,
    /// Item name, or `None` when the item no longer exists
    pub name: Option<String>,
    pub quantity: f64,
    pub unit: Option<String>,
}

/// Recipe with its resolved component lines
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<ComponentLine>,
    pub supplies: Vec<ComponentLine>,
    /// Quantity is hours per batch
    pub equipment: Vec<ComponentLine>,
}

/// Summary of a recipe for list results
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub base_yield: f64,
    pub ingredient_count: usize,
    pub supply_count: usize,
    pub equipment_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteRecipeResponse {
    pub success: bool,
    pub id: String,
    pub name: String,
    pub cascade: Cascade,
}

#[derive(Debug, Serialize)]
pub struct RemoveLineResponse {
    pub success: bool,
    pub link_id: String,
    pub recipe_id: String,
}

pub fn upsert_recipe(session: &mut Session, data: RecipeUpsert) -> Result<UpsertResponse<Recipe>, String> {
    let created = data
        .id
        .as_deref()
        .and_then(|id| session.catalog().recipe(id))
        .is_none();
    let item = session
        .mutate(|c| c.upsert_recipe(&data))
        .map_err(|e| format!("Failed to save recipe: {}", e))?;
    tracing::debug!("Saved recipe {} ({}), yield {}", item.name, item.id, item.base_yield);
    Ok(UpsertResponse { created, item })
}

pub fn get_recipe(session: &Session, id: &str) -> Option<RecipeDetail> {
    let catalog = session.catalog();
    let recipe = catalog.recipe(id)?.clone();

    let ingredients = catalog
        .recipe_ingredients(id)
        .into_iter()
        .map(|l| {
            let item = catalog.ingredient(&l.ingredient_id);
            ComponentLine {
                link_id: l.id.clone(),
                item_id: l.ingredient_id.clone(),
                name: item.map(|i| i.name.clone()),
                quantity: l.quantity,
                unit: item.map(|i| i.unit.clone()),
            }
        })
        .collect();

    let supplies = catalog
        .recipe_supplies(id)
        .into_iter()
        .map(|l| {
            let item = catalog.supply(&l.supply_id);
            ComponentLine {
                link_id: l.id.clone(),
                item_id: l.supply_id.clone(),
                name: item.map(|s| s.name.clone()),
                quantity: l.quantity,
                unit: item.map(|s| s.package_unit.clone()),
            }
        })
        .collect();

    let equipment = catalog
        .recipe_equipment(id)
        .into_iter()
        .map(|l| ComponentLine {
            link_id: l.id.clone(),
            item_id: l.equipment_id.clone(),
            name: catalog.equipment_item(&l.equipment_id).map(|e| e.name.clone()),
            quantity: l.hours,
            unit: Some("h".to_string()),
        })
        .collect();

    Some(RecipeDetail {
        recipe,
        ingredients,
        supplies,
        equipment,
    })
}

pub fn list_recipes(session: &Session, query: Option<&str>) -> ListRecipesResponse {
    let catalog = session.catalog();
    let recipes: Vec<RecipeSummary> = catalog
        .recipes()
        .iter()
        .filter(|r| name_matches(&r.name, query))
        .map(|r| RecipeSummary {
            id: r.id.clone(),
            name: r.name.clone(),
            base_yield: r.base_yield,
            ingredient_count: catalog.recipe_ingredients(&r.id).len(),
            supply_count: catalog.recipe_supplies(&r.id).len(),
            equipment_count: catalog.recipe_equipment(&r.id).len(),
        })
        .collect();
    ListRecipesResponse {
        total: recipes.len(),
        recipes,
    }
}

pub fn delete_recipe(session: &mut Session, id: &str) -> Result<DeleteRecipeResponse, String> {
    let name = session
        .catalog()
        .recipe(id)
        .map(|r| r.name.clone())
        .unwrap_or_default();
    let cascade = session
        .mutate(|c| c.delete_recipe(id))
        .map_err(|e| format!("Failed to delete recipe: {}", e))?;
    tracing::info!("Deleted recipe {} and {} component lines", id, cascade.total());
    Ok(DeleteRecipeResponse {
        success: true,
        id: id.to_string(),
        name,
        cascade,
    })
}

// ============================================================================
// Component lines
// ============================================================================

pub fn upsert_recipe_ingredient(
    session: &mut Session,
    data: RecipeIngredientUpsert,
) -> Result<RecipeIngredient, String> {
    session
        .mutate(|c| c.upsert_recipe_ingredient(&data))
        .map_err(|e| format!("Failed to save recipe ingredient: {}", e))
}

pub fn upsert_recipe_supply(session: &mut Session, data: RecipeSupplyUpsert) -> Result<RecipeSupply, String> {
    session
        .mutate(|c| c.upsert_recipe_supply(&data))
        .map_err(|e| format!("Failed to save recipe supply: {}", e))
}

pub fn upsert_recipe_equipment(
    session: &mut Session,
    data: RecipeEquipmentUpsert,
) -> Result<RecipeEquipment, String> {
    session
        .mutate(|c| c.upsert_recipe_equipment(&data))
        .map_err(|e| format!("Failed to save recipe equipment: {}", e))
}

pub fn remove_recipe_ingredient(session: &mut Session, link_id: &str) -> Result<RemoveLineResponse, String> {
    let link = session
        .mutate(|c| c.delete_recipe_ingredient(link_id))
        .map_err(|e| format!("Failed to remove recipe ingredient: {}", e))?;
    Ok(RemoveLineResponse {
        success: true,
        link_id: link.id,
        recipe_id: link.recipe_id,
    })
}

pub fn remove_recipe_supply(session: &mut Session, link_id: &str) -> Result<RemoveLineResponse, String> {
    let link = session
        .mutate(|c| c.delete_recipe_supply(link_id))
        .map_err(|e| format!("Failed to remove recipe supply: {}", e))?;
    Ok(RemoveLineResponse {
        success: true,
        link_id: link.id,
        recipe_id: link.recipe_id,
    })
}

pub fn remove_recipe_equipment(session: &mut Session, link_id: &str) -> Result<RemoveLineResponse, String> {
    let link = session
        .mutate(|c| c.delete_recipe_equipment(link_id))
        .map_err(|e| format!("Failed to remove recipe equipment: {}", e))?;
    Ok(RemoveLineResponse {
        success: true,
        link_id: link.id,
        recipe_id: link.recipe_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EquipmentUpsert, IngredientUpsert};

    fn bread(session: &mut Session) -> Recipe {
        upsert_recipe(
            session,
            RecipeUpsert {
                name: "Country Bread".to_string(),
                base_yield: Some(2.0),
                ..Default::default()
            },
        )
        .unwrap()
        .item
    }

    #[test]
    fn test_get_recipe_resolves_lines() {
        let mut session = Session::in_memory();
        let recipe = bread(&mut session);
        let flour = session
            .mutate(|c| {
                c.upsert_ingredient(&IngredientUpsert {
                    name: "Flour".to_string(),
                    ..Default::default()
                })
            })
            .unwrap();
        let oven = session
            .mutate(|c| {
                c.upsert_equipment(&EquipmentUpsert {
                    name: "Oven".to_string(),
                    power_watts: 2400.0,
                    ..Default::default()
                })
            })
            .unwrap();
        upsert_recipe_ingredient(
            &mut session,
            RecipeIngredientUpsert {
                id: None,
                recipe_id: recipe.id.clone(),
                ingredient_id: flour.id.clone(),
                quantity: 900.0,
            },
        )
        .unwrap();
        upsert_recipe_equipment(
            &mut session,
            RecipeEquipmentUpsert {
                id: None,
                recipe_id: recipe.id.clone(),
                equipment_id: oven.id.clone(),
                hours: 0.75,
            },
        )
        .unwrap();

        let detail = get_recipe(&session, &recipe.id).unwrap();
        assert_eq!(detail.ingredients[0].name.as_deref(), Some("Flour"));
        assert_eq!(detail.ingredients[0].unit.as_deref(), Some("g"));
        assert_eq!(detail.equipment[0].quantity, 0.75);

        let listed = list_recipes(&session, Some("bread"));
        assert_eq!(listed.total, 1);
        assert_eq!(listed.recipes[0].ingredient_count, 1);
        assert_eq!(listed.recipes[0].equipment_count, 1);
    }

    #[test]
    fn test_remove_line_and_delete_recipe() {
        let mut session = Session::in_memory();
        let recipe = bread(&mut session);
        let flour = session
            .mutate(|c| {
                c.upsert_ingredient(&IngredientUpsert {
                    name: "Flour".to_string(),
                    ..Default::default()
                })
            })
            .unwrap();
        let link = upsert_recipe_ingredient(
            &mut session,
            RecipeIngredientUpsert {
                id: None,
                recipe_id: recipe.id.clone(),
                ingredient_id: flour.id,
                quantity: 900.0,
            },
        )
        .unwrap();

        let removed = remove_recipe_ingredient(&mut session, &link.id).unwrap();
        assert_eq!(removed.recipe_id, recipe.id);
        assert!(remove_recipe_ingredient(&mut session, &link.id).is_err());

        let deleted = delete_recipe(&mut session, &recipe.id).unwrap();
        assert_eq!(deleted.name, "Country Bread");
        assert!(get_recipe(&session, &recipe.id).is_none());
    }

    #[test]
    fn test_line_for_unknown_recipe_rejected() {
        let mut session = Session::in_memory();
        let result = upsert_recipe_supply(
            &mut session,
            RecipeSupplyUpsert {
                id: None,
                recipe_id: "rec_missing".to_string(),
                supply_id: "sup_missing".to_string(),
                quantity: 1.0,
            },
        );
        assert!(result.is_err());
    }
}
