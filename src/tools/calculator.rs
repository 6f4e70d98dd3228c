//! Calculator MCP Tools
//!
//! Single-recipe costing and the shopping list.

use serde::Serialize;

use crate::catalog::{clamp_multiplier, Session};
use crate::costing::{
    consolidate, cost_recipe, top_cost_items, ConsolidatedResult, CostBreakdown, CostShare,
};

#[derive(Debug, Serialize)]
pub struct RecipeCostResponse {
    pub recipe_id: String,
    pub recipe_name: String,
    #[serde(flatten)]
    pub cost: CostBreakdown,
}

#[derive(Debug, Serialize)]
pub struct ShoppingEntry {
    pub recipe_id: String,
    pub recipe_name: String,
    pub base_yield: f64,
    pub multiplier: u32,
    pub units: f64,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub entries: Vec<ShoppingEntry>,
    pub total_units: f64,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListCalculation {
    #[serde(flatten)]
    pub result: ConsolidatedResult,
    pub top_items: Vec<CostShare>,
}

/// Cost a recipe for `units`; defaults to one batch of its base yield
pub fn calculate_recipe_cost(
    session: &Session,
    recipe_id: &str,
    units: Option<f64>,
) -> Result<RecipeCostResponse, String> {
    let snapshot = session.snapshot();
    let recipe = snapshot
        .recipe(recipe_id)
        .ok_or_else(|| format!("Recipe '{}' not found", recipe_id))?;
    let units = units.unwrap_or(recipe.base_yield);
    Ok(RecipeCostResponse {
        recipe_id: recipe.id.clone(),
        recipe_name: recipe.name.clone(),
        cost: cost_recipe(snapshot, recipe, units),
    })
}

// ============================================================================
// Shopping list
// ============================================================================

pub fn get_shopping_list(session: &Session) -> ShoppingListResponse {
    let snapshot = session.snapshot();
    let entries: Vec<ShoppingEntry> = session
        .selections()
        .resolve(snapshot)
        .into_iter()
        .map(|s| ShoppingEntry {
            recipe_id: s.recipe.id.clone(),
            recipe_name: s.recipe.name.clone(),
            base_yield: s.recipe.base_yield,
            multiplier: s.multiplier,
            units: f64::from(s.multiplier) * s.recipe.base_yield,
        })
        .collect();
    ShoppingListResponse {
        total_units: entries.iter().map(|e| e.units).sum(),
        entries,
    }
}

pub fn add_to_shopping_list(session: &mut Session, recipe_id: &str) -> Result<ShoppingListResponse, String> {
    if session.catalog().recipe(recipe_id).is_none() {
        return Err(format!("Recipe '{}' not found", recipe_id));
    }
    let multiplier = session.selections_mut().add(recipe_id);
    tracing::debug!("Shopping list: {} x{}", recipe_id, multiplier);
    Ok(get_shopping_list(session))
}

pub fn set_shopping_multiplier(
    session: &mut Session,
    recipe_id: &str,
    multiplier: f64,
) -> Result<ShoppingListResponse, String> {
    session
        .selections_mut()
        .set_multiplier(recipe_id, clamp_multiplier(multiplier))
        .ok_or_else(|| format!("Recipe '{}' is not on the shopping list", recipe_id))?;
    Ok(get_shopping_list(session))
}

pub fn remove_from_shopping_list(session: &mut Session, recipe_id: &str) -> Result<ShoppingListResponse, String> {
    if !session.selections_mut().remove(recipe_id) {
        return Err(format!("Recipe '{}' is not on the shopping list", recipe_id));
    }
    Ok(get_shopping_list(session))
}

pub fn clear_shopping_list(session: &mut Session) -> ShoppingListResponse {
    session.selections_mut().clear();
    get_shopping_list(session)
}

/// Consolidated shopping list for the current selections
pub fn consolidate_selection(session: &Session) -> Result<ConsolidatedResult, String> {
    let snapshot = session.snapshot();
    let selections = session.selections().resolve(snapshot);
    if selections.is_empty() {
        return Err("Shopping list is empty. Add at least one recipe first.".to_string());
    }
    Ok(consolidate(snapshot, &selections))
}

pub fn calculate_shopping_list(session: &Session, top: usize) -> Result<ShoppingListCalculation, String> {
    let result = consolidate_selection(session)?;
    let top_items = top_cost_items(&result, top);
    tracing::info!(
        "Shopping list: {} recipes, {} units, total {:.2}",
        result.recipes.len(),
        result.total_units,
        result.total
    );
    Ok(ShoppingListCalculation { result, top_items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientUpsert, RecipeIngredientUpsert, RecipeUpsert};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Flour at 1.0 per gram; Cupcakes (12) use 200 g, Bread (1) uses 50 g
    fn bakery() -> (Session, String, String) {
        let mut session = Session::in_memory();
        let flour = session
            .mutate(|c| {
                c.upsert_ingredient(&IngredientUpsert {
                    name: "Flour".to_string(),
                    package_quantity: 1000.0,
                    package_cost: 1000.0,
                    ..Default::default()
                })
            })
            .unwrap();
        let mut ids = Vec::new();
        for (name, base_yield, grams) in [("Cupcakes", 12.0, 200.0), ("Bread", 1.0, 50.0)] {
            let recipe = session
                .mutate(|c| {
                    c.upsert_recipe(&RecipeUpsert {
                        name: name.to_string(),
                        base_yield: Some(base_yield),
                        ..Default::default()
                    })
                })
                .unwrap();
            session
                .mutate(|c| {
                    c.upsert_recipe_ingredient(&RecipeIngredientUpsert {
                        id: None,
                        recipe_id: recipe.id.clone(),
                        ingredient_id: flour.id.clone(),
                        quantity: grams,
                    })
                })
                .unwrap();
            ids.push(recipe.id);
        }
        let bread = ids.pop().unwrap();
        let cupcakes = ids.pop().unwrap();
        (session, cupcakes, bread)
    }

    #[test]
    fn test_recipe_cost_for_requested_units() {
        let (session, cupcakes, _) = bakery();
        let response = calculate_recipe_cost(&session, &cupcakes, Some(24.0)).unwrap();
        assert!(approx(response.cost.total, 400.0));
        assert!(approx(response.cost.unit_cost, 400.0 / 24.0));

        let default_units = calculate_recipe_cost(&session, &cupcakes, None).unwrap();
        assert_eq!(default_units.cost.requested_units, 12.0);
        assert!(calculate_recipe_cost(&session, "rec_missing", None).is_err());
    }

    #[test]
    fn test_shopping_list_consolidates() {
        let (mut session, cupcakes, bread) = bakery();
        add_to_shopping_list(&mut session, &cupcakes).unwrap();
        add_to_shopping_list(&mut session, &cupcakes).unwrap();
        let list = add_to_shopping_list(&mut session, &bread).unwrap();
        assert_eq!(list.entries.len(), 2);
        assert_eq!(list.entries[0].multiplier, 2);
        assert_eq!(list.total_units, 25.0);

        let calc = calculate_shopping_list(&session, 15).unwrap();
        assert_eq!(calc.result.ingredients.len(), 1);
        assert!(approx(calc.result.ingredients[0].quantity, 450.0));
        assert!(approx(calc.result.total, 450.0));
        assert_eq!(calc.top_items[0].name, "Flour");
    }

    #[test]
    fn test_shopping_list_edits() {
        let (mut session, cupcakes, _) = bakery();
        assert!(set_shopping_multiplier(&mut session, &cupcakes, 3.0).is_err());
        add_to_shopping_list(&mut session, &cupcakes).unwrap();

        let list = set_shopping_multiplier(&mut session, &cupcakes, 0.0).unwrap();
        assert_eq!(list.entries[0].multiplier, 1);

        remove_from_shopping_list(&mut session, &cupcakes).unwrap();
        assert!(calculate_shopping_list(&session, 15).is_err());
        assert!(add_to_shopping_list(&mut session, "rec_missing").is_err());
        assert!(clear_shopping_list(&mut session).entries.is_empty());
    }
}
