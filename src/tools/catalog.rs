//! Catalog MCP Tools
//!
//! Tools for managing ingredients, supplies, equipment and energy settings.

use serde::Serialize;

use crate::catalog::{Cascade, Session};
use crate::costing::{compute_energy, validate_formula, NO_SUPPLIER};
use crate::models::{
    CatalogSnapshot, Equipment, EquipmentUpsert, Ingredient, IngredientUpsert, Supply,
    SupplyUpsert,
};

/// Response for upsert tools
#[derive(Debug, Serialize)]
pub struct UpsertResponse<T> {
    pub created: bool,
    pub item: T,
}

/// Item detail with the recipes that use it
#[derive(Debug, Serialize)]
pub struct ItemDetail<T> {
    #[serde(flatten)]
    pub item: T,
    pub used_in_recipes: Vec<String>,
}

/// Response for list tools
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Ingredients bought from one supplier
#[derive(Debug, Serialize)]
pub struct SupplierGroup {
    pub supplier: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Serialize)]
pub struct GroupedIngredientsResponse {
    pub suppliers: Vec<SupplierGroup>,
    pub total: usize,
}

/// Response for delete tools
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: String,
    pub name: String,
    pub removed_recipe_lines: usize,
    pub cascade: Cascade,
}

#[derive(Debug, Serialize)]
pub struct ValidateFormulaResponse {
    pub formula: String,
    pub valid: bool,
    pub error: Option<String>,
    /// kWh for 1000 W over 1 h, when valid
    pub sample_kwh: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EnergyCostResponse {
    pub global_energy_cost: f64,
}

/// Case-insensitive substring match; no query matches everything
pub(crate) fn name_matches(name: &str, query: Option<&str>) -> bool {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => name.to_lowercase().contains(&q.to_lowercase()),
        None => true,
    }
}

/// Sorted names of the given recipes
fn recipes_using(snapshot: &CatalogSnapshot, recipe_ids: Vec<&str>) -> Vec<String> {
    let mut names: Vec<String> = snapshot
        .recipes
        .iter()
        .filter(|r| recipe_ids.contains(&r.id.as_str()))
        .map(|r| r.name.clone())
        .collect();
    names.sort();
    names
}

fn delete_response(id: &str, name: String, cascade: Cascade) -> DeleteResponse {
    DeleteResponse {
        success: true,
        id: id.to_string(),
        name,
        removed_recipe_lines: cascade.total(),
        cascade,
    }
}

// ============================================================================
// Ingredients
// ============================================================================

pub fn upsert_ingredient(
    session: &mut Session,
    data: IngredientUpsert,
) -> Result<UpsertResponse<Ingredient>, String> {
    let created = data.id.as_deref().and_then(|id| session.catalog().ingredient(id)).is_none();
    let item = session
        .mutate(|c| c.upsert_ingredient(&data))
        .map_err(|e| format!("Failed to save ingredient: {}", e))?;
    tracing::debug!("Saved ingredient {} ({})", item.name, item.id);
    Ok(UpsertResponse { created, item })
}

pub fn get_ingredient(session: &Session, id: &str) -> Option<ItemDetail<Ingredient>> {
    let snapshot = session.snapshot();
    let item = session.catalog().ingredient(id)?.clone();
    let recipe_ids = snapshot
        .recipe_ingredients
        .iter()
        .filter(|l| l.ingredient_id == id)
        .map(|l| l.recipe_id.as_str())
        .collect();
    Some(ItemDetail {
        item,
        used_in_recipes: recipes_using(snapshot, recipe_ids),
    })
}

pub fn list_ingredients(session: &Session, query: Option<&str>) -> ListResponse<Ingredient> {
    let items: Vec<Ingredient> = session
        .catalog()
        .ingredients()
        .iter()
        .filter(|i| name_matches(&i.name, query))
        .cloned()
        .collect();
    ListResponse {
        total: items.len(),
        items,
    }
}

/// Ingredients grouped by supplier, groups in first-appearance order
pub fn list_ingredients_by_supplier(session: &Session, query: Option<&str>) -> GroupedIngredientsResponse {
    let mut suppliers: Vec<SupplierGroup> = Vec::new();
    let mut total = 0;
    for item in session.catalog().ingredients() {
        if !name_matches(&item.name, query) {
            continue;
        }
        total += 1;
        let supplier = item.supplier.as_deref().unwrap_or(NO_SUPPLIER);
        match suppliers.iter_mut().find(|g| g.supplier == supplier) {
            Some(group) => group.ingredients.push(item.clone()),
            None => suppliers.push(SupplierGroup {
                supplier: supplier.to_string(),
                ingredients: vec![item.clone()],
            }),
        }
    }
    GroupedIngredientsResponse { suppliers, total }
}

pub fn delete_ingredient(session: &mut Session, id: &str) -> Result<DeleteResponse, String> {
    let name = session
        .catalog()
        .ingredient(id)
        .map(|i| i.name.clone())
        .unwrap_or_default();
    let cascade = session
        .mutate(|c| c.delete_ingredient(id))
        .map_err(|e| format!("Failed to delete ingredient: {}", e))?;
    tracing::info!("Deleted ingredient {} and {} recipe lines", id, cascade.total());
    Ok(delete_response(id, name, cascade))
}

// ============================================================================
// Supplies
// ============================================================================

pub fn upsert_supply(session: &mut Session, data: SupplyUpsert) -> Result<UpsertResponse<Supply>, String> {
    let created = data.id.as_deref().and_then(|id| session.catalog().supply(id)).is_none();
    let item = session
        .mutate(|c| c.upsert_supply(&data))
        .map_err(|e| format!("Failed to save supply: {}", e))?;
    tracing::debug!("Saved supply {} ({})", item.name, item.id);
    Ok(UpsertResponse { created, item })
}

pub fn get_supply(session: &Session, id: &str) -> Option<ItemDetail<Supply>> {
    let snapshot = session.snapshot();
    let item = session.catalog().supply(id)?.clone();
    let recipe_ids = snapshot
        .recipe_supplies
        .iter()
        .filter(|l| l.supply_id == id)
        .map(|l| l.recipe_id.as_str())
        .collect();
    Some(ItemDetail {
        item,
        used_in_recipes: recipes_using(snapshot, recipe_ids),
    })
}

pub fn list_supplies(session: &Session, query: Option<&str>) -> ListResponse<Supply> {
    let items: Vec<Supply> = session
        .catalog()
        .supplies()
        .iter()
        .filter(|s| name_matches(&s.name, query))
        .cloned()
        .collect();
    ListResponse {
        total: items.len(),
        items,
    }
}

pub fn delete_supply(session: &mut Session, id: &str) -> Result<DeleteResponse, String> {
    let name = session
        .catalog()
        .supply(id)
        .map(|s| s.name.clone())
        .unwrap_or_default();
    let cascade = session
        .mutate(|c| c.delete_supply(id))
        .map_err(|e| format!("Failed to delete supply: {}", e))?;
    tracing::info!("Deleted supply {} and {} recipe lines", id, cascade.total());
    Ok(delete_response(id, name, cascade))
}

// ============================================================================
// Equipment
// ============================================================================

pub fn upsert_equipment(
    session: &mut Session,
    data: EquipmentUpsert,
) -> Result<UpsertResponse<Equipment>, String> {
    if let Some(formula) = data.formula.as_deref() {
        validate_formula(formula).map_err(|e| format!("Invalid energy formula: {}", e))?;
    }
    let created = data
        .id
        .as_deref()
        .and_then(|id| session.catalog().equipment_item(id))
        .is_none();
    let item = session
        .mutate(|c| c.upsert_equipment(&data))
        .map_err(|e| format!("Failed to save equipment: {}", e))?;
    tracing::debug!("Saved equipment {} ({})", item.name, item.id);
    Ok(UpsertResponse { created, item })
}

pub fn get_equipment(session: &Session, id: &str) -> Option<ItemDetail<Equipment>> {
    let snapshot = session.snapshot();
    let item = session.catalog().equipment_item(id)?.clone();
    let recipe_ids = snapshot
        .recipe_equipment
        .iter()
        .filter(|l| l.equipment_id == id)
        .map(|l| l.recipe_id.as_str())
        .collect();
    Some(ItemDetail {
        item,
        used_in_recipes: recipes_using(snapshot, recipe_ids),
    })
}

pub fn list_equipment(session: &Session, query: Option<&str>) -> ListResponse<Equipment> {
    let items: Vec<Equipment> = session
        .catalog()
        .equipment()
        .iter()
        .filter(|e| name_matches(&e.name, query))
        .cloned()
        .collect();
    ListResponse {
        total: items.len(),
        items,
    }
}

pub fn delete_equipment(session: &mut Session, id: &str) -> Result<DeleteResponse, String> {
    let name = session
        .catalog()
        .equipment_item(id)
        .map(|e| e.name.clone())
        .unwrap_or_default();
    let cascade = session
        .mutate(|c| c.delete_equipment(id))
        .map_err(|e| format!("Failed to delete equipment: {}", e))?;
    tracing::info!("Deleted equipment {} and {} recipe lines", id, cascade.total());
    Ok(delete_response(id, name, cascade))
}

pub fn validate_energy_formula(formula: &str) -> ValidateFormulaResponse {
    match validate_formula(formula) {
        Ok(()) => ValidateFormulaResponse {
            formula: formula.to_string(),
            valid: true,
            error: None,
            sample_kwh: Some(compute_energy(1000.0, 1.0, Some(formula))),
        },
        Err(e) => ValidateFormulaResponse {
            formula: formula.to_string(),
            valid: false,
            error: Some(e.to_string()),
            sample_kwh: None,
        },
    }
}

// ============================================================================
// Settings
// ============================================================================

pub fn get_energy_cost(session: &Session) -> EnergyCostResponse {
    EnergyCostResponse {
        global_energy_cost: session.catalog().global_energy_cost(),
    }
}

pub fn set_energy_cost(session: &mut Session, cost: f64) -> Result<EnergyCostResponse, String> {
    let global_energy_cost = session
        .mutate(|c| c.set_global_energy_cost(cost))
        .map_err(|e| format!("Failed to set energy cost: {}", e))?;
    tracing::info!("Global energy cost set to {}", global_energy_cost);
    Ok(EnergyCostResponse { global_energy_cost })
}
