//! Recipe component links
//!
//! Join records between a recipe and the catalog items it consumes. Quantities
//! are per batch of the recipe's base yield; equipment time is per batch and is
//! not scaled by yield.

use serde::{Deserialize, Serialize};

/// Ingredient quantity used by one batch of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: String,
    pub recipe_id: String,
    pub ingredient_id: String,
    pub quantity: f64,
}

/// Supply quantity used by one batch of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSupply {
    pub id: String,
    pub recipe_id: String,
    pub supply_id: String,
    pub quantity: f64,
}

/// Equipment hours used by one batch of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeEquipment {
    pub id: String,
    pub recipe_id: String,
    pub equipment_id: String,
    pub hours: f64,
}

/// Data for adding or changing a recipe ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientUpsert {
    pub id: Option<String>,
    pub recipe_id: String,
    pub ingredient_id: String,
    pub quantity: f64,
}

/// Data for adding or changing a recipe supply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSupplyUpsert {
    pub id: Option<String>,
    pub recipe_id: String,
    pub supply_id: String,
    pub quantity: f64,
}

/// Data for adding or changing recipe equipment usage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeEquipmentUpsert {
    pub id: Option<String>,
    pub recipe_id: String,
    pub equipment_id: String,
    pub hours: f64,
}

impl RecipeIngredient {
    pub const ID_PREFIX: &'static str = "ring";
}

impl RecipeSupply {
    pub const ID_PREFIX: &'static str = "rsup";
}

impl RecipeEquipment {
    pub const ID_PREFIX: &'static str = "req";
}
