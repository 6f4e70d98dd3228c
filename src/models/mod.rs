//! Data models
//!
//! Catalog records, their upsert payloads and the full catalog snapshot.

mod equipment;
mod id;
mod ingredient;
mod recipe;
mod recipe_link;
mod snapshot;
mod supply;

pub use equipment::{Equipment, EquipmentUpsert};
pub use id::generate_id;
pub use ingredient::{Ingredient, IngredientUpsert, DEFAULT_INGREDIENT_UNIT};
pub use recipe::{normalize_yield, Recipe, RecipeUpsert};
pub use recipe_link::{
    RecipeEquipment, RecipeEquipmentUpsert, RecipeIngredient, RecipeIngredientUpsert,
    RecipeSupply, RecipeSupplyUpsert,
};
pub use snapshot::{CatalogCounts, CatalogSnapshot, DEFAULT_ENERGY_COST};
pub use supply::{Supply, SupplyUpsert, DEFAULT_SUPPLY_UNIT};
