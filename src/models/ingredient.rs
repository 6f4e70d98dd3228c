//! Ingredient model
//!
//! A baking ingredient bought in packages, with a derived per-unit cost.

use serde::{Deserialize, Serialize};

use crate::costing::{derive_unit_cost, finite_or};

/// Display unit used when an ingredient has none
pub const DEFAULT_INGREDIENT_UNIT: &str = "g";

/// An ingredient with package pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// Measurement unit recipes use for this ingredient (e.g. "g", "units")
    pub unit: String,
    pub package_quantity: f64,
    pub package_unit: String,
    pub package_cost: f64,
    /// Cost of one `unit`, derived from the package when its quantity is positive
    pub unit_cost: f64,
    pub supplier: Option<String>,
}

/// Data for creating or replacing an ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientUpsert {
    /// Existing ID to replace; a new ID is assigned when absent
    pub id: Option<String>,
    pub name: String,
    pub unit: Option<String>,
    #[serde(default)]
    pub package_quantity: f64,
    pub package_unit: Option<String>,
    #[serde(default)]
    pub package_cost: f64,
    /// Only used when the package quantity is not positive
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
}

impl Ingredient {
    pub const ID_PREFIX: &'static str = "ing";

    /// Build the stored record, re-deriving the unit cost
    pub fn from_upsert(id: String, data: &IngredientUpsert) -> Self {
        let package_quantity = finite_or(data.package_quantity, 0.0);
        let package_cost = finite_or(data.package_cost, 0.0);

        let unit_cost = if package_quantity > 0.0 {
            derive_unit_cost(package_cost, package_quantity)
        } else {
            data.unit_cost.map_or(0.0, |c| finite_or(c, 0.0))
        };

        let unit = data
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_INGREDIENT_UNIT)
            .to_string();

        Self {
            id,
            name: data.name.trim().to_string(),
            unit,
            package_quantity,
            package_unit: data.package_unit.as_deref().unwrap_or("").trim().to_string(),
            package_cost,
            unit_cost,
            supplier: data
                .supplier
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}
