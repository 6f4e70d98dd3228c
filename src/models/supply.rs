//! Supply model
//!
//! Packaging and other consumables (boxes, liners, ribbons) used per recipe.

use serde::{Deserialize, Serialize};

use crate::costing::{derive_unit_cost, finite_or};

/// Display unit used when a supply has none
pub const DEFAULT_SUPPLY_UNIT: &str = "unit";

/// A supply with package pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    pub id: String,
    pub name: String,
    pub package_quantity: f64,
    pub package_unit: String,
    pub package_cost: f64,
    pub unit_cost: f64,
}

/// Data for creating or replacing a supply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplyUpsert {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub package_quantity: f64,
    pub package_unit: Option<String>,
    #[serde(default)]
    pub package_cost: f64,
}

impl Supply {
    pub const ID_PREFIX: &'static str = "sup";

    /// Build the stored record; the unit cost is always derived
    pub fn from_upsert(id: String, data: &SupplyUpsert) -> Self {
        let package_quantity = finite_or(data.package_quantity, 0.0);
        let package_cost = finite_or(data.package_cost, 0.0);

        Self {
            id,
            name: data.name.trim().to_string(),
            package_quantity,
            package_unit: data
                .package_unit
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(DEFAULT_SUPPLY_UNIT)
                .to_string(),
            package_cost,
            unit_cost: derive_unit_cost(package_cost, package_quantity),
        }
    }
}
