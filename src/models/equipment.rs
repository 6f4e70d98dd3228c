//! Equipment model
//!
//! Ovens, mixers and other appliances whose energy use is charged to recipes.

use serde::{Deserialize, Serialize};

use crate::costing::{finite_or, DEFAULT_FORMULA};

/// An appliance with a rated power and an energy formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub power_watts: f64,
    /// Item-specific cost per kWh; `None` uses the global energy cost
    pub energy_cost: Option<f64>,
    /// kWh formula over `power` and `time`
    pub formula: String,
}

/// Data for creating or replacing an equipment item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentUpsert {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub power_watts: f64,
    pub energy_cost: Option<f64>,
    pub formula: Option<String>,
}

impl Equipment {
    pub const ID_PREFIX: &'static str = "eq";

    pub fn from_upsert(id: String, data: &EquipmentUpsert) -> Self {
        Self {
            id,
            name: data.name.trim().to_string(),
            power_watts: finite_or(data.power_watts, 0.0),
            energy_cost: data.energy_cost.filter(|c| c.is_finite()),
            formula: data
                .formula
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .unwrap_or(DEFAULT_FORMULA)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_formula_gets_default() {
        let data = EquipmentUpsert {
            name: "Oven".to_string(),
            power_watts: 2000.0,
            formula: Some("  ".to_string()),
            ..Default::default()
        };
        let item = Equipment::from_upsert("eq_1".to_string(), &data);
        assert_eq!(item.formula, DEFAULT_FORMULA);
        assert_eq!(item.energy_cost, None);
    }

    #[test]
    fn test_non_finite_energy_cost_dropped() {
        let data = EquipmentUpsert {
            name: "Mixer".to_string(),
            energy_cost: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(Equipment::from_upsert("eq_2".to_string(), &data).energy_cost, None);
    }
}
