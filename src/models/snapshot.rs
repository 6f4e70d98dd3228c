//! Catalog snapshot
//!
//! The full catalog state: seven ordered collections plus the global energy
//! cost. This is the unit of caching, import and export.

use serde::{Deserialize, Serialize};

use super::{
    Equipment, Ingredient, Recipe, RecipeEquipment, RecipeIngredient, RecipeSupply, Supply,
};
use crate::costing::CostLookup;

/// Cost per kWh used when nothing else is configured
pub const DEFAULT_ENERGY_COST: f64 = 230.0;

fn default_energy_cost() -> f64 {
    DEFAULT_ENERGY_COST
}

/// Complete catalog state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub supplies: Vec<Supply>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub recipe_ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub recipe_supplies: Vec<RecipeSupply>,
    #[serde(default)]
    pub recipe_equipment: Vec<RecipeEquipment>,
    #[serde(default = "default_energy_cost")]
    pub global_energy_cost: f64,
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self {
            ingredients: Vec::new(),
            supplies: Vec::new(),
            equipment: Vec::new(),
            recipes: Vec::new(),
            recipe_ingredients: Vec::new(),
            recipe_supplies: Vec::new(),
            recipe_equipment: Vec::new(),
            global_energy_cost: DEFAULT_ENERGY_COST,
        }
    }
}

/// Row counts per collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub ingredients: usize,
    pub supplies: usize,
    pub equipment: usize,
    pub recipes: usize,
    pub recipe_ingredients: usize,
    pub recipe_supplies: usize,
    pub recipe_equipment: usize,
}

impl CatalogSnapshot {
    pub fn counts(&self) -> CatalogCounts {
        CatalogCounts {
            ingredients: self.ingredients.len(),
            supplies: self.supplies.len(),
            equipment: self.equipment.len(),
            recipes: self.recipes.len(),
            recipe_ingredients: self.recipe_ingredients.len(),
            recipe_supplies: self.recipe_supplies.len(),
            recipe_equipment: self.recipe_equipment.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
            && self.supplies.is_empty()
            && self.equipment.is_empty()
            && self.recipes.is_empty()
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}

impl CostLookup for CatalogSnapshot {
    fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    fn supply(&self, id: &str) -> Option<&Supply> {
        self.supplies.iter().find(|s| s.id == id)
    }

    fn equipment(&self, id: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.id == id)
    }

    fn ingredient_links(&self, recipe_id: &str) -> Vec<&RecipeIngredient> {
        self.recipe_ingredients
            .iter()
            .filter(|l| l.recipe_id == recipe_id)
            .collect()
    }

    fn supply_links(&self, recipe_id: &str) -> Vec<&RecipeSupply> {
        self.recipe_supplies
            .iter()
            .filter(|l| l.recipe_id == recipe_id)
            .collect()
    }

    fn equipment_links(&self, recipe_id: &str) -> Vec<&RecipeEquipment> {
        self.recipe_equipment
            .iter()
            .filter(|l| l.recipe_id == recipe_id)
            .collect()
    }

    fn global_energy_cost(&self) -> f64 {
        self.global_energy_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let snapshot: CatalogSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, CatalogSnapshot::default());
        assert_eq!(snapshot.global_energy_cost, 230.0);
        assert!(snapshot.is_empty());
    }
}
