//! Read-only catalog access for the calculators

use super::recipe_cost::{
    calculate_recipe_cost, CostBreakdown, EquipmentUsage, IngredientUsage, SupplyUsage,
};
use crate::models::{
    Equipment, Ingredient, Recipe, RecipeEquipment, RecipeIngredient, RecipeSupply, Supply,
};

/// Item and link lookups the calculators need
pub trait CostLookup {
    fn ingredient(&self, id: &str) -> Option<&Ingredient>;
    fn supply(&self, id: &str) -> Option<&Supply>;
    fn equipment(&self, id: &str) -> Option<&Equipment>;
    fn ingredient_links(&self, recipe_id: &str) -> Vec<&RecipeIngredient>;
    fn supply_links(&self, recipe_id: &str) -> Vec<&RecipeSupply>;
    fn equipment_links(&self, recipe_id: &str) -> Vec<&RecipeEquipment>;
    fn global_energy_cost(&self) -> f64;
}

/// A recipe's component usages with their catalog items resolved
#[derive(Debug, Clone, Default)]
pub struct RecipeUsages<'a> {
    pub ingredients: Vec<IngredientUsage<'a>>,
    pub supplies: Vec<SupplyUsage<'a>>,
    pub equipment: Vec<EquipmentUsage<'a>>,
}

pub fn recipe_usages<'a, L: CostLookup + ?Sized>(lookup: &'a L, recipe_id: &str) -> RecipeUsages<'a> {
    RecipeUsages {
        ingredients: lookup
            .ingredient_links(recipe_id)
            .into_iter()
            .map(|link| IngredientUsage {
                ingredient: lookup.ingredient(&link.ingredient_id),
                quantity: link.quantity,
            })
            .collect(),
        supplies: lookup
            .supply_links(recipe_id)
            .into_iter()
            .map(|link| SupplyUsage {
                supply: lookup.supply(&link.supply_id),
                quantity: link.quantity,
            })
            .collect(),
        equipment: lookup
            .equipment_links(recipe_id)
            .into_iter()
            .map(|link| EquipmentUsage {
                equipment: lookup.equipment(&link.equipment_id),
                hours: link.hours,
            })
            .collect(),
    }
}

/// Cost a catalog recipe for `requested_units`
pub fn cost_recipe<L: CostLookup + ?Sized>(
    lookup: &L,
    recipe: &Recipe,
    requested_units: f64,
) -> CostBreakdown {
    let usages = recipe_usages(lookup, &recipe.id);
    calculate_recipe_cost(
        Some(recipe),
        &usages.ingredients,
        &usages.supplies,
        &usages.equipment,
        requested_units,
        lookup.global_energy_cost(),
    )
}
