//! Multi-recipe consolidation
//!
//! Aggregates the component usage of several selected recipes into one row per
//! catalog item, keyed by item id and kept in first-appearance order.

use std::collections::HashMap;

use serde::Serialize;

use super::lookup::{cost_recipe, CostLookup};
use super::normalize::finite_or;
use super::recipe_cost::{effective_energy_unit_cost, CostBreakdown};
use crate::models::Recipe;

/// Supplier label for ingredients without one
pub const NO_SUPPLIER: &str = "No supplier";

/// A recipe to produce `multiplier` times its base yield
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub recipe: &'a Recipe,
    pub multiplier: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedIngredientRow {
    pub item_id: String,
    pub name: String,
    pub supplier: String,
    pub quantity: f64,
    pub unit: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedSupplyRow {
    pub item_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedEnergyRow {
    pub item_id: String,
    pub name: String,
    pub hours: f64,
    pub kwh: f64,
    pub cost: f64,
}

/// Drill-down entry for one selected recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeBreakdown {
    pub recipe_id: String,
    pub recipe_name: String,
    pub multiplier: u32,
    pub units: f64,
    pub cost: CostBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsolidatedResult {
    pub ingredients: Vec<ConsolidatedIngredientRow>,
    pub supplies: Vec<ConsolidatedSupplyRow>,
    pub energy: Vec<ConsolidatedEnergyRow>,
    pub total_ingredients: f64,
    pub total_supplies: f64,
    pub total_energy: f64,
    pub total: f64,
    pub unit_cost: f64,
    pub total_units: f64,
    pub recipes: Vec<RecipeBreakdown>,
}

/// Rows keyed by item id, iterated in insertion order
struct Keyed<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Keyed<T> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn entry(&mut self, key: &str, create: impl FnOnce() -> T) -> &mut T {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                self.rows.push(create());
                self.index.insert(key.to_string(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[pos]
    }
}

fn yield_or_one(recipe: &Recipe) -> f64 {
    let base_yield = finite_or(recipe.base_yield, 0.0);
    if base_yield > 0.0 {
        base_yield
    } else {
        1.0
    }
}

/// Consolidate the selected recipes into a shopping list.
///
/// Equipment rows scale hours by the multiplier and price energy as
/// `(power / 1000) * hours` at the effective kWh cost. The per-recipe
/// breakdowns go through the single-recipe calculator, which applies each
/// equipment formula to the unscaled hours.
pub fn consolidate<L: CostLookup + ?Sized>(lookup: &L, selections: &[Selection<'_>]) -> ConsolidatedResult {
    let global_energy_cost = lookup.global_energy_cost();
    let mut ingredients = Keyed::new();
    let mut supplies = Keyed::new();
    let mut energy = Keyed::new();
    let mut result = ConsolidatedResult::default();

    for selection in selections {
        let recipe = selection.recipe;
        let multiplier = selection.multiplier.max(1);
        let base_yield = yield_or_one(recipe);
        let units = f64::from(multiplier) * base_yield;
        result.total_units += units;

        for link in lookup.ingredient_links(&recipe.id) {
            let Some(ingredient) = lookup.ingredient(&link.ingredient_id) else {
                continue;
            };
            let quantity = (finite_or(link.quantity, 0.0) / base_yield) * units;
            let cost = quantity * finite_or(ingredient.unit_cost, 0.0);
            let row = ingredients.entry(&ingredient.id, || ConsolidatedIngredientRow {
                item_id: ingredient.id.clone(),
                name: ingredient.name.clone(),
                supplier: ingredient
                    .supplier
                    .clone()
                    .unwrap_or_else(|| NO_SUPPLIER.to_string()),
                quantity: 0.0,
                unit: ingredient.unit.clone(),
                cost: 0.0,
            });
            row.quantity += quantity;
            row.cost += cost;
        }

        for link in lookup.supply_links(&recipe.id) {
            let Some(supply) = lookup.supply(&link.supply_id) else {
                continue;
            };
            let quantity = (finite_or(link.quantity, 0.0) / base_yield) * units;
            let cost = quantity * finite_or(supply.unit_cost, 0.0);
            let row = supplies.entry(&supply.id, || ConsolidatedSupplyRow {
                item_id: supply.id.clone(),
                name: supply.name.clone(),
                quantity: 0.0,
                unit: supply.package_unit.clone(),
                cost: 0.0,
            });
            row.quantity += quantity;
            row.cost += cost;
        }

        for link in lookup.equipment_links(&recipe.id) {
            let Some(item) = lookup.equipment(&link.equipment_id) else {
                continue;
            };
            let hours = finite_or(link.hours, 0.0) * f64::from(multiplier);
            let power_watts = finite_or(item.power_watts, 0.0);
            let kwh = (power_watts / 1000.0) * hours;
            let cost = kwh * effective_energy_unit_cost(item, global_energy_cost);
            let row = energy.entry(&item.id, || ConsolidatedEnergyRow {
                item_id: item.id.clone(),
                name: item.name.clone(),
                hours: 0.0,
                kwh: 0.0,
                cost: 0.0,
            });
            row.hours += hours;
            row.kwh += kwh;
            row.cost += cost;
        }

        result.recipes.push(RecipeBreakdown {
            recipe_id: recipe.id.clone(),
            recipe_name: recipe.name.clone(),
            multiplier,
            units,
            cost: cost_recipe(lookup, recipe, units),
        });
    }

    result.ingredients = ingredients.rows;
    result.supplies = supplies.rows;
    result.energy = energy.rows;

    result.total_ingredients = result.ingredients.iter().map(|r| r.cost).sum();
    result.total_supplies = result.supplies.iter().map(|r| r.cost).sum();
    result.total_energy = result.energy.iter().map(|r| r.cost).sum();
    result.total = result.total_ingredients + result.total_supplies + result.total_energy;
    result.unit_cost = if result.total_units > 0.0 {
        result.total / result.total_units
    } else {
        0.0
    };

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CatalogSnapshot, Equipment, EquipmentUpsert, Ingredient, IngredientUpsert,
        RecipeEquipment, RecipeIngredient, RecipeUpsert,
    };

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn ingredient(id: &str, name: &str, cost: f64, qty: f64, supplier: Option<&str>) -> Ingredient {
        Ingredient::from_upsert(
            id.to_string(),
            &IngredientUpsert {
                name: name.to_string(),
                package_cost: cost,
                package_quantity: qty,
                supplier: supplier.map(str::to_string),
                ..Default::default()
            },
        )
    }

    fn recipe(id: &str, name: &str, base_yield: f64) -> Recipe {
        Recipe::from_upsert(
            id.to_string(),
            &RecipeUpsert {
                name: name.to_string(),
                base_yield: Some(base_yield),
                ..Default::default()
            },
        )
    }

    fn link(recipe_id: &str, ingredient_id: &str, quantity: f64) -> RecipeIngredient {
        RecipeIngredient {
            id: format!("ring_{}_{}", recipe_id, ingredient_id),
            recipe_id: recipe_id.to_string(),
            ingredient_id: ingredient_id.to_string(),
            quantity,
        }
    }

    fn bakery() -> CatalogSnapshot {
        CatalogSnapshot {
            ingredients: vec![
                ingredient("ing_flour", "Flour", 1000.0, 1000.0, Some("Mill")),
                ingredient("ing_sugar", "Sugar", 800.0, 1000.0, None),
                ingredient("ing_butter", "Butter", 2000.0, 500.0, Some("Dairy")),
            ],
            recipes: vec![
                recipe("rec_cupcakes", "Cupcakes", 12.0),
                recipe("rec_bread", "Bread", 1.0),
                recipe("rec_cookies", "Cookies", 20.0),
            ],
            recipe_ingredients: vec![
                link("rec_cupcakes", "ing_flour", 200.0),
                link("rec_cupcakes", "ing_sugar", 150.0),
                link("rec_bread", "ing_flour", 50.0),
                link("rec_cookies", "ing_butter", 100.0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_shared_ingredient_summed_once() {
        let catalog = bakery();
        let selections = [
            Selection { recipe: catalog.recipe("rec_cupcakes").unwrap(), multiplier: 2 },
            Selection { recipe: catalog.recipe("rec_bread").unwrap(), multiplier: 1 },
        ];

        let result = consolidate(&catalog, &selections);

        let flour: Vec<_> = result.ingredients.iter().filter(|r| r.item_id == "ing_flour").collect();
        assert_eq!(flour.len(), 1);
        assert!(approx(flour[0].quantity, 450.0));
        assert!(approx(flour[0].cost, 450.0));
        assert_eq!(flour[0].supplier, "Mill");
        assert_eq!(result.total_units, 25.0);
        assert_eq!(result.recipes.len(), 2);
        assert_eq!(result.recipes[0].units, 24.0);
    }

    #[test]
    fn test_rows_keep_first_appearance_order() {
        let catalog = bakery();
        let selections = [
            Selection { recipe: catalog.recipe("rec_cupcakes").unwrap(), multiplier: 1 },
            Selection { recipe: catalog.recipe("rec_cookies").unwrap(), multiplier: 1 },
        ];

        let result = consolidate(&catalog, &selections);
        let names: Vec<_> = result.ingredients.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Flour", "Sugar", "Butter"]);
        assert_eq!(result.ingredients[1].supplier, NO_SUPPLIER);
    }

    #[test]
    fn test_disjoint_recipes_are_additive() {
        let catalog = bakery();
        let cupcakes = catalog.recipe("rec_cupcakes").unwrap();
        let cookies = catalog.recipe("rec_cookies").unwrap();
        let selections = [
            Selection { recipe: cupcakes, multiplier: 3 },
            Selection { recipe: cookies, multiplier: 2 },
        ];

        let result = consolidate(&catalog, &selections);
        let separate = cost_recipe(&catalog, cupcakes, 36.0).total
            + cost_recipe(&catalog, cookies, 40.0).total;

        assert!(approx(result.total, separate));
        assert!(approx(result.unit_cost, separate / 76.0));
    }

    #[test]
    fn test_equipment_hours_scale_by_multiplier() {
        let mut catalog = bakery();
        catalog.equipment.push(Equipment::from_upsert(
            "eq_oven".to_string(),
            &EquipmentUpsert {
                name: "Oven".to_string(),
                power_watts: 2000.0,
                formula: Some("power * time".to_string()),
                ..Default::default()
            },
        ));
        catalog.recipe_equipment.push(RecipeEquipment {
            id: "req_1".to_string(),
            recipe_id: "rec_bread".to_string(),
            equipment_id: "eq_oven".to_string(),
            hours: 1.5,
        });
        let selections = [Selection { recipe: catalog.recipe("rec_bread").unwrap(), multiplier: 2 }];

        let result = consolidate(&catalog, &selections);

        assert_eq!(result.energy.len(), 1);
        assert!(approx(result.energy[0].hours, 3.0));
        assert!(approx(result.energy[0].kwh, 6.0));
        assert!(approx(result.energy[0].cost, 6.0 * 230.0));
        // breakdown applies the item's formula to the unscaled hours
        assert!(approx(result.recipes[0].cost.energy[0].kwh, 3000.0));
    }

    #[test]
    fn test_missing_items_skipped() {
        let mut catalog = bakery();
        catalog.ingredients.retain(|i| i.id != "ing_sugar");
        let selections = [Selection { recipe: catalog.recipe("rec_cupcakes").unwrap(), multiplier: 1 }];

        let result = consolidate(&catalog, &selections);

        assert_eq!(result.ingredients.len(), 1);
        assert!(approx(result.total, 200.0));
    }

    #[test]
    fn test_empty_selection() {
        let result = consolidate(&bakery(), &[]);
        assert_eq!(result.total, 0.0);
        assert_eq!(result.unit_cost, 0.0);
        assert_eq!(result.total_units, 0.0);
    }
}
