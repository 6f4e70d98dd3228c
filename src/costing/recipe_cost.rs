//! Single-recipe cost calculator
//!
//! Scales a recipe's per-batch component quantities to a requested number of
//! units and prices ingredients, supplies and equipment energy.

use serde::Serialize;

use super::formula::compute_energy;
use super::normalize::finite_or;
use crate::models::{Equipment, Ingredient, Recipe, Supply, DEFAULT_ENERGY_COST};

/// Ingredient used by a recipe; `ingredient` is `None` when the link dangles
#[derive(Debug, Clone, Copy)]
pub struct IngredientUsage<'a> {
    pub ingredient: Option<&'a Ingredient>,
    /// Quantity per batch of the recipe's base yield
    pub quantity: f64,
}

/// Supply used by a recipe; `supply` is `None` when the link dangles
#[derive(Debug, Clone, Copy)]
pub struct SupplyUsage<'a> {
    pub supply: Option<&'a Supply>,
    pub quantity: f64,
}

/// Equipment used by a recipe; `hours` is per batch and never scaled here
#[derive(Debug, Clone, Copy)]
pub struct EquipmentUsage<'a> {
    pub equipment: Option<&'a Equipment>,
    pub hours: f64,
}

/// A priced ingredient or supply line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRow {
    pub item_id: String,
    pub name: String,
    pub required_quantity: f64,
    pub unit: String,
    pub cost: f64,
}

/// A priced equipment energy line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyRow {
    pub item_id: String,
    pub name: String,
    pub time_hours: f64,
    pub kwh: f64,
    pub energy_unit_cost: f64,
    pub cost: f64,
}

/// Result of costing one recipe for a number of units
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub ingredients: Vec<CostRow>,
    pub supplies: Vec<CostRow>,
    pub energy: Vec<EnergyRow>,
    pub total_ingredients: f64,
    pub total_supplies: f64,
    pub total_energy: f64,
    pub total: f64,
    pub unit_cost: f64,
    pub requested_units: f64,
    pub base_yield: f64,
}

/// `base_quantity * (requested_units / base_yield)`
pub fn required_quantity(base_quantity: f64, requested_units: f64, base_yield: f64) -> f64 {
    base_quantity * (requested_units / base_yield)
}

/// The equipment's own kWh cost when set and positive, else the global one
pub fn effective_energy_unit_cost(equipment: &Equipment, global_energy_cost: f64) -> f64 {
    match equipment.energy_cost {
        Some(cost) if cost.is_finite() && cost > 0.0 => cost,
        _ => finite_or(global_energy_cost, DEFAULT_ENERGY_COST),
    }
}

/// Cost a recipe for `requested_units`.
///
/// Returns an all-zero breakdown when the recipe is missing, the requested
/// units are not positive or the base yield is not positive. Usages whose
/// catalog item is missing are skipped.
pub fn calculate_recipe_cost(
    recipe: Option<&Recipe>,
    ingredients: &[IngredientUsage<'_>],
    supplies: &[SupplyUsage<'_>],
    equipment: &[EquipmentUsage<'_>],
    requested_units: f64,
    global_energy_cost: f64,
) -> CostBreakdown {
    let requested_units = finite_or(requested_units, 0.0);
    let base_yield = recipe.map_or(0.0, |r| finite_or(r.base_yield, 0.0));

    let mut breakdown = CostBreakdown {
        requested_units,
        base_yield,
        ..Default::default()
    };

    if recipe.is_none() || requested_units <= 0.0 || base_yield <= 0.0 {
        return breakdown;
    }

    for usage in ingredients {
        let Some(ingredient) = usage.ingredient else {
            continue;
        };
        let required = required_quantity(finite_or(usage.quantity, 0.0), requested_units, base_yield);
        let cost = required * finite_or(ingredient.unit_cost, 0.0);
        breakdown.total_ingredients += cost;
        breakdown.ingredients.push(CostRow {
            item_id: ingredient.id.clone(),
            name: ingredient.name.clone(),
            required_quantity: required,
            unit: ingredient.unit.clone(),
            cost,
        });
    }

    for usage in supplies {
        let Some(supply) = usage.supply else {
            continue;
        };
        let required = required_quantity(finite_or(usage.quantity, 0.0), requested_units, base_yield);
        let cost = required * finite_or(supply.unit_cost, 0.0);
        breakdown.total_supplies += cost;
        breakdown.supplies.push(CostRow {
            item_id: supply.id.clone(),
            name: supply.name.clone(),
            required_quantity: required,
            unit: supply.package_unit.clone(),
            cost,
        });
    }

    for usage in equipment {
        let Some(item) = usage.equipment else {
            continue;
        };
        let hours = finite_or(usage.hours, 0.0);
        let kwh = compute_energy(item.power_watts, hours, Some(&item.formula));
        let energy_unit_cost = effective_energy_unit_cost(item, global_energy_cost);
        let cost = kwh * energy_unit_cost;
        breakdown.total_energy += cost;
        breakdown.energy.push(EnergyRow {
            item_id: item.id.clone(),
            name: item.name.clone(),
            time_hours: hours,
            kwh,
            energy_unit_cost,
            cost,
        });
    }

    breakdown.total = breakdown.total_ingredients + breakdown.total_supplies + breakdown.total_energy;
    breakdown.unit_cost = breakdown.total / requested_units;
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EquipmentUpsert, IngredientUpsert, RecipeUpsert, SupplyUpsert};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn flour() -> Ingredient {
        Ingredient::from_upsert(
            "ing_flour".to_string(),
            &IngredientUpsert {
                name: "Flour".to_string(),
                package_quantity: 1000.0,
                package_cost: 1000.0,
                ..Default::default()
            },
        )
    }

    fn cupcakes() -> Recipe {
        Recipe::from_upsert(
            "rec_cupcakes".to_string(),
            &RecipeUpsert {
                name: "Cupcakes".to_string(),
                base_yield: Some(12.0),
                ..Default::default()
            },
        )
    }

    fn oven(energy_cost: Option<f64>) -> Equipment {
        Equipment::from_upsert(
            "eq_oven".to_string(),
            &EquipmentUpsert {
                name: "Oven".to_string(),
                power_watts: 2000.0,
                energy_cost,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_cupcakes_for_24_units() {
        let flour = flour();
        let recipe = cupcakes();
        let usages = [IngredientUsage { ingredient: Some(&flour), quantity: 200.0 }];

        let result = calculate_recipe_cost(Some(&recipe), &usages, &[], &[], 24.0, 230.0);

        assert_eq!(result.ingredients.len(), 1);
        assert!(approx(result.ingredients[0].required_quantity, 400.0));
        assert_eq!(result.ingredients[0].unit, "g");
        assert!(approx(result.total_ingredients, 400.0));
        assert!(approx(result.total, 400.0));
        assert!(approx(result.unit_cost, 400.0 / 24.0));
        assert_eq!(result.requested_units, 24.0);
        assert_eq!(result.base_yield, 12.0);
    }

    #[test]
    fn test_required_quantity_is_linear() {
        assert!(approx(required_quantity(200.0, 12.0, 12.0), 200.0));
        let single = required_quantity(35.0, 7.0, 3.0);
        let double = required_quantity(35.0, 14.0, 3.0);
        assert!(approx(double, 2.0 * single));
    }

    #[test]
    fn test_energy_uses_global_cost_when_item_has_none() {
        let recipe = cupcakes();
        let oven = oven(None);
        let usages = [EquipmentUsage { equipment: Some(&oven), hours: 1.5 }];

        let result = calculate_recipe_cost(Some(&recipe), &[], &[], &usages, 12.0, 230.0);

        assert!(approx(result.energy[0].kwh, 3.0));
        assert!(approx(result.energy[0].energy_unit_cost, 230.0));
        assert!(approx(result.total_energy, 690.0));
    }

    #[test]
    fn test_energy_hours_not_scaled_by_units() {
        let recipe = cupcakes();
        let oven = oven(Some(100.0));
        let usages = [EquipmentUsage { equipment: Some(&oven), hours: 1.0 }];

        let result = calculate_recipe_cost(Some(&recipe), &[], &[], &usages, 48.0, 230.0);

        assert_eq!(result.energy[0].time_hours, 1.0);
        assert!(approx(result.total_energy, 200.0));
    }

    #[test]
    fn test_effective_energy_cost_precedence() {
        assert_eq!(effective_energy_unit_cost(&oven(Some(150.0)), 230.0), 150.0);
        assert_eq!(effective_energy_unit_cost(&oven(Some(0.0)), 230.0), 230.0);
        assert_eq!(effective_energy_unit_cost(&oven(None), f64::NAN), 230.0);
    }

    #[test]
    fn test_supply_rows_use_package_unit() {
        let recipe = cupcakes();
        let liners = Supply::from_upsert(
            "sup_liners".to_string(),
            &SupplyUpsert {
                name: "Liners".to_string(),
                package_quantity: 100.0,
                package_cost: 500.0,
                package_unit: Some("liner".to_string()),
                ..Default::default()
            },
        );
        let usages = [SupplyUsage { supply: Some(&liners), quantity: 12.0 }];

        let result = calculate_recipe_cost(Some(&recipe), &[], &usages, &[], 24.0, 230.0);

        assert_eq!(result.supplies[0].unit, "liner");
        assert!(approx(result.supplies[0].required_quantity, 24.0));
        assert!(approx(result.total_supplies, 120.0));
    }

    #[test]
    fn test_degenerate_inputs_give_zero() {
        let flour = flour();
        let usages = [IngredientUsage { ingredient: Some(&flour), quantity: 200.0 }];

        let zero_units = calculate_recipe_cost(Some(&cupcakes()), &usages, &[], &[], 0.0, 230.0);
        assert!(zero_units.ingredients.is_empty());
        assert_eq!(zero_units.total, 0.0);
        assert_eq!(zero_units.unit_cost, 0.0);

        let mut flat = cupcakes();
        flat.base_yield = 0.0;
        let zero_yield = calculate_recipe_cost(Some(&flat), &usages, &[], &[], 10.0, 230.0);
        assert!(zero_yield.ingredients.is_empty());
        assert_eq!(zero_yield.total, 0.0);
        assert_eq!(zero_yield.unit_cost, 0.0);

        let missing = calculate_recipe_cost(None, &usages, &[], &[], 10.0, 230.0);
        assert_eq!(missing.total, 0.0);
    }

    #[test]
    fn test_dangling_usage_skipped() {
        let flour = flour();
        let usages = [
            IngredientUsage { ingredient: None, quantity: 50.0 },
            IngredientUsage { ingredient: Some(&flour), quantity: 100.0 },
        ];

        let result = calculate_recipe_cost(Some(&cupcakes()), &usages, &[], &[], 12.0, 230.0);

        assert_eq!(result.ingredients.len(), 1);
        assert!(approx(result.total, 100.0));
    }
}
