//! Cost ranking and supplier grouping for shopping-list reports

use serde::Serialize;

use super::consolidate::{ConsolidatedIngredientRow, ConsolidatedResult};

/// Number of items shown in the cost chart
pub const DEFAULT_TOP_ITEMS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Ingredient,
    Supply,
    Energy,
}

impl CostCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CostCategory::Ingredient => "Ingredient",
            CostCategory::Supply => "Supply",
            CostCategory::Energy => "Energy",
        }
    }
}

/// One line of the consolidated result and its share of the total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostShare {
    pub name: String,
    pub category: CostCategory,
    pub cost: f64,
    pub percentage: f64,
}

/// The `limit` most expensive lines, most expensive first
pub fn top_cost_items(result: &ConsolidatedResult, limit: usize) -> Vec<CostShare> {
    let share = |cost: f64| {
        if result.total > 0.0 {
            cost / result.total * 100.0
        } else {
            0.0
        }
    };

    let ingredients = result
        .ingredients
        .iter()
        .map(|r| (r.name.as_str(), CostCategory::Ingredient, r.cost));
    let supplies = result
        .supplies
        .iter()
        .map(|r| (r.name.as_str(), CostCategory::Supply, r.cost));
    let energy = result
        .energy
        .iter()
        .map(|r| (r.name.as_str(), CostCategory::Energy, r.cost));

    let mut items: Vec<CostShare> = ingredients
        .chain(supplies)
        .chain(energy)
        .map(|(name, category, cost)| CostShare {
            name: name.to_string(),
            category,
            cost,
            percentage: share(cost),
        })
        .collect();

    // stable sort keeps list order among equal costs
    items.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    items.truncate(limit);
    items
}

/// Ingredient rows grouped by supplier, groups in first-appearance order
pub fn group_by_supplier(
    rows: &[ConsolidatedIngredientRow],
) -> Vec<(String, Vec<&ConsolidatedIngredientRow>)> {
    let mut groups: Vec<(String, Vec<&ConsolidatedIngredientRow>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(supplier, _)| *supplier == row.supplier) {
            Some((_, members)) => members.push(row),
            None => groups.push((row.supplier.clone(), vec![row])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::consolidate::{ConsolidatedEnergyRow, ConsolidatedSupplyRow};

    fn ingredient_row(name: &str, supplier: &str, cost: f64) -> ConsolidatedIngredientRow {
        ConsolidatedIngredientRow {
            item_id: format!("ing_{}", name),
            name: name.to_string(),
            supplier: supplier.to_string(),
            quantity: 1.0,
            unit: "g".to_string(),
            cost,
        }
    }

    fn sample() -> ConsolidatedResult {
        ConsolidatedResult {
            ingredients: vec![
                ingredient_row("Flour", "Mill", 400.0),
                ingredient_row("Sugar", "No supplier", 100.0),
                ingredient_row("Bran", "Mill", 50.0),
            ],
            supplies: vec![ConsolidatedSupplyRow {
                item_id: "sup_box".to_string(),
                name: "Box".to_string(),
                quantity: 2.0,
                unit: "unit".to_string(),
                cost: 150.0,
            }],
            energy: vec![ConsolidatedEnergyRow {
                item_id: "eq_oven".to_string(),
                name: "Oven".to_string(),
                hours: 1.0,
                kwh: 1.3,
                cost: 300.0,
            }],
            total: 1000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_top_items_sorted_with_percentages() {
        let top = top_cost_items(&sample(), 3);
        let names: Vec<_> = top.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Flour", "Oven", "Box"]);
        assert_eq!(top[0].percentage, 40.0);
        assert_eq!(top[1].category, CostCategory::Energy);
    }

    #[test]
    fn test_zero_total_has_zero_percentages() {
        let result = ConsolidatedResult {
            ingredients: vec![ingredient_row("Salt", "Mill", 0.0)],
            ..Default::default()
        };
        let top = top_cost_items(&result, DEFAULT_TOP_ITEMS);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].percentage, 0.0);
    }

    #[test]
    fn test_group_by_supplier() {
        let result = sample();
        let groups = group_by_supplier(&result.ingredients);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Mill");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "No supplier");
    }
}
