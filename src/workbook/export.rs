//! Snapshot to workbook

use std::collections::HashMap;

use serde_json::{json, Value};

use super::{
    Row, Workbook, CONFIG_ENERGY_COST, SHEET_CONFIG, SHEET_EQUIPMENT, SHEET_INGREDIENTS,
    SHEET_RECIPES, SHEET_RECIPE_DETAIL, SHEET_SUPPLIES,
};
use crate::models::CatalogSnapshot;

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

/// Display name for an ID; unknown IDs are written as-is
fn name_or_id(names: &HashMap<&str, &str>, id: &str) -> String {
    names.get(id).copied().unwrap_or(id).to_string()
}

fn names<'a>(items: impl Iterator<Item = (&'a str, &'a str)>) -> HashMap<&'a str, &'a str> {
    items.collect()
}

/// Build the workbook for a snapshot
pub fn export_snapshot(snapshot: &CatalogSnapshot) -> Workbook {
    let mut workbook = Workbook::default();

    workbook.add_sheet(
        SHEET_INGREDIENTS,
        snapshot
            .ingredients
            .iter()
            .map(|i| {
                row(json!({
                    "ID": i.id,
                    "Name": i.name,
                    "Unit": i.unit,
                    "Package Cost": i.package_cost,
                    "Package Quantity": i.package_quantity,
                    "Package Unit": i.package_unit,
                    "Supplier": i.supplier,
                }))
            })
            .collect(),
    );

    workbook.add_sheet(
        SHEET_SUPPLIES,
        snapshot
            .supplies
            .iter()
            .map(|s| {
                row(json!({
                    "ID": s.id,
                    "Name": s.name,
                    "Unit": s.package_unit,
                    "Package Cost": s.package_cost,
                    "Package Quantity": s.package_quantity,
                }))
            })
            .collect(),
    );

    workbook.add_sheet(
        SHEET_EQUIPMENT,
        snapshot
            .equipment
            .iter()
            .map(|e| {
                row(json!({
                    "ID": e.id,
                    "Name": e.name,
                    "Power (Watts)": e.power_watts,
                    "kWh Cost": e.energy_cost,
                    "Formula": e.formula,
                }))
            })
            .collect(),
    );

    workbook.add_sheet(
        SHEET_RECIPES,
        snapshot
            .recipes
            .iter()
            .map(|r| {
                row(json!({
                    "ID": r.id,
                    "Name": r.name,
                    "Yield": r.base_yield,
                    "Oven Time (min)": r.oven_minutes,
                    "Oven Temp (C)": r.oven_temperature,
                    "Description": r.description,
                    "Steps": r.steps,
                }))
            })
            .collect(),
    );

    let recipe_names = names(snapshot.recipes.iter().map(|r| (r.id.as_str(), r.name.as_str())));
    let ingredient_names = names(snapshot.ingredients.iter().map(|i| (i.id.as_str(), i.name.as_str())));
    let supply_names = names(snapshot.supplies.iter().map(|s| (s.id.as_str(), s.name.as_str())));
    let equipment_names = names(snapshot.equipment.iter().map(|e| (e.id.as_str(), e.name.as_str())));

    let mut detail: Vec<(String, Row)> = Vec::new();
    for l in &snapshot.recipe_ingredients {
        let recipe = name_or_id(&recipe_names, &l.recipe_id);
        let r = row(json!({
            "Recipe Name": &recipe,
            "Type": "Ingredient",
            "Item Name": name_or_id(&ingredient_names, &l.ingredient_id),
            "Quantity": l.quantity,
        }));
        detail.push((recipe, r));
    }
    for l in &snapshot.recipe_supplies {
        let recipe = name_or_id(&recipe_names, &l.recipe_id);
        let r = row(json!({
            "Recipe Name": &recipe,
            "Type": "Supply",
            "Item Name": name_or_id(&supply_names, &l.supply_id),
            "Quantity": l.quantity,
        }));
        detail.push((recipe, r));
    }
    for l in &snapshot.recipe_equipment {
        let recipe = name_or_id(&recipe_names, &l.recipe_id);
        let r = row(json!({
            "Recipe Name": &recipe,
            "Type": "Equipment",
            "Item Name": name_or_id(&equipment_names, &l.equipment_id),
            "Quantity": l.hours,
        }));
        detail.push((recipe, r));
    }
    detail.sort_by_key(|(recipe, _)| recipe.to_lowercase());
    workbook.add_sheet(SHEET_RECIPE_DETAIL, detail.into_iter().map(|(_, r)| r).collect());

    workbook.add_sheet(
        SHEET_CONFIG,
        vec![row(json!({
            "Key": CONFIG_ENERGY_COST,
            "Value": snapshot.global_energy_cost,
        }))],
    );

    workbook
}
