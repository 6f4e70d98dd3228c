//! Workbook to snapshot
//!
//! Sheet and header names are matched in English or in the Spanish layout of
//! older workbooks. Recipe detail rows are joined on trimmed, lowercased
//! names; rows that do not resolve are skipped and counted.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;

use super::{
    Row, Workbook, WorkbookError, WorkbookResult, CONFIG_ENERGY_COST, SHEET_CONFIG,
    SHEET_EQUIPMENT, SHEET_INGREDIENTS, SHEET_RECIPES, SHEET_RECIPE_DETAIL, SHEET_SUPPLIES,
};
use crate::costing::{normalize_opt, DEFAULT_FORMULA};
use crate::models::{
    generate_id, CatalogCounts, CatalogSnapshot, Equipment, Ingredient, IngredientUpsert, Recipe,
    RecipeEquipment, RecipeIngredient, RecipeSupply, RecipeUpsert, Supply, SupplyUpsert,
    DEFAULT_ENERGY_COST,
};

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub counts: CatalogCounts,
    pub global_energy_cost: f64,
    /// Item rows without a name
    pub skipped_rows: usize,
    /// Detail rows whose recipe, item or type did not resolve
    pub unresolved_links: usize,
    pub warnings: Vec<String>,
}

const ID: &[&str] = &["ID", "Id", "id"];
const NAME: &[&str] = &["Name", "Nombre"];

/// Cell under the first matching header
fn cell<'a>(row: &'a Row, headers: &[&str]) -> Option<&'a Value> {
    headers.iter().find_map(|h| row.get(*h))
}

/// Cell as trimmed text; numbers and booleans are rendered, null is empty
fn text(row: &Row, headers: &[&str]) -> String {
    match cell(row, headers) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn opt_text(row: &Row, headers: &[&str]) -> Option<String> {
    Some(text(row, headers)).filter(|t| !t.is_empty())
}

fn number(row: &Row, headers: &[&str], default: f64) -> f64 {
    normalize_opt(cell(row, headers), default)
}

/// Number for optional columns; blank cells stay `None`
fn opt_number(row: &Row, headers: &[&str]) -> Option<f64> {
    match cell(row, headers) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(normalize_opt(Some(value), 0.0)),
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Row IDs, generating one when missing or already used in the sheet
struct IdAssigner<'a> {
    prefix: &'static str,
    seen: HashSet<String>,
    warnings: &'a mut Vec<String>,
}

impl IdAssigner<'_> {
    fn assign(&mut self, sheet: &str, row: &Row) -> String {
        let id = text(row, ID);
        if id.is_empty() {
            return generate_id(self.prefix);
        }
        if !self.seen.insert(id.clone()) {
            let fresh = generate_id(self.prefix);
            self.warnings.push(format!(
                "{}: duplicate ID '{}' replaced with '{}'",
                sheet, id, fresh
            ));
            self.seen.insert(fresh.clone());
            return fresh;
        }
        id
    }
}

enum DetailKind {
    Ingredient,
    Supply,
    Equipment,
}

fn detail_kind(kind: &str) -> Option<DetailKind> {
    let kind = name_key(kind);
    if kind.contains("ingredient") || kind.contains("ingrediente") {
        Some(DetailKind::Ingredient)
    } else if kind.contains("supply") || kind.contains("supplies") || kind.contains("insumo") {
        Some(DetailKind::Supply)
    } else if kind.contains("equipment") || kind.contains("equipo") || kind.contains("electro") {
        Some(DetailKind::Equipment)
    } else {
        None
    }
}

/// Build a snapshot from a workbook
///
/// Fails only when the workbook has none of the catalog sheets; bad rows are
/// skipped and reported.
pub fn import_snapshot(workbook: &Workbook) -> WorkbookResult<(CatalogSnapshot, ImportReport)> {
    let ingredients_sheet = workbook.sheet_any(&[SHEET_INGREDIENTS, "Ingredientes"]);
    let supplies_sheet = workbook.sheet_any(&[SHEET_SUPPLIES, "Insumos"]);
    let equipment_sheet = workbook.sheet_any(&[SHEET_EQUIPMENT, "Equipos"]);
    let recipes_sheet = workbook.sheet_any(&[SHEET_RECIPES, "Recetas"]);
    let detail_sheet = workbook.sheet_any(&[SHEET_RECIPE_DETAIL, "Receta_Detalle"]);
    let config_sheet = workbook.sheet_any(&[SHEET_CONFIG]);

    if ingredients_sheet.is_none()
        && supplies_sheet.is_none()
        && equipment_sheet.is_none()
        && recipes_sheet.is_none()
    {
        return Err(WorkbookError::NoCatalogSheets);
    }

    let mut snapshot = CatalogSnapshot::default();
    let mut report = ImportReport::default();

    if let Some(rows) = config_sheet {
        let energy_row = rows.iter().find(|r| {
            matches!(
                text(r, &["Key", "Clave"]).as_str(),
                CONFIG_ENERGY_COST | "CostoKwhGlobal"
            )
        });
        if let Some(r) = energy_row {
            snapshot.global_energy_cost = number(r, &["Value", "Valor"], DEFAULT_ENERGY_COST);
        }
    }

    let mut ingredient_ids = HashMap::new();
    let mut supply_ids = HashMap::new();
    let mut equipment_ids = HashMap::new();
    let mut recipe_ids = HashMap::new();

    if let Some(rows) = ingredients_sheet {
        let mut ids = IdAssigner {
            prefix: Ingredient::ID_PREFIX,
            seen: HashSet::new(),
            warnings: &mut report.warnings,
        };
        for r in rows {
            let name = text(r, NAME);
            if name.is_empty() {
                report.skipped_rows += 1;
                continue;
            }
            let data = IngredientUpsert {
                id: None,
                name,
                unit: opt_text(r, &["Unit", "Unidad Medida"]),
                package_quantity: number(r, &["Package Quantity", "Cantidad Paquete"], 0.0),
                package_unit: opt_text(r, &["Package Unit"]),
                package_cost: number(r, &["Package Cost", "Costo Paquete"], 0.0),
                unit_cost: None,
                supplier: opt_text(r, &["Supplier", "Proveedor"]),
            };
            let item = Ingredient::from_upsert(ids.assign(SHEET_INGREDIENTS, r), &data);
            ingredient_ids.insert(name_key(&item.name), item.id.clone());
            snapshot.ingredients.push(item);
        }
    }

    if let Some(rows) = supplies_sheet {
        let mut ids = IdAssigner {
            prefix: Supply::ID_PREFIX,
            seen: HashSet::new(),
            warnings: &mut report.warnings,
        };
        for r in rows {
            let name = text(r, NAME);
            if name.is_empty() {
                report.skipped_rows += 1;
                continue;
            }
            let data = SupplyUpsert {
                id: None,
                name,
                package_quantity: number(r, &["Package Quantity", "Cantidad Paquete"], 0.0),
                package_unit: opt_text(r, &["Unit", "Unidad"]),
                package_cost: number(r, &["Package Cost", "Costo Paquete"], 0.0),
            };
            let item = Supply::from_upsert(ids.assign(SHEET_SUPPLIES, r), &data);
            supply_ids.insert(name_key(&item.name), item.id.clone());
            snapshot.supplies.push(item);
        }
    }

    if let Some(rows) = equipment_sheet {
        let mut ids = IdAssigner {
            prefix: Equipment::ID_PREFIX,
            seen: HashSet::new(),
            warnings: &mut report.warnings,
        };
        for r in rows {
            let name = text(r, NAME);
            if name.is_empty() {
                report.skipped_rows += 1;
                continue;
            }
            let formula = opt_text(r, &["Formula", "Fórmula"]).unwrap_or_else(|| DEFAULT_FORMULA.to_string());
            let item = Equipment {
                id: ids.assign(SHEET_EQUIPMENT, r),
                name,
                power_watts: number(r, &["Power (Watts)", "Potencia (Watts)"], 0.0),
                energy_cost: opt_number(r, &["kWh Cost", "Costo KWh"]),
                formula,
            };
            equipment_ids.insert(name_key(&item.name), item.id.clone());
            snapshot.equipment.push(item);
        }
    }

    if let Some(rows) = recipes_sheet {
        let mut ids = IdAssigner {
            prefix: Recipe::ID_PREFIX,
            seen: HashSet::new(),
            warnings: &mut report.warnings,
        };
        for r in rows {
            let name = text(r, NAME);
            if name.is_empty() {
                report.skipped_rows += 1;
                continue;
            }
            let data = RecipeUpsert {
                id: None,
                name,
                description: opt_text(r, &["Description", "Descripción"]),
                base_yield: Some(number(r, &["Yield", "Rendimiento"], 1.0)),
                oven_minutes: opt_number(r, &["Oven Time (min)", "Tiempo Horno (min)"]),
                oven_temperature: opt_number(r, &["Oven Temp (C)", "Temp Horno (C)"]),
                steps: opt_text(r, &["Steps", "Pasos"]),
            };
            let recipe = Recipe::from_upsert(ids.assign(SHEET_RECIPES, r), &data);
            recipe_ids.insert(name_key(&recipe.name), recipe.id.clone());
            snapshot.recipes.push(recipe);
        }
    }

    for (n, r) in detail_sheet.unwrap_or_default().iter().enumerate() {
        let recipe_name = text(r, &["Recipe Name", "Nombre Receta"]);
        let item_name = text(r, &["Item Name", "Nombre Item"]);
        let kind = text(r, &["Type", "Tipo"]);
        let quantity = number(r, &["Quantity", "Cantidad"], 0.0);

        let Some(recipe_id) = recipe_ids.get(&name_key(&recipe_name)).cloned() else {
            report.unresolved_links += 1;
            report.warnings.push(format!(
                "{} row {}: unknown recipe '{}'",
                SHEET_RECIPE_DETAIL,
                n + 1,
                recipe_name
            ));
            continue;
        };

        let (ids, label) = match detail_kind(&kind) {
            Some(DetailKind::Ingredient) => (&ingredient_ids, "ingredient"),
            Some(DetailKind::Supply) => (&supply_ids, "supply"),
            Some(DetailKind::Equipment) => (&equipment_ids, "equipment"),
            None => {
                report.unresolved_links += 1;
                report.warnings.push(format!(
                    "{} row {}: unknown type '{}'",
                    SHEET_RECIPE_DETAIL,
                    n + 1,
                    kind
                ));
                continue;
            }
        };

        let Some(item_id) = ids.get(&name_key(&item_name)).cloned() else {
            report.unresolved_links += 1;
            report.warnings.push(format!(
                "{} row {}: unknown {} '{}'",
                SHEET_RECIPE_DETAIL,
                n + 1,
                label,
                item_name
            ));
            continue;
        };

        match detail_kind(&kind) {
            Some(DetailKind::Ingredient) => snapshot.recipe_ingredients.push(RecipeIngredient {
                id: generate_id(RecipeIngredient::ID_PREFIX),
                recipe_id,
                ingredient_id: item_id,
                quantity,
            }),
            Some(DetailKind::Supply) => snapshot.recipe_supplies.push(RecipeSupply {
                id: generate_id(RecipeSupply::ID_PREFIX),
                recipe_id,
                supply_id: item_id,
                quantity,
            }),
            Some(DetailKind::Equipment) => snapshot.recipe_equipment.push(RecipeEquipment {
                id: generate_id(RecipeEquipment::ID_PREFIX),
                recipe_id,
                equipment_id: item_id,
                hours: quantity,
            }),
            None => {}
        }
    }

    for warning in &report.warnings {
        tracing::warn!("Workbook import: {}", warning);
    }

    report.counts = snapshot.counts();
    report.global_energy_cost = snapshot.global_energy_cost;
    Ok((snapshot, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::export_snapshot;
    use serde_json::json;

    fn workbook(value: Value) -> Workbook {
        let mut workbook = Workbook::default();
        for (name, rows) in value.as_object().unwrap() {
            let rows = rows
                .as_array()
                .unwrap()
                .iter()
                .map(|r| r.as_object().cloned().unwrap())
                .collect();
            workbook.add_sheet(name, rows);
        }
        workbook
    }

    #[test]
    fn test_import_resolves_detail_by_name() {
        let wb = workbook(json!({
            "Ingredients": [
                {"ID": "ing_flour", "Name": "Flour", "Unit": "g", "Package Cost": "1000", "Package Quantity": 1000},
                {"Name": "  "}
            ],
            "Recipes": [
                {"Name": "Cupcakes", "Yield": 12}
            ],
            "Recipe_Detail": [
                {"Recipe Name": " cupcakes ", "Type": "Ingredient", "Item Name": "FLOUR", "Quantity": 200},
                {"Recipe Name": "Cupcakes", "Type": "Ingredient", "Item Name": "Cocoa", "Quantity": 20},
                {"Recipe Name": "Muffins", "Type": "Ingredient", "Item Name": "Flour", "Quantity": 20}
            ],
            "Config": [
                {"Key": "GlobalKwhCost", "Value": 180}
            ]
        }));

        let (snapshot, report) = import_snapshot(&wb).unwrap();

        assert_eq!(snapshot.ingredients.len(), 1);
        assert_eq!(snapshot.ingredients[0].unit_cost, 1.0);
        assert!(snapshot.recipes[0].id.starts_with("rec_"));
        assert_eq!(snapshot.recipe_ingredients.len(), 1);
        assert_eq!(snapshot.recipe_ingredients[0].ingredient_id, "ing_flour");
        assert_eq!(snapshot.recipe_ingredients[0].quantity, 200.0);
        assert_eq!(snapshot.global_energy_cost, 180.0);
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(report.unresolved_links, 2);
    }

    #[test]
    fn test_legacy_spanish_layout() {
        let wb = workbook(json!({
            "Equipos": [
                {"ID": "eq_1", "Nombre": "Horno", "Potencia (Watts)": 2000, "Costo KWh": "", "Fórmula": "(potenciaWatts / 1000) * tiempoHoras"}
            ],
            "Insumos": [
                {"ID": "sup_1", "Nombre": "Caja", "Unidad": "caja", "Costo Paquete": 500, "Cantidad Paquete": 10}
            ],
            "Recetas": [
                {"ID": "rec_1", "Nombre": "Pan", "Rendimiento": ""}
            ],
            "Receta_Detalle": [
                {"Nombre Receta": "Pan", "Tipo": "Electrodoméstico", "Nombre Item": "horno", "Cantidad": 1.5},
                {"Nombre Receta": "Pan", "Tipo": "Insumo", "Nombre Item": "caja", "Cantidad": 2}
            ]
        }));

        let (snapshot, report) = import_snapshot(&wb).unwrap();

        assert_eq!(snapshot.equipment[0].energy_cost, None);
        assert_eq!(snapshot.supplies[0].unit_cost, 50.0);
        assert_eq!(snapshot.recipes[0].base_yield, 1.0);
        assert_eq!(snapshot.recipe_equipment[0].hours, 1.5);
        assert_eq!(snapshot.recipe_supplies[0].quantity, 2.0);
        assert_eq!(snapshot.global_energy_cost, 230.0);
        assert_eq!(report.unresolved_links, 0);
    }

    #[test]
    fn test_duplicate_ids_are_replaced() {
        let wb = workbook(json!({
            "Supplies": [
                {"ID": "sup_1", "Name": "Box"},
                {"ID": "sup_1", "Name": "Ribbon"}
            ]
        }));

        let (snapshot, report) = import_snapshot(&wb).unwrap();

        assert_ne!(snapshot.supplies[0].id, snapshot.supplies[1].id);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_no_catalog_sheets_is_error() {
        let wb = workbook(json!({ "Config": [] }));
        assert!(matches!(import_snapshot(&wb), Err(WorkbookError::NoCatalogSheets)));
    }

    #[test]
    fn test_export_then_import_keeps_catalog() {
        let mut original = CatalogSnapshot {
            global_energy_cost: 199.5,
            ..Default::default()
        };
        original.ingredients.push(Ingredient::from_upsert(
            "ing_1".to_string(),
            &IngredientUpsert {
                name: "Butter".to_string(),
                package_quantity: 500.0,
                package_cost: 2500.0,
                supplier: Some("Dairy".to_string()),
                ..Default::default()
            },
        ));
        original.recipes.push(Recipe::from_upsert(
            "rec_1".to_string(),
            &RecipeUpsert {
                name: "Shortbread".to_string(),
                base_yield: Some(24.0),
                oven_minutes: Some(18.0),
                ..Default::default()
            },
        ));
        original.recipe_ingredients.push(RecipeIngredient {
            id: "ring_1".to_string(),
            recipe_id: "rec_1".to_string(),
            ingredient_id: "ing_1".to_string(),
            quantity: 250.0,
        });

        let (imported, _) = import_snapshot(&export_snapshot(&original)).unwrap();

        assert_eq!(imported.ingredients, original.ingredients);
        assert_eq!(imported.recipes, original.recipes);
        assert_eq!(imported.recipe_ingredients.len(), 1);
        assert_eq!(imported.recipe_ingredients[0].quantity, 250.0);
        assert_eq!(imported.global_energy_cost, 199.5);
    }
}
