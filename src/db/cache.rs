//! Snapshot cache
//!
//! Stores the whole catalog snapshot between sessions. A save replaces every
//! table inside one transaction, so the cache always holds one complete
//! snapshot.

use rusqlite::{params, Connection, Row};

use super::connection::{Database, DbError, DbResult};
use super::migrations::run_migrations;
use crate::models::{
    CatalogSnapshot, Equipment, Ingredient, Recipe, RecipeEquipment, RecipeIngredient,
    RecipeSupply, Supply, DEFAULT_ENERGY_COST,
};

const KEY_ENERGY_COST: &str = "global_energy_cost";
const KEY_SAVED_AT: &str = "saved_at";

/// Local cache of the session snapshot
#[derive(Clone)]
pub struct SnapshotCache {
    db: Database,
}

impl SnapshotCache {
    /// Open the cache, creating or migrating its schema
    pub fn open(db: Database) -> DbResult<Self> {
        db.with_conn(run_migrations)?;
        Ok(Self { db })
    }

    /// Replace the stored snapshot
    pub fn save(&self, snapshot: &CatalogSnapshot) -> DbResult<()> {
        self.db.with_transaction(|tx| write_snapshot(tx, snapshot))
    }

    /// Load the stored snapshot, `None` when nothing was ever saved
    pub fn load(&self) -> DbResult<Option<CatalogSnapshot>> {
        self.db.with_conn(|conn| {
            if get_setting(conn, KEY_SAVED_AT)?.is_none() {
                return Ok(None);
            }
            read_snapshot(conn).map(Some)
        })
    }

    /// When the snapshot was last saved (RFC 3339)
    pub fn saved_at(&self) -> DbResult<Option<String>> {
        self.db.with_conn(|conn| get_setting(conn, KEY_SAVED_AT))
    }
}

fn get_setting(conn: &Connection, key: &str) -> DbResult<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
    let mut rows = stmt.query(params![key])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

fn set_setting(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn write_snapshot(conn: &Connection, snapshot: &CatalogSnapshot) -> DbResult<()> {
    conn.execute_batch(
        "DELETE FROM ingredients;
         DELETE FROM supplies;
         DELETE FROM equipment;
         DELETE FROM recipes;
         DELETE FROM recipe_ingredients;
         DELETE FROM recipe_supplies;
         DELETE FROM recipe_equipment;",
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO ingredients (id, position, name, unit, package_quantity, package_unit, package_cost, unit_cost, supplier)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for (pos, i) in snapshot.ingredients.iter().enumerate() {
        stmt.execute(params![
            i.id,
            pos as i64,
            i.name,
            i.unit,
            i.package_quantity,
            i.package_unit,
            i.package_cost,
            i.unit_cost,
            i.supplier
        ])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO supplies (id, position, name, package_quantity, package_unit, package_cost, unit_cost)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (pos, s) in snapshot.supplies.iter().enumerate() {
        stmt.execute(params![
            s.id,
            pos as i64,
            s.name,
            s.package_quantity,
            s.package_unit,
            s.package_cost,
            s.unit_cost
        ])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO equipment (id, position, name, power_watts, energy_cost, formula)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (pos, e) in snapshot.equipment.iter().enumerate() {
        stmt.execute(params![e.id, pos as i64, e.name, e.power_watts, e.energy_cost, e.formula])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO recipes (id, position, name, description, base_yield, oven_minutes, oven_temperature, steps)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for (pos, r) in snapshot.recipes.iter().enumerate() {
        stmt.execute(params![
            r.id,
            pos as i64,
            r.name,
            r.description,
            r.base_yield,
            r.oven_minutes,
            r.oven_temperature,
            r.steps
        ])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO recipe_ingredients (id, position, recipe_id, ingredient_id, quantity)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (pos, l) in snapshot.recipe_ingredients.iter().enumerate() {
        stmt.execute(params![l.id, pos as i64, l.recipe_id, l.ingredient_id, l.quantity])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO recipe_supplies (id, position, recipe_id, supply_id, quantity)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (pos, l) in snapshot.recipe_supplies.iter().enumerate() {
        stmt.execute(params![l.id, pos as i64, l.recipe_id, l.supply_id, l.quantity])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO recipe_equipment (id, position, recipe_id, equipment_id, hours)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (pos, l) in snapshot.recipe_equipment.iter().enumerate() {
        stmt.execute(params![l.id, pos as i64, l.recipe_id, l.equipment_id, l.hours])?;
    }

    set_setting(conn, KEY_ENERGY_COST, &snapshot.global_energy_cost.to_string())?;
    set_setting(conn, KEY_SAVED_AT, &chrono::Utc::now().to_rfc3339())?;

    tracing::debug!(
        "Cached snapshot: {} ingredients, {} supplies, {} equipment, {} recipes",
        snapshot.ingredients.len(),
        snapshot.supplies.len(),
        snapshot.equipment.len(),
        snapshot.recipes.len()
    );

    Ok(())
}

fn query_all<T, F>(conn: &Connection, sql: &str, map: F) -> DbResult<Vec<T>>
where
    F: FnMut(&Row) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn read_snapshot(conn: &Connection) -> DbResult<CatalogSnapshot> {
    let ingredients = query_all(
        conn,
        "SELECT * FROM ingredients ORDER BY position",
        |row| {
            Ok(Ingredient {
                id: row.get("id")?,
                name: row.get("name")?,
                unit: row.get("unit")?,
                package_quantity: row.get("package_quantity")?,
                package_unit: row.get("package_unit")?,
                package_cost: row.get("package_cost")?,
                unit_cost: row.get("unit_cost")?,
                supplier: row.get("supplier")?,
            })
        },
    )?;

    let supplies = query_all(conn, "SELECT * FROM supplies ORDER BY position", |row| {
        Ok(Supply {
            id: row.get("id")?,
            name: row.get("name")?,
            package_quantity: row.get("package_quantity")?,
            package_unit: row.get("package_unit")?,
            package_cost: row.get("package_cost")?,
            unit_cost: row.get("unit_cost")?,
        })
    })?;

    let equipment = query_all(conn, "SELECT * FROM equipment ORDER BY position", |row| {
        Ok(Equipment {
            id: row.get("id")?,
            name: row.get("name")?,
            power_watts: row.get("power_watts")?,
            energy_cost: row.get("energy_cost")?,
            formula: row.get("formula")?,
        })
    })?;

    let recipes = query_all(conn, "SELECT * FROM recipes ORDER BY position", |row| {
        Ok(Recipe {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            base_yield: row.get("base_yield")?,
            oven_minutes: row.get("oven_minutes")?,
            oven_temperature: row.get("oven_temperature")?,
            steps: row.get("steps")?,
        })
    })?;

    let recipe_ingredients = query_all(
        conn,
        "SELECT * FROM recipe_ingredients ORDER BY position",
        |row| {
            Ok(RecipeIngredient {
                id: row.get("id")?,
                recipe_id: row.get("recipe_id")?,
                ingredient_id: row.get("ingredient_id")?,
                quantity: row.get("quantity")?,
            })
        },
    )?;

    let recipe_supplies = query_all(
        conn,
        "SELECT * FROM recipe_supplies ORDER BY position",
        |row| {
            Ok(RecipeSupply {
                id: row.get("id")?,
                recipe_id: row.get("recipe_id")?,
                supply_id: row.get("supply_id")?,
                quantity: row.get("quantity")?,
            })
        },
    )?;

    let recipe_equipment = query_all(
        conn,
        "SELECT * FROM recipe_equipment ORDER BY position",
        |row| {
            Ok(RecipeEquipment {
                id: row.get("id")?,
                recipe_id: row.get("recipe_id")?,
                equipment_id: row.get("equipment_id")?,
                hours: row.get("hours")?,
            })
        },
    )?;

    let global_energy_cost = match get_setting(conn, KEY_ENERGY_COST)? {
        Some(text) => text
            .parse::<f64>()
            .map_err(|e| DbError::Corrupt(format!("global energy cost '{}': {}", text, e)))?,
        None => DEFAULT_ENERGY_COST,
    };

    Ok(CatalogSnapshot {
        ingredients,
        supplies,
        equipment,
        recipes,
        recipe_ingredients,
        recipe_supplies,
        recipe_equipment,
        global_energy_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientUpsert, RecipeUpsert};

    fn cache() -> SnapshotCache {
        SnapshotCache::open(Database::in_memory().unwrap()).unwrap()
    }

    fn sample() -> CatalogSnapshot {
        let names = ["Flour", "Sugar", "Eggs", "Butter"];
        CatalogSnapshot {
            ingredients: names
                .iter()
                .enumerate()
                .map(|(n, name)| {
                    Ingredient::from_upsert(
                        format!("ing_{}", n),
                        &IngredientUpsert {
                            name: name.to_string(),
                            package_quantity: 1000.0,
                            package_cost: 500.0 * (n as f64 + 1.0),
                            supplier: (n % 2 == 0).then(|| "Mill".to_string()),
                            ..Default::default()
                        },
                    )
                })
                .collect(),
            equipment: vec![Equipment {
                id: "eq_1".to_string(),
                name: "Oven".to_string(),
                power_watts: 2000.0,
                energy_cost: None,
                formula: "(power / 1000) * time".to_string(),
            }],
            recipes: vec![Recipe::from_upsert(
                "rec_1".to_string(),
                &RecipeUpsert {
                    name: "Bread".to_string(),
                    base_yield: Some(2.0),
                    ..Default::default()
                },
            )],
            recipe_ingredients: vec![RecipeIngredient {
                id: "ring_1".to_string(),
                recipe_id: "rec_1".to_string(),
                ingredient_id: "ing_2".to_string(),
                quantity: 120.0,
            }],
            recipe_equipment: vec![RecipeEquipment {
                id: "req_1".to_string(),
                recipe_id: "rec_1".to_string(),
                equipment_id: "eq_1".to_string(),
                hours: 0.75,
            }],
            global_energy_cost: 180.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_load_before_save_is_none() {
        assert_eq!(cache().load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_preserves_order_and_settings() {
        let cache = cache();
        let snapshot = sample();
        cache.save(&snapshot).unwrap();

        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert!(cache.saved_at().unwrap().is_some());
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let cache = cache();
        cache.save(&sample()).unwrap();

        let mut smaller = sample();
        smaller.ingredients.truncate(1);
        smaller.recipe_ingredients.clear();
        cache.save(&smaller).unwrap();

        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded.ingredients.len(), 1);
        assert!(loaded.recipe_ingredients.is_empty());
        assert_eq!(loaded.recipes.len(), 1);
    }
}
