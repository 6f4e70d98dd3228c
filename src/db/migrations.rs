//! Database migrations
//!
//! Versioned schema for the snapshot cache.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: snapshot tables
///
/// Each table mirrors one snapshot collection. `position` keeps list order.
/// Links carry no foreign keys: a cached snapshot is stored exactly as the
/// session held it.
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- CATALOG ITEMS
        -- ============================================
        CREATE TABLE ingredients (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            unit TEXT NOT NULL,
            package_quantity REAL NOT NULL DEFAULT 0,
            package_unit TEXT NOT NULL DEFAULT '',
            package_cost REAL NOT NULL DEFAULT 0,
            unit_cost REAL NOT NULL DEFAULT 0,
            supplier TEXT
        );

        CREATE TABLE supplies (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            package_quantity REAL NOT NULL DEFAULT 0,
            package_unit TEXT NOT NULL DEFAULT '',
            package_cost REAL NOT NULL DEFAULT 0,
            unit_cost REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE equipment (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            power_watts REAL NOT NULL DEFAULT 0,
            energy_cost REAL,                    -- null means use the global kWh cost
            formula TEXT NOT NULL
        );

        -- ============================================
        -- RECIPES
        -- ============================================
        CREATE TABLE recipes (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            base_yield REAL NOT NULL DEFAULT 1,
            oven_minutes REAL,
            oven_temperature REAL,
            steps TEXT
        );

        CREATE TABLE recipe_ingredients (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            recipe_id TEXT NOT NULL,
            ingredient_id TEXT NOT NULL,
            quantity REAL NOT NULL DEFAULT 0    -- per batch of base yield
        );

        CREATE INDEX idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id);

        CREATE TABLE recipe_supplies (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            recipe_id TEXT NOT NULL,
            supply_id TEXT NOT NULL,
            quantity REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX idx_recipe_supplies_recipe ON recipe_supplies(recipe_id);

        CREATE TABLE recipe_equipment (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            recipe_id TEXT NOT NULL,
            equipment_id TEXT NOT NULL,
            hours REAL NOT NULL DEFAULT 0       -- per batch, not scaled by yield
        );

        CREATE INDEX idx_recipe_equipment_recipe ON recipe_equipment(recipe_id);

        -- ============================================
        -- SETTINGS
        -- ============================================
        CREATE TABLE settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration_fresh(&conn));
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    fn needs_migration_fresh(conn: &Connection) -> bool {
        // no schema_migrations table yet
        get_schema_version(conn).unwrap() == 0
    }
}
