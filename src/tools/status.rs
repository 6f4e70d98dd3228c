//! Status Tool
//!
//! Provides runtime status information about the bakecost service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::models::CatalogCounts;

/// Costing workflow instructions for AI assistants
pub const COSTING_INSTRUCTIONS: &str = r#"
# Bakecost Instructions

This guide explains how to cost recipes and build shopping lists with the bakecost tools.

## Overview

Costs come from three kinds of catalog items:
1. **Ingredients** - bought in packages (e.g. 1000 g of flour for 1000). The unit cost is
   derived as package cost / package quantity and is recomputed on every save.
2. **Supplies** - packaging and consumables (liners, boxes), priced the same way.
3. **Equipment** - ovens and mixers. Energy cost = kWh x cost per kWh.

A **recipe** lists quantities of ingredients and supplies for one batch of its
**base yield** (e.g. 200 g flour makes 12 cupcakes), and equipment hours per batch.

---

## Building the Catalog

1. `upsert_ingredient` with `name`, `unit` (what recipes measure in, default "g"),
   `package_quantity`, `package_cost`, optional `supplier`.
2. `upsert_supply` with `name`, `package_unit`, `package_quantity`, `package_cost`.
3. `upsert_equipment` with `name`, `power_watts`, optional `energy_cost` (per kWh; omit to
   use the global cost) and optional `formula`.
4. `upsert_recipe` with `name` and `base_yield`.
5. Link components: `upsert_recipe_ingredient`, `upsert_recipe_supply`,
   `upsert_recipe_equipment` (quantities per batch, hours per batch).

Passing an existing `id` to any upsert replaces that record; leaving it out creates a new one.
Deleting an item also deletes every recipe line that uses it.

---

## Energy Formulas

Formulas are arithmetic over `power` (watts) and `time` (hours) with `+ - * /` and
parentheses. The default is `(power / 1000) * time`. Check a formula with
`validate_energy_formula` before saving it. A formula that fails at calculation time falls
back to the default.

The global cost per kWh defaults to 230. Change it with `set_energy_cost`.

---

## Costing

- `calculate_recipe_cost` with `recipe_id` and `units`: ingredient and supply quantities
  scale by units / base_yield. Equipment hours are used as recorded, not scaled.
- Shopping list: `add_to_shopping_list` (adding the same recipe again adds one more batch),
  `set_shopping_multiplier`, `remove_from_shopping_list`, then `calculate_shopping_list`.
  Shared ingredients are merged into one line. Equipment hours are multiplied by the
  number of batches.

---

## Files

- `export_shopping_list_csv` writes a CSV for the current shopping list.
- `export_cost_chart` writes a PNG bar chart of the most expensive items.
- `export_workbook` / `import_workbook` back up or bulk-edit the whole catalog
  as an `.xlsx` file. Import replaces the catalog only if the file parses.
"#;

/// Runtime status of the bakecost service
#[derive(Debug, Clone, Serialize)]
pub struct BakecostStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Cache information
    pub cache_path: Option<String>,
    pub cache_size_bytes: Option<u64>,

    /// Catalog contents
    pub catalog: CatalogCounts,
    pub global_energy_cost: f64,
    pub shopping_list_entries: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    cache_path: Option<PathBuf>,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(cache_path: Option<PathBuf>) -> Self {
        Self {
            start_time: Instant::now(),
            cache_path,
        }
    }

    /// Get the current status
    pub fn get_status(
        &self,
        catalog: CatalogCounts,
        global_energy_cost: f64,
        shopping_list_entries: usize,
    ) -> BakecostStatus {
        let build_info = BuildInfo::current();

        let cache_size_bytes = self
            .cache_path
            .as_ref()
            .and_then(|path| std::fs::metadata(path).ok())
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        BakecostStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            cache_path: self.cache_path.as_ref().map(|p| p.display().to_string()),
            cache_size_bytes,
            catalog,
            global_energy_cost,
            shopping_list_entries,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
