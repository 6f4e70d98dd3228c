//! Bakecost MCP Server Implementation
//!
//! Implements the MCP server with all costing tools.

use std::path::{Path, PathBuf};
use std::sync::{Arc, MutexGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::catalog::Session;
use crate::costing::DEFAULT_TOP_ITEMS;
use crate::models::{
    EquipmentUpsert, IngredientUpsert, RecipeEquipmentUpsert, RecipeIngredientUpsert,
    RecipeSupplyUpsert, RecipeUpsert, SupplyUpsert,
};
use crate::tools::calculator;
use crate::tools::catalog;
use crate::tools::recipes;
use crate::tools::reports::{self, CsvOptions};
use crate::tools::status::StatusTracker;
use crate::tools::workbook;

/// Bakecost MCP Service
#[derive(Clone)]
pub struct BakecostService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    /// Catalog, shopping list and cache; never held across an await
    session: Arc<std::sync::Mutex<Session>>,
    tool_router: ToolRouter<BakecostService>,
}

impl BakecostService {
    pub fn new(cache_path: Option<PathBuf>, session: Session) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(cache_path))),
            session: Arc::new(std::sync::Mutex::new(session)),
            tool_router: Self::tool_router(),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, McpError> {
        self.session
            .lock()
            .map_err(|e| McpError::internal_error(format!("Session lock poisoned: {}", e), None))
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(kind: &str, id: &str) -> Result<CallToolResult, McpError> {
    json_result(&serde_json::json!({ "error": format!("{} not found", kind), "id": id }))
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpsertIngredientParams {
    /// Existing ingredient ID to replace (omit to create)
    pub id: Option<String>,
    pub name: String,
    /// Unit recipes measure in (default "g")
    pub unit: Option<String>,
    /// Quantity in one package, in `unit`
    #[serde(default)]
    pub package_quantity: f64,
    /// Package unit label (informational)
    pub package_unit: Option<String>,
    /// Price of one package
    #[serde(default)]
    pub package_cost: f64,
    /// Manual cost per unit, used only when package_quantity is 0
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpsertSupplyParams {
    /// Existing supply ID to replace (omit to create)
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub package_quantity: f64,
    /// Unit recipes measure in (default "unit")
    pub package_unit: Option<String>,
    #[serde(default)]
    pub package_cost: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpsertEquipmentParams {
    /// Existing equipment ID to replace (omit to create)
    pub id: Option<String>,
    pub name: String,
    /// Power draw in watts
    #[serde(default)]
    pub power_watts: f64,
    /// Cost per kWh for this item (omit to use the global cost)
    pub energy_cost: Option<f64>,
    /// kWh formula over `power` and `time` (default "(power / 1000) * time")
    pub formula: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListParams {
    /// Case-insensitive name filter
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListIngredientsParams {
    pub query: Option<String>,
    /// Group the result by supplier
    #[serde(default)]
    pub group_by_supplier: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateFormulaParams {
    pub formula: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetEnergyCostParams {
    /// Cost per kWh; invalid values reset to 230
    pub cost: f64,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpsertRecipeParams {
    /// Existing recipe ID to replace (omit to create)
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    /// Units one batch makes (default 1)
    pub base_yield: Option<f64>,
    pub oven_minutes: Option<f64>,
    pub oven_temperature: Option<f64>,
    pub steps: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpsertRecipeIngredientParams {
    /// Existing line ID to replace (omit to add a line)
    pub id: Option<String>,
    pub recipe_id: String,
    pub ingredient_id: String,
    /// Quantity per batch, in the ingredient's unit
    pub quantity: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpsertRecipeSupplyParams {
    pub id: Option<String>,
    pub recipe_id: String,
    pub supply_id: String,
    /// Quantity per batch, in the supply's package unit
    pub quantity: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpsertRecipeEquipmentParams {
    pub id: Option<String>,
    pub recipe_id: String,
    pub equipment_id: String,
    /// Hours of use per batch
    pub hours: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveLineParams {
    /// Recipe line ID
    pub link_id: String,
}

// ============================================================================
// Costing Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeCostParams {
    pub recipe_id: String,
    /// Units to cost (defaults to one batch)
    pub units: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeIdParams {
    pub recipe_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetMultiplierParams {
    pub recipe_id: String,
    /// Number of batches; rounded and clamped to at least 1
    pub multiplier: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateShoppingListParams {
    /// Number of top cost items to include (default 15)
    #[serde(default = "default_top_items")]
    pub top: usize,
}

fn default_top_items() -> usize { DEFAULT_TOP_ITEMS }
fn default_true() -> bool { true }

// ============================================================================
// File Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportCsvParams {
    /// Output file path
    pub file_path: String,
    #[serde(default = "default_true")]
    pub include_ingredients: bool,
    #[serde(default = "default_true")]
    pub include_supplies: bool,
    #[serde(default = "default_true")]
    pub include_energy: bool,
    /// Group ingredient rows under supplier headings
    #[serde(default)]
    pub group_by_supplier: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportChartParams {
    /// Output PNG path
    pub file_path: String,
    #[serde(default = "default_top_items")]
    pub top: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FilePathParams {
    pub file_path: String,
}

#[tool_router]
impl BakecostService {
    // --- Status ---

    #[tool(description = "Get the current status of the bakecost service including build info, catalog counts, cache status, and process information")]
    async fn bakecost_status(&self) -> Result<CallToolResult, McpError> {
        let (counts, energy_cost, entries) = {
            let session = self.session()?;
            (
                session.snapshot().counts(),
                session.catalog().global_energy_cost(),
                session.selections().len(),
            )
        };
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(counts, energy_cost, entries);
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for costing recipes. Call this when starting a costing session or when unsure how to use the tools.")]
    fn costing_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::COSTING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(COSTING_INSTRUCTIONS)]))
    }

    // --- Ingredients ---

    #[tool(description = "Create or replace an ingredient. Unit cost is derived from package cost / package quantity.")]
    fn upsert_ingredient(&self, Parameters(p): Parameters<UpsertIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = IngredientUpsert {
            id: p.id, name: p.name, unit: p.unit, package_quantity: p.package_quantity,
            package_unit: p.package_unit, package_cost: p.package_cost, unit_cost: p.unit_cost,
            supplier: p.supplier,
        };
        let result = catalog::upsert_ingredient(&mut *self.session()?, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get an ingredient and the recipes that use it")]
    fn get_ingredient(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match catalog::get_ingredient(&*self.session()?, &p.id) {
            Some(item) => json_result(&item),
            None => not_found("Ingredient", &p.id),
        }
    }

    #[tool(description = "List ingredients, optionally filtered by name and grouped by supplier")]
    fn list_ingredients(&self, Parameters(p): Parameters<ListIngredientsParams>) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        if p.group_by_supplier {
            json_result(&catalog::list_ingredients_by_supplier(&session, p.query.as_deref()))
        } else {
            json_result(&catalog::list_ingredients(&session, p.query.as_deref()))
        }
    }

    #[tool(description = "Delete an ingredient and every recipe line that uses it")]
    fn delete_ingredient(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::delete_ingredient(&mut *self.session()?, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Supplies ---

    #[tool(description = "Create or replace a supply (packaging, liners, boxes). Unit cost is derived from the package.")]
    fn upsert_supply(&self, Parameters(p): Parameters<UpsertSupplyParams>) -> Result<CallToolResult, McpError> {
        let data = SupplyUpsert {
            id: p.id, name: p.name, package_quantity: p.package_quantity,
            package_unit: p.package_unit, package_cost: p.package_cost,
        };
        let result = catalog::upsert_supply(&mut *self.session()?, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a supply and the recipes that use it")]
    fn get_supply(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match catalog::get_supply(&*self.session()?, &p.id) {
            Some(item) => json_result(&item),
            None => not_found("Supply", &p.id),
        }
    }

    #[tool(description = "List supplies, optionally filtered by name")]
    fn list_supplies(&self, Parameters(p): Parameters<ListParams>) -> Result<CallToolResult, McpError> {
        json_result(&catalog::list_supplies(&*self.session()?, p.query.as_deref()))
    }

    #[tool(description = "Delete a supply and every recipe line that uses it")]
    fn delete_supply(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::delete_supply(&mut *self.session()?, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Equipment ---

    #[tool(description = "Create or replace an equipment item. The formula is validated before saving.")]
    fn upsert_equipment(&self, Parameters(p): Parameters<UpsertEquipmentParams>) -> Result<CallToolResult, McpError> {
        let data = EquipmentUpsert {
            id: p.id, name: p.name, power_watts: p.power_watts,
            energy_cost: p.energy_cost, formula: p.formula,
        };
        let result = catalog::upsert_equipment(&mut *self.session()?, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get an equipment item and the recipes that use it")]
    fn get_equipment(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match catalog::get_equipment(&*self.session()?, &p.id) {
            Some(item) => json_result(&item),
            None => not_found("Equipment", &p.id),
        }
    }

    #[tool(description = "List equipment, optionally filtered by name")]
    fn list_equipment(&self, Parameters(p): Parameters<ListParams>) -> Result<CallToolResult, McpError> {
        json_result(&catalog::list_equipment(&*self.session()?, p.query.as_deref()))
    }

    #[tool(description = "Delete an equipment item and every recipe line that uses it")]
    fn delete_equipment(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::delete_equipment(&mut *self.session()?, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Check an energy formula over `power` (watts) and `time` (hours) and show a sample result")]
    fn validate_energy_formula(&self, Parameters(p): Parameters<ValidateFormulaParams>) -> Result<CallToolResult, McpError> {
        json_result(&catalog::validate_energy_formula(&p.formula))
    }

    #[tool(description = "Get the global cost per kWh")]
    fn get_energy_cost(&self) -> Result<CallToolResult, McpError> {
        json_result(&catalog::get_energy_cost(&*self.session()?))
    }

    #[tool(description = "Set the global cost per kWh used by equipment without its own cost")]
    fn set_energy_cost(&self, Parameters(p): Parameters<SetEnergyCostParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::set_energy_cost(&mut *self.session()?, p.cost).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Recipes ---

    #[tool(description = "Create or replace a recipe. base_yield is the number of units one batch makes.")]
    fn upsert_recipe(&self, Parameters(p): Parameters<UpsertRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeUpsert {
            id: p.id, name: p.name, description: p.description, base_yield: p.base_yield,
            oven_minutes: p.oven_minutes, oven_temperature: p.oven_temperature, steps: p.steps,
        };
        let result = recipes::upsert_recipe(&mut *self.session()?, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a recipe with its ingredient, supply and equipment lines")]
    fn get_recipe(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match recipes::get_recipe(&*self.session()?, &p.id) {
            Some(recipe) => json_result(&recipe),
            None => not_found("Recipe", &p.id),
        }
    }

    #[tool(description = "List recipes, optionally filtered by name")]
    fn list_recipes(&self, Parameters(p): Parameters<ListParams>) -> Result<CallToolResult, McpError> {
        json_result(&recipes::list_recipes(&*self.session()?, p.query.as_deref()))
    }

    #[tool(description = "Delete a recipe and all its lines. Also removes it from the shopping list.")]
    fn delete_recipe(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&mut *self.session()?, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add or change an ingredient line of a recipe (quantity per batch)")]
    fn upsert_recipe_ingredient(&self, Parameters(p): Parameters<UpsertRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientUpsert {
            id: p.id, recipe_id: p.recipe_id, ingredient_id: p.ingredient_id, quantity: p.quantity,
        };
        let result = recipes::upsert_recipe_ingredient(&mut *self.session()?, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add or change a supply line of a recipe (quantity per batch)")]
    fn upsert_recipe_supply(&self, Parameters(p): Parameters<UpsertRecipeSupplyParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeSupplyUpsert {
            id: p.id, recipe_id: p.recipe_id, supply_id: p.supply_id, quantity: p.quantity,
        };
        let result = recipes::upsert_recipe_supply(&mut *self.session()?, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add or change an equipment line of a recipe (hours per batch)")]
    fn upsert_recipe_equipment(&self, Parameters(p): Parameters<UpsertRecipeEquipmentParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeEquipmentUpsert {
            id: p.id, recipe_id: p.recipe_id, equipment_id: p.equipment_id, hours: p.hours,
        };
        let result = recipes::upsert_recipe_equipment(&mut *self.session()?, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove an ingredient line from a recipe")]
    fn remove_recipe_ingredient(&self, Parameters(p): Parameters<RemoveLineParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::remove_recipe_ingredient(&mut *self.session()?, &p.link_id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove a supply line from a recipe")]
    fn remove_recipe_supply(&self, Parameters(p): Parameters<RemoveLineParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::remove_recipe_supply(&mut *self.session()?, &p.link_id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove an equipment line from a recipe")]
    fn remove_recipe_equipment(&self, Parameters(p): Parameters<RemoveLineParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::remove_recipe_equipment(&mut *self.session()?, &p.link_id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Costing ---

    #[tool(description = "Cost a recipe for a number of units. Ingredient and supply quantities scale with units / base_yield; equipment hours do not.")]
    fn calculate_recipe_cost(&self, Parameters(p): Parameters<RecipeCostParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::calculate_recipe_cost(&*self.session()?, &p.recipe_id, p.units)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add a recipe to the shopping list. Adding it again adds one more batch.")]
    fn add_to_shopping_list(&self, Parameters(p): Parameters<RecipeIdParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::add_to_shopping_list(&mut *self.session()?, &p.recipe_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the number of batches of a recipe on the shopping list")]
    fn set_shopping_multiplier(&self, Parameters(p): Parameters<SetMultiplierParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::set_shopping_multiplier(&mut *self.session()?, &p.recipe_id, p.multiplier)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove a recipe from the shopping list")]
    fn remove_from_shopping_list(&self, Parameters(p): Parameters<RecipeIdParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::remove_from_shopping_list(&mut *self.session()?, &p.recipe_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Clear the shopping list")]
    fn clear_shopping_list(&self) -> Result<CallToolResult, McpError> {
        json_result(&calculator::clear_shopping_list(&mut *self.session()?))
    }

    #[tool(description = "Show the recipes on the shopping list with their batch counts")]
    fn get_shopping_list(&self) -> Result<CallToolResult, McpError> {
        json_result(&calculator::get_shopping_list(&*self.session()?))
    }

    #[tool(description = "Consolidate the shopping list: merged ingredient, supply and energy lines, totals, per-recipe breakdown and the most expensive items")]
    fn calculate_shopping_list(&self, Parameters(p): Parameters<CalculateShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::calculate_shopping_list(&*self.session()?, p.top)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Reports ---

    #[tool(description = "Export the consolidated shopping list as a CSV file (UTF-8 with BOM)")]
    fn export_shopping_list_csv(&self, Parameters(p): Parameters<ExportCsvParams>) -> Result<CallToolResult, McpError> {
        let options = CsvOptions {
            include_ingredients: p.include_ingredients,
            include_supplies: p.include_supplies,
            include_energy: p.include_energy,
            group_by_supplier: p.group_by_supplier,
        };
        let result = reports::export_shopping_list_csv(&*self.session()?, Path::new(&p.file_path), options)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Export a PNG bar chart of the most expensive shopping list items")]
    fn export_cost_chart(&self, Parameters(p): Parameters<ExportChartParams>) -> Result<CallToolResult, McpError> {
        let result = reports::export_cost_chart(&*self.session()?, Path::new(&p.file_path), p.top)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Workbook ---

    #[tool(description = "Export the whole catalog to an .xlsx workbook file")]
    async fn export_workbook(&self, Parameters(p): Parameters<FilePathParams>) -> Result<CallToolResult, McpError> {
        let snapshot = self.session()?.snapshot().clone();
        let result = workbook::export_workbook(&snapshot, Path::new(&p.file_path))
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Replace the catalog with the contents of an .xlsx workbook file. The catalog is unchanged if the file cannot be read. Reports how many shopping list entries were dropped.")]
    async fn import_workbook(&self, Parameters(p): Parameters<FilePathParams>) -> Result<CallToolResult, McpError> {
        let path = PathBuf::from(&p.file_path);
        let (snapshot, report) = workbook::load_workbook(&path)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let result = workbook::apply_import(&mut *self.session()?, &path, snapshot, report);
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for BakecostService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bakecost".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Bakery Recipe Costing".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Bakecost - ingredient, supply and energy costing for bakery recipes. \
                 IMPORTANT: Call costing_instructions before starting. \
                 Catalog: upsert/get/list/delete_ingredient, upsert/get/list/delete_supply, \
                 upsert/get/list/delete_equipment, validate_energy_formula, get/set_energy_cost. \
                 Recipes: upsert/get/list/delete_recipe, upsert/remove_recipe_ingredient, \
                 upsert/remove_recipe_supply, upsert/remove_recipe_equipment. \
                 Costing: calculate_recipe_cost. \
                 Shopping list: add_to_shopping_list, set_shopping_multiplier, remove_from_shopping_list, \
                 clear_shopping_list, get_shopping_list, calculate_shopping_list. \
                 Files: export_shopping_list_csv, export_cost_chart, export_workbook, import_workbook."
                    .into(),
            ),
        }
    }
}
