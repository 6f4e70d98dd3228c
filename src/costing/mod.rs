//! Costing core
//!
//! Numeric normalization, unit cost derivation, the energy formula model and
//! the single-recipe and multi-recipe cost calculators. Nothing here returns an
//! error: malformed input degrades to zero cost.

pub mod consolidate;
pub mod formula;
pub mod lookup;
pub mod normalize;
pub mod ranking;
pub mod recipe_cost;
pub mod unit_cost;

pub use consolidate::{
    consolidate, ConsolidatedEnergyRow, ConsolidatedIngredientRow, ConsolidatedResult,
    ConsolidatedSupplyRow, RecipeBreakdown, Selection, NO_SUPPLIER,
};
pub use formula::{
    compute_energy, default_kwh, validate_formula, Formula, FormulaError, Variable,
    DEFAULT_FORMULA,
};
pub use lookup::{cost_recipe, recipe_usages, CostLookup, RecipeUsages};
pub use normalize::{finite_or, normalize, normalize_opt, normalize_str};
pub use ranking::{group_by_supplier, top_cost_items, CostCategory, CostShare, DEFAULT_TOP_ITEMS};
pub use recipe_cost::{
    calculate_recipe_cost, effective_energy_unit_cost, required_quantity, CostBreakdown, CostRow,
    EnergyRow, EquipmentUsage, IngredientUsage, SupplyUsage,
};
pub use unit_cost::derive_unit_cost;
