//! Bakecost Library
//!
//! Recipe costing for bakeries: ingredient, supply and equipment energy costs,
//! multi-recipe shopping lists and catalog import/export.

pub mod build_info;
pub mod catalog;
pub mod config;
pub mod costing;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod workbook;
