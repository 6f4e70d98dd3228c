//! Bakecost Tools module
//!
//! MCP tool implementations for catalog management, costing and exports.

pub mod calculator;
pub mod catalog;
pub mod recipes;
pub mod reports;
pub mod status;
pub mod workbook;
