//! Workbook serializer
//!
//! Converts the catalog snapshot to and from a workbook of named sheets, each
//! an ordered list of rows keyed by column header. Recipe detail rows refer to
//! recipes and items by display name, not by ID.
//!
//! Workbook files are `.xlsx` spreadsheets, read with calamine and written
//! with rust_xlsxwriter.

mod export;
mod import;
mod xlsx;

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

pub use export::export_snapshot;
pub use import::{import_snapshot, ImportReport};
pub use xlsx::{parse_xlsx, render_xlsx};

pub const SHEET_INGREDIENTS: &str = "Ingredients";
pub const SHEET_SUPPLIES: &str = "Supplies";
pub const SHEET_EQUIPMENT: &str = "Equipment";
pub const SHEET_RECIPES: &str = "Recipes";
pub const SHEET_RECIPE_DETAIL: &str = "Recipe_Detail";
pub const SHEET_CONFIG: &str = "Config";

/// Config key holding the global kWh cost
pub const CONFIG_ENERGY_COST: &str = "GlobalKwhCost";

/// One sheet row, cells keyed by header
pub type Row = Map<String, Value>;

/// Workbook errors
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("Failed to access workbook {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid workbook file: {0}")]
    Read(#[from] calamine::Error),

    #[error("Failed to build workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook contains none of the catalog sheets")]
    NoCatalogSheets,
}

pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Named sheets of rows, in sheet order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<(String, Vec<Row>)>,
}

impl Workbook {
    pub fn sheets(&self) -> &[(String, Vec<Row>)] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&[Row]> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rows)| rows.as_slice())
    }

    /// First sheet present under any of `names`
    pub fn sheet_any(&self, names: &[&str]) -> Option<&[Row]> {
        names.iter().find_map(|name| self.sheet(name))
    }

    /// Add a sheet, replacing one of the same name
    pub fn add_sheet(&mut self, name: &str, rows: Vec<Row>) {
        match self.sheets.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = rows,
            None => self.sheets.push((name.to_string(), rows)),
        }
    }
}

/// Read a workbook file
pub async fn read_workbook(path: &Path) -> WorkbookResult<Workbook> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| WorkbookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_xlsx(bytes)
}

/// Write a workbook file, creating parent directories as needed
pub async fn write_workbook(path: &Path, workbook: &Workbook) -> WorkbookResult<()> {
    let io_err = |source| WorkbookError::Io {
        path: path.to_path_buf(),
        source,
    };
    let bytes = render_xlsx(workbook)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, bytes).await.map_err(io_err)
}
