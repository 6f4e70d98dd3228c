//! Workbook MCP Tools
//!
//! File IO runs without the session lock held; the server clones the snapshot
//! before exporting and applies an import only after the file parsed.

use std::path::Path;

use serde::Serialize;

use crate::catalog::Session;
use crate::models::{CatalogCounts, CatalogSnapshot};
use crate::workbook::{export_snapshot, import_snapshot, read_workbook, write_workbook, ImportReport};

#[derive(Debug, Serialize)]
pub struct ExportWorkbookResponse {
    pub success: bool,
    pub file_path: String,
    pub counts: CatalogCounts,
}

#[derive(Debug, Serialize)]
pub struct ImportWorkbookResponse {
    pub success: bool,
    pub file_path: String,
    #[serde(flatten)]
    pub report: ImportReport,
    /// Shopping list entries dropped because their recipe is not in the workbook
    pub shopping_list_entries: usize,
}

pub async fn export_workbook(snapshot: &CatalogSnapshot, file_path: &Path) -> Result<ExportWorkbookResponse, String> {
    let workbook = export_snapshot(snapshot);
    write_workbook(file_path, &workbook)
        .await
        .map_err(|e| format!("Failed to export workbook: {}", e))?;

    let counts = snapshot.counts();
    tracing::info!(
        "Exported workbook to {} ({} ingredients, {} recipes)",
        file_path.display(),
        counts.ingredients,
        counts.recipes
    );

    Ok(ExportWorkbookResponse {
        success: true,
        file_path: file_path.display().to_string(),
        counts,
    })
}

/// Read and convert a workbook without touching the session
pub async fn load_workbook(file_path: &Path) -> Result<(CatalogSnapshot, ImportReport), String> {
    let workbook = read_workbook(file_path)
        .await
        .map_err(|e| format!("Failed to read workbook: {}", e))?;
    import_snapshot(&workbook).map_err(|e| format!("Failed to import workbook: {}", e))
}

/// Replace the session catalog with an imported snapshot
pub fn apply_import(
    session: &mut Session,
    file_path: &Path,
    snapshot: CatalogSnapshot,
    report: ImportReport,
) -> ImportWorkbookResponse {
    let dropped = session.restore(snapshot);
    tracing::info!(
        "Imported workbook {} ({} recipes, {} warnings)",
        file_path.display(),
        report.counts.recipes,
        report.warnings.len()
    );
    ImportWorkbookResponse {
        success: true,
        file_path: file_path.display().to_string(),
        report,
        shopping_list_entries: dropped,
    }
}
