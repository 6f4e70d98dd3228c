//! Report generation tools
//!
//! Export the consolidated shopping list as CSV and the top cost items as a PNG bar chart.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use serde::Serialize;

use crate::catalog::Session;
use crate::costing::{group_by_supplier, top_cost_items, ConsolidatedResult, CostCategory, CostShare, NO_SUPPLIER};
use crate::tools::calculator::consolidate_selection;

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_INGREDIENT: (u8, u8, u8) = (196, 120, 60); // Crust brown
const COLOR_SUPPLY: (u8, u8, u8) = (0, 112, 192); // Blue
const COLOR_ENERGY: (u8, u8, u8) = (255, 165, 0); // Orange

pub const CSV_HEADER: &str = "Category,Supplier,Item,Quantity,Unit,Estimated Cost";
const UTF8_BOM: &str = "\u{FEFF}";

pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 600;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ExportCsvResponse {
    pub success: bool,
    pub file_path: String,
    /// Data rows written, not counting the header or supplier headings
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct ExportChartResponse {
    pub success: bool,
    pub file_path: String,
    pub items: Vec<CostShare>,
}

/// Which sections end up in the CSV
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub include_ingredients: bool,
    pub include_supplies: bool,
    pub include_energy: bool,
    pub group_by_supplier: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            include_ingredients: true,
            include_supplies: true,
            include_energy: true,
            group_by_supplier: false,
        }
    }
}

// ============================================================================
// Formatting Helpers
// ============================================================================

/// At most one decimal, trailing `.0` dropped
fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

/// Whole currency units
fn format_cost(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    format!("{:.0}", value.round())
}

// ============================================================================
// CSV
// ============================================================================

type CsvWriter = csv::Writer<Vec<u8>>;

fn write_row(writer: &mut CsvWriter, fields: &[&str]) -> Result<(), String> {
    writer
        .write_record(fields)
        .map_err(|e| format!("Failed to write CSV row: {}", e))
}

/// Render the consolidated result as CSV text (without BOM), returning the data row count
pub fn shopping_list_csv(result: &ConsolidatedResult, options: CsvOptions) -> Result<(String, usize), String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let header: Vec<&str> = CSV_HEADER.split(',').collect();
    write_row(&mut writer, &header)?;
    let mut rows = 0;

    if options.include_ingredients && !result.ingredients.is_empty() {
        if options.group_by_supplier {
            for (supplier, group) in group_by_supplier(&result.ingredients) {
                write_row(&mut writer, &["Supplier", &supplier, "", "", "", ""])?;
                for row in group {
                    write_row(
                        &mut writer,
                        &[
                            CostCategory::Ingredient.label(),
                            &supplier,
                            &row.name,
                            &format_quantity(row.quantity),
                            &row.unit,
                            &format_cost(row.cost),
                        ],
                    )?;
                    rows += 1;
                }
                // Empty separator row between supplier groups
                write_row(&mut writer, &[""; 6])?;
            }
        } else {
            for row in &result.ingredients {
                let supplier = if row.supplier.trim().is_empty() {
                    NO_SUPPLIER
                } else {
                    row.supplier.as_str()
                };
                write_row(
                    &mut writer,
                    &[
                        CostCategory::Ingredient.label(),
                        supplier,
                        &row.name,
                        &format_quantity(row.quantity),
                        &row.unit,
                        &format_cost(row.cost),
                    ],
                )?;
                rows += 1;
            }
        }
    }

    if options.include_supplies {
        for row in &result.supplies {
            write_row(
                &mut writer,
                &[
                    CostCategory::Supply.label(),
                    "",
                    &row.name,
                    &format_quantity(row.quantity),
                    &row.unit,
                    &format_cost(row.cost),
                ],
            )?;
            rows += 1;
        }
    }

    if options.include_energy {
        for row in &result.energy {
            let usage = format!("{} h ({} kWh)", format_quantity(row.hours), format_quantity(row.kwh));
            write_row(
                &mut writer,
                &[
                    CostCategory::Energy.label(),
                    "",
                    &row.name,
                    &usage,
                    "",
                    &format_cost(row.cost),
                ],
            )?;
            rows += 1;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| format!("Failed to finish CSV: {}", e))?;
    let text = String::from_utf8(bytes).map_err(|e| format!("CSV is not valid UTF-8: {}", e))?;
    Ok((text, rows))
}

/// Write the current shopping list as a UTF-8 CSV with BOM
pub fn export_shopping_list_csv(
    session: &Session,
    file_path: &Path,
    options: CsvOptions,
) -> Result<ExportCsvResponse, String> {
    let result = consolidate_selection(session)?;
    let (csv, rows) = shopping_list_csv(&result, options)?;
    if rows == 0 {
        return Err("No data selected for export".to_string());
    }

    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
        }
    }
    std::fs::write(file_path, format!("{}{}", UTF8_BOM, csv))
        .map_err(|e| format!("Failed to write CSV: {}", e))?;

    tracing::info!("Exported shopping list CSV ({} rows) to {}", rows, file_path.display());

    Ok(ExportCsvResponse {
        success: true,
        file_path: file_path.display().to_string(),
        rows,
    })
}

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

fn category_color(category: CostCategory) -> (u8, u8, u8) {
    match category {
        CostCategory::Ingredient => COLOR_INGREDIENT,
        CostCategory::Supply => COLOR_SUPPLY,
        CostCategory::Energy => COLOR_ENERGY,
    }
}

/// Generate a horizontal bar chart of cost items as PNG bytes, first item on top
pub fn generate_cost_chart(items: &[CostShare], width: u32, height: u32) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if items.is_empty() {
        return Err("No data to chart".to_string());
    }
    if width == 0 || height == 0 {
        return Err("Chart dimensions must be positive".to_string());
    }

    let count = items.len() as i32;
    let x_max = items.iter().map(|i| i.cost).fold(0.0_f64, f64::max).max(1.0) * 1.15;
    // Row index counted from the bottom of the chart
    let label_for = |row: i32| -> String {
        let index = (count - 1 - row) as usize;
        items
            .get(index)
            .map(|i| format!("{} ({:.1}%)", i.name, i.percentage))
            .unwrap_or_default()
    };

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Top cost items", ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(260)
            .build_cartesian_2d(0.0..x_max, (0..count).into_segmented())
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(items.len())
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(row) => label_for(*row),
                _ => String::new(),
            })
            .x_desc("Estimated cost")
            .draw()
            .map_err(|e| e.to_string())?;

        chart
            .draw_series(items.iter().enumerate().map(|(index, item)| {
                let row = count - 1 - index as i32;
                let (r, g, b) = category_color(item.category);
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(row)),
                        (item.cost.max(0.0), SegmentValue::Exact(row + 1)),
                    ],
                    RGBColor(r, g, b).filled(),
                );
                bar.set_margin(4, 4, 0, 0);
                bar
            }))
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    // Convert RGB buffer to PNG
    let img = RgbImage::from_raw(width, height, buffer).ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    let dyn_img = DynamicImage::ImageRgb8(img);
    dyn_img
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

/// Render the top cost items of the current shopping list to a PNG file
pub fn export_cost_chart(session: &Session, file_path: &Path, top: usize) -> Result<ExportChartResponse, String> {
    let result = consolidate_selection(session)?;
    let items = top_cost_items(&result, top);
    let png = generate_cost_chart(&items, CHART_WIDTH, CHART_HEIGHT)?;

    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
        }
    }
    std::fs::write(file_path, png).map_err(|e| format!("Failed to write chart: {}", e))?;

    tracing::info!("Exported cost chart ({} items) to {}", items.len(), file_path.display());

    Ok(ExportChartResponse {
        success: true,
        file_path: file_path.display().to_string(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::{ConsolidatedEnergyRow, ConsolidatedIngredientRow, ConsolidatedSupplyRow};

    fn sample() -> ConsolidatedResult {
        ConsolidatedResult {
            ingredients: vec![
                ConsolidatedIngredientRow {
                    item_id: "ing_1".to_string(),
                    name: "Flour".to_string(),
                    supplier: "Mill Co".to_string(),
                    quantity: 450.0,
                    unit: "g".to_string(),
                    cost: 450.4,
                },
                ConsolidatedIngredientRow {
                    item_id: "ing_2".to_string(),
                    name: "Chocolate, dark".to_string(),
                    supplier: NO_SUPPLIER.to_string(),
                    quantity: 33.333,
                    unit: "g".to_string(),
                    cost: 99.6,
                },
            ],
            supplies: vec![ConsolidatedSupplyRow {
                item_id: "sup_1".to_string(),
                name: "Liners".to_string(),
                quantity: 24.0,
                unit: "unit".to_string(),
                cost: 48.0,
            }],
            energy: vec![ConsolidatedEnergyRow {
                item_id: "eq_1".to_string(),
                name: "Oven".to_string(),
                hours: 1.5,
                kwh: 3.75,
                cost: 862.5,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_quantity(450.0), "450");
        assert_eq!(format_quantity(33.333), "33.3");
        assert_eq!(format_quantity(f64::NAN), "0");
        assert_eq!(format_cost(862.5), "863");
    }

    #[test]
    fn test_csv_layout() {
        let (csv, rows) = shopping_list_csv(&sample(), CsvOptions::default()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(rows, 4);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "Ingredient,Mill Co,Flour,450,g,450");
        assert_eq!(lines[2], "Ingredient,No supplier,\"Chocolate, dark\",33.3,g,100");
        assert_eq!(lines[3], "Supply,,Liners,24,unit,48");
        assert_eq!(lines[4], "Energy,,Oven,1.5 h (3.8 kWh),,863");
    }

    #[test]
    fn test_csv_quotes_embedded_quotes() {
        let mut result = sample();
        result.supplies[0].name = "Box \"large\"".to_string();
        let (csv, _) = shopping_list_csv(&result, CsvOptions::default()).unwrap();
        assert!(csv.contains("Supply,,\"Box \"\"large\"\"\",24,unit,48\n"));
        assert!(!csv.contains('\r'));
    }

    #[test]
    fn test_csv_grouped_and_filtered() {
        let options = CsvOptions {
            include_supplies: false,
            include_energy: false,
            group_by_supplier: true,
            ..Default::default()
        };
        let (csv, rows) = shopping_list_csv(&sample(), options).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(rows, 2);
        assert_eq!(lines[1], "Supplier,Mill Co,,,,");
        assert_eq!(lines[2], "Ingredient,Mill Co,Flour,450,g,450");
        assert_eq!(lines[3], ",,,,,");
        assert_eq!(lines[4], "Supplier,No supplier,,,,");
    }

    #[test]
    fn test_csv_nothing_selected() {
        let options = CsvOptions {
            include_ingredients: false,
            include_supplies: false,
            include_energy: false,
            group_by_supplier: false,
        };
        let (csv, rows) = shopping_list_csv(&sample(), options).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(csv, format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn test_export_requires_selection() {
        let session = Session::in_memory();
        let path = std::env::temp_dir().join("bakecost_empty_list.csv");
        assert!(export_shopping_list_csv(&session, &path, CsvOptions::default()).is_err());
        assert!(export_cost_chart(&session, &path, 15).is_err());
    }

    #[test]
    fn test_chart_rejects_empty_input() {
        assert!(generate_cost_chart(&[], CHART_WIDTH, CHART_HEIGHT).is_err());
        let items = top_cost_items(&sample(), 15);
        assert!(generate_cost_chart(&items, 0, CHART_HEIGHT).is_err());
    }
}
