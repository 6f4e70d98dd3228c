//! `.xlsx` encoding of a [`Workbook`]
//!
//! The first row of each worksheet holds the headers; every later row becomes
//! a [`Row`] keyed by them. Empty cells are left out of the row.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Workbook as XlsxWorkbook, Worksheet, XlsxError};
use serde_json::{Number, Value};

use super::{Row, Workbook, WorkbookResult};

/// Largest float that still converts to an exact integer cell
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn float_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn cell_value(data: &Data) -> Value {
    match data {
        Data::String(s) => Value::String(s.clone()),
        Data::Float(f) => float_value(*f),
        Data::Int(i) => Value::from(*i),
        Data::Bool(b) => Value::Bool(*b),
        _ => Value::Null,
    }
}

fn header_text(data: &Data) -> String {
    match cell_value(data) {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse workbook bytes (xlsx, and anything else calamine detects)
pub fn parse_xlsx(bytes: Vec<u8>) -> WorkbookResult<Workbook> {
    let mut source = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut workbook = Workbook::default();

    for name in source.sheet_names() {
        let range = source.worksheet_range(&name)?;
        let mut lines = range.rows();
        let headers: Vec<String> = lines
            .next()
            .map(|cells| cells.iter().map(header_text).collect())
            .unwrap_or_default();

        let rows = lines
            .map(|cells| {
                headers
                    .iter()
                    .zip(cells)
                    .filter(|(header, _)| !header.is_empty())
                    .filter_map(|(header, data)| {
                        let value = cell_value(data);
                        (!value.is_null()).then(|| (header.clone(), value))
                    })
                    .collect::<Row>()
            })
            .filter(|row| !row.is_empty())
            .collect();

        workbook.add_sheet(&name, rows);
    }

    Ok(workbook)
}

/// Union of the row keys, in first-appearance order
fn headers(rows: &[Row]) -> Vec<&str> {
    let mut headers: Vec<&str> = Vec::new();
    for key in rows.iter().flat_map(|r| r.keys()) {
        if !headers.contains(&key.as_str()) {
            headers.push(key);
        }
    }
    headers
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<(), XlsxError> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => {
            sheet.write_number(row, col, n.as_f64().unwrap_or(0.0))?;
        }
        Value::String(s) => {
            sheet.write_string(row, col, s)?;
        }
        other => {
            sheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}

/// Render the workbook as `.xlsx` bytes
pub fn render_xlsx(workbook: &Workbook) -> WorkbookResult<Vec<u8>> {
    let mut book = XlsxWorkbook::new();

    for (name, rows) in workbook.sheets() {
        let sheet = book.add_worksheet();
        sheet.set_name(name)?;

        let headers = headers(rows);
        for (c, header) in headers.iter().enumerate() {
            let col = u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
            sheet.write_string(0, col, *header)?;
        }
        for (r, row) in rows.iter().enumerate() {
            let line = u32::try_from(r + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (c, header) in headers.iter().enumerate() {
                if let Some(value) = row.get(*header) {
                    let col = u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
                    write_cell(sheet, line, col, value)?;
                }
            }
        }
    }

    Ok(book.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_cells_survive_xlsx() {
        let mut workbook = Workbook::default();
        workbook.add_sheet(
            "Ingredients",
            vec![
                row(json!({"ID": "ing_1", "Name": "Flour", "Package Cost": 1200, "Package Quantity": 1000})),
                row(json!({"ID": "ing_2", "Name": "Vanilla", "Package Cost": 12.5, "Supplier": "Spice Co"})),
            ],
        );
        workbook.add_sheet("Config", vec![row(json!({"Key": "GlobalKwhCost", "Value": 230}))]);

        let parsed = parse_xlsx(render_xlsx(&workbook).unwrap()).unwrap();

        let ingredients = parsed.sheet("Ingredients").unwrap();
        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[0]["Name"], "Flour");
        assert_eq!(ingredients[0]["Package Quantity"], 1000);
        assert_eq!(ingredients[1]["Package Cost"], 12.5);
        assert_eq!(ingredients[1]["Supplier"], "Spice Co");
        assert!(ingredients[0].get("Supplier").is_none());
        assert_eq!(parsed.sheet("Config").unwrap()[0]["Value"], 230);
    }

    #[test]
    fn test_sheet_order_and_headers() {
        let mut workbook = Workbook::default();
        workbook.add_sheet("Recipes", vec![row(json!({"Name": "Bread", "Yield": 2}))]);
        workbook.add_sheet("Config", Vec::new());

        let parsed = parse_xlsx(render_xlsx(&workbook).unwrap()).unwrap();

        let names: Vec<&str> = parsed.sheets().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Recipes", "Config"]);
        assert_eq!(headers(workbook.sheet("Recipes").unwrap()), vec!["Name", "Yield"]);
        assert!(parsed.sheet("Config").unwrap().is_empty());
    }

    #[test]
    fn test_not_a_workbook() {
        assert!(parse_xlsx(b"plain text, not a spreadsheet".to_vec()).is_err());
    }
}
