//! Excel workbook writer
//!
//! Each present table becomes one worksheet: bold frozen header row, autofit
//! columns, sheets appended in collection order. The workbook is created by
//! the first section and saved once at the end of the run.

use super::ReportWriter;
use crate::graph::page::ResultSet;
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;
use std::path::Path;

/// Excel sheet names are limited to 31 characters
const MAX_SHEET_NAME: usize = 31;

pub struct XlsxReportWriter {
    workbook: Workbook,
}

impl XlsxReportWriter {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
        }
    }

    /// Persist the workbook. Callers skip this when no section was written,
    /// so an all-empty run produces no artifact.
    pub fn save(mut self, path: &Path) -> Result<()> {
        self.workbook
            .save(path)
            .with_context(|| format!("Failed to write workbook {}", path.display()))
    }
}

impl Default for XlsxReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportWriter for XlsxReportWriter {
    fn write_section(&mut self, name: &str, rows: &ResultSet) -> Result<()> {
        let sheet = self.workbook.add_worksheet();
        sheet.set_name(sheet_name(name))?;

        let header_format = Format::new().set_bold();

        match rows {
            ResultSet::Table { columns, rows } => {
                for (col, column) in columns.iter().enumerate() {
                    sheet.write_string_with_format(0, col as u16, &column.name, &header_format)?;
                }
                for (row_idx, row) in rows.iter().enumerate() {
                    for (col, cell) in row.iter().enumerate() {
                        write_cell(sheet, row_idx as u32 + 1, col as u16, cell)?;
                    }
                }
            }
            ResultSet::Records(records) => {
                let headers = record_headers(records);
                for (col, header) in headers.iter().enumerate() {
                    sheet.write_string_with_format(0, col as u16, header, &header_format)?;
                }
                for (row_idx, record) in records.iter().enumerate() {
                    for (col, header) in headers.iter().enumerate() {
                        if let Some(cell) = record.get(header) {
                            write_cell(sheet, row_idx as u32 + 1, col as u16, cell)?;
                        }
                    }
                }
            }
        }

        sheet.set_freeze_panes(1, 0)?;
        sheet.autofit();

        Ok(())
    }
}

/// Header row for record-shaped data: the column set grows in first-seen
/// order across records (later records append new keys without reordering
/// earlier ones); within one record keys follow serde_json's map order,
/// which is alphabetical
fn record_headers(records: &[Value]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        if let Some(obj) = record.as_object() {
            for key in obj.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
    }
    headers
}

fn sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME).collect()
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Value) -> Result<()> {
    match cell {
        Value::Null => {}
        Value::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                sheet.write_number(row, col, f)?;
            } else {
                sheet.write_string(row, col, n.to_string())?;
            }
        }
        Value::String(s) => {
            sheet.write_string(row, col, s)?;
        }
        // Nested structures are written as compact JSON
        other => {
            sheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}
