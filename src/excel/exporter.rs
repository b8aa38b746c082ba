//! Excel exporter implementation

use crate::error::{DeckError, DeckResult};
use crate::types::SummaryTable;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

/// Excel caps worksheet names at 31 characters
const MAX_SHEET_NAME: usize = 31;

/// Worksheet-safe version of a summary title
pub fn worksheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() {
        "Summary".to_string()
    } else {
        cleaned
    }
}

/// One distinct worksheet name per title, compared case-insensitively.
/// Collisions fall back to the first free `Summary {n}`.
pub fn unique_sheet_names(titles: &[&str]) -> Vec<String> {
    let mut used = HashSet::new();
    titles
        .iter()
        .enumerate()
        .map(|(idx, title)| {
            let mut name = worksheet_name(title);
            let mut n = idx + 1;
            while !used.insert(name.to_lowercase()) {
                name = format!("Summary {}", n);
                n += 1;
            }
            name
        })
        .collect()
}

/// Writes summary tables to a workbook, one worksheet each
pub struct SummaryExporter {
    sheets: Vec<(String, SummaryTable)>,
}

impl SummaryExporter {
    pub fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    pub fn add(&mut self, title: &str, summary: SummaryTable) {
        self.sheets.push((title.to_string(), summary));
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Export every summary to an .xlsx file
    pub fn export(&self, output_path: &Path) -> DeckResult<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let titles: Vec<&str> = self.sheets.iter().map(|(title, _)| title.as_str()).collect();
        let names = unique_sheet_names(&titles);

        for ((_, summary), name) in self.sheets.iter().zip(names) {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(&name)
                .map_err(|e| DeckError::Export(format!("Failed to set worksheet name: {}", e)))?;
            Self::write_summary(worksheet, summary, &header)?;
        }

        workbook
            .save(output_path)
            .map_err(|e| DeckError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    fn write_summary(
        worksheet: &mut Worksheet,
        summary: &SummaryTable,
        header: &Format,
    ) -> DeckResult<()> {
        for (col, label) in summary.header().iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *label, header)
                .map_err(|e| DeckError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (idx, row) in summary.rows.iter().enumerate() {
            let excel_row = (idx + 1) as u32;
            worksheet
                .write_string(excel_row, 0, &row.key)
                .map_err(|e| DeckError::Export(format!("Failed to write text: {}", e)))?;
            worksheet
                .write_number(excel_row, 1, row.value)
                .map_err(|e| DeckError::Export(format!("Failed to write number: {}", e)))?;
        }

        Ok(())
    }
}

impl Default for SummaryExporter {
    fn default() -> Self {
        Self::new()
    }
}
