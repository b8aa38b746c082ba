//! Tabular loader - CSV / workbook → RowDataset

use crate::error::{DeckError, DeckResult};
use crate::types::{CellValue, RowDataset};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Column holding the renewal amount; cleaned on every load
pub const AMOUNT_COLUMN: &str = "Est. Renewal Available";

/// Default column used for the row filter
pub const FILTER_COLUMN: &str = "Partner_ID";

/// Loader for row-oriented files (.csv, .xlsx, .xls, .ods)
pub struct TabularLoader {
    path: PathBuf,
    amount_column: String,
}

impl TabularLoader {
    /// Create a new loader for the given file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            amount_column: AMOUNT_COLUMN.to_string(),
        }
    }

    /// Override the column that gets comma-stripped and coerced to integer
    pub fn with_amount_column(mut self, column: impl Into<String>) -> Self {
        self.amount_column = column.into();
        self
    }

    /// Read the file, apply the optional exact-match filter and clean the
    /// amount column.
    pub fn load(&self, filter_column: &str, filter_value: Option<&str>) -> DeckResult<RowDataset> {
        let dataset = self.read()?;
        let label = self.path.display().to_string();
        prepare(dataset, &label, filter_column, filter_value, &self.amount_column)
    }

    /// Read the whole file without filtering or cleaning
    pub fn read(&self) -> DeckResult<RowDataset> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => self.read_csv(),
            "xlsx" | "xlsm" | "xls" | "ods" => self.read_workbook(),
            other => Err(DeckError::Load(format!(
                "Unsupported file type '{}' for {}",
                other,
                self.path.display()
            ))),
        }
    }

    fn read_csv(&self) -> DeckResult<RowDataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| {
                DeckError::Load(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| DeckError::Load(format!("Failed to read header: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut dataset = RowDataset::new(columns);
        for record in reader.records() {
            let record =
                record.map_err(|e| DeckError::Load(format!("Malformed CSV record: {}", e)))?;
            dataset.push_row(record.iter().map(CellValue::from_text).collect())?;
        }
        Ok(dataset)
    }

    fn read_workbook(&self) -> DeckResult<RowDataset> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            DeckError::Load(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DeckError::Load(format!("{} has no worksheets", self.path.display())))?
            .map_err(|e| DeckError::Load(format!("Failed to read worksheet: {}", e)))?;

        let mut rows = range.rows();
        let columns: Vec<String> = match rows.next() {
            Some(header) => header
                .iter()
                .enumerate()
                .map(|(idx, cell)| match cell {
                    Data::Empty => format!("col_{}", idx),
                    other => other.to_string(),
                })
                .collect(),
            None => return Ok(RowDataset::default()),
        };

        let mut dataset = RowDataset::new(columns);
        for row in rows {
            dataset.push_row(row.iter().map(convert_cell).collect())?;
        }
        Ok(dataset)
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::from_text(s),
        other => CellValue::Text(other.to_string()),
    }
}

/// Build a dataset from string rows whose first row is the header
/// (the shape returned by the spreadsheet values API).
pub fn dataset_from_values(values: Vec<Vec<String>>) -> DeckResult<RowDataset> {
    let mut rows = values.into_iter();
    let columns = match rows.next() {
        Some(header) => header,
        None => return Ok(RowDataset::default()),
    };
    let mut dataset = RowDataset::new(columns);
    for row in rows {
        dataset.push_row(row.iter().map(|s| CellValue::from_text(s)).collect())?;
    }
    Ok(dataset)
}

/// Filter and clean a freshly read dataset
pub fn prepare(
    mut dataset: RowDataset,
    source: &str,
    filter_column: &str,
    filter_value: Option<&str>,
    amount_column: &str,
) -> DeckResult<RowDataset> {
    info!(
        "Data loaded from {}: {} rows, {} columns",
        source,
        dataset.len(),
        dataset.width()
    );

    if let Some(value) = filter_value {
        let before = dataset.len();
        dataset.retain_eq(filter_column, value)?;
        info!(
            "Filtered on {}={}: rows reduced from {} to {}",
            filter_column,
            value,
            before,
            dataset.len()
        );
    }

    if dataset.has_column(amount_column) {
        dataset.try_map_column(amount_column, normalize_amount)?;
        info!(
            "'{}' cleaned: commas removed, missing filled with 0, converted to integer",
            amount_column
        );
    } else {
        warn!("'{}' column not found in the dataset", amount_column);
    }

    Ok(dataset)
}

/// Strip thousands separators, treat missing as zero, coerce to integer.
/// Fractional values truncate toward zero.
pub fn normalize_amount(cell: &CellValue) -> DeckResult<CellValue> {
    match cell {
        CellValue::Missing => Ok(CellValue::Integer(0)),
        CellValue::Integer(i) => Ok(CellValue::Integer(*i)),
        CellValue::Number(n) => Ok(CellValue::Integer(n.trunc() as i64)),
        CellValue::Text(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',').collect();
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                return Ok(CellValue::Integer(0));
            }
            if let Ok(i) = cleaned.parse::<i64>() {
                return Ok(CellValue::Integer(i));
            }
            match cleaned.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(CellValue::Integer(f.trunc() as i64)),
                _ => Err(DeckError::Load(format!(
                    "Cannot convert '{}' to an integer amount",
                    s
                ))),
            }
        }
    }
}
