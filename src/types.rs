use crate::error::{DeckError, DeckResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    // Round to 6 decimal places; enough for currency totals and counts
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

//==============================================================================
// Cell values
//==============================================================================

/// A single cell of a loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty cell (CSV empty field, blank spreadsheet cell)
    Missing,
    Text(String),
    Integer(i64),
    Number(f64),
}

impl CellValue {
    /// Build a cell from raw text; the empty string is a missing value
    pub fn from_text(raw: &str) -> Self {
        if raw.is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Text form used for equality filters and distinct counts.
    /// Returns None for missing cells.
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            other => Some(other.to_string()),
        }
    }

    /// Numeric view of the cell. Text is parsed after trimming.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Missing => None,
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
        }
    }
}

//==============================================================================
// Row dataset
//==============================================================================

/// Row-oriented table. Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowDataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RowDataset {
    /// Create an empty dataset with the given header
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from raw rows. Short rows are padded with missing
    /// cells; rows wider than the header are rejected.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> DeckResult<Self> {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    pub fn push_row(&mut self, mut row: Vec<CellValue>) -> DeckResult<()> {
        if row.len() > self.columns.len() {
            return Err(DeckError::Load(format!(
                "Row {} has {} fields but the header has {} columns",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell lookup by row position and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Keep only rows whose `column` text equals `value` exactly
    pub fn retain_eq(&mut self, column: &str, value: &str) -> DeckResult<()> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| DeckError::Load(format!("Filter column '{}' not found", column)))?;
        self.rows
            .retain(|row| row[idx].as_key().as_deref() == Some(value));
        Ok(())
    }

    /// Filtered copy; the source dataset is left untouched
    pub fn filter_eq(&self, column: &str, value: &str) -> DeckResult<RowDataset> {
        let mut filtered = self.clone();
        filtered.retain_eq(column, value)?;
        Ok(filtered)
    }

    /// Copy with only the named columns, in the given order
    pub fn select(&self, columns: &[&str]) -> DeckResult<RowDataset> {
        let indices = columns
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| DeckError::Load(format!("Column '{}' not found", name)))
            })
            .collect::<DeckResult<Vec<usize>>>()?;
        Ok(RowDataset {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Drop rows where `column` is missing
    pub fn drop_missing(&mut self, column: &str) -> DeckResult<()> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| DeckError::Load(format!("Column '{}' not found", column)))?;
        self.rows.retain(|row| !row[idx].is_missing());
        Ok(())
    }

    /// Distinct non-missing values of a column, in order of first appearance
    pub fn unique_values(&self, column: &str) -> DeckResult<Vec<String>> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| DeckError::Load(format!("Column '{}' not found", column)))?;
        let mut seen = HashSet::new();
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row[idx].as_key())
            .filter(|key| seen.insert(key.clone()))
            .collect())
    }

    /// Rewrite every cell of one column in place
    pub fn try_map_column<F>(&mut self, column: &str, mut f: F) -> DeckResult<()>
    where
        F: FnMut(&CellValue) -> DeckResult<CellValue>,
    {
        let idx = self
            .column_index(column)
            .ok_or_else(|| DeckError::Load(format!("Column '{}' not found", column)))?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx])?;
        }
        Ok(())
    }
}

//==============================================================================
// Aggregation
//==============================================================================

/// How values are folded within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMode {
    /// Number of distinct values
    CountUnique,
    Sum,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::CountUnique => write!(f, "count-unique"),
            AggregationMode::Sum => write!(f, "sum"),
        }
    }
}

impl FromStr for AggregationMode {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count-unique" => Ok(AggregationMode::CountUnique),
            "sum" => Ok(AggregationMode::Sum),
            other => Err(DeckError::Config(format!(
                "Unknown aggregation mode '{}' (expected count-unique or sum)",
                other
            ))),
        }
    }
}

/// One ranked entry of a summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: String,
    pub value: f64,
}

/// Ranked top-N aggregation. Two columns: group key, aggregate value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub group_column: String,
    pub value_column: String,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        2
    }

    pub fn header(&self) -> [&str; 2] {
        [&self.group_column, &self.value_column]
    }

    /// Text of a data cell (zero-based, header excluded)
    pub fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        let entry = self.rows.get(row)?;
        match column {
            0 => Some(entry.key.clone()),
            1 => Some(format_number(entry.value)),
            _ => None,
        }
    }
}
