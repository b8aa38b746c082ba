//! Group-and-rank summaries over a RowDataset

use crate::error::{DeckError, DeckResult};
use crate::types::{AggregationMode, RowDataset, SummaryRow, SummaryTable};
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// Number of groups kept in a summary
pub const TOP_N: usize = 5;

/// Aggregate `value_column` per distinct `group_column` value and keep the
/// top five groups by aggregate value, descending.
///
/// Rows with a missing group key are skipped. `count-unique` ignores missing
/// values, so an empty cell never counts as a distinct value of its own;
/// `sum` treats them as zero and rejects non-numeric text.
pub fn aggregate(
    dataset: &RowDataset,
    group_column: &str,
    value_column: &str,
    mode: AggregationMode,
) -> DeckResult<SummaryTable> {
    let group_idx = dataset.column_index(group_column).ok_or_else(|| {
        DeckError::Aggregation(format!("Group column '{}' not found", group_column))
    })?;
    let value_idx = dataset.column_index(value_column).ok_or_else(|| {
        DeckError::Aggregation(format!("Value column '{}' not found", value_column))
    })?;

    // BTreeMap keeps groups key-ordered, so ties rank deterministically
    let mut rows: Vec<SummaryRow> = match mode {
        AggregationMode::CountUnique => {
            let mut groups: BTreeMap<String, HashSet<String>> = BTreeMap::new();
            for row in dataset.rows() {
                let Some(key) = row[group_idx].as_key() else {
                    continue;
                };
                let distinct = groups.entry(key).or_default();
                if let Some(value) = row[value_idx].as_key() {
                    distinct.insert(value);
                }
            }
            groups
                .into_iter()
                .map(|(key, distinct)| SummaryRow {
                    key,
                    value: distinct.len() as f64,
                })
                .collect()
        }
        AggregationMode::Sum => {
            let mut groups: BTreeMap<String, f64> = BTreeMap::new();
            for row in dataset.rows() {
                let Some(key) = row[group_idx].as_key() else {
                    continue;
                };
                let cell = &row[value_idx];
                let amount = if cell.is_missing() {
                    0.0
                } else {
                    cell.as_number().ok_or_else(|| {
                        DeckError::Aggregation(format!(
                            "Cannot sum non-numeric value '{}' in '{}'",
                            cell, value_column
                        ))
                    })?
                };
                *groups.entry(key).or_insert(0.0) += amount;
            }
            groups
                .into_iter()
                .map(|(key, value)| SummaryRow { key, value })
                .collect()
        }
    };

    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    let group_count = rows.len();
    rows.truncate(TOP_N);

    info!(
        "Summary '{}' by '{}' ({}): {} groups, kept {}",
        value_column,
        group_column,
        mode,
        group_count,
        rows.len()
    );

    Ok(SummaryTable {
        group_column: group_column.to_string(),
        value_column: value_column.to_string(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use pretty_assertions::assert_eq;

    fn dataset(columns: &[&str], rows: &[&[&str]]) -> RowDataset {
        RowDataset::from_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| CellValue::from_text(v)).collect())
                .collect(),
        )
        .unwrap()
    }

    fn pairs(summary: &SummaryTable) -> Vec<(String, f64)> {
        summary
            .rows
            .iter()
            .map(|r| (r.key.clone(), r.value))
            .collect()
    }

    #[test]
    fn test_sum_groups() {
        let ds = dataset(&["g", "v"], &[&["A", "10"], &["A", "5"], &["B", "1"]]);
        let summary = aggregate(&ds, "g", "v", AggregationMode::Sum).unwrap();
        assert_eq!(
            pairs(&summary),
            vec![("A".to_string(), 15.0), ("B".to_string(), 1.0)]
        );
        assert_eq!(summary.header(), ["g", "v"]);
    }

    #[test]
    fn test_count_unique_ignores_duplicates() {
        let ds = dataset(
            &["FY FQ", "Opp #"],
            &[
                &["FY24 Q1", "O-1"],
                &["FY24 Q1", "O-1"],
                &["FY24 Q1", "O-2"],
                &["FY24 Q2", "O-3"],
                &["FY24 Q2", ""],
            ],
        );
        let summary = aggregate(&ds, "FY FQ", "Opp #", AggregationMode::CountUnique).unwrap();
        assert_eq!(
            pairs(&summary),
            vec![("FY24 Q1".to_string(), 2.0), ("FY24 Q2".to_string(), 1.0)]
        );
    }

    #[test]
    fn test_count_unique_missing_values_count_zero() {
        let ds = dataset(
            &["FY FQ", "Opp #"],
            &[&["FY24 Q1", "O-1"], &["FY24 Q3", ""], &["FY24 Q3", ""]],
        );
        let summary = aggregate(&ds, "FY FQ", "Opp #", AggregationMode::CountUnique).unwrap();
        assert_eq!(
            pairs(&summary),
            vec![("FY24 Q1".to_string(), 1.0), ("FY24 Q3".to_string(), 0.0)]
        );
    }

    #[test]
    fn test_top_five_descending() {
        let rows: Vec<Vec<String>> = (1..=8)
            .map(|i| vec![format!("G{}", i), (i * 10).to_string()])
            .collect();
        let row_refs: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.iter().map(|s| s.as_str()).collect())
            .collect();
        let slices: Vec<&[&str]> = row_refs.iter().map(|r| r.as_slice()).collect();
        let ds = dataset(&["g", "v"], &slices);

        let summary = aggregate(&ds, "g", "v", AggregationMode::Sum).unwrap();
        assert_eq!(summary.num_rows(), TOP_N);
        assert!(summary.rows.windows(2).all(|w| w[0].value >= w[1].value));
        assert_eq!(summary.rows[0].key, "G8");
    }

    #[test]
    fn test_missing_group_key_is_skipped() {
        let ds = dataset(&["g", "v"], &[&["", "10"], &["A", "1"]]);
        let summary = aggregate(&ds, "g", "v", AggregationMode::Sum).unwrap();
        assert_eq!(pairs(&summary), vec![("A".to_string(), 1.0)]);
    }

    #[test]
    fn test_missing_columns() {
        let ds = dataset(&["g", "v"], &[&["A", "1"]]);
        assert!(matches!(
            aggregate(&ds, "nope", "v", AggregationMode::Sum),
            Err(DeckError::Aggregation(_))
        ));
        assert!(matches!(
            aggregate(&ds, "g", "nope", AggregationMode::CountUnique),
            Err(DeckError::Aggregation(_))
        ));
    }

    #[test]
    fn test_sum_rejects_text() {
        let ds = dataset(&["g", "v"], &[&["A", "lots"]]);
        assert!(matches!(
            aggregate(&ds, "g", "v", AggregationMode::Sum),
            Err(DeckError::Aggregation(_))
        ));
    }

    #[test]
    fn test_empty_dataset_gives_empty_summary() {
        let ds = dataset(&["g", "v"], &[]);
        let summary = aggregate(&ds, "g", "v", AggregationMode::CountUnique).unwrap();
        assert_eq!(summary.num_rows(), 0);
    }
}
