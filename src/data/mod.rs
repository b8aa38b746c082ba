//! Renewal data: loading, filtering, aggregation
//!
//! - Loader: CSV / workbook / Google Sheet → RowDataset, exact-match filter,
//!   amount column cleanup
//! - Aggregate: top-5 count-unique or sum summaries
//! - Roster: account/assignee lookups for the web forms

pub mod aggregate;
pub mod loader;
pub mod roster;

pub use aggregate::{aggregate, TOP_N};
pub use loader::{dataset_from_values, normalize_amount, TabularLoader};
pub use roster::{AccountSummary, Roster};

use crate::config::DataSource;
use crate::error::{DeckError, DeckResult};
use crate::google::SheetsApi;
use crate::types::RowDataset;

/// Load the configured source, filtered on `filter_column == filter_value`
pub fn load_source(
    source: &DataSource,
    sheets: &dyn SheetsApi,
    filter_column: &str,
    filter_value: Option<&str>,
    amount_column: &str,
) -> DeckResult<RowDataset> {
    match source {
        DataSource::File { path } => TabularLoader::new(path)
            .with_amount_column(amount_column)
            .load(filter_column, filter_value),
        DataSource::Sheet {
            spreadsheet_id,
            range,
        } => {
            let values = sheets
                .read_range(spreadsheet_id, range)
                .map_err(|e| DeckError::Load(e.to_string()))?;
            let dataset = dataset_from_values(values)?;
            loader::prepare(
                dataset,
                &source.describe(),
                filter_column,
                filter_value,
                amount_column,
            )
        }
    }
}
