//! Account roster behind the web selection forms

use super::loader::TabularLoader;
use crate::error::DeckResult;
use crate::types::RowDataset;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const PARTNER_NAME: &str = "Partner/Distributor Name";
pub const ACCOUNT_ID: &str = "Account ID";
pub const GEO: &str = "GEO";
pub const ASSIGNED_CRS: &str = "Assigned CRS";
pub const COUNTRY: &str = "Country";
pub const TOTAL_ACV: &str = "Total ACV 2024";
pub const TOTAL_TCV: &str = "Total TCV 2024";

pub const ROSTER_COLUMNS: [&str; 7] = [
    PARTNER_NAME,
    ACCOUNT_ID,
    GEO,
    ASSIGNED_CRS,
    COUNTRY,
    TOTAL_ACV,
    TOTAL_TCV,
];

/// One account row as shown on the results view
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AccountSummary {
    pub account_id: String,
    pub total_acv: String,
    pub total_tcv: String,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    dataset: RowDataset,
}

impl Roster {
    pub fn load<P: AsRef<Path>>(path: P) -> DeckResult<Self> {
        let dataset = TabularLoader::new(path.as_ref()).read()?;
        let roster = Self::from_dataset(dataset)?;
        info!(
            "Roster loaded from {}: {} accounts",
            path.as_ref().display(),
            roster.len()
        );
        Ok(roster)
    }

    /// Keep the roster columns and drop rows without an account id
    pub fn from_dataset(dataset: RowDataset) -> DeckResult<Self> {
        let mut dataset = dataset.select(&ROSTER_COLUMNS)?;
        dataset.drop_missing(ACCOUNT_ID)?;
        Ok(Self { dataset })
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Distinct assignees for the first selection form
    pub fn assignees(&self) -> DeckResult<Vec<String>> {
        self.dataset.unique_values(ASSIGNED_CRS)
    }

    /// Distinct partner names handled by one assignee
    pub fn partners_for(&self, assigned_crs: &str) -> DeckResult<Vec<String>> {
        self.dataset
            .filter_eq(ASSIGNED_CRS, assigned_crs)?
            .unique_values(PARTNER_NAME)
    }

    /// Accounts of one partner
    pub fn accounts_for(&self, partner_name: &str) -> DeckResult<Vec<AccountSummary>> {
        let filtered = self.dataset.filter_eq(PARTNER_NAME, partner_name)?;
        Ok((0..filtered.len())
            .map(|row| {
                let text = |column: &str| {
                    filtered
                        .get(row, column)
                        .map(|cell| cell.to_string())
                        .unwrap_or_default()
                };
                AccountSummary {
                    account_id: text(ACCOUNT_ID),
                    total_acv: text(TOTAL_ACV),
                    total_tcv: text(TOTAL_TCV),
                }
            })
            .collect())
    }
}
