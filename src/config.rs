//! Report configuration
//!
//! Everything that used to be a literal (credential file, template id, the
//! login allow-list, data locations, summary layout) lives here and is
//! loaded once at startup from YAML.

use crate::data::loader::{AMOUNT_COLUMN, FILTER_COLUMN};
use crate::error::{DeckError, DeckResult};
use crate::types::AggregationMode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "qbr.yaml";

/// Where the renewal rows come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataSource {
    /// Local .csv / .xlsx file
    File { path: PathBuf },
    /// Google Sheet range, first row is the header
    Sheet { spreadsheet_id: String, range: String },
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::File { path } => path.display().to_string(),
            DataSource::Sheet {
                spreadsheet_id,
                range,
            } => format!("sheet {} ({})", spreadsheet_id, range),
        }
    }
}

/// One summary table and the slide it lands on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySpec {
    pub title: String,
    pub group_column: String,
    pub value_column: String,
    pub mode: AggregationMode,
    /// Zero-based slide position in the copied deck
    pub slide_index: usize,
}

impl SummarySpec {
    fn new(
        title: &str,
        group_column: &str,
        value_column: &str,
        mode: AggregationMode,
        slide_index: usize,
    ) -> Self {
        Self {
            title: title.to_string(),
            group_column: group_column.to_string(),
            value_column: value_column.to_string(),
            mode,
            slide_index,
        }
    }
}

/// The three default summaries, written to the 2nd, 3rd and 4th slides
pub fn default_summaries() -> Vec<SummarySpec> {
    vec![
        SummarySpec::new(
            "Unique opportunities by fiscal quarter",
            "FY FQ",
            "Opp #",
            AggregationMode::CountUnique,
            1,
        ),
        SummarySpec::new(
            "Renewal available by opportunity stage",
            "Opp Stage",
            AMOUNT_COLUMN,
            AggregationMode::Sum,
            2,
        ),
        SummarySpec::new(
            "Unique opportunities by product",
            "Product Group Detail",
            "Opp #",
            AggregationMode::CountUnique,
            3,
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Service-account key file (JSON)
    pub credential_path: PathBuf,
    /// Presentation copied for every report
    pub template_presentation_id: String,
    /// Base name of the copy; a timestamp is appended
    pub presentation_name: String,
    pub data: DataSource,
    pub filter_column: String,
    pub amount_column: String,
    pub summaries: Vec<SummarySpec>,
    /// Emails allowed through the web login
    pub allowed_emails: Vec<String>,
    /// Account roster behind the web selection forms
    pub roster_path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            credential_path: PathBuf::from("credentials.json"),
            template_presentation_id: String::new(),
            presentation_name: "Copy of Partner Data Slide".to_string(),
            data: DataSource::File {
                path: PathBuf::from("resources/sample_data_for_qbr_builder.csv"),
            },
            filter_column: FILTER_COLUMN.to_string(),
            amount_column: AMOUNT_COLUMN.to_string(),
            summaries: default_summaries(),
            allowed_emails: Vec::new(),
            roster_path: PathBuf::from("resources/crs_sheet.csv"),
        }
    }
}

impl ReportConfig {
    /// Load from an explicit file, else `qbr.yaml` if present, else defaults
    pub fn load(path: Option<&Path>) -> DeckResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> DeckResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DeckError::Config(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> DeckResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check the settings the pipeline cannot run without
    pub fn validate(&self) -> DeckResult<()> {
        if self.template_presentation_id.trim().is_empty() {
            return Err(DeckError::Config(
                "template_presentation_id is not set".to_string(),
            ));
        }
        if self.summaries.is_empty() {
            return Err(DeckError::Config("no summaries configured".to_string()));
        }
        let mut seen = HashSet::new();
        for spec in &self.summaries {
            if !seen.insert(spec.slide_index) {
                return Err(DeckError::Config(format!(
                    "slide index {} is used by more than one summary",
                    spec.slide_index
                )));
            }
        }
        Ok(())
    }

    /// Slides the copied deck must have for every summary to land
    pub fn min_slide_count(&self) -> usize {
        self.summaries
            .iter()
            .map(|s| s.slide_index + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn is_allowed(&self, email: &str) -> bool {
        let email = email.trim();
        self.allowed_emails
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(email))
    }
}
