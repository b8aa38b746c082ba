//! QBR Builder - partner renewal decks from opportunity data
//!
//! Loads an opportunity export (CSV, spreadsheet file or Google Sheet), keeps
//! the rows of one partner, ranks the top five groups of each configured
//! summary and writes them as tables into a copy of a Google Slides template.
//!
//! # Example
//!
//! ```no_run
//! use qbr_builder::config::ReportConfig;
//! use qbr_builder::report::generate_report;
//!
//! let config = ReportConfig::load(None)?;
//! let outcome = generate_report(&config, &["P-1001".to_string()], "user@example.com")?;
//! println!("{}", outcome.presentation_url);
//! # Ok::<(), qbr_builder::error::DeckError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod excel;
pub mod google;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::{DataSource, ReportConfig, SummarySpec};
pub use error::{DeckError, DeckResult};
pub use report::{generate_report, ReportOutcome, ReportPipeline};
pub use types::{AggregationMode, CellValue, RowDataset, SummaryTable};
