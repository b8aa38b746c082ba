//! Excel export of summary tables
//!
//! Local counterpart of slide population: each summary becomes a worksheet
//! with the same header row the slide tables receive.

mod exporter;

pub use exporter::{unique_sheet_names, worksheet_name, SummaryExporter};
