//! Deck generation: duplicate the template, populate slides, share

pub mod duplicate;
pub mod pipeline;
pub mod populate;
pub mod share;

pub use duplicate::{copy_name, duplicate_template};
pub use pipeline::{
    build_summaries, generate_report, presentation_url, split_filter_values, PopulatedSlide,
    ReportOutcome, ReportPipeline,
};
pub use populate::{cell_requests, create_table_request, insert_table};
pub use share::share_presentation;
