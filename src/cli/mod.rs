//! CLI command handlers

pub mod commands;

pub use commands::{load_config, run, summarize};
