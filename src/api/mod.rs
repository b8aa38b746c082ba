//! QBR Builder API Server module
//!
//! JSON endpoints for the account selection flow.
//! Run with `qbr-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
