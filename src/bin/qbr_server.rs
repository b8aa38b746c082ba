//! QBR Builder API Server binary
//!
//! Serves the account selection flow and triggers report generation.

use clap::Parser;
use qbr_builder::api::{run_api_server, ApiConfig};
use qbr_builder::config::ReportConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qbr-server")]
#[command(version)]
#[command(about = "QBR Builder API Server - partner renewal decks over HTTP")]
#[command(long_about = r#"
QBR Builder API Server

Endpoints (every POST body carries the caller's email):
  - POST /api/v1/login      - Check the email against allowed_emails
  - POST /api/v1/assignees  - Assigned CRS values from the roster
  - POST /api/v1/partners   - Partners of one assignee
  - POST /api/v1/accounts   - Accounts of one partner
  - POST /api/v1/generate   - Build the deck and share it with the caller

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  qbr-server --config qbr.yaml
  qbr-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/login \
    -H "Content-Type: application/json" \
    -d '{"email": "user@example.com"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "QBR_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "QBR_PORT")]
    port: u16,

    /// Configuration file (YAML)
    #[arg(short, long, env = "QBR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let report = ReportConfig::load(args.config.as_deref())?;
    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config, report).await
}
