use clap::{Parser, Subcommand};
use qbr_builder::cli;
use qbr_builder::error::DeckResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qbr")]
#[command(about = "Build partner QBR renewal decks from opportunity data.")]
#[command(long_about = "QBR Builder - partner renewal decks from opportunity data

Loads the opportunity export, keeps the rows of one partner, builds the
top-5 summaries and writes them as tables into a fresh copy of the
template presentation. The copy is shared with the requesting user.

COMMANDS:
  run         - Generate and share a presentation, print its link
  summarize   - Print the summaries locally (no presentation is created)

CONFIGURATION:
  Settings are read from --config, else $QBR_CONFIG, else ./qbr.yaml when
  present. Every key is optional except template_presentation_id:

    credential_path: credentials.json
    template_presentation_id: 1AbC...
    data:
      path: resources/sample_data_for_qbr_builder.csv

EXAMPLES:
  qbr run P-1001 user@example.com          # Build a deck for partner P-1001
  qbr summarize P-1001 -o summary.xlsx     # Dry run, export to Excel

Logs go to stderr; tune them with RUST_LOG (default qbr_builder=info).")]
#[command(version)]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = "QBR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a presentation and share it with EMAIL
    Run {
        /// Filter value(s), comma-separated; only the first is used
        filters: String,

        /// Recipient granted edit access to the copy
        email: String,

        /// Override the configured data file (csv, xlsx, xls, ods)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    #[command(long_about = "Print the configured summaries for one filter value.

Nothing is copied or shared; only a Google Sheet data source needs the
service-account credential. Use --output to write every summary to its own
worksheet of an Excel workbook.")]
    /// Print the summaries without creating a presentation
    Summarize {
        /// Filter value
        filter: String,

        /// Override the configured data file (csv, xlsx, xls, ods)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Export the summaries to an Excel file (.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show dataset details
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> DeckResult<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "qbr_builder=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            filters,
            email,
            data,
        } => {
            let config = cli::load_config(cli.config.as_deref(), data)?;
            cli::run(filters, email, config)
        }

        Commands::Summarize {
            filter,
            data,
            output,
            verbose,
        } => {
            let config = cli::load_config(cli.config.as_deref(), data)?;
            cli::summarize(filter, config, output, verbose)
        }
    }
}
