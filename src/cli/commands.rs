use crate::config::{DataSource, ReportConfig};
use crate::data::{load_source, TabularLoader};
use crate::error::{DeckError, DeckResult};
use crate::excel::SummaryExporter;
use crate::google::DocumentServices;
use crate::report::{build_summaries, generate_report, split_filter_values, ReportOutcome};
use crate::types::{format_number, RowDataset, SummaryTable};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Load the config file and apply the `--data` override
pub fn load_config(config: Option<&Path>, data: Option<PathBuf>) -> DeckResult<ReportConfig> {
    let mut report = ReportConfig::load(config)?;
    if let Some(path) = data {
        report.data = DataSource::File { path };
    }
    Ok(report)
}

/// Execute the run command: full pipeline, prints the presentation link
pub fn run(filters: String, email: String, config: ReportConfig) -> DeckResult<()> {
    let email = email.trim().to_string();
    if email.is_empty() {
        return Err(DeckError::Config("Recipient email is empty".to_string()));
    }

    let filter_values = split_filter_values(&filters);
    let outcome = generate_report(&config, &filter_values, &email)?;

    write_outcome(
        &outcome,
        &config.filter_column,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;

    Ok(())
}

/// Progress lines go to `err`; `out` receives the edit link and nothing else
pub fn write_outcome<O: Write, E: Write>(
    outcome: &ReportOutcome,
    filter_column: &str,
    out: &mut O,
    err: &mut E,
) -> DeckResult<()> {
    writeln!(err, "{}", "✅ Report generated".bold().green())?;
    writeln!(
        err,
        "   Filter: {} = {}",
        filter_column,
        outcome.filter_value.bright_blue()
    )?;
    for slide in &outcome.populated {
        writeln!(
            err,
            "   📊 Slide {}: {}",
            slide.slide_index + 1,
            slide.title.cyan()
        )?;
    }
    for title in &outcome.skipped {
        writeln!(err, "   {} {}", "⚠️  Skipped:".yellow(), title)?;
    }
    writeln!(out, "{}", outcome.presentation_url)?;
    Ok(())
}

/// Execute the summarize command: local dry run, no deck is created
pub fn summarize(
    filter: String,
    config: ReportConfig,
    output: Option<PathBuf>,
    verbose: bool,
) -> DeckResult<()> {
    println!("{}", "📋 QBR Builder - Summaries (dry run)".bold().green());
    println!("   Source: {}", config.data.describe());
    println!("   Filter: {} = {}\n", config.filter_column, filter.bright_blue());

    let dataset = load_dataset(&config, &filter)?;
    if dataset.is_empty() {
        return Err(DeckError::Load(format!(
            "No rows where {} = {}",
            config.filter_column, filter
        )));
    }
    if verbose {
        println!(
            "   Loaded {} rows, {} columns\n",
            dataset.len(),
            dataset.width()
        );
    }

    let mut exporter = SummaryExporter::new();
    let results = build_summaries(&dataset, &config.summaries);
    for (spec, result) in config.summaries.iter().zip(results) {
        println!(
            "{} {}",
            format!("Slide {}:", spec.slide_index + 1).bold(),
            spec.title.bright_blue().bold()
        );
        match result {
            Ok(summary) => {
                print_summary(&summary);
                exporter.add(&spec.title, summary);
            }
            Err(e) => println!("   {} {}", "❌".red(), e.to_string().red()),
        }
        println!();
    }

    if let Some(path) = output {
        if exporter.is_empty() {
            println!("{}", "⚠️  No summaries to export".yellow());
        } else {
            exporter.export(&path)?;
            println!(
                "{}",
                format!("✅ Exported {} summaries to {}", exporter.len(), path.display())
                    .bold()
                    .green()
            );
        }
    }

    Ok(())
}

fn load_dataset(config: &ReportConfig, filter: &str) -> DeckResult<RowDataset> {
    match &config.data {
        DataSource::File { path } => TabularLoader::new(path)
            .with_amount_column(&config.amount_column)
            .load(&config.filter_column, Some(filter)),
        DataSource::Sheet { .. } => {
            let services = DocumentServices::connect(&config.credential_path)?;
            load_source(
                &config.data,
                services.sheets.as_ref(),
                &config.filter_column,
                Some(filter),
                &config.amount_column,
            )
        }
    }
}

fn print_summary(summary: &SummaryTable) {
    let key_width = summary
        .rows
        .iter()
        .map(|r| r.key.chars().count())
        .chain(std::iter::once(summary.group_column.chars().count()))
        .max()
        .unwrap_or(0);

    println!(
        "   {:<width$}  {}",
        summary.group_column.cyan(),
        summary.value_column.cyan(),
        width = key_width
    );
    for row in &summary.rows {
        println!(
            "   {:<width$}  {}",
            row.key,
            format_number(row.value).bold(),
            width = key_width
        );
    }
    if summary.rows.is_empty() {
        println!("   (no groups)");
    }
}
