//! Report pipeline
//!
//! Init → ServicesReady → DataLoaded → Aggregated → TemplateCopied →
//! SlideIdsFetched → Populated → Shared → Done
//!
//! Strictly linear. Every stage except sharing aborts the run on failure;
//! a summary that fails to aggregate only leaves its slide untouched.

use super::duplicate::duplicate_template;
use super::populate::insert_table;
use super::share::share_presentation;
use crate::config::{ReportConfig, SummarySpec};
use crate::data::{aggregate, load_source};
use crate::error::{DeckError, DeckResult};
use crate::google::DocumentServices;
use crate::types::{RowDataset, SummaryTable};
use serde::Serialize;
use tracing::{error, info};

/// Edit link for a presentation id
pub fn presentation_url(presentation_id: &str) -> String {
    format!(
        "https://docs.google.com/presentation/d/{}/edit",
        presentation_id
    )
}

/// Split a comma-separated filter argument, trimming each value
pub fn split_filter_values(input: &str) -> Vec<String> {
    input.split(',').map(|v| v.trim().to_string()).collect()
}

/// A summary that made it onto a slide
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedSlide {
    pub title: String,
    pub slide_index: usize,
    pub slide_id: String,
    pub table_id: String,
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOutcome {
    pub filter_value: String,
    pub presentation_id: String,
    pub presentation_url: String,
    pub populated: Vec<PopulatedSlide>,
    /// Titles of summaries that failed to aggregate
    pub skipped: Vec<String>,
}

/// Aggregate every configured summary; results line up with `specs`
pub fn build_summaries(
    dataset: &RowDataset,
    specs: &[SummarySpec],
) -> Vec<DeckResult<SummaryTable>> {
    specs
        .iter()
        .map(|spec| aggregate(dataset, &spec.group_column, &spec.value_column, spec.mode))
        .collect()
}

pub struct ReportPipeline<'a> {
    config: &'a ReportConfig,
    services: &'a DocumentServices,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(config: &'a ReportConfig, services: &'a DocumentServices) -> Self {
        Self { config, services }
    }

    /// Run every stage after ServicesReady.
    ///
    /// Only the first of `filter_values` is used.
    pub fn run(&self, filter_values: &[String], email: &str) -> DeckResult<ReportOutcome> {
        let filter_value = filter_values
            .first()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DeckError::Load("No filter value supplied".to_string()))?;

        // DataLoaded
        let dataset = load_source(
            &self.config.data,
            self.services.sheets.as_ref(),
            &self.config.filter_column,
            Some(filter_value),
            &self.config.amount_column,
        )?;
        if dataset.is_empty() {
            error!("No data fetched for {}={}", self.config.filter_column, filter_value);
            return Err(DeckError::Load(format!(
                "No rows where {} = {}",
                self.config.filter_column, filter_value
            )));
        }

        // Aggregated
        let summaries = build_summaries(&dataset, &self.config.summaries);
        let mut skipped = Vec::new();
        for (spec, summary) in self.config.summaries.iter().zip(&summaries) {
            match summary {
                Ok(table) => info!("Summary '{}' created ({} rows)", spec.title, table.num_rows()),
                Err(e) => {
                    error!("Summary '{}' failed, slide left untouched: {}", spec.title, e);
                    skipped.push(spec.title.clone());
                }
            }
        }

        // TemplateCopied
        let presentation_id = duplicate_template(
            self.services.drive.as_ref(),
            &self.config.template_presentation_id,
            &self.config.presentation_name,
        )?;
        info!("Copied template with new presentation ID: {}", presentation_id);

        // SlideIdsFetched
        let slide_ids = self
            .services
            .slides
            .slide_ids(&presentation_id)
            .map_err(|e| {
                error!("Error fetching slides of {}: {}", presentation_id, e);
                DeckError::LayoutMismatch(format!(
                    "Cannot read the slides of presentation {}: {}",
                    presentation_id, e
                ))
            })?;
        let required = self.config.min_slide_count();
        if slide_ids.len() < required {
            error!(
                "Expected {} slides in the copied presentation, found {}",
                required,
                slide_ids.len()
            );
            return Err(DeckError::LayoutMismatch(format!(
                "Presentation {} has {} slides, {} required",
                presentation_id,
                slide_ids.len(),
                required
            )));
        }

        // Populated
        let mut populated = Vec::new();
        for (spec, summary) in self.config.summaries.iter().zip(&summaries) {
            let Ok(table) = summary else {
                continue;
            };
            let slide_id = &slide_ids[spec.slide_index];
            info!(
                "Inserting '{}' into slide {}",
                spec.title,
                spec.slide_index + 1
            );
            let table_id = insert_table(
                self.services.slides.as_ref(),
                &presentation_id,
                slide_id,
                table,
            )?;
            populated.push(PopulatedSlide {
                title: spec.title.clone(),
                slide_index: spec.slide_index,
                slide_id: slide_id.clone(),
                table_id,
            });
        }

        // Shared
        share_presentation(self.services.drive.as_ref(), &presentation_id, email);

        let presentation_url = presentation_url(&presentation_id);
        info!("Report ready: {}", presentation_url);

        Ok(ReportOutcome {
            filter_value: filter_value.to_string(),
            presentation_id,
            presentation_url,
            populated,
            skipped,
        })
    }
}

/// Validate config, build the services from the credential, run the pipeline
pub fn generate_report(
    config: &ReportConfig,
    filter_values: &[String],
    email: &str,
) -> DeckResult<ReportOutcome> {
    config.validate()?;
    let services = DocumentServices::connect(&config.credential_path)?;
    ReportPipeline::new(config, &services).run(filter_values, email)
}
