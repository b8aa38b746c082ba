//! Slides v1 handle and batchUpdate request types

use super::transport::{endpoint, ApiTransport};
use super::SlidesApi;
use crate::error::DeckResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SLIDES_PRESENTATIONS_URL: &str = "https://slides.googleapis.com/v1/presentations";

/// One entry of a presentations.batchUpdate call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideRequest {
    CreateTable(CreateTableRequest),
    InsertText(InsertTextRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    pub object_id: String,
    pub element_properties: PageElementProperties,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElementProperties {
    pub page_object_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertTextRequest {
    pub object_id: String,
    pub cell_location: TableCellLocation,
    pub text: String,
}

/// Zero-based cell address inside a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellLocation {
    pub row_index: usize,
    pub column_index: usize,
}

#[derive(Serialize)]
struct BatchUpdateBody<'a> {
    requests: &'a [SlideRequest],
}

#[derive(Deserialize)]
struct Presentation {
    #[serde(default)]
    slides: Vec<Page>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    object_id: String,
}

pub struct SlidesClient {
    transport: Arc<ApiTransport>,
}

impl SlidesClient {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }
}

impl SlidesApi for SlidesClient {
    fn slide_ids(&self, presentation_id: &str) -> DeckResult<Vec<String>> {
        let mut url = endpoint(SLIDES_PRESENTATIONS_URL, &[presentation_id])?;
        url.query_pairs_mut().append_pair("fields", "slides.objectId");
        let presentation: Presentation = self.transport.get_json(url)?;
        Ok(presentation.slides.into_iter().map(|s| s.object_id).collect())
    }

    fn batch_update(&self, presentation_id: &str, requests: &[SlideRequest]) -> DeckResult<()> {
        let target = format!("{}:batchUpdate", presentation_id);
        let url = endpoint(SLIDES_PRESENTATIONS_URL, &[target.as_str()])?;
        let _: serde_json::Value = self
            .transport
            .post_json(url, &BatchUpdateBody { requests })?;
        Ok(())
    }
}
