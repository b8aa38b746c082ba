//! Google Workspace service handles
//!
//! Three capability groups behind one credential:
//! - Drive: file parents, copy, permissions
//! - Slides: presentation structure, batch edits
//! - Sheets: range reads
//!
//! The pipeline only talks to the traits, so any handle can be swapped out.

pub mod credentials;
pub mod drive;
pub mod sheets;
pub mod slides;
pub mod transport;

pub use credentials::{ServiceAccountKey, SCOPES};
pub use drive::DriveClient;
pub use sheets::SheetsClient;
pub use slides::{
    CreateTableRequest, InsertTextRequest, PageElementProperties, SlideRequest, SlidesClient,
    TableCellLocation,
};

use crate::error::{DeckError, DeckResult};
use reqwest::blocking::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// File storage operations
pub trait DriveApi {
    /// Folder ids the file lives in, in API order
    fn parent_folders(&self, file_id: &str) -> DeckResult<Vec<String>>;

    /// Copy `file_id` into `parent_id` under `name`; returns the new file id
    fn copy_file(&self, file_id: &str, name: &str, parent_id: &str) -> DeckResult<String>;

    /// Give one user writer access
    fn grant_writer(&self, file_id: &str, email: &str) -> DeckResult<()>;
}

/// Presentation query and edit operations
pub trait SlidesApi {
    /// Slide object ids in deck order
    fn slide_ids(&self, presentation_id: &str) -> DeckResult<Vec<String>>;

    fn batch_update(&self, presentation_id: &str, requests: &[SlideRequest]) -> DeckResult<()>;
}

/// Spreadsheet reads
pub trait SheetsApi {
    /// Cell text of `range`, row-major; rows may be ragged
    fn read_range(&self, spreadsheet_id: &str, range: &str) -> DeckResult<Vec<Vec<String>>>;
}

/// The three handles, built once from one credential
pub struct DocumentServices {
    pub slides: Box<dyn SlidesApi>,
    pub drive: Box<dyn DriveApi>,
    pub sheets: Box<dyn SheetsApi>,
}

impl DocumentServices {
    pub fn new(
        slides: Box<dyn SlidesApi>,
        drive: Box<dyn DriveApi>,
        sheets: Box<dyn SheetsApi>,
    ) -> Self {
        Self {
            slides,
            drive,
            sheets,
        }
    }

    /// Load the service-account key, obtain a token and build all handles.
    /// Every failure here is a `ServiceInit` error.
    pub fn connect(credential_path: &Path) -> DeckResult<Self> {
        let key = ServiceAccountKey::from_file(credential_path)?;

        // No request timeout: a hung call blocks the run
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| DeckError::ServiceInit(format!("Failed to create HTTP client: {}", e)))?;

        let token = key.fetch_access_token(&client)?;
        let transport = Arc::new(transport::ApiTransport::new(client, token));

        info!("Initialized Google services as {}", key.client_email);

        Ok(Self::new(
            Box::new(SlidesClient::new(Arc::clone(&transport))),
            Box::new(DriveClient::new(Arc::clone(&transport))),
            Box::new(SheetsClient::new(transport)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_connect_missing_credentials() {
        let result = DocumentServices::connect(Path::new("missing/credentials.json"));
        assert!(matches!(result, Err(DeckError::ServiceInit(_))));
    }

    #[test]
    fn test_connect_invalid_key_fails_before_network() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("key.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"client_email": "bot@x", "private_key": "garbage", "token_uri": "http://127.0.0.1:9/token"}}"#
        )
        .unwrap();

        let result = DocumentServices::connect(&path);
        assert!(matches!(result, Err(DeckError::ServiceInit(_))));
    }
}
