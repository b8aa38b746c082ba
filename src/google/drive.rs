//! Drive v3 handle: parents, copy, permissions

use super::transport::{endpoint, ApiTransport};
use super::DriveApi;
use crate::error::DeckResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

#[derive(Deserialize)]
struct FileParents {
    #[serde(default)]
    parents: Vec<String>,
}

#[derive(Deserialize)]
struct FileId {
    id: String,
}

#[derive(Serialize)]
struct CopyBody<'a> {
    name: &'a str,
    parents: [&'a str; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionBody<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    role: &'a str,
    email_address: &'a str,
}

pub struct DriveClient {
    transport: Arc<ApiTransport>,
}

impl DriveClient {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }
}

impl DriveApi for DriveClient {
    fn parent_folders(&self, file_id: &str) -> DeckResult<Vec<String>> {
        let mut url = endpoint(DRIVE_FILES_URL, &[file_id])?;
        url.query_pairs_mut()
            .append_pair("fields", "parents")
            .append_pair("supportsAllDrives", "true");
        let file: FileParents = self.transport.get_json(url)?;
        Ok(file.parents)
    }

    fn copy_file(&self, file_id: &str, name: &str, parent_id: &str) -> DeckResult<String> {
        let mut url = endpoint(DRIVE_FILES_URL, &[file_id, "copy"])?;
        url.query_pairs_mut()
            .append_pair("fields", "id")
            .append_pair("supportsAllDrives", "true");
        let body = CopyBody {
            name,
            parents: [parent_id],
        };
        let copied: FileId = self.transport.post_json(url, &body)?;
        Ok(copied.id)
    }

    fn grant_writer(&self, file_id: &str, email: &str) -> DeckResult<()> {
        let mut url = endpoint(DRIVE_FILES_URL, &[file_id, "permissions"])?;
        url.query_pairs_mut()
            .append_pair("fields", "id")
            .append_pair("supportsAllDrives", "true");
        let body = PermissionBody {
            kind: "user",
            role: "writer",
            email_address: email,
        };
        let _: serde_json::Value = self.transport.post_json(url, &body)?;
        Ok(())
    }
}
