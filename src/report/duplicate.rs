//! Template duplication

use crate::error::{DeckError, DeckResult};
use crate::google::DriveApi;
use chrono::{DateTime, Local};
use tracing::{error, info};

/// Suffix format appended to every copy name
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `{base}_{YYYY-MM-DD_HH-MM-SS}`
pub fn copy_name(base: &str, at: DateTime<Local>) -> String {
    format!("{}_{}", base, at.format(TIMESTAMP_FORMAT))
}

/// Copy `source_id` into its own (first) parent folder under a timestamped
/// name and return the new presentation id.
pub fn duplicate_template(
    drive: &dyn DriveApi,
    source_id: &str,
    new_name: &str,
) -> DeckResult<String> {
    let parents = drive.parent_folders(source_id).map_err(|e| {
        error!("Error getting folder ID: {}", e);
        DeckError::Copy(format!("Cannot resolve parent folder of {}: {}", source_id, e))
    })?;

    let folder_id = parents.first().ok_or_else(|| {
        error!("Folder ID could not be retrieved for {}", source_id);
        DeckError::NotFound(format!("Presentation {} has no parent folder", source_id))
    })?;

    let name = copy_name(new_name, Local::now());
    let new_id = drive
        .copy_file(source_id, &name, folder_id)
        .map_err(|e| {
            error!("Error copying presentation: {}", e);
            DeckError::Copy(format!("Failed to copy {}: {}", source_id, e))
        })?;

    info!("Copied template {} to '{}' ({})", source_id, name, new_id);
    Ok(new_id)
}
