use crate::google::DriveApi;
use tracing::{error, info};

/// Grant `email` writer access to the presentation.
///
/// Failures are logged and swallowed; the run's outcome does not change.
pub fn share_presentation(drive: &dyn DriveApi, presentation_id: &str, email: &str) {
    match drive.grant_writer(presentation_id, email) {
        Ok(()) => info!("Successfully shared the presentation with {}", email),
        Err(e) => error!("Error sharing presentation with {}: {}", email, e),
    }
}
