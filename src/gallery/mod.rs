//! Gallery image upload checks and deletion.

use regex::Regex;
use tracing::{debug, warn};

use crate::api::TargetApi;
use crate::board::store::{Notice, NoticeLevel};
use crate::error::{BoardError, ValidationError};
use crate::prompt::Confirm;

pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/jpg", "image/gif"];

const FILENAME_PATTERN: &str = r"^[A-Za-z0-9._-]+$";

pub const DELETE_PROMPT: &str = "Delete this image?";
pub const DELETED_MESSAGE: &str = "Image deleted successfully!";
pub const REJECTED_MESSAGE: &str = "Failed to delete image.";
pub const TRANSPORT_MESSAGE: &str = "An error occurred while deleting the image.";

pub fn validate_filename(name: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidFileName {
        name: name.to_string(),
    };
    if name.is_empty() || name == "." || name == ".." {
        return Err(invalid());
    }
    let ok = Regex::new(FILENAME_PATTERN)
        .map(|re| re.is_match(name))
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Checks a file before upload: name, MIME type and size.
pub fn validate_upload(name: &str, mime: &str, size: u64) -> Result<(), ValidationError> {
    validate_filename(name)?;
    let mime_lower = mime.trim().to_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime_lower.as_str()) {
        return Err(ValidationError::UnsupportedFileType {
            mime: mime.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Message for a failed deletion.
pub fn failure_message(err: &BoardError) -> String {
    match err {
        BoardError::Application { message } => message
            .clone()
            .unwrap_or_else(|| REJECTED_MESSAGE.to_string()),
        BoardError::Validation(e) => e.to_string(),
        BoardError::Declined => "Deletion cancelled.".to_string(),
        _ => TRANSPORT_MESSAGE.to_string(),
    }
}

/// Deletes one gallery image after confirmation.
///
/// The filename is checked before the prompt; a declined prompt or a bad
/// name never reaches the server.
pub async fn delete_image<A, C>(api: &A, confirm: &C, filename: &str) -> Result<Notice, BoardError>
where
    A: TargetApi + ?Sized,
    C: Confirm + ?Sized,
{
    validate_filename(filename)?;
    if !confirm.confirm(DELETE_PROMPT) {
        debug!(filename, "image deletion declined");
        return Err(BoardError::Declined);
    }
    match api.delete_image(filename).await {
        Ok(_) => Ok(Notice {
            level: NoticeLevel::Success,
            message: DELETED_MESSAGE.to_string(),
        }),
        Err(e) => {
            warn!(filename, error = %e, "failed to delete image");
            Err(e)
        }
    }
}
