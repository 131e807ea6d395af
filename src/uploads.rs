//! Profile picture storage.
//!
//! Uploaded pictures are written to the configured upload directory under a
//! sanitized version of the client's filename.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::UploadConfig;
use crate::error::{DirectoryError, DirectoryResult};

/// Returns true if `filename` has one of the `allowed` extensions, ignoring
/// case.
///
/// # Examples
///
/// ```
/// use employee_directory::uploads::allowed_file;
///
/// let allowed = vec!["png".to_string(), "jpg".to_string()];
/// assert!(allowed_file("me.PNG", &allowed));
/// assert!(!allowed_file("me.gif", &allowed));
/// assert!(!allowed_file("png", &allowed));
/// ```
pub fn allowed_file(filename: &str, allowed: &[String]) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Reduces a client-supplied filename to a safe, flat name.
///
/// Path components are dropped, whitespace becomes `_`, and every character
/// other than ASCII letters, digits, `.`, `-` and `_` is removed. Leading
/// dots and underscores are stripped so the result is never hidden or a
/// relative path. Returns `None` if nothing usable remains.
///
/// # Examples
///
/// ```
/// use employee_directory::uploads::secure_filename;
///
/// assert_eq!(secure_filename("My Photo.png").as_deref(), Some("My_Photo.png"));
/// assert_eq!(secure_filename("../../etc/passwd").as_deref(), Some("passwd"));
/// assert_eq!(secure_filename("..").as_deref(), None);
/// ```
pub fn secure_filename(filename: &str) -> Option<String> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let trimmed = cleaned.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Writes profile pictures into the configured upload directory.
#[derive(Debug, Clone)]
pub struct PictureStore {
    directory: PathBuf,
    allowed_extensions: Vec<String>,
}

impl PictureStore {
    /// Creates a store from the upload settings.
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            allowed_extensions: config.allowed_extensions.clone(),
        }
    }

    /// The directory pictures are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Creates the upload directory if it does not exist.
    pub async fn ensure_directory(&self) -> DirectoryResult<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| DirectoryError::UploadFailed {
                filename: self.directory.display().to_string(),
                message: e.to_string(),
            })
    }

    /// Returns the name a picture would be stored under, or `None` if the
    /// file must be ignored (bad name or disallowed extension).
    pub fn accept(&self, original_name: &str) -> Option<String> {
        secure_filename(original_name).filter(|name| allowed_file(name, &self.allowed_extensions))
    }

    /// Stores `contents` under the sanitized form of `original_name`.
    ///
    /// Returns `Ok(None)` when the name or extension is not accepted; the
    /// caller then proceeds without a new picture. An existing file with the
    /// same name is overwritten.
    pub async fn save(&self, original_name: &str, contents: &[u8]) -> DirectoryResult<Option<String>> {
        let Some(filename) = self.accept(original_name) else {
            return Ok(None);
        };

        self.ensure_directory().await?;
        let path = self.directory.join(&filename);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| DirectoryError::UploadFailed {
                filename: filename.clone(),
                message: e.to_string(),
            })?;

        info!(filename = %filename, bytes = contents.len(), "Stored profile picture");
        Ok(Some(filename))
    }
}
