//! Archive file-selection validation
//!
//! Checks the selected file before a submission is allowed. The check goes by
//! filename, never by declared MIME type; browsers and platforms disagree on
//! MIME types for archives, so the extension is the only reliable signal.

use crate::types::UploadedFile;

/// Validates the selected archive against the configured packaging extension.
///
/// # Examples
///
/// ```
/// use ziptozim_client::file_guard::FileSelectionGuard;
/// use ziptozim_client::types::UploadedFile;
///
/// let guard = FileSelectionGuard::new("zip");
/// let file = UploadedFile::new("site.zip", "application/zip", vec![1, 2, 3]);
/// assert_eq!(guard.validate_file(Some(&file)), "");
/// assert!(!guard.validate_file(None).is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct FileSelectionGuard {
    /// Lowercased `.ext` suffix the filename must carry
    suffix: String,
    /// Extension without the dot, for messages
    extension: String,
}

impl FileSelectionGuard {
    /// Create a guard for the given packaging extension (without the dot).
    pub fn new(archive_extension: impl Into<String>) -> Self {
        let extension = archive_extension.into();
        Self {
            suffix: format!(".{}", extension.to_lowercase()),
            extension,
        }
    }

    /// Validate the current file selection.
    ///
    /// Returns an empty string when the selection is acceptable, otherwise a
    /// user-facing message: one for an absent file, one for a filename that
    /// does not carry the packaging extension (checked case-insensitively).
    pub fn validate_file(&self, file: Option<&UploadedFile>) -> String {
        match file {
            None => format!("A {} archive is required", self.extension),
            Some(file) if !file.name.to_lowercase().ends_with(&self.suffix) => {
                format!("The selected file must be a .{} archive", self.extension)
            }
            Some(_) => String::new(),
        }
    }
}
