//! Artifact delivery to local storage
//!
//! Turns a received [`DownloadArtifact`] into a file the user can keep. The
//! payload is first written to a transient staging file next to the
//! destination, then promoted to its final name. The staging file is released
//! on every exit path (promotion consumes it, and any failure path removes
//! it via an RAII guard), so a failed delivery never leaves partial output
//! behind.

use crate::config::{DeliveryConfig, FileCollisionAction};
use crate::error::{DeliveryError, Result};
use crate::types::DownloadArtifact;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum number of rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Delivers converted artifacts into the configured output directory.
#[derive(Clone, Debug)]
pub struct ArtifactDeliveryManager {
    config: DeliveryConfig,
}

impl ArtifactDeliveryManager {
    /// Create a manager with the given delivery settings.
    pub fn new(config: DeliveryConfig) -> Self {
        Self { config }
    }

    /// Write the artifact to the output directory and return the final path.
    ///
    /// The destination name is the artifact's filename, adjusted by the
    /// configured collision policy. The output directory is created if it
    /// does not exist yet.
    pub fn deliver(&self, artifact: &DownloadArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.output_dir)?;

        let staging_path = self
            .config
            .output_dir
            .join(format!(".{}.partial", artifact.file_name));
        let staging = StagingFile::create(staging_path, &artifact.bytes)?;

        let desired = self.config.output_dir.join(&artifact.file_name);
        let dest = resolve_collision(&desired, self.config.file_collision)?;

        staging.promote(&dest)?;
        tracing::info!(
            path = %dest.display(),
            size_bytes = artifact.bytes.len(),
            "artifact delivered"
        );
        Ok(dest)
    }
}

/// Transient staging file, removed on drop unless promoted.
struct StagingFile {
    path: PathBuf,
    released: bool,
}

impl StagingFile {
    fn create(path: PathBuf, bytes: &[u8]) -> Result<Self> {
        let guard = Self {
            path,
            released: false,
        };
        // On write failure the guard drops here and removes any partial file.
        fs::write(&guard.path, bytes).map_err(|source| DeliveryError::WriteFailed {
            path: guard.path.clone(),
            source,
        })?;
        Ok(guard)
    }

    /// Rename the staging file to its final destination, consuming the guard.
    fn promote(mut self, dest: &Path) -> Result<()> {
        fs::rename(&self.path, dest).map_err(|source| DeliveryError::PromoteFailed {
            staging: self.path.clone(),
            dest: dest.to_path_buf(),
            source,
        })?;
        self.released = true;
        Ok(())
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::debug!(path = %self.path.display(), error = %e, "staging file cleanup failed");
            }
        }
    }
}

/// Resolve the final destination path according to the collision policy.
///
/// For `Rename`, appends ` (1)`, ` (2)`, ... before the extension until a
/// free name is found. For `Skip`, an existing destination is an error. For
/// `Overwrite`, the desired path is used unchanged.
fn resolve_collision(path: &Path, action: FileCollisionAction) -> Result<PathBuf> {
    match action {
        FileCollisionAction::Overwrite => Ok(path.to_path_buf()),
        FileCollisionAction::Skip => {
            if path.exists() {
                return Err(DeliveryError::FileCollision {
                    path: path.to_path_buf(),
                    reason: "destination already exists and the skip policy forbids replacing it"
                        .to_string(),
                }
                .into());
            }
            Ok(path.to_path_buf())
        }
        FileCollisionAction::Rename => {
            if !path.exists() {
                return Ok(path.to_path_buf());
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
                DeliveryError::InvalidPath {
                    path: path.to_path_buf(),
                    reason: "cannot extract file stem".to_string(),
                }
            })?;
            let extension = path.extension().and_then(|e| e.to_str());
            let parent = path.parent().ok_or_else(|| DeliveryError::InvalidPath {
                path: path.to_path_buf(),
                reason: "cannot extract parent directory".to_string(),
            })?;

            for i in 1..=MAX_RENAME_ATTEMPTS {
                let new_name = match extension {
                    Some(ext) => format!("{} ({}).{}", stem, i, ext),
                    None => format!("{} ({})", stem, i),
                };
                let new_path = parent.join(new_name);
                if !new_path.exists() {
                    return Ok(new_path);
                }
            }

            Err(DeliveryError::FileCollision {
                path: path.to_path_buf(),
                reason: format!("no free name within {MAX_RENAME_ATTEMPTS} suffix attempts"),
            }
            .into())
        }
    }
}
