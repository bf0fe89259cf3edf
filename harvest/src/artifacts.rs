//! Persisted artifact naming and storage.
//!
//! File names are derived from the locator:
//! `sanitize(locator) [+ "." + tag] + "." + extension [+ "." + timestamp + ".bak"]`.
//! The persistent-store strategy relies on this being bit-exact to find
//! what the network strategy wrote earlier.

use crate::errors::HarvestError;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Format of the UTC timestamp in backup names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Sanitizes a locator for use as a file name.
///
/// Strips one leading `https://` or `http://`, one trailing `/`, and
/// replaces `/`, `.` and `_` with `-`.
#[must_use]
pub fn sanitize_locator(locator: &str) -> String {
    let stripped = locator
        .strip_prefix("https://")
        .or_else(|| locator.strip_prefix("http://"))
        .unwrap_or(locator);
    let stripped = stripped.strip_suffix('/').unwrap_or(stripped);

    stripped
        .chars()
        .map(|c| if matches!(c, '/' | '.' | '_') { '-' } else { c })
        .collect()
}

/// Formats a backup timestamp.
#[must_use]
pub fn backup_timestamp(at: DateTime<Utc>) -> String {
    at.format(BACKUP_TIMESTAMP_FORMAT).to_string()
}

/// Builds the artifact file name for a locator.
///
/// A leading dot on `extension` is ignored. When `backup_at` is set the
/// name gets the timestamp and a trailing `.bak`.
#[must_use]
pub fn build_raw_filename(
    locator: &str,
    extension: &str,
    tag: Option<&str>,
    backup_at: Option<DateTime<Utc>>,
) -> String {
    let mut file_name = sanitize_locator(locator);

    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        file_name.push('.');
        file_name.push_str(tag);
    }

    file_name.push('.');
    file_name.push_str(extension.strip_prefix('.').unwrap_or(extension));

    if let Some(at) = backup_at {
        file_name.push('.');
        file_name.push_str(&backup_timestamp(at));
        file_name.push_str(".bak");
    }

    debug!(
        locator = %locator,
        tag = ?tag,
        extension = %extension,
        file_name = %file_name,
        "Built raw file name"
    );
    file_name
}

/// A storage root holding artifacts named after their locators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The current path for a locator's artifact.
    #[must_use]
    pub fn path_for(&self, locator: &str, extension: &str, tag: Option<&str>) -> PathBuf {
        self.root.join(build_raw_filename(locator, extension, tag, None))
    }

    /// Reads an artifact, returning `None` when it does not exist.
    pub async fn read(
        &self,
        locator: &str,
        extension: &str,
        tag: Option<&str>,
    ) -> Result<Option<String>, HarvestError> {
        let path = self.path_for(locator, extension, tag);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                info!(path = %path.display(), "Read artifact");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(locator = %locator, path = %path.display(), "Artifact not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes an artifact, overwriting any existing file.
    pub async fn write(
        &self,
        locator: &str,
        extension: &str,
        tag: Option<&str>,
        content: &str,
    ) -> Result<PathBuf, HarvestError> {
        let path = self.path_for(locator, extension, tag);
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, content).await?;
        info!(path = %path.display(), bytes = content.len(), "Wrote artifact");
        Ok(path)
    }

    /// Renames an existing artifact to its timestamped backup name.
    ///
    /// Returns the backup path, or `None` when there was nothing to back up.
    pub async fn backup_if_exists(
        &self,
        locator: &str,
        extension: &str,
        tag: Option<&str>,
    ) -> Result<Option<PathBuf>, HarvestError> {
        let path = self.path_for(locator, extension, tag);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }

        let backup = self
            .root
            .join(build_raw_filename(locator, extension, tag, Some(Utc::now())));
        info!(
            path = %path.display(),
            backup = %backup.display(),
            "Backing up existing artifact"
        );
        tokio::fs::rename(&path, &backup).await?;
        Ok(Some(backup))
    }
}
