//! Raw API response snapshots on disk.
//!
//! Layout under the store root (by default `data/applications`):
//!
//! ```text
//! apps.json
//! <sku>/versions.json
//! <sku>/version_localizations.json
//! <sku>/events.json
//! <sku>/event_localizations.json
//! ```

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::{debug, error, info};

use crate::{error::Error, traits::write_json_file};

pub const APPS_SNAPSHOT: &str = "apps.json";

/// What [`ensure_dir`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    AlreadyExists,
}

/// Creates `path` and any missing parents. An existing directory is not an
/// error.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<DirStatus, Error> {
    let path = path.as_ref();
    if path.is_dir() {
        debug!(path = %path.display(), "directory already exists");
        return Ok(DirStatus::AlreadyExists);
    }
    match fs::create_dir_all(path) {
        Ok(()) => {
            info!(path = %path.display(), "directory created");
            Ok(DirStatus::Created)
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            error!(path = %path.display(), "permission denied creating directory");
            Err(Error::PermissionDenied(path.to_path_buf()))
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to create directory");
            Err(Error::Io(e))
        }
    }
}

/// Writes snapshots below a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SnapshotStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one app's snapshots. Path separators in the SKU are
    /// replaced so the directory always sits directly below the root.
    pub fn app_dir(&self, sku: &str) -> PathBuf {
        let name: String = sku
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        let name = match name.as_str() {
            "" | "." | ".." => "_".to_string(),
            _ => name,
        };
        self.root.join(name)
    }

    /// Writes a snapshot directly under the root.
    pub fn write_root(&self, file_name: &str, document: &Value) -> Result<PathBuf, Error> {
        ensure_dir(&self.root)?;
        let path = self.root.join(file_name);
        write_json_file(&path, document)?;
        Ok(path)
    }

    /// Writes a snapshot in the app's directory.
    pub fn write_app(&self, sku: &str, file_name: &str, document: &Value) -> Result<PathBuf, Error> {
        let dir = self.app_dir(sku);
        ensure_dir(&dir)?;
        let path = dir.join(file_name);
        write_json_file(&path, document)?;
        Ok(path)
    }
}
