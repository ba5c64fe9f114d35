//! Link graph read straight from the vault directory.

use super::{GraphError, LinkGraph};
use crate::domain::{ExtractedLink, file_stem};
use crate::infra::{read_note, scan_vault};
use std::path::PathBuf;

/// A [`LinkGraph`] that scans and reads files on demand, without a cache.
pub struct LiveVault {
    root: PathBuf,
}

impl LiveVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LinkGraph for LiveVault {
    fn files(&self) -> Result<Vec<String>, GraphError> {
        Ok(scan_vault(&self.root)?.into_iter().map(|f| f.path).collect())
    }

    /// Unreadable notes contribute no links.
    fn links_from(&self, path: &str) -> Result<Vec<ExtractedLink>, GraphError> {
        match read_note(&self.root, path) {
            Ok(note) => Ok(note.links()),
            Err(e) => {
                tracing::debug!(path, error = %e, "skipping links of unreadable note");
                Ok(Vec::new())
            }
        }
    }

    fn title(&self, path: &str) -> Result<String, GraphError> {
        Ok(file_stem(path).to_string())
    }
}
