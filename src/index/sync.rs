//! Reconciles the files on disk with the vault cache.

use crate::index::{CacheError, CacheResult, VaultCache};
use crate::infra::{FsError, absolute_vault_path, read_note, scan_vault};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

// ===========================================
// Result Types
// ===========================================

/// A file that could not be indexed during a sync pass.
///
/// The file is left out of the pass and retried on the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Counts for one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub total_time_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SyncError>,
}

impl SyncStats {
    /// Returns true if the pass wrote nothing.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.modified == 0 && self.deleted == 0
    }
}

// ===========================================
// Progress Reporting
// ===========================================

/// Result of processing a single file.
#[derive(Debug, Clone)]
pub enum FileResult {
    /// File was new and has been indexed.
    Added,
    /// File changed on disk and has been re-indexed.
    Modified,
    /// File was unchanged.
    Skipped,
    /// File disappeared from disk and was removed.
    Deleted,
    /// File could not be read; it is retried on the next sync.
    Error(String),
}

/// Trait for receiving progress updates during a sync pass.
pub trait ProgressReporter {
    /// Called when a file is processed.
    fn on_file(&mut self, path: &str, result: FileResult);
    /// Called after the pass has committed.
    fn on_complete(&mut self, stats: &SyncStats);
}

/// A no-op progress reporter.
#[derive(Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_file(&mut self, _path: &str, _result: FileResult) {}
    fn on_complete(&mut self, _stats: &SyncStats) {}
}

// ===========================================
// SyncEngine
// ===========================================

/// Brings a [`VaultCache`] up to date with a vault directory.
///
/// Files are compared by modification time only, so an unchanged file costs
/// one map lookup. All writes of a pass share one transaction.
pub struct SyncEngine {
    vault_root: PathBuf,
}

#[derive(Clone, Copy)]
enum Change {
    Added,
    Modified,
}

impl SyncEngine {
    /// Creates a SyncEngine for the given vault directory.
    pub fn new(vault_root: PathBuf) -> Self {
        Self { vault_root }
    }

    /// Runs an incremental sync pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be scanned or a database write
    /// fails; nothing from the pass is committed in that case. Files that
    /// cannot be read are collected in [`SyncStats::errors`] instead.
    pub fn sync(&self, cache: &mut VaultCache) -> CacheResult<SyncStats> {
        self.sync_with_progress(cache, &mut NoopReporter)
    }

    /// Runs an incremental sync pass with progress reporting.
    pub fn sync_with_progress<P: ProgressReporter>(
        &self,
        cache: &mut VaultCache,
        progress: &mut P,
    ) -> CacheResult<SyncStats> {
        self.run(cache, progress, false)
    }

    /// Drops every cached row and re-indexes the whole vault in one pass.
    pub fn full_resync_with_progress<P: ProgressReporter>(
        &self,
        cache: &mut VaultCache,
        progress: &mut P,
    ) -> CacheResult<SyncStats> {
        self.run(cache, progress, true)
    }

    fn run<P: ProgressReporter>(
        &self,
        cache: &mut VaultCache,
        progress: &mut P,
        full: bool,
    ) -> CacheResult<SyncStats> {
        let started = Instant::now();

        // 1. Scan disk
        let files = scan_vault(&self.vault_root).map_err(|e| scan_error(&self.vault_root, e))?;

        // 2. Load cached state
        let cached = if full {
            Default::default()
        } else {
            cache.cached_mtimes()?
        };

        let mut stats = SyncStats::default();
        let tx = cache.transaction()?;
        if full {
            tx.clear()?;
        }

        // 3. Classify and re-index added/modified files
        for file in &files {
            let change = match cached.get(&file.path) {
                None => Change::Added,
                Some(&mtime) if mtime != file.mtime => Change::Modified,
                Some(_) => {
                    stats.unchanged += 1;
                    progress.on_file(&file.path, FileResult::Skipped);
                    continue;
                }
            };

            match read_note(&self.vault_root, &file.path) {
                Ok(note) => {
                    tx.upsert_note(&note, file)?;
                    tracing::trace!(path = %file.path, "indexed");
                    match change {
                        Change::Added => {
                            stats.added += 1;
                            progress.on_file(&file.path, FileResult::Added);
                        }
                        Change::Modified => {
                            stats.modified += 1;
                            progress.on_file(&file.path, FileResult::Modified);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %file.path, error = %e, "skipping unreadable note");
                    let message = e.to_string();
                    progress.on_file(&file.path, FileResult::Error(message.clone()));
                    stats.errors.push(SyncError {
                        path: file.path.clone(),
                        message,
                    });
                }
            }
        }

        // 4. Retract files that left the disk
        let on_disk: HashSet<&str> = files.iter().map(|f| f.path.as_str()).collect();
        let mut gone: Vec<&String> = cached
            .keys()
            .filter(|path| !on_disk.contains(path.as_str()))
            .collect();
        gone.sort();
        for path in gone {
            if tx.remove_file(path)? {
                stats.deleted += 1;
                progress.on_file(path, FileResult::Deleted);
            }
        }

        if let Ok(root) = absolute_vault_path(&self.vault_root) {
            tx.set_meta("vault_path", &root.to_string_lossy())?;
        }
        tx.set_meta("last_sync", &chrono::Utc::now().to_rfc3339())?;
        tx.commit()?;

        stats.total_time_ms = started.elapsed().as_millis() as u64;
        tracing::debug!(
            added = stats.added,
            modified = stats.modified,
            deleted = stats.deleted,
            unchanged = stats.unchanged,
            errors = stats.errors.len(),
            total_time_ms = stats.total_time_ms,
            "sync complete"
        );

        progress.on_complete(&stats);
        Ok(stats)
    }
}

impl VaultCache {
    /// Syncs this cache with `vault_root`. Shorthand for [`SyncEngine::sync`].
    pub fn sync(&mut self, vault_root: &Path) -> CacheResult<SyncStats> {
        SyncEngine::new(vault_root.to_path_buf()).sync(self)
    }
}

fn scan_error(root: &Path, error: FsError) -> CacheError {
    match error {
        FsError::NotFound { .. } | FsError::NotADirectory { .. } => {
            CacheError::not_found(format!("vault directory {}", root.display()))
        }
        other => CacheError::Io {
            path: root.to_path_buf(),
            source: std::io::Error::other(other.to_string()),
        },
    }
}
