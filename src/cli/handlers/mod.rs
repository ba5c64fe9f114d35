//! Command handlers for the CLI.

mod files;
mod graph;
mod info;
mod links;
mod list;
mod search;
mod sync;
mod tags;


use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::index::{FileResult, ProgressReporter, SyncStats, VaultCache};

// Re-export public items
pub use files::{handle_new, handle_rm, handle_show, new_note_content};
pub use graph::handle_graph;
pub use info::{handle_frontmatter, handle_info, handle_stats};
pub use links::{handle_backlinks, handle_links};
pub use list::handle_list;
pub use search::handle_search;
pub use sync::handle_sync;
pub use tags::{handle_tagged, handle_tags};

// ===========================================
// Shared Utilities
// ===========================================

/// The vault a command runs against, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct VaultContext {
    root: PathBuf,
    cache_dir: Option<PathBuf>,
    verbose: bool,
}

impl VaultContext {
    pub fn new(root: PathBuf, cache_dir: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            root,
            cache_dir,
            verbose,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Opens this vault's cache database without syncing it.
    pub(crate) fn open_cache(&self) -> Result<VaultCache> {
        if !self.root.is_dir() {
            bail!("vault directory not found: {}", self.root.display());
        }
        VaultCache::open_for_vault(&self.root, self.cache_dir.as_deref())
            .with_context(|| format!("failed to open cache for {}", self.root.display()))
    }

    /// Opens the cache and brings it up to date before a query.
    pub(crate) fn synced_cache(&self) -> Result<VaultCache> {
        let mut cache = self.open_cache()?;
        cache
            .sync(&self.root)
            .with_context(|| format!("failed to sync {}", self.root.display()))?;
        Ok(cache)
    }
}

/// Progress reporter that prints to stdout.
pub(crate) struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub(crate) fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn on_file(&mut self, path: &str, result: FileResult) {
        match result {
            FileResult::Error(msg) => eprintln!("  error: {}: {}", path, msg),
            _ if !self.verbose => {}
            FileResult::Added => println!("  added: {}", path),
            FileResult::Modified => println!("  modified: {}", path),
            FileResult::Deleted => println!("  deleted: {}", path),
            FileResult::Skipped => println!("  unchanged: {}", path),
        }
    }

    fn on_complete(&mut self, stats: &SyncStats) {
        println!("{}", sync_summary(stats));
    }
}

/// One-line summary of a sync pass.
pub(crate) fn sync_summary(stats: &SyncStats) -> String {
    let mut line = format!(
        "Synced in {} ms: {} added, {} modified, {} deleted, {} unchanged",
        stats.total_time_ms, stats.added, stats.modified, stats.deleted, stats.unchanged
    );
    if !stats.errors.is_empty() {
        line.push_str(&format!(", {} skipped", stats.errors.len()));
    }
    line
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// Date part of a stored timestamp, or `-` when unset.
pub(crate) fn short_date(timestamp: Option<&str>) -> &str {
    match timestamp {
        Some(ts) => ts.get(..10).unwrap_or(ts),
        None => "-",
    }
}
