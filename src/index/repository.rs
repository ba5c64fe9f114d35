//! CacheQueries trait, query options and result types.

use crate::domain::{LinkKind, PathError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

// ===========================================
// CacheError Type
// ===========================================

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The requested note or resource is not in the index.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// A path or folder failed traversal-safety validation.
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// The cache database could not be opened or its directory is unusable.
    #[error("cache unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The query is invalid.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        CacheError::NotFound { what: what.into() }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

// ===========================================
// Query Options
// ===========================================

/// Options for [`CacheQueries::list_notes`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only notes under this folder.
    pub folder: Option<String>,
    /// Maximum number of results after ordering.
    pub limit: Option<usize>,
}

/// Options for [`CacheQueries::search_content`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub folder: Option<String>,
    pub limit: Option<usize>,
    /// Keep only hits where a query term appears with the same case.
    pub case_sensitive: bool,
}

/// Options for [`CacheQueries::notes_by_tag`].
#[derive(Debug, Clone, Default)]
pub struct TagQuery {
    /// Exact, case-sensitive equality instead of substring containment.
    pub exact: bool,
    pub limit: Option<usize>,
}

// ===========================================
// Result Types
// ===========================================

/// A note as listed from the `files` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteSummary {
    path: String,
    title: String,
    created: Option<String>,
    modified: Option<String>,
    mtime: i64,
    size: u64,
}

impl NoteSummary {
    /// Creates a new NoteSummary with all fields.
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        created: Option<String>,
        modified: Option<String>,
        mtime: i64,
        size: u64,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            created,
            modified,
            mtime,
            size,
        }
    }

    /// Returns the vault-relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the derived title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the frontmatter `created` value.
    pub fn created(&self) -> Option<&str> {
        self.created.as_deref()
    }

    /// Returns the frontmatter `modified` value.
    pub fn modified(&self) -> Option<&str> {
        self.modified.as_deref()
    }

    /// Returns the file modification time in milliseconds.
    pub fn mtime(&self) -> i64 {
        self.mtime
    }

    /// Returns the file size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// A full-text search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    path: String,
    title: String,
    snippet: String,
    score: f64,
}

impl SearchHit {
    pub fn new(path: String, title: String, snippet: String, score: f64) -> Self {
        Self {
            path,
            title,
            snippet,
            score,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns a short context window around the match.
    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    /// Returns the relevance score (higher is more relevant).
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// A tag with the number of notes carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// A link leaving a note, with its unresolved target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutLink {
    pub target: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

/// A link arriving at a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackLink {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

/// A note's record plus its tags and link counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteInfo {
    #[serde(flatten)]
    pub summary: NoteSummary,
    pub tags: Vec<String>,
    pub outlinks: usize,
    pub backlinks: usize,
}

/// Cache-wide counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub files: usize,
    pub tags: usize,
    pub links: usize,
    /// `None` for in-memory caches.
    pub cache_path: Option<PathBuf>,
    pub cache_size: u64,
    pub vault_path: Option<String>,
    /// RFC 3339 time of the last committed sync.
    pub last_sync: Option<String>,
}

// ===========================================
// CacheQueries Trait
// ===========================================

/// Read-only queries against the vault cache.
///
/// Paths are vault-relative; a missing `.md` extension is added. Folder
/// filters and paths are validated before the database is touched.
pub trait CacheQueries {
    /// Lists notes, most recently modified (then created) first, nulls last.
    fn list_notes(&self, options: &ListOptions) -> CacheResult<Vec<NoteSummary>>;

    /// Full-text search with prefix matching per term, best hits first.
    ///
    /// A query with no searchable terms returns an empty result.
    fn search_content(&self, query: &str, options: &SearchOptions)
    -> CacheResult<Vec<SearchHit>>;

    /// Returns every tag with its note count, most used first.
    fn all_tags(&self) -> CacheResult<Vec<TagCount>>;

    /// Lists notes carrying a tag.
    fn notes_by_tag(&self, tag: &str, query: &TagQuery) -> CacheResult<Vec<NoteSummary>>;

    /// Returns the links recorded for a note, in extraction order.
    fn outlinks(&self, path: &str) -> CacheResult<Vec<OutLink>>;

    /// Returns notes linking to `path`, matched by path or bare basename.
    fn backlinks(&self, path: &str) -> CacheResult<Vec<BackLink>>;

    /// Returns the stored frontmatter map.
    fn frontmatter(&self, path: &str) -> CacheResult<Map<String, Value>>;

    /// Returns a note's record, tags and link counts.
    fn note_info(&self, path: &str) -> CacheResult<NoteInfo>;

    /// Returns cache-wide counters.
    fn stats(&self) -> CacheResult<CacheStats>;
}
