//! Bounded, cycle-safe traversal of the note link graph.
//!
//! The traversal runs over any [`LinkGraph`]: [`LiveVault`] re-reads files
//! from disk, while [`VaultCache`](crate::index::VaultCache) answers from
//! its `files` and `links` tables.

mod cache_source;
mod live;
mod resolver;
mod traversal;

pub use live::LiveVault;
pub use resolver::LinkResolver;
pub use traversal::traverse;

use crate::domain::{ExtractedLink, LinkKind, PathError};
use crate::index::CacheError;
use crate::infra::FsError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

// ===========================================
// Limits
// ===========================================

/// Deepest traversal any request may ask for.
pub const MAX_DEPTH: usize = 5;
/// Most nodes any response may contain.
pub const MAX_NODES: usize = 1000;
/// Longest wall-clock budget for one traversal.
pub const MAX_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_DEPTH: usize = 2;
pub const DEFAULT_MAX_NODES: usize = 200;
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Files included in a whole-vault snapshot (further capped by `max_nodes`).
pub const SNAPSHOT_NODES: usize = 100;

// ===========================================
// Errors
// ===========================================

/// Errors raised by graph queries.
///
/// Hitting a limit is never an error; it sets [`GraphResponse::truncated`].
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("note not found: {path}")]
    NotFound { path: String },

    #[error(transparent)]
    InvalidPath(#[from] PathError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fs(#[from] FsError),
}

// ===========================================
// Request
// ===========================================

/// Which links to follow from each node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Notes linking to the current note.
    In,
    /// Notes the current note links to.
    Out,
    #[default]
    Both,
}

impl Direction {
    pub fn includes_in(self) -> bool {
        matches!(self, Direction::In | Direction::Both)
    }

    pub fn includes_out(self) -> bool {
        matches!(self, Direction::Out | Direction::Both)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::Both => "both",
        };
        f.write_str(s)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            "both" => Ok(Direction::Both),
            other => Err(format!("unknown direction '{other}' (expected in, out or both)")),
        }
    }
}

/// A graph query. Unset limits take the defaults; every limit is clamped
/// to the hard maximum.
#[derive(Debug, Clone, Default)]
pub struct GraphRequest {
    /// Start note; `None` asks for a whole-vault snapshot.
    pub from: Option<String>,
    pub depth: Option<usize>,
    pub direction: Direction,
    pub max_nodes: Option<usize>,
    pub timeout_ms: Option<u64>,
}

/// Effective limits after clamping a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLimits {
    pub depth: usize,
    pub max_nodes: usize,
    pub timeout: Duration,
    /// The caller asked for more depth than [`MAX_DEPTH`].
    pub depth_clamped: bool,
}

impl GraphLimits {
    /// Applies defaults and hard caps. Caller limits narrow the caps, never
    /// widen them.
    pub fn clamp(request: &GraphRequest) -> Self {
        let depth = request.depth.unwrap_or(DEFAULT_DEPTH);
        let max_nodes = request.max_nodes.unwrap_or(DEFAULT_MAX_NODES);
        let timeout_ms = request.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            depth: depth.min(MAX_DEPTH),
            max_nodes: max_nodes.min(MAX_NODES),
            timeout: Duration::from_millis(timeout_ms.min(MAX_TIMEOUT_MS)),
            depth_clamped: depth > MAX_DEPTH,
        }
    }
}

// ===========================================
// Response
// ===========================================

/// A note in a graph response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Vault path without the `.md` extension.
    pub id: String,
    pub title: String,
    /// Parent folder, `""` for the vault root.
    pub group: String,
}

/// A directed link between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: LinkKind,
}

/// Result of a graph query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphResponse {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// A limit or the timeout cut the answer short.
    pub truncated: bool,
    /// Files whose links were read.
    pub processed_files: usize,
    pub total_files: usize,
}

// ===========================================
// LinkGraph Trait
// ===========================================

/// A source of notes and their outgoing links.
pub trait LinkGraph {
    /// Returns every note path in enumeration order.
    fn files(&self) -> Result<Vec<String>, GraphError>;

    /// Returns the unresolved links written in a note.
    fn links_from(&self, path: &str) -> Result<Vec<ExtractedLink>, GraphError>;

    /// Returns the display title of a note.
    fn title(&self, path: &str) -> Result<String, GraphError>;
}
