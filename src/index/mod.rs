//! SQLite vault cache: schema, store, sync engine and queries

mod repository;
mod schema;
mod sqlite;
mod sync;

pub use repository::{
    BackLink, CacheError, CacheQueries, CacheResult, CacheStats, ListOptions, NoteInfo,
    NoteSummary, OutLink, SearchHit, SearchOptions, TagCount, TagQuery,
};
pub use schema::{SCHEMA_VERSION, create_schema};
pub use sqlite::{Transaction, VaultCache};
pub use sync::{FileResult, NoopReporter, ProgressReporter, SyncEngine, SyncError, SyncStats};
