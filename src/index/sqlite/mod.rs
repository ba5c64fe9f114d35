//! SQLite-backed vault cache implementation.

mod connection;
mod queries;
mod transaction;
mod writes;

#[cfg(test)]
mod tests;

use rusqlite::Connection;
use std::path::PathBuf;

pub use transaction::Transaction;

// ===========================================
// VaultCache Struct
// ===========================================

/// SQLite-backed cache of one vault's files, tags, links and text.
///
/// A `VaultCache` owns its connection; dropping it or calling
/// [`VaultCache::close`] releases the database handle. Only one cache
/// should write to a given database file at a time.
#[derive(Debug)]
pub struct VaultCache {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
}
