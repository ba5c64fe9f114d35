//! Connection management for VaultCache.

use super::VaultCache;
use super::transaction::Transaction;
use crate::index::{CacheError, CacheResult, create_schema};
use crate::infra::{absolute_vault_path, cache_file_path, default_cache_dir};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

impl VaultCache {
    // ===========================================
    // In-Memory Connection
    // ===========================================

    /// Opens an in-memory cache with the schema applied.
    ///
    /// This is useful for testing and one-shot queries that don't need persistence.
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        create_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    // ===========================================
    // File-Based Connection
    // ===========================================

    /// Opens or creates a cache database at the given path.
    ///
    /// Creates parent directories if they don't exist and switches the
    /// database to WAL journaling.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Unavailable` if the directory cannot be created
    /// or the database cannot be opened.
    pub fn open(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| CacheError::Unavailable {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(path).map_err(|e| CacheError::Unavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        tracing::trace!(journal_mode = %mode, "cache journal mode");
        create_schema(&conn)?;

        tracing::info!(path = %path.display(), "opened vault cache");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens the cache belonging to `vault_root`.
    ///
    /// The file is `<cache_dir>/<sha256(absolute vault path)[0:16]>.db`,
    /// where `cache_dir` defaults to the per-user cache directory.
    pub fn open_for_vault(vault_root: &Path, cache_dir: Option<&Path>) -> CacheResult<Self> {
        let path = Self::cache_path_for(vault_root, cache_dir)?;
        Self::open(&path)
    }

    /// Returns the database file that [`VaultCache::open_for_vault`] would use.
    pub fn cache_path_for(vault_root: &Path, cache_dir: Option<&Path>) -> CacheResult<PathBuf> {
        let root = absolute_vault_path(vault_root).map_err(|e| CacheError::Io {
            path: vault_root.to_path_buf(),
            source: e,
        })?;
        let dir = match cache_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_cache_dir().ok_or_else(|| CacheError::Unavailable {
                path: PathBuf::new(),
                reason: "no per-user cache directory on this platform".into(),
            })?,
        };
        Ok(cache_file_path(&dir, &root))
    }

    /// Deletes a cache database and its WAL side files.
    ///
    /// Returns `true` if the database existed. The next open starts cold.
    pub fn remove_cache_file(path: &Path) -> CacheResult<bool> {
        let existed = path.exists();
        for suffix in ["", "-wal", "-shm"] {
            let mut target = path.as_os_str().to_owned();
            target.push(suffix);
            let target = PathBuf::from(target);
            match fs::remove_file(&target) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::Io { path: target, source: e }),
            }
        }
        Ok(existed)
    }

    /// Closes the database handle.
    pub fn close(self) -> CacheResult<()> {
        self.conn.close().map_err(|(_, e)| CacheError::Database(e))
    }

    // ===========================================
    // Connection Accessors
    // ===========================================

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Returns the database file path, or `None` for in-memory caches.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ===========================================
    // Transaction Support
    // ===========================================

    /// Begins a new transaction.
    ///
    /// The transaction will automatically rollback on drop unless `commit()` is called.
    pub fn transaction(&mut self) -> CacheResult<Transaction<'_>> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(Transaction::new(&self.conn))
    }
}
