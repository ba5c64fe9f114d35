//! SQLite schema creation for the vault cache.

use rusqlite::Connection;

/// Version written to the `meta` table for new caches.
pub const SCHEMA_VERSION: i64 = 1;

/// Creates the database schema for the vault cache.
///
/// It is idempotent - calling it on every open is safe.
///
/// # Tables Created
/// - `files` - One row per indexed Markdown file
/// - `tags` - (tag, path) pairs
/// - `links` - (source, target) pairs with the link syntax used
/// - `search` - FTS5 table over title and body, keyed by the `files` rowid
/// - `meta` - Schema version, vault path and last sync time
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // ===========================================
    // Files Table
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS files (
            path TEXT PRIMARY KEY,
            mtime INTEGER NOT NULL,
            size INTEGER NOT NULL,
            title TEXT NOT NULL,
            created TEXT,
            modified TEXT,
            frontmatter TEXT NOT NULL DEFAULT '{}'
        );",
    )?;

    // ===========================================
    // Tags Table
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tags (
            tag TEXT NOT NULL,
            path TEXT NOT NULL REFERENCES files(path) ON DELETE CASCADE,
            PRIMARY KEY (tag, path)
        );",
    )?;

    // ===========================================
    // Links Table
    // ===========================================
    // Keyed without `kind`: a wiki and a markdown link from one source to
    // the same target share a row.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS links (
            source TEXT NOT NULL REFERENCES files(path) ON DELETE CASCADE,
            target TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('wiki', 'markdown')),
            PRIMARY KEY (source, target)
        );",
    )?;

    // ===========================================
    // Indexes
    // ===========================================
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_tags_path ON tags(path);
         CREATE INDEX IF NOT EXISTS idx_links_target ON links(target);
         CREATE INDEX IF NOT EXISTS idx_files_modified ON files(modified);",
    )?;

    // ===========================================
    // FTS5 Search Table
    // ===========================================
    // rowid mirrors files.rowid; the body is stored only here.
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS search USING fts5(
            path UNINDEXED,
            title,
            body,
            tokenize = 'unicode61'
        );",
    )?;

    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS files_search_delete
        AFTER DELETE ON files BEGIN
            DELETE FROM search WHERE rowid = OLD.rowid;
        END;",
    )?;

    // ===========================================
    // Meta Table
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}
