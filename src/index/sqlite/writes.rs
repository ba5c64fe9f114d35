//! Row writers used by the sync engine.

use super::transaction::Transaction;
use crate::domain::Note;
use crate::index::CacheResult;
use crate::infra::ScannedFile;
use rusqlite::params;

impl Transaction<'_> {
    /// Replaces everything the cache knows about one file.
    ///
    /// The `files` row is upserted; tags, links and the search document are
    /// deleted and re-inserted from the note's current content.
    pub fn upsert_note(&self, note: &Note, file: &ScannedFile) -> CacheResult<()> {
        let path = note.path();
        let conn = self.conn();

        // 1. Upsert the file row (keeps its rowid)
        conn.execute(
            "INSERT INTO files (path, mtime, size, title, created, modified, frontmatter)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(path) DO UPDATE SET
                 mtime = excluded.mtime,
                 size = excluded.size,
                 title = excluded.title,
                 created = excluded.created,
                 modified = excluded.modified,
                 frontmatter = excluded.frontmatter",
            params![
                path,
                file.mtime,
                file.size as i64,
                note.title(),
                note.created(),
                note.modified(),
                note.frontmatter().to_json(),
            ],
        )?;
        let rowid: i64 =
            conn.query_row("SELECT rowid FROM files WHERE path = ?1", [path], |row| {
                row.get(0)
            })?;

        // 2. Drop derived rows from the previous version
        conn.execute("DELETE FROM tags WHERE path = ?1", [path])?;
        conn.execute("DELETE FROM links WHERE source = ?1", [path])?;
        conn.execute("DELETE FROM search WHERE rowid = ?1", [rowid])?;

        // 3. Tags
        let mut insert_tag =
            conn.prepare_cached("INSERT OR IGNORE INTO tags (tag, path) VALUES (?1, ?2)")?;
        for tag in note.tags() {
            insert_tag.execute([tag.as_str(), path])?;
        }

        // 4. Links, last write wins per target
        let mut insert_link = conn.prepare_cached(
            "INSERT OR REPLACE INTO links (source, target, kind) VALUES (?1, ?2, ?3)",
        )?;
        for link in note.links() {
            insert_link.execute([path, link.target(), link.kind().as_str()])?;
        }

        // 5. Search document
        conn.execute(
            "INSERT INTO search (rowid, path, title, body) VALUES (?1, ?2, ?3, ?4)",
            params![rowid, path, note.title(), note.body()],
        )?;

        Ok(())
    }

    /// Removes a file and, through cascade and trigger, its tags, links and
    /// search document.
    ///
    /// Returns `true` if a row was removed.
    pub fn remove_file(&self, path: &str) -> CacheResult<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM files WHERE path = ?1", [path])?;
        Ok(rows > 0)
    }

    /// Removes every indexed file.
    pub fn clear(&self) -> CacheResult<()> {
        self.conn().execute("DELETE FROM files", [])?;
        Ok(())
    }

    /// Records a `meta` value.
    pub fn set_meta(&self, key: &str, value: &str) -> CacheResult<()> {
        self.conn().execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}
