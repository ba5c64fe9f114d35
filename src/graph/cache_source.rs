//! Link graph answered from the vault cache.

use super::{GraphError, LinkGraph};
use crate::domain::{ExtractedLink, LinkKind, file_stem};
use crate::index::{CacheError, VaultCache};
use rusqlite::OptionalExtension;

impl From<rusqlite::Error> for GraphError {
    fn from(e: rusqlite::Error) -> Self {
        GraphError::Cache(CacheError::Database(e))
    }
}

impl LinkGraph for VaultCache {
    fn files(&self) -> Result<Vec<String>, GraphError> {
        let mut stmt = self.conn().prepare("SELECT path FROM files ORDER BY path")?;
        let paths = stmt
            .query_map([], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(paths)
    }

    fn links_from(&self, path: &str) -> Result<Vec<ExtractedLink>, GraphError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT target, kind FROM links WHERE source = ?1 ORDER BY rowid")?;
        let links = stmt
            .query_map([path], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .filter_map(|r| r.ok())
            .filter_map(|(target, kind)| {
                kind.parse::<LinkKind>()
                    .ok()
                    .map(|kind| ExtractedLink::new(target, kind))
            })
            .collect();
        Ok(links)
    }

    fn title(&self, path: &str) -> Result<String, GraphError> {
        let title: Option<String> = self
            .conn()
            .query_row("SELECT title FROM files WHERE path = ?1", [path], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(title.unwrap_or_else(|| file_stem(path).to_string()))
    }
}
