//! CacheQueries implementation for VaultCache.

use super::VaultCache;
use crate::domain::{
    LinkKind, file_stem, normalize_note_path, path_without_extension, validate_folder,
};
use crate::index::{
    BackLink, CacheError, CacheQueries, CacheResult, CacheStats, ListOptions, NoteInfo,
    NoteSummary, OutLink, SearchHit, SearchOptions, TagCount, TagQuery,
};
use rusqlite::{OptionalExtension, Row};
use serde_json::{Map, Value};
use std::collections::HashMap;

const SUMMARY_COLUMNS: &str = "path, title, created, modified, mtime, size";

/// Most recently touched first; notes without dates go last.
const ORDER_RECENT: &str =
    "ORDER BY modified IS NULL, modified DESC, created IS NULL, created DESC, path";

// ===========================================
// Sync Support
// ===========================================

impl VaultCache {
    /// Returns every indexed path with its recorded mtime.
    pub fn cached_mtimes(&self) -> CacheResult<HashMap<String, i64>> {
        let mut stmt = self.conn.prepare("SELECT path, mtime FROM files")?;
        let results = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(results)
    }

    /// Returns a value from the `meta` table.
    pub fn meta(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM meta WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    /// Returns true if `path` (already normalized) has a file row.
    pub fn contains(&self, path: &str) -> CacheResult<bool> {
        Ok(self
            .conn
            .query_row("SELECT 1 FROM files WHERE path = ?1", [path], |_| Ok(()))
            .optional()?
            .is_some())
    }

    fn require_indexed(&self, path: &str) -> CacheResult<String> {
        let path = normalize_note_path(path)?;
        if self.contains(&path)? {
            Ok(path)
        } else {
            Err(CacheError::not_found(format!("note '{path}' is not indexed")))
        }
    }
}

// ===========================================
// Query Layer
// ===========================================

impl CacheQueries for VaultCache {
    fn list_notes(&self, options: &ListOptions) -> CacheResult<Vec<NoteSummary>> {
        let prefix = folder_prefix(options.folder.as_deref())?;

        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM files
             WHERE (?1 IS NULL OR substr(path, 1, length(?1)) = ?1)
             {ORDER_RECENT}
             LIMIT ?2"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map(rusqlite::params![prefix, limit_param(options.limit)], summary_from_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(notes)
    }

    fn search_content(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> CacheResult<Vec<SearchHit>> {
        let prefix = folder_prefix(options.folder.as_deref())?;
        let terms = query_terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let fts_query = terms
            .iter()
            .map(|term| format!("\"{term}\"*"))
            .collect::<Vec<_>>()
            .join(" OR ");

        // Weights: path=0 (unindexed), title=10, body=1
        let mut stmt = self.conn.prepare(
            "SELECT
                f.path,
                f.title,
                snippet(search, -1, '**', '**', '...', 12) AS snippet,
                -bm25(search, 0.0, 10.0, 1.0) AS score,
                CASE WHEN ?3 THEN search.body ELSE NULL END AS body
             FROM search
             JOIN files f ON f.rowid = search.rowid
             WHERE search MATCH ?1
               AND (?2 IS NULL OR substr(f.path, 1, length(?2)) = ?2)
             ORDER BY score DESC, f.path
             LIMIT ?4",
        )?;

        // Case filtering happens after the query, so the limit moves with it
        let sql_limit = if options.case_sensitive {
            -1
        } else {
            limit_param(options.limit)
        };

        let rows = stmt
            .query_map(
                rusqlite::params![fts_query, prefix, options.case_sensitive, sql_limit],
                |row| {
                    Ok((
                        SearchHit::new(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?),
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .map_err(fts_error)?;

        let mut hits = Vec::new();
        for row in rows {
            let (hit, body) = row.map_err(fts_error)?;
            if options.case_sensitive {
                let body = body.unwrap_or_default();
                let exact = terms.iter().any(|term| {
                    hit.title().contains(term.as_str()) || body.contains(term.as_str())
                });
                if !exact {
                    continue;
                }
            }
            hits.push(hit);
        }

        if options.case_sensitive
            && let Some(limit) = options.limit
        {
            hits.truncate(limit);
        }
        Ok(hits)
    }

    fn all_tags(&self) -> CacheResult<Vec<TagCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT tag, COUNT(DISTINCT path) AS n FROM tags
             GROUP BY tag
             ORDER BY n DESC, tag",
        )?;
        let tags = stmt
            .query_map([], |row| {
                Ok(TagCount {
                    tag: row.get(0)?,
                    count: row.get::<_, i64>(1)? as usize,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(tags)
    }

    fn notes_by_tag(&self, tag: &str, query: &TagQuery) -> CacheResult<Vec<NoteSummary>> {
        let tag = tag.trim().trim_start_matches('#');
        let condition = if query.exact {
            "tag = ?1"
        } else {
            "instr(lower(tag), lower(?1)) > 0"
        };

        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM files
             WHERE path IN (SELECT path FROM tags WHERE {condition})
             {ORDER_RECENT}
             LIMIT ?2"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map(rusqlite::params![tag, limit_param(query.limit)], summary_from_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(notes)
    }

    fn outlinks(&self, path: &str) -> CacheResult<Vec<OutLink>> {
        let path = self.require_indexed(path)?;
        let mut stmt = self
            .conn
            .prepare("SELECT target, kind FROM links WHERE source = ?1 ORDER BY rowid")?;
        let links = stmt
            .query_map([&path], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .filter_map(|r| r.ok())
            .filter_map(|(target, kind)| {
                kind.parse::<LinkKind>()
                    .ok()
                    .map(|kind| OutLink { target, kind })
            })
            .collect();
        Ok(links)
    }

    fn backlinks(&self, path: &str) -> CacheResult<Vec<BackLink>> {
        let path = normalize_note_path(path)?;
        let without_ext = path_without_extension(&path);
        let basename = file_stem(&path);

        // MAX prefers 'wiki' when one source links both ways
        let mut stmt = self.conn.prepare(
            "SELECT source, MAX(kind) FROM links
             WHERE target IN (?1, ?2, ?3)
             GROUP BY source
             ORDER BY source",
        )?;
        let links = stmt
            .query_map([without_ext, basename, path.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .filter_map(|r| r.ok())
            .filter_map(|(source, kind)| {
                kind.parse::<LinkKind>()
                    .ok()
                    .map(|kind| BackLink { source, kind })
            })
            .collect();
        Ok(links)
    }

    fn frontmatter(&self, path: &str) -> CacheResult<Map<String, Value>> {
        let path = normalize_note_path(path)?;
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT frontmatter FROM files WHERE path = ?1",
                [&path],
                |row| row.get(0),
            )
            .optional()?;

        let json =
            json.ok_or_else(|| CacheError::not_found(format!("note '{path}' is not indexed")))?;
        match serde_json::from_str(&json) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Ok(Map::new()),
            Err(e) => Err(CacheError::InvalidQuery(format!(
                "stored frontmatter for '{path}' is not JSON: {e}"
            ))),
        }
    }

    fn note_info(&self, path: &str) -> CacheResult<NoteInfo> {
        let path = self.require_indexed(path)?;

        let sql = format!("SELECT {SUMMARY_COLUMNS} FROM files WHERE path = ?1");
        let summary = self.conn.query_row(&sql, [&path], summary_from_row)?;

        let tags: Vec<String> = self
            .conn
            .prepare("SELECT tag FROM tags WHERE path = ?1 ORDER BY tag")?
            .query_map([&path], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        let outlinks: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM links WHERE source = ?1", [&path], |row| {
                    row.get(0)
                })?;

        Ok(NoteInfo {
            summary,
            tags,
            outlinks: outlinks as usize,
            backlinks: self.backlinks(&path)?.len(),
        })
    }

    fn stats(&self) -> CacheResult<CacheStats> {
        let count = |sql: &str| -> CacheResult<usize> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n as usize)
        };

        let cache_size = match &self.path {
            Some(path) => std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            None => 0,
        };

        Ok(CacheStats {
            files: count("SELECT COUNT(*) FROM files")?,
            tags: count("SELECT COUNT(DISTINCT tag) FROM tags")?,
            links: count("SELECT COUNT(*) FROM links")?,
            cache_path: self.path.clone(),
            cache_size,
            vault_path: self.meta("vault_path")?,
            last_sync: self.meta("last_sync")?,
        })
    }
}

// ===========================================
// Helper Functions
// ===========================================

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<NoteSummary> {
    Ok(NoteSummary::new(
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get::<_, i64>(5)? as u64,
    ))
}

/// Validates a folder filter and turns it into a `folder/` prefix.
fn folder_prefix(folder: Option<&str>) -> CacheResult<Option<String>> {
    match folder {
        Some(folder) => Ok(validate_folder(folder)?.map(|f| format!("{f}/"))),
        None => Ok(None),
    }
}

/// SQLite treats a negative LIMIT as unbounded.
fn limit_param(limit: Option<usize>) -> i64 {
    limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX))
}

/// Splits a query into the terms the unicode61 tokenizer would index.
fn query_terms(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

fn fts_error(e: rusqlite::Error) -> CacheError {
    let msg = e.to_string();
    if msg.contains("fts5") || msg.contains("syntax") {
        CacheError::InvalidQuery(format!("invalid search query: {}", e))
    } else {
        CacheError::Database(e)
    }
}
