use super::*;
use crate::domain::LinkKind;
use crate::index::{
    BackLink, CacheError, CacheQueries, ListOptions, OutLink, SearchOptions, TagCount, TagQuery,
};
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::time::{Duration, SystemTime};
use tempfile::{TempDir, tempdir};

// ===========================================
// Test Helpers
// ===========================================

struct Vault {
    dir: TempDir,
    cache: VaultCache,
}

impl Vault {
    fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
            cache: VaultCache::open_in_memory().unwrap(),
        }
    }

    fn write(&self, rel: &str, content: &str) -> &Self {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Sets an mtime `secs` seconds in the past so ordering and change
    /// detection do not depend on timestamp granularity.
    fn age(&self, rel: &str, secs: u64) -> &Self {
        let file = File::options()
            .write(true)
            .open(self.dir.path().join(rel))
            .unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs))
            .unwrap();
        self
    }

    fn sync(&mut self) -> crate::index::SyncStats {
        self.cache.sync(self.dir.path()).unwrap()
    }
}

fn paths(notes: &[crate::index::NoteSummary]) -> Vec<&str> {
    notes.iter().map(|n| n.path()).collect()
}

// ===========================================
// Connection
// ===========================================

#[test]
fn open_in_memory_enables_foreign_keys() {
    let cache = VaultCache::open_in_memory().unwrap();

    let fk_enabled: i32 = cache
        .conn()
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();

    assert_eq!(fk_enabled, 1, "foreign keys should be enabled");
    assert_eq!(cache.path(), None);
}

#[test]
fn open_creates_file_and_parents() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("nested").join("cache.db");

    let cache = VaultCache::open(&db_path).unwrap();

    assert!(db_path.exists(), "database file should be created");
    assert_eq!(cache.path(), Some(db_path.as_path()));
}

#[test]
fn open_uses_wal_journal() {
    let dir = tempdir().unwrap();
    let cache = VaultCache::open(&dir.path().join("wal.db")).unwrap();

    let mode: String = cache
        .conn()
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn reopen_preserves_synced_data() {
    let vault = tempdir().unwrap();
    fs::write(vault.path().join("a.md"), "hello").unwrap();
    let cache_dir = tempdir().unwrap();

    {
        let mut cache = VaultCache::open_for_vault(vault.path(), Some(cache_dir.path())).unwrap();
        cache.sync(vault.path()).unwrap();
        cache.close().unwrap();
    }

    let mut cache = VaultCache::open_for_vault(vault.path(), Some(cache_dir.path())).unwrap();
    let stats = cache.sync(vault.path()).unwrap();
    assert_eq!(stats.unchanged, 1, "second process should start warm");
    assert_eq!(stats.added, 0);
}

#[test]
fn open_for_vault_names_file_by_vault_hash() {
    let vault = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();

    let path = VaultCache::cache_path_for(vault.path(), Some(cache_dir.path())).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();

    assert_eq!(path.parent(), Some(cache_dir.path()));
    assert!(name.ends_with(".db"));
    assert_eq!(name.len(), 16 + ".db".len());
}

#[test]
fn separate_vaults_get_separate_caches() {
    let cache_dir = tempdir().unwrap();
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();

    let path_a = VaultCache::cache_path_for(a.path(), Some(cache_dir.path())).unwrap();
    let path_b = VaultCache::cache_path_for(b.path(), Some(cache_dir.path())).unwrap();
    assert_ne!(path_a, path_b);
}

#[test]
fn remove_cache_file_forces_cold_sync() {
    let vault = tempdir().unwrap();
    fs::write(vault.path().join("a.md"), "hello").unwrap();
    let cache_dir = tempdir().unwrap();
    let db_path = VaultCache::cache_path_for(vault.path(), Some(cache_dir.path())).unwrap();

    let mut cache = VaultCache::open(&db_path).unwrap();
    cache.sync(vault.path()).unwrap();
    cache.close().unwrap();

    assert!(VaultCache::remove_cache_file(&db_path).unwrap());
    assert!(!db_path.exists());
    assert!(!VaultCache::remove_cache_file(&db_path).unwrap());

    let mut cache = VaultCache::open(&db_path).unwrap();
    assert_eq!(cache.sync(vault.path()).unwrap().added, 1);
}

#[cfg(unix)]
#[test]
fn open_under_readonly_dir_is_unavailable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let readonly_dir = dir.path().join("readonly");
    fs::create_dir(&readonly_dir).unwrap();
    fs::set_permissions(&readonly_dir, fs::Permissions::from_mode(0o555)).unwrap();

    // Permission bits do not bind a privileged user
    if fs::create_dir(readonly_dir.join("probe")).is_ok() {
        fs::set_permissions(&readonly_dir, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = VaultCache::open(&readonly_dir.join("sub").join("cache.db"));

    fs::set_permissions(&readonly_dir, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(matches!(result, Err(CacheError::Unavailable { .. })));
}

// ===========================================
// Transactions
// ===========================================

#[test]
fn dropped_transaction_rolls_back() {
    let mut cache = VaultCache::open_in_memory().unwrap();
    {
        let tx = cache.transaction().unwrap();
        tx.set_meta("probe", "1").unwrap();
    }
    assert_eq!(cache.meta("probe").unwrap(), None);
}

#[test]
fn committed_transaction_persists() {
    let mut cache = VaultCache::open_in_memory().unwrap();
    let tx = cache.transaction().unwrap();
    tx.set_meta("probe", "1").unwrap();
    tx.commit().unwrap();
    assert_eq!(cache.meta("probe").unwrap(), Some("1".to_string()));
}

// ===========================================
// Scenario: tags and backlinks
// ===========================================

#[test]
fn backlinks_and_tags_for_simple_vault() {
    let mut vault = Vault::new();
    vault.write("a.md", "See [[b]]").write("b.md", "Body #work");
    vault.sync();

    assert_eq!(
        vault.cache.backlinks("b").unwrap(),
        vec![BackLink {
            source: "a.md".into(),
            kind: LinkKind::Wiki,
        }]
    );
    assert_eq!(
        vault.cache.all_tags().unwrap(),
        vec![TagCount {
            tag: "work".into(),
            count: 1,
        }]
    );
}

#[test]
fn backlinks_match_full_path_and_basename() {
    let mut vault = Vault::new();
    vault
        .write("projects/target.md", "")
        .write("by-path.md", "[[projects/target]]")
        .write("by-name.md", "[[target|alias]]")
        .write("by-md.md", "[t](projects/target.md)")
        .write("unrelated.md", "[[other]]");
    vault.sync();

    let sources: Vec<String> = vault
        .cache
        .backlinks("projects/target.md")
        .unwrap()
        .into_iter()
        .map(|b| b.source)
        .collect();
    assert_eq!(sources, vec!["by-md.md", "by-name.md", "by-path.md"]);
}

#[test]
fn outlinks_in_extraction_order() {
    let mut vault = Vault::new();
    vault.write("a.md", "[[z]] then [m](m.md) and [ext](https://x.io)");
    vault.sync();

    assert_eq!(
        vault.cache.outlinks("a").unwrap(),
        vec![
            OutLink {
                target: "z".into(),
                kind: LinkKind::Wiki,
            },
            OutLink {
                target: "m".into(),
                kind: LinkKind::Markdown,
            },
        ]
    );
}

#[test]
fn same_target_in_both_syntaxes_collapses_to_one_link() {
    let mut vault = Vault::new();
    vault.write("a.md", "[[b]] and [b](b.md)");
    vault.sync();

    let links = vault.cache.outlinks("a.md").unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].kind, LinkKind::Markdown);
}

#[test]
fn outlinks_of_unindexed_note_is_not_found() {
    let vault = Vault::new();
    assert!(matches!(
        vault.cache.outlinks("ghost.md"),
        Err(CacheError::NotFound { .. })
    ));
}

// ===========================================
// Change detection and deletion
// ===========================================

#[test]
fn modified_note_leaves_no_stale_rows() {
    let mut vault = Vault::new();
    vault.write("a.md", "#old [[x]] ancient words").age("a.md", 100);
    vault.sync();

    vault.write("a.md", "#new [[y]] fresh words");
    let stats = vault.sync();
    assert_eq!(stats.modified, 1);

    let tags: Vec<String> = vault.cache.all_tags().unwrap().into_iter().map(|t| t.tag).collect();
    assert_eq!(tags, vec!["new"]);
    assert!(vault.cache.backlinks("x").unwrap().is_empty());
    assert_eq!(vault.cache.backlinks("y").unwrap().len(), 1);
    assert!(vault
        .cache
        .search_content("ancient", &SearchOptions::default())
        .unwrap()
        .is_empty());
    assert_eq!(
        vault
            .cache
            .search_content("fresh", &SearchOptions::default())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn deleted_note_cascades_everywhere() {
    let mut vault = Vault::new();
    vault
        .write("a.md", "#shared [[b]] unique-term")
        .write("b.md", "#shared");
    vault.sync();
    assert_eq!(vault.cache.all_tags().unwrap()[0].count, 2);

    fs::remove_file(vault.dir.path().join("a.md")).unwrap();
    vault.sync();

    assert_eq!(paths(&vault.cache.list_notes(&ListOptions::default()).unwrap()), vec!["b.md"]);
    assert_eq!(vault.cache.all_tags().unwrap()[0].count, 1);
    assert!(vault.cache.backlinks("b").unwrap().is_empty());
    assert!(vault
        .cache
        .search_content("unique", &SearchOptions::default())
        .unwrap()
        .is_empty());
}

// ===========================================
// listNotes
// ===========================================

#[test]
fn list_orders_by_modified_then_created_nulls_last() {
    let mut vault = Vault::new();
    vault
        .write("old.md", "---\nmodified: 2023-01-01\n---\n")
        .write("new.md", "---\nmodified: 2024-06-01\n---\n")
        .write("created-only.md", "---\ncreated: 2024-12-01\n---\n")
        .write("undated.md", "plain");
    vault.sync();

    let notes = vault.cache.list_notes(&ListOptions::default()).unwrap();
    assert_eq!(
        paths(&notes),
        vec!["new.md", "old.md", "created-only.md", "undated.md"]
    );
}

#[test]
fn list_filters_by_folder_and_limits() {
    let mut vault = Vault::new();
    vault
        .write("projects/a.md", "")
        .write("projects/b.md", "")
        .write("projects-old/c.md", "")
        .write("root.md", "");
    vault.sync();

    let in_folder = vault
        .cache
        .list_notes(&ListOptions {
            folder: Some("projects".into()),
            limit: None,
        })
        .unwrap();
    assert_eq!(paths(&in_folder), vec!["projects/a.md", "projects/b.md"]);

    let limited = vault
        .cache
        .list_notes(&ListOptions {
            folder: None,
            limit: Some(1),
        })
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[test]
fn list_rejects_parent_traversal() {
    let vault = Vault::new();
    let result = vault.cache.list_notes(&ListOptions {
        folder: Some("../../etc".into()),
        limit: None,
    });
    assert!(matches!(result, Err(CacheError::InvalidPath(_))));
}

// ===========================================
// searchContent
// ===========================================

#[test]
fn search_ranks_by_relevance_and_skips_non_matches() {
    let mut vault = Vault::new();
    vault
        .write("a.md", "term term term term term")
        .write("b.md", "a single term among many other words in this longer note")
        .write("c.md", "nothing relevant here");
    vault.sync();

    let hits = vault
        .cache
        .search_content("term", &SearchOptions::default())
        .unwrap();
    let found: Vec<&str> = hits.iter().map(|h| h.path()).collect();
    assert_eq!(found, vec!["a.md", "b.md"]);
    assert!(hits[0].score() >= hits[1].score());
}

#[test]
fn search_matches_prefixes_and_ors_terms() {
    let mut vault = Vault::new();
    vault
        .write("rust.md", "programming in rustlang")
        .write("go.md", "gophers everywhere");
    vault.sync();

    let hits = vault
        .cache
        .search_content("rust gopher", &SearchOptions::default())
        .unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn search_without_terms_is_empty() {
    let mut vault = Vault::new();
    vault.write("a.md", "content");
    vault.sync();

    let hits = vault
        .cache
        .search_content(" -- \"* ", &SearchOptions::default())
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn search_returns_snippet_with_match() {
    let mut vault = Vault::new();
    vault.write("a.md", "The quick brown fox jumps over the lazy dog");
    vault.sync();

    let hits = vault
        .cache
        .search_content("fox", &SearchOptions::default())
        .unwrap();
    assert!(hits[0].snippet().contains("**fox**"));
}

#[test]
fn search_respects_folder_and_case() {
    let mut vault = Vault::new();
    vault
        .write("work/a.md", "Rust at work")
        .write("home/b.md", "rust at home");
    vault.sync();

    let in_work = vault
        .cache
        .search_content(
            "rust",
            &SearchOptions {
                folder: Some("work".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(in_work.len(), 1);
    assert_eq!(in_work[0].path(), "work/a.md");

    let exact_case = vault
        .cache
        .search_content(
            "Rust",
            &SearchOptions {
                case_sensitive: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(exact_case.len(), 1);
    assert_eq!(exact_case[0].path(), "work/a.md");
}

#[test]
fn search_rejects_bad_folder_before_querying() {
    let vault = Vault::new();
    let result = vault.cache.search_content(
        "x",
        &SearchOptions {
            folder: Some("a/../../b".into()),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(CacheError::InvalidPath(_))));
}

// ===========================================
// Tags
// ===========================================

#[test]
fn tags_ignore_code_and_merge_frontmatter() {
    let mut vault = Vault::new();
    vault.write(
        "a.md",
        "---\ntags: [meta]\n---\nUse `#nottag` but #realtag\n\n```\n#fenced\n```\n",
    );
    vault.sync();

    let tags: Vec<String> = vault.cache.all_tags().unwrap().into_iter().map(|t| t.tag).collect();
    assert_eq!(tags, vec!["meta", "realtag"]);
}

#[test]
fn all_tags_sorted_by_count() {
    let mut vault = Vault::new();
    vault
        .write("a.md", "#common #rare")
        .write("b.md", "#common");
    vault.sync();

    let tags = vault.cache.all_tags().unwrap();
    assert_eq!(tags[0], TagCount { tag: "common".into(), count: 2 });
    assert_eq!(tags[1], TagCount { tag: "rare".into(), count: 1 });
}

#[test]
fn notes_by_tag_exact_and_substring() {
    let mut vault = Vault::new();
    vault
        .write("a.md", "#Project/alpha")
        .write("b.md", "#project")
        .write("c.md", "#other");
    vault.sync();

    let exact = vault
        .cache
        .notes_by_tag("project", &TagQuery { exact: true, limit: None })
        .unwrap();
    assert_eq!(paths(&exact), vec!["b.md"]);

    let mut fuzzy = vault
        .cache
        .notes_by_tag("#PROJECT", &TagQuery::default())
        .unwrap();
    fuzzy.sort_by(|x, y| x.path().cmp(y.path()));
    assert_eq!(paths(&fuzzy), vec!["a.md", "b.md"]);
}

// ===========================================
// Note info, frontmatter, stats
// ===========================================

#[test]
fn note_info_includes_tags_and_link_counts() {
    let mut vault = Vault::new();
    vault
        .write("a.md", "---\ntitle: Alpha\n---\n#x [[b]] [[c]]")
        .write("b.md", "[[a]]");
    vault.sync();

    let info = vault.cache.note_info("a").unwrap();
    assert_eq!(info.summary.title(), "Alpha");
    assert_eq!(info.tags, vec!["x"]);
    assert_eq!(info.outlinks, 2);
    assert_eq!(info.backlinks, 1);
}

#[test]
fn frontmatter_keeps_extra_fields() {
    let mut vault = Vault::new();
    vault.write("a.md", "---\ntitle: T\nstatus: draft\npriority: 3\n---\n");
    vault.sync();

    let fm = vault.cache.frontmatter("a.md").unwrap();
    assert_eq!(fm["status"], "draft");
    assert_eq!(fm["priority"], 3);
    assert_eq!(fm["title"], "T");
}

#[test]
fn frontmatter_of_unindexed_note_is_not_found() {
    let vault = Vault::new();
    assert!(matches!(
        vault.cache.frontmatter("missing"),
        Err(CacheError::NotFound { .. })
    ));
    assert!(matches!(
        vault.cache.note_info("../escape"),
        Err(CacheError::InvalidPath(_))
    ));
}

#[test]
fn stats_count_rows() {
    let mut vault = Vault::new();
    vault
        .write("a.md", "#one #two [[b]]")
        .write("b.md", "#one");
    vault.sync();

    let stats = vault.cache.stats().unwrap();
    assert_eq!(stats.files, 2);
    assert_eq!(stats.tags, 2);
    assert_eq!(stats.links, 1);
    assert!(stats.last_sync.is_some());
    assert_eq!(stats.cache_path, None);
}
