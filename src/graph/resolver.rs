//! Resolution of unresolved link targets to vault files.

use crate::domain::{file_stem, parent_folder};
use std::collections::{HashMap, HashSet};

/// Maps link text as written to the vault file it points at.
///
/// A target is cleaned (leading `./` and `/`, `#fragment` and `.md` are
/// dropped) and then tried, in order, as a path relative to the linking
/// note's folder, as a vault-root path, and as a bare basename. Basename
/// matches pick the first file in enumeration order.
#[derive(Debug, Default)]
pub struct LinkResolver {
    paths: HashSet<String>,
    by_basename: HashMap<String, String>,
}

impl LinkResolver {
    /// Builds a resolver over the given vault paths (in enumeration order).
    pub fn new(files: &[String]) -> Self {
        let mut paths = HashSet::with_capacity(files.len());
        let mut by_basename = HashMap::new();

        for path in files {
            paths.insert(path.clone());
            by_basename
                .entry(file_stem(path).to_string())
                .or_insert_with(|| path.clone());
        }

        Self { paths, by_basename }
    }

    /// Resolves `target` as written inside `source`.
    ///
    /// `source` is `None` when resolving a caller-supplied start note.
    pub fn resolve(&self, target: &str, source: Option<&str>) -> Option<String> {
        let cleaned = clean_target(target)?;

        if let Some(source) = source {
            let folder = parent_folder(source);
            if !folder.is_empty() {
                let relative = format!("{folder}/{cleaned}.md");
                if self.paths.contains(&relative) {
                    return Some(relative);
                }
            }
        }

        let rooted = format!("{cleaned}.md");
        if self.paths.contains(&rooted) {
            return Some(rooted);
        }

        let basename = cleaned.rsplit('/').next().unwrap_or(cleaned);
        self.by_basename.get(basename).cloned()
    }
}

fn clean_target(target: &str) -> Option<&str> {
    let mut cleaned = target.trim();
    if let Some(pos) = cleaned.find('#') {
        cleaned = &cleaned[..pos];
    }
    while let Some(rest) = cleaned.strip_prefix("./") {
        cleaned = rest;
    }
    cleaned = cleaned.trim_start_matches('/');
    cleaned = cleaned.strip_suffix(".md").unwrap_or(cleaned);

    if cleaned.is_empty() { None } else { Some(cleaned) }
}
