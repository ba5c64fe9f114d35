//! Link extraction from Markdown note content.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// `[[Target]]` or `[[Target|Alias]]`.
static WIKI_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+?)\]\]").expect("wiki link regex is valid"));

/// `[Alias](target)`.
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("markdown link regex is valid"));

/// The syntax a link was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// `[[Target]]` style.
    Wiki,
    /// `[Alias](target)` style.
    Markdown,
}

impl LinkKind {
    /// Returns the stored name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Wiki => "wiki",
            LinkKind::Markdown => "markdown",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown link kind.
#[derive(Debug, Clone)]
pub struct ParseLinkKindError(String);

impl fmt::Display for ParseLinkKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown link kind '{}': expected 'wiki' or 'markdown'", self.0)
    }
}

impl std::error::Error for ParseLinkKindError {}

impl FromStr for LinkKind {
    type Err = ParseLinkKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wiki" => Ok(LinkKind::Wiki),
            "markdown" => Ok(LinkKind::Markdown),
            other => Err(ParseLinkKindError(other.to_string())),
        }
    }
}

/// A link found in a note's content.
///
/// The target is kept exactly as written (after trimming and the stripping
/// rules of its kind); it is not resolved against the vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExtractedLink {
    target: String,
    kind: LinkKind,
}

impl ExtractedLink {
    /// Creates a link with the given target and kind.
    pub fn new(target: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }

    /// Returns the unresolved link target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the link syntax.
    pub fn kind(&self) -> LinkKind {
        self.kind
    }
}

/// Extracts wiki and markdown links from raw Markdown text.
///
/// Results are de-duplicated by `(kind, target)` and ordered by first
/// occurrence in the text.
///
/// - `[[Target|Alias]]` yields `Target` (trimmed).
/// - `[Alias](target)` yields `target` with any `#fragment` and `.md`
///   extension removed. External `http://`/`https://` links and bare
///   `#anchor` links are ignored.
///
/// # Examples
///
/// ```
/// use vaultkit::domain::{extract_links, LinkKind};
///
/// let links = extract_links("See [[Projects/Alpha|alpha]] and [setup](docs/setup.md#intro).");
/// assert_eq!(links[0].target(), "Projects/Alpha");
/// assert_eq!(links[1].target(), "docs/setup");
/// assert_eq!(links[1].kind(), LinkKind::Markdown);
/// ```
pub fn extract_links(content: &str) -> Vec<ExtractedLink> {
    let mut found: Vec<(usize, ExtractedLink)> = Vec::new();

    for cap in WIKI_LINK.captures_iter(content) {
        let inner = &cap[1];
        let target = inner.split('|').next().unwrap_or_default().trim();
        if target.is_empty() {
            continue;
        }
        let start = cap.get(0).map_or(0, |m| m.start());
        found.push((start, ExtractedLink::new(target, LinkKind::Wiki)));
    }

    for cap in MARKDOWN_LINK.captures_iter(content) {
        let Some(target) = markdown_target(&cap[2]) else {
            continue;
        };
        let start = cap.get(0).map_or(0, |m| m.start());
        found.push((start, ExtractedLink::new(target, LinkKind::Markdown)));
    }

    found.sort_by_key(|(start, _)| *start);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .map(|(_, link)| link)
        .filter(|link| seen.insert((link.kind, link.target.clone())))
        .collect()
}

/// Normalizes a markdown link destination, returning `None` for links that
/// are not part of the vault graph.
fn markdown_target(raw: &str) -> Option<String> {
    let target = raw.trim();

    if target.is_empty()
        || target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with('#')
    {
        return None;
    }

    let without_fragment = match target.find('#') {
        Some(pos) => &target[..pos],
        None => target,
    };
    let stripped = without_fragment
        .strip_suffix(".md")
        .unwrap_or(without_fragment)
        .trim();

    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}
