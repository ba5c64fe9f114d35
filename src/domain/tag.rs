//! Tag extraction from note bodies and frontmatter.

use crate::domain::Frontmatter;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::LazyLock;

/// Longest inline tag token that is still treated as a tag.
pub const MAX_TAG_LEN: usize = 64;

/// `#tag` preceded by start of line or a non-tag character.
static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|[^\p{L}\p{N}_&#/-])#([\p{L}\p{N}_/-]+)").expect("inline tag regex is valid")
});

/// Bare URLs, whose `#fragment` must not be read as a tag.
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z][A-Za-z0-9+.-]*://\S+").expect("url regex is valid")
});

/// Markdown link destinations and wiki link targets, whose `#fragment`
/// points at a heading rather than naming a tag.
static LINK_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\]\([^)]*\)|\[\[[^\[\]]*\]\]").expect("link target regex is valid")
});

/// Returns the sorted, de-duplicated tags of a note.
///
/// Combines the frontmatter `tags` array with inline `#tags` found in the
/// body. The body must already have its frontmatter block removed.
///
/// # Examples
///
/// ```
/// use vaultkit::domain::{tags_from_note, Frontmatter};
///
/// let tags = tags_from_note("Use `#nottag` here but #realtag there", &Frontmatter::default());
/// assert_eq!(tags, vec!["realtag".to_string()]);
/// ```
pub fn tags_from_note(body: &str, frontmatter: &Frontmatter) -> Vec<String> {
    let mut tags: BTreeSet<String> = frontmatter
        .tags()
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    tags.extend(extract_inline_tags(body));
    tags.into_iter().collect()
}

/// Finds inline `#tags` in a Markdown body.
///
/// Code blocks, inline code spans, bare URLs and link targets are removed
/// before matching. Tag tokens consist of letters, digits, `-`,
/// `_` and `/`; purely numeric tokens (`#42`) and tokens longer than
/// [`MAX_TAG_LEN`] are ignored.
pub fn extract_inline_tags(body: &str) -> BTreeSet<String> {
    let without_code = blank_ranges(body, code_ranges(body));
    let without_urls = BARE_URL.replace_all(&without_code, " ");
    let searchable = LINK_TARGET.replace_all(&without_urls, " ");

    INLINE_TAG
        .captures_iter(&searchable)
        .filter_map(|cap| {
            let token = cap[1].trim_end_matches('/');
            let valid = !token.is_empty()
                && token.chars().count() <= MAX_TAG_LEN
                && !token.chars().all(|c| c.is_ascii_digit());
            valid.then(|| token.to_string())
        })
        .collect()
}

/// Byte ranges of code blocks and inline code spans.
fn code_ranges(body: &str) -> Vec<Range<usize>> {
    Parser::new(body)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect()
}

/// Replaces each range with a single space, keeping the rest of the text.
fn blank_ranges(text: &str, mut ranges: Vec<Range<usize>>) -> String {
    ranges.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in ranges {
        if range.start < cursor || range.end > text.len() {
            continue;
        }
        out.push_str(&text[cursor..range.start]);
        out.push(' ');
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}
