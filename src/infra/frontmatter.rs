//! Frontmatter splitting and parsing for Markdown notes.
//!
//! Parsing never fails: a missing, unterminated or malformed YAML block
//! yields empty frontmatter.

use crate::domain::Frontmatter;
use serde_json::{Map, Value};

/// Result of splitting a note into frontmatter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Parses markdown content with an optional YAML frontmatter block.
///
/// # Format
/// ```text
/// ---
/// title: Note Title
/// tags: [a, b]
/// ---
/// Body content here...
/// ```
///
/// `body` is everything after the closing delimiter, or the whole input if
/// there is no complete block. Invalid YAML, or YAML that is not a mapping,
/// produces empty frontmatter while still dropping the block from the body.
pub fn parse(content: &str) -> ParsedDocument {
    match split(content) {
        Some((yaml, body)) => ParsedDocument {
            frontmatter: Frontmatter::from_map(parse_yaml_map(yaml)),
            body: body.to_string(),
        },
        None => ParsedDocument {
            frontmatter: Frontmatter::default(),
            body: content.to_string(),
        },
    }
}

/// Splits content into `(yaml, body)` when it starts with a complete
/// `---` block.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let after_opening = if content.starts_with("---\r\n") {
        5
    } else if content.starts_with("---\n") {
        4
    } else {
        return None;
    };

    let yaml_and_rest = &content[after_opening..];
    let closing_pos = find_closing_delimiter(yaml_and_rest)?;
    let yaml = &yaml_and_rest[..closing_pos];

    let after_closing = &yaml_and_rest[closing_pos..];
    let body = if let Some(rest) = after_closing.strip_prefix("---\r\n") {
        rest
    } else if let Some(rest) = after_closing.strip_prefix("---\n") {
        rest
    } else {
        &after_closing[3..]
    };

    Some((yaml, body))
}

/// Renders frontmatter and body back into a Markdown document.
///
/// Empty frontmatter produces just the body.
pub fn render(frontmatter: &Frontmatter, body: &str) -> Result<String, serde_yaml::Error> {
    if frontmatter.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(&frontmatter.to_map())?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}

fn parse_yaml_map(yaml: &str) -> Map<String, Value> {
    let value: serde_yaml::Value = match serde_yaml::from_str(yaml) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring invalid frontmatter YAML");
            return Map::new();
        }
    };

    match serde_json::to_value(&value) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => {
            tracing::debug!(error = %e, "frontmatter is not representable as JSON");
            Map::new()
        }
    }
}

/// Finds the position of the closing `---` delimiter.
///
/// The closing delimiter must:
/// - Appear at the start of a line
/// - Be exactly `---` followed by newline or EOF
fn find_closing_delimiter(content: &str) -> Option<usize> {
    let mut pos = 0;
    let bytes = content.as_bytes();

    while pos < bytes.len() {
        if bytes[pos..].starts_with(b"---") {
            let after = pos + 3;
            if after >= bytes.len()
                || bytes[after] == b'\n'
                || (bytes[after] == b'\r' && after + 1 < bytes.len() && bytes[after + 1] == b'\n')
            {
                return Some(pos);
            }
        }

        match content[pos..].find('\n') {
            Some(newline_offset) => pos += newline_offset + 1,
            None => break,
        }
    }

    None
}
