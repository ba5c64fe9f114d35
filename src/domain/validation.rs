//! Traversal-safety checks for vault-relative paths.
//!
//! Every path or folder supplied by a caller passes through here before any
//! filesystem or database access happens.

use std::fmt;

/// Error returned for a path that is unsafe or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    path: String,
    reason: &'static str,
}

impl PathError {
    fn new(path: &str, reason: &'static str) -> Self {
        Self {
            path: path.to_string(),
            reason,
        }
    }

    /// Returns the offending input.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns why the path was rejected.
    pub fn reason(&self) -> &str {
        self.reason
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid path '{}': {}", self.path, self.reason)
    }
}

impl std::error::Error for PathError {}

/// Normalizes a vault-relative path.
///
/// Backslashes become `/`, leading `/` and `./` segments are dropped, and
/// repeated separators collapse. The result never starts with `/`.
///
/// # Errors
///
/// Returns `PathError` if the path is empty, contains a `..` segment, a NUL
/// byte, or a drive prefix such as `C:`.
///
/// # Examples
///
/// ```
/// use vaultkit::domain::normalize_vault_path;
///
/// assert_eq!(normalize_vault_path("/notes//a.md").unwrap(), "notes/a.md");
/// assert!(normalize_vault_path("../../etc/passwd").is_err());
/// ```
pub fn normalize_vault_path(input: &str) -> Result<String, PathError> {
    let segments = safe_segments(input)?;
    if segments.is_empty() {
        return Err(PathError::new(input, "path is empty"));
    }
    Ok(segments.join("/"))
}

/// Validates a folder filter, returning `None` for the vault root.
///
/// # Errors
///
/// Returns `PathError` under the same rules as [`normalize_vault_path`].
pub fn validate_folder(input: &str) -> Result<Option<String>, PathError> {
    let segments = safe_segments(input)?;
    if segments.is_empty() {
        Ok(None)
    } else {
        Ok(Some(segments.join("/")))
    }
}

/// Normalizes a note path and appends `.md` when it has no extension.
///
/// # Errors
///
/// Returns `PathError` under the same rules as [`normalize_vault_path`].
pub fn normalize_note_path(input: &str) -> Result<String, PathError> {
    let path = normalize_vault_path(input)?;
    if path.ends_with(".md") {
        Ok(path)
    } else {
        Ok(format!("{path}.md"))
    }
}

fn safe_segments(input: &str) -> Result<Vec<&str>, PathError> {
    if input.contains('\0') {
        return Err(PathError::new(input, "contains a NUL byte"));
    }

    let bytes = input.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return Err(PathError::new(input, "drive prefixes are not allowed"));
    }

    let mut segments = Vec::new();
    for segment in input.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => return Err(PathError::new(input, "parent traversal ('..') is not allowed")),
            s => segments.push(s),
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_separators_and_prefixes() {
        assert_eq!(normalize_vault_path("./a/./b.md").unwrap(), "a/b.md");
        assert_eq!(normalize_vault_path("a\\b.md").unwrap(), "a/b.md");
        assert_eq!(normalize_vault_path("/a//b.md").unwrap(), "a/b.md");
    }

    #[test]
    fn rejects_parent_traversal() {
        let err = normalize_vault_path("notes/../../secret.md").unwrap_err();
        assert_eq!(err.path(), "notes/../../secret.md");
        assert!(err.to_string().contains(".."));
    }

    #[test]
    fn rejects_empty_and_nul() {
        assert!(normalize_vault_path("").is_err());
        assert!(normalize_vault_path("/./").is_err());
        assert!(normalize_vault_path("a\0b").is_err());
    }

    #[test]
    fn rejects_drive_prefix() {
        assert!(normalize_vault_path("C:\\Windows\\x.md").is_err());
    }

    #[test]
    fn dotted_names_are_not_traversal() {
        assert_eq!(normalize_vault_path("v1..2/notes.md").unwrap(), "v1..2/notes.md");
    }

    #[test]
    fn folder_root_is_none() {
        assert_eq!(validate_folder("").unwrap(), None);
        assert_eq!(validate_folder("/").unwrap(), None);
        assert_eq!(validate_folder("/projects").unwrap(), Some("projects".to_string()));
        assert!(validate_folder("C:/projects").is_err());
        assert_eq!(validate_folder("projects/").unwrap(), Some("projects".to_string()));
        assert!(validate_folder("../../etc").is_err());
    }

    #[test]
    fn note_path_gets_extension() {
        assert_eq!(normalize_note_path("a/b").unwrap(), "a/b.md");
        assert_eq!(normalize_note_path("a/b.md").unwrap(), "a/b.md");
    }
}
