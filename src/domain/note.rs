//! A parsed vault note: path, frontmatter and body.

use crate::domain::{ExtractedLink, Frontmatter, extract_links, tags_from_note};
use std::path::Path;

/// A Markdown note read from the vault.
///
/// `path` is vault-relative, uses `/` separators and includes the `.md`
/// extension. `body` is the content after the frontmatter block.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    path: String,
    frontmatter: Frontmatter,
    body: String,
}

impl Note {
    /// Creates a note from its parts.
    pub fn new(path: impl Into<String>, frontmatter: Frontmatter, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            frontmatter,
            body: body.into(),
        }
    }

    /// Returns the vault-relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the parsed frontmatter.
    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    /// Returns the body without frontmatter.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the frontmatter title, falling back to the file name
    /// without extension.
    pub fn title(&self) -> String {
        match self.frontmatter.title() {
            Some(title) => title.to_string(),
            None => file_stem(&self.path).to_string(),
        }
    }

    /// Returns the `created` frontmatter field.
    pub fn created(&self) -> Option<&str> {
        self.frontmatter.created()
    }

    /// Returns the `modified` frontmatter field.
    pub fn modified(&self) -> Option<&str> {
        self.frontmatter.modified()
    }

    /// Returns the sorted union of frontmatter and inline tags.
    pub fn tags(&self) -> Vec<String> {
        tags_from_note(&self.body, &self.frontmatter)
    }

    /// Returns links found in the body, in order of first appearance.
    pub fn links(&self) -> Vec<ExtractedLink> {
        extract_links(&self.body)
    }
}

/// Returns the file name of a vault path without its extension.
pub fn file_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}

/// Returns a vault path without its `.md` extension.
///
/// This is the id used for graph nodes and for link target matching.
pub fn path_without_extension(path: &str) -> &str {
    path.strip_suffix(".md").unwrap_or(path)
}

/// Returns the parent folder of a vault path, or `""` for the root.
pub fn parent_folder(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    }
}
