//! Builder for test notes with sensible defaults.

/// Builder for a Markdown note file.
///
/// Frontmatter is only written when a title, tag or extra field is set.
#[derive(Debug, Clone)]
pub struct TestNote {
    path: String,
    title: Option<String>,
    tags: Vec<String>,
    fields: Vec<(String, String)>,
    body: String,
}

impl TestNote {
    /// Creates a note at `path` (vault-relative, `.md` optional).
    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.ends_with(".md") {
            path.push_str(".md");
        }
        Self {
            path,
            title: None,
            tags: Vec::new(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    /// Sets the frontmatter title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds a frontmatter tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a raw frontmatter field (`key: value`).
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Sets the body content.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the vault-relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Renders the file content.
    pub fn render(&self) -> String {
        let mut yaml = String::new();
        if let Some(title) = &self.title {
            yaml.push_str(&format!("title: \"{}\"\n", title));
        }
        if !self.tags.is_empty() {
            yaml.push_str(&format!("tags: [{}]\n", self.tags.join(", ")));
        }
        for (key, value) in &self.fields {
            yaml.push_str(&format!("{}: {}\n", key, value));
        }

        if yaml.is_empty() {
            self.body.clone()
        } else {
            format!("---\n{}---\n{}", yaml, self.body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_appends_extension() {
        assert_eq!(TestNote::new("a").path(), "a.md");
        assert_eq!(TestNote::new("b.md").path(), "b.md");
    }

    #[test]
    fn test_note_without_metadata_is_body_only() {
        let note = TestNote::new("a").body("# Heading\n");
        assert_eq!(note.render(), "# Heading\n");
    }

    #[test]
    fn test_note_renders_frontmatter() {
        let note = TestNote::new("a")
            .title("Alpha")
            .tag("work")
            .tag("idea")
            .field("status", "draft")
            .body("Body\n");
        assert_eq!(
            note.render(),
            "---\ntitle: \"Alpha\"\ntags: [work, idea]\nstatus: draft\n---\nBody\n"
        );
    }
}
