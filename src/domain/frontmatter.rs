//! Typed view over a note's frontmatter map.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Frontmatter of a note: the known optional fields plus an open bag of
/// user-defined fields.
///
/// A known field is only lifted out of the map when it has the expected
/// shape (`title` a non-empty string, `tags` an array, `created`/`modified`
/// a string or number). Anything else stays in the extension bag untouched,
/// so [`Frontmatter::to_map`] reproduces the user's data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    title: Option<String>,
    tags: Vec<String>,
    created: Option<String>,
    modified: Option<String>,
    extra: Map<String, Value>,
}

impl Frontmatter {
    /// Builds frontmatter from a parsed key/value map.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let title = match map.get("title") {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                let t = s.trim().to_string();
                map.remove("title");
                Some(t)
            }
            _ => None,
        };

        let tags = match map.get("tags") {
            Some(Value::Array(items)) => {
                let tags = items.iter().filter_map(stringify).collect();
                map.remove("tags");
                tags
            }
            _ => Vec::new(),
        };

        let created = take_timestamp(&mut map, "created");
        let modified = take_timestamp(&mut map, "modified");

        Self {
            title,
            tags,
            created,
            modified,
            extra: map,
        }
    }

    /// Parses frontmatter previously stored with [`Frontmatter::to_json`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self::from_map(map))
    }

    /// Returns the title field, if present.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the tags listed in frontmatter.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the `created` field as written.
    pub fn created(&self) -> Option<&str> {
        self.created.as_deref()
    }

    /// Returns the `modified` field as written.
    pub fn modified(&self) -> Option<&str> {
        self.modified.as_deref()
    }

    /// Returns fields other than the known ones.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.tags.is_empty()
            && self.created.is_none()
            && self.modified.is_none()
            && self.extra.is_empty()
    }

    /// Reassembles the full key/value map.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        if let Some(title) = &self.title {
            map.insert("title".into(), Value::String(title.clone()));
        }
        if !self.tags.is_empty() {
            map.insert(
                "tags".into(),
                Value::Array(self.tags.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(created) = &self.created {
            map.insert("created".into(), Value::String(created.clone()));
        }
        if let Some(modified) = &self.modified {
            map.insert("modified".into(), Value::String(modified.clone()));
        }
        map
    }

    /// Serializes the full map as a JSON object string.
    pub fn to_json(&self) -> String {
        Value::Object(self.to_map()).to_string()
    }
}

impl Serialize for Frontmatter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_map().serialize(serializer)
    }
}

fn take_timestamp(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    let value = match map.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return None,
    };
    map.remove(key);
    Some(value)
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
