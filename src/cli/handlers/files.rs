//! File-mode handlers: show, new and rm.

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Map, Value};

use super::VaultContext;
use crate::cli::{NewArgs, RmArgs, ShowArgs};
use crate::domain::Frontmatter;
use crate::infra::{create_note_file, delete_note_file, frontmatter, read_note_file, write_note_file};

pub fn handle_show(args: &ShowArgs, ctx: &VaultContext) -> Result<()> {
    let content = read_note_file(ctx.root(), &args.path)
        .with_context(|| format!("failed to read note: {}", args.path))?;
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub fn handle_new(args: &NewArgs, ctx: &VaultContext) -> Result<()> {
    let content = new_note_content(args.title.as_deref(), &args.tags, args.body.as_deref())?;

    let path = if args.force {
        write_note_file(ctx.root(), &args.path, &content)
    } else {
        create_note_file(ctx.root(), &args.path, &content)
    }
    .with_context(|| format!("failed to create note: {}", args.path))?;

    println!("Created {}", path);
    Ok(())
}

pub fn handle_rm(args: &RmArgs, ctx: &VaultContext) -> Result<()> {
    let path = delete_note_file(ctx.root(), &args.path)
        .with_context(|| format!("failed to delete note: {}", args.path))?;
    println!("Deleted {}", path);
    Ok(())
}

/// Builds the document for a new note.
///
/// Frontmatter is written only when a title or tags are given, and then
/// carries a `created` timestamp.
pub fn new_note_content(title: Option<&str>, tags: &[String], body: Option<&str>) -> Result<String> {
    let mut map = Map::new();
    if let Some(title) = title {
        map.insert("title".into(), Value::String(title.to_string()));
    }
    if !tags.is_empty() {
        let tags = tags
            .iter()
            .map(|t| Value::String(t.trim_start_matches('#').to_string()))
            .collect();
        map.insert("tags".into(), Value::Array(tags));
    }
    if !map.is_empty() {
        map.insert("created".into(), Value::String(Utc::now().to_rfc3339()));
    }

    let mut body = body.unwrap_or_default().to_string();
    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }

    frontmatter::render(&Frontmatter::from_map(map), &body)
        .with_context(|| "failed to render frontmatter")
}
