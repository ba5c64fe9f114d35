//! Link command handlers.

use anyhow::{Context, Result};

use super::VaultContext;
use crate::cli::NoteArgs;
use crate::cli::output::{Output, OutputFormat};
use crate::domain::normalize_note_path;
use crate::index::CacheQueries;

pub fn handle_links(args: &NoteArgs, ctx: &VaultContext) -> Result<()> {
    let path = normalize_note_path(&args.path)?;
    let cache = ctx.synced_cache()?;
    let links = cache
        .outlinks(&path)
        .with_context(|| format!("failed to read links of {}", args.path))?;

    match args.format {
        OutputFormat::Human => {
            if links.is_empty() {
                println!("No links found.");
            } else {
                for link in &links {
                    println!("{:<10}  {}", link.kind.as_str(), link.target);
                }
                println!();
                println!("{} link(s)", links.len());
            }
        }
        OutputFormat::Json => {
            println!("{}", Output::new(&links).to_json()?);
        }
        OutputFormat::Paths => {
            for link in &links {
                println!("{}", link.target);
            }
        }
    }

    Ok(())
}

pub fn handle_backlinks(args: &NoteArgs, ctx: &VaultContext) -> Result<()> {
    let path = normalize_note_path(&args.path)?;
    let cache = ctx.synced_cache()?;
    let backlinks = cache
        .backlinks(&path)
        .with_context(|| format!("failed to query backlinks of {}", args.path))?;

    match args.format {
        OutputFormat::Human => {
            if backlinks.is_empty() {
                println!("No backlinks found.");
            } else {
                for link in &backlinks {
                    println!("{:<10}  {}", link.kind.as_str(), link.source);
                }
                println!();
                println!("{} backlink(s)", backlinks.len());
            }
        }
        OutputFormat::Json => {
            println!("{}", Output::new(&backlinks).to_json()?);
        }
        OutputFormat::Paths => {
            for link in &backlinks {
                println!("{}", link.source);
            }
        }
    }

    Ok(())
}
