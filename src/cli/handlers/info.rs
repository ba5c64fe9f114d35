//! Info, frontmatter and stats command handlers.

use anyhow::{Context, Result};

use super::{VaultContext, short_date};
use crate::cli::output::{Output, OutputFormat};
use crate::cli::{FrontmatterArgs, NoteArgs, StatsArgs};
use crate::domain::normalize_note_path;
use crate::index::CacheQueries;

pub fn handle_info(args: &NoteArgs, ctx: &VaultContext) -> Result<()> {
    let path = normalize_note_path(&args.path)?;
    let cache = ctx.synced_cache()?;
    let info = cache
        .note_info(&path)
        .with_context(|| format!("failed to read note info for {}", args.path))?;

    match args.format {
        OutputFormat::Human => {
            let summary = &info.summary;
            println!("# {}", summary.title());
            println!();
            println!("Path: {}", summary.path());
            println!(
                "Created: {}  Modified: {}",
                short_date(summary.created()),
                short_date(summary.modified())
            );
            println!("Size: {} bytes", summary.size());
            if !info.tags.is_empty() {
                println!("Tags: {}", info.tags.join(", "));
            }
            println!("Links: {} out, {} in", info.outlinks, info.backlinks);
        }
        OutputFormat::Json => {
            println!("{}", Output::new(&info).to_json()?);
        }
        OutputFormat::Paths => {
            println!("{}", info.summary.path());
        }
    }

    Ok(())
}

pub fn handle_frontmatter(args: &FrontmatterArgs, ctx: &VaultContext) -> Result<()> {
    let path = normalize_note_path(&args.path)?;
    let cache = ctx.synced_cache()?;
    let frontmatter = cache
        .frontmatter(&path)
        .with_context(|| format!("failed to read frontmatter of {}", args.path))?;

    println!("{}", serde_json::to_string_pretty(&frontmatter)?);
    Ok(())
}

pub fn handle_stats(args: &StatsArgs, ctx: &VaultContext) -> Result<()> {
    let cache = ctx.synced_cache()?;
    let stats = cache.stats().with_context(|| "failed to read cache stats")?;

    match args.format {
        OutputFormat::Human => {
            println!("Files:      {}", stats.files);
            println!("Tags:       {}", stats.tags);
            println!("Links:      {}", stats.links);
            if let Some(path) = &stats.cache_path {
                println!("Cache:      {} ({} bytes)", path.display(), stats.cache_size);
            }
            if let Some(vault) = &stats.vault_path {
                println!("Vault:      {}", vault);
            }
            if let Some(last_sync) = &stats.last_sync {
                println!("Last sync:  {}", last_sync);
            }
        }
        OutputFormat::Json => {
            println!("{}", Output::new(&stats).to_json()?);
        }
        OutputFormat::Paths => {
            if let Some(path) = &stats.cache_path {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
