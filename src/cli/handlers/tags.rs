//! Tag command handlers.

use anyhow::{Context, Result};

use super::VaultContext;
use super::list::print_notes;
use crate::cli::output::{Output, OutputFormat};
use crate::cli::{TaggedArgs, TagsArgs};
use crate::index::{CacheQueries, TagQuery};

pub fn handle_tags(args: &TagsArgs, ctx: &VaultContext) -> Result<()> {
    let cache = ctx.synced_cache()?;
    let tags = cache.all_tags().with_context(|| "failed to list tags")?;

    match args.format {
        OutputFormat::Human => {
            if tags.is_empty() {
                println!("No tags found.");
            } else {
                for t in &tags {
                    println!("{} ({})", t.tag, t.count);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", Output::new(&tags).to_json()?);
        }
        OutputFormat::Paths => {
            for t in &tags {
                println!("{}", t.tag);
            }
        }
    }

    Ok(())
}

pub fn handle_tagged(args: &TaggedArgs, ctx: &VaultContext) -> Result<()> {
    let cache = ctx.synced_cache()?;

    let query = TagQuery {
        exact: args.exact,
        limit: args.limit,
    };
    let notes = cache
        .notes_by_tag(&args.tag, &query)
        .with_context(|| format!("failed to list notes tagged: {}", args.tag))?;

    print_notes(&notes, args.format, "No notes with that tag.")
}
