//! Search command handler.

use anyhow::{Context, Result};

use super::VaultContext;
use crate::cli::SearchArgs;
use crate::cli::output::{Output, OutputFormat};
use crate::domain::validate_folder;
use crate::index::{CacheQueries, SearchHit, SearchOptions};

pub fn handle_search(args: &SearchArgs, ctx: &VaultContext) -> Result<()> {
    let folder = args.folder.as_deref().map(validate_folder).transpose()?.flatten();
    let cache = ctx.synced_cache()?;

    let options = SearchOptions {
        folder,
        limit: args.limit,
        case_sensitive: args.case_sensitive,
    };
    let hits = cache
        .search_content(&args.query, &options)
        .with_context(|| format!("search failed for query: {}", args.query))?;

    format_search_output(&hits, args.format)
}

/// Strip highlight markers from a snippet for terminal display.
pub(crate) fn strip_highlights(s: &str) -> String {
    s.replace("**", "")
}

fn format_search_output(hits: &[SearchHit], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if hits.is_empty() {
                println!("No matching notes found.");
            } else {
                for hit in hits {
                    println!("{} {} (score: {:.2})", hit.path(), hit.title(), hit.score());
                    if !hit.snippet().is_empty() {
                        println!("  {}", strip_highlights(hit.snippet()));
                    }
                }
                println!();
                println!("{} result(s)", hits.len());
            }
        }
        OutputFormat::Json => {
            println!("{}", Output::new(hits).to_json()?);
        }
        OutputFormat::Paths => {
            for hit in hits {
                println!("{}", hit.path());
            }
        }
    }
    Ok(())
}
