//! List command handler.

use anyhow::{Context, Result};

use super::{VaultContext, short_date, truncate_str};
use crate::cli::ListArgs;
use crate::cli::output::{Output, OutputFormat};
use crate::domain::validate_folder;
use crate::index::{CacheQueries, ListOptions, NoteSummary};

pub fn handle_list(args: &ListArgs, ctx: &VaultContext) -> Result<()> {
    let folder = args.folder.as_deref().map(validate_folder).transpose()?.flatten();
    let cache = ctx.synced_cache()?;

    let options = ListOptions {
        folder,
        limit: args.limit,
    };
    let notes = cache
        .list_notes(&options)
        .with_context(|| "failed to list notes")?;

    print_notes(&notes, args.format, "No notes found.")
}

/// Prints note summaries in the requested format.
pub(crate) fn print_notes(notes: &[NoteSummary], format: OutputFormat, empty: &str) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if notes.is_empty() {
                println!("{}", empty);
            } else {
                println!("{:<40}  {:<40}  {:>10}", "Path", "Title", "Modified");
                println!("{:<40}  {:<40}  {:>10}", "-".repeat(40), "-".repeat(40), "-".repeat(10));

                for note in notes {
                    let modified = short_date(note.modified().or(note.created()));
                    println!(
                        "{:<40}  {:<40}  {:>10}",
                        truncate_str(note.path(), 40),
                        truncate_str(note.title(), 40),
                        modified
                    );
                }

                println!();
                println!("{} note(s)", notes.len());
            }
        }
        OutputFormat::Json => {
            println!("{}", Output::new(notes).to_json()?);
        }
        OutputFormat::Paths => {
            for note in notes {
                println!("{}", note.path());
            }
        }
    }
    Ok(())
}
