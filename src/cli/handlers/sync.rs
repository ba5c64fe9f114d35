//! Sync command handler.

use anyhow::{Context, Result};

use super::{ConsoleReporter, VaultContext};
use crate::cli::SyncArgs;
use crate::cli::output::{Output, OutputFormat};
use crate::index::{NoopReporter, ProgressReporter, SyncEngine, SyncStats, VaultCache};

pub fn handle_sync(args: &SyncArgs, ctx: &VaultContext) -> Result<()> {
    let mut cache = ctx.open_cache()?;
    let engine = SyncEngine::new(ctx.root().to_path_buf());

    match args.format {
        OutputFormat::Json => {
            let stats = run(&engine, &mut cache, args.full, &mut NoopReporter)?;
            println!("{}", Output::new(&stats).to_json()?);
        }
        OutputFormat::Human | OutputFormat::Paths => {
            if args.full {
                println!("Rebuilding cache...");
            }
            let mut reporter = ConsoleReporter::new(ctx.verbose());
            run(&engine, &mut cache, args.full, &mut reporter)?;
        }
    }

    Ok(())
}

fn run<P: ProgressReporter>(
    engine: &SyncEngine,
    cache: &mut VaultCache,
    full: bool,
    reporter: &mut P,
) -> Result<SyncStats> {
    if full {
        engine
            .full_resync_with_progress(cache, reporter)
            .with_context(|| "failed to rebuild cache")
    } else {
        engine
            .sync_with_progress(cache, reporter)
            .with_context(|| "failed to sync cache")
    }
}
