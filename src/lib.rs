//! vaultkit - query a folder of Markdown notes through a local SQLite cache

pub mod cli;
pub mod domain;
pub mod graph;
pub mod index;
pub mod infra;
pub mod logging;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        VaultContext, handle_backlinks, handle_frontmatter, handle_graph, handle_info,
        handle_links, handle_list, handle_new, handle_rm, handle_search, handle_show,
        handle_stats, handle_sync, handle_tagged, handle_tags,
    },
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Completions(args) = &cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "vault", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_json) {
        eprintln!("warning: logging disabled: {e}");
    }

    let config = Config::load()?;
    let root = config.vault_dir(cli.dir.as_ref(), cli.vault.as_deref())?;
    let ctx = VaultContext::new(root, config.cache_dir(cli.cache_dir.as_ref()), cli.verbose > 0);

    match &cli.command {
        Command::Sync(args) => handle_sync(args, &ctx),
        Command::List(args) => handle_list(args, &ctx),
        Command::Search(args) => handle_search(args, &ctx),
        Command::Tags(args) => handle_tags(args, &ctx),
        Command::Tagged(args) => handle_tagged(args, &ctx),
        Command::Links(args) => handle_links(args, &ctx),
        Command::Backlinks(args) => handle_backlinks(args, &ctx),
        Command::Info(args) => handle_info(args, &ctx),
        Command::Frontmatter(args) => handle_frontmatter(args, &ctx),
        Command::Stats(args) => handle_stats(args, &ctx),
        Command::Graph(args) => handle_graph(args, &ctx, &config.graph),
        Command::Show(args) => handle_show(args, &ctx),
        Command::New(args) => handle_new(args, &ctx),
        Command::Rm(args) => handle_rm(args, &ctx),
        Command::Completions(_) => Ok(()),
    }
}
