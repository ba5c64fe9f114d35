//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::graph::Direction;
use output::OutputFormat;

/// vault - query a folder of Markdown notes through a local cache
#[derive(Parser, Debug)]
#[command(name = "vault", version, about, long_about = None)]
pub struct Cli {
    /// Vault directory (overrides config file and --vault)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Use a named vault from config
    #[arg(long, global = true)]
    pub vault: Option<String>,

    /// Directory holding cache databases
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bring the cache up to date with the vault
    Sync(SyncArgs),

    /// List notes, most recently modified first
    #[command(name = "ls")]
    List(ListArgs),

    /// Full-text search across notes
    Search(SearchArgs),

    /// List all tags with note counts
    Tags(TagsArgs),

    /// List notes carrying a tag
    Tagged(TaggedArgs),

    /// Show the links written in a note
    Links(NoteArgs),

    /// Show notes that link to a given note
    Backlinks(NoteArgs),

    /// Show a note's record, tags and link counts
    Info(NoteArgs),

    /// Print a note's frontmatter as JSON
    Frontmatter(FrontmatterArgs),

    /// Show cache statistics
    Stats(StatsArgs),

    /// Explore the link graph around a note
    Graph(GraphArgs),

    /// Print a note's raw contents
    Show(ShowArgs),

    /// Create a new note
    New(NewArgs),

    /// Delete a note
    Rm(RmArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `sync` command
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// Clear the cache and re-index every file
    #[arg(long)]
    pub full: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only notes under this folder
    #[arg(long)]
    pub folder: Option<String>,

    /// Maximum number of notes
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Restrict search to a folder
    #[arg(long)]
    pub folder: Option<String>,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only keep hits containing a term with exact case
    #[arg(short = 'c', long)]
    pub case_sensitive: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tags` command
#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tagged` command
#[derive(Parser, Debug)]
pub struct TaggedArgs {
    /// Tag to look up (a leading # is ignored)
    pub tag: String,

    /// Match the tag exactly instead of as a substring
    #[arg(long)]
    pub exact: bool,

    /// Maximum number of notes
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for commands that take a single note
#[derive(Parser, Debug)]
pub struct NoteArgs {
    /// Vault-relative note path (.md optional)
    pub path: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `frontmatter` command
#[derive(Parser, Debug)]
pub struct FrontmatterArgs {
    /// Vault-relative note path (.md optional)
    pub path: String,
}

/// Arguments for the `stats` command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `graph` command
#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Start note; omit for a whole-vault snapshot
    #[arg(long)]
    pub from: Option<String>,

    /// Link hops to follow (capped at 5)
    #[arg(long)]
    pub depth: Option<usize>,

    /// Links to follow: in, out or both
    #[arg(long, default_value_t = Direction::Both)]
    pub direction: Direction,

    /// Maximum nodes in the answer (capped at 1000)
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Time budget in milliseconds (capped at 10000)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Read files from disk instead of the cache
    #[arg(long)]
    pub live: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Vault-relative note path (.md optional)
    pub path: String,
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Vault-relative path of the new note (.md optional)
    pub path: String,

    /// Title written to the frontmatter
    #[arg(short, long)]
    pub title: Option<String>,

    /// Tag written to the frontmatter (can be specified multiple times)
    #[arg(long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Initial body text
    #[arg(short, long)]
    pub body: Option<String>,

    /// Overwrite an existing note
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Vault-relative note path (.md optional)
    pub path: String,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
