//! Graph command handler.

use anyhow::{Context, Result};

use super::VaultContext;
use crate::cli::GraphArgs;
use crate::cli::config::GraphDefaults;
use crate::cli::output::{Output, OutputFormat};
use crate::domain::normalize_vault_path;
use crate::graph::{GraphRequest, GraphResponse, LiveVault, traverse};

pub fn handle_graph(args: &GraphArgs, ctx: &VaultContext, defaults: &GraphDefaults) -> Result<()> {
    if let Some(from) = &args.from {
        normalize_vault_path(from)?;
    }

    let mut request = GraphRequest {
        from: args.from.clone(),
        depth: args.depth,
        direction: args.direction,
        max_nodes: args.max_nodes,
        timeout_ms: args.timeout_ms,
    };
    defaults.apply(&mut request);

    let response = if args.live {
        traverse(&LiveVault::new(ctx.root()), &request)
    } else {
        let cache = ctx.synced_cache()?;
        traverse(&cache, &request)
    }
    .with_context(|| "graph query failed")?;

    match args.format {
        OutputFormat::Human => print_graph(&response),
        OutputFormat::Json => println!("{}", Output::new(&response).to_json()?),
        OutputFormat::Paths => {
            for node in &response.nodes {
                println!("{}.md", node.id);
            }
        }
    }

    Ok(())
}

fn print_graph(response: &GraphResponse) {
    if response.nodes.is_empty() {
        println!("No notes found.");
        return;
    }

    for node in &response.nodes {
        println!("{}  ({})", node.id, node.title);
        for edge in response.edges.iter().filter(|e| e.source == node.id) {
            println!("  -> {} [{}]", edge.target, edge.kind);
        }
    }

    println!();
    println!(
        "{} node(s), {} edge(s), {} of {} file(s) read",
        response.nodes.len(),
        response.edges.len(),
        response.processed_files,
        response.total_files
    );
    if response.truncated {
        println!("(truncated: a limit was reached)");
    }
}
