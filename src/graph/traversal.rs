//! Breadth-first traversal with depth, node and time limits.

use super::{
    GraphEdge, GraphError, GraphLimits, GraphNode, GraphRequest, GraphResponse, LinkGraph,
    LinkResolver, SNAPSHOT_NODES,
};
use crate::domain::{
    ExtractedLink, LinkKind, normalize_vault_path, parent_folder, path_without_extension,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

/// Runs a graph query against `graph`.
///
/// With a start note, traverses breadth-first up to the clamped depth,
/// following outgoing and/or incoming links. Without one, returns a
/// snapshot of the first `min(100, max_nodes)` files and the links among
/// them.
///
/// # Errors
///
/// Returns `GraphError::InvalidPath` for an unsafe start path and
/// `GraphError::NotFound` when the start note does not resolve. Limits
/// never produce an error.
#[tracing::instrument(skip(graph, request), fields(from = ?request.from, direction = %request.direction))]
pub fn traverse<G: LinkGraph + ?Sized>(
    graph: &G,
    request: &GraphRequest,
) -> Result<GraphResponse, GraphError> {
    let limits = GraphLimits::clamp(request);
    let files = graph.files()?;
    let mut walk = Walk::new(graph, &files, limits);

    match &request.from {
        None => walk.snapshot()?,
        Some(from) => {
            let from = normalize_vault_path(from)?;
            let start = walk
                .resolver
                .resolve(&from, None)
                .ok_or_else(|| GraphError::NotFound { path: from.clone() })?;
            if request.direction.includes_in() {
                walk.build_backlink_index()?;
            }
            walk.bfs(&start, request)?;
        }
    }

    if walk.truncated {
        tracing::debug!(
            nodes = walk.nodes.len(),
            processed = walk.links.len(),
            "graph traversal truncated"
        );
    }

    Ok(GraphResponse {
        nodes: walk.nodes,
        edges: walk.edges,
        truncated: walk.truncated,
        processed_files: walk.links.len(),
        total_files: files.len(),
    })
}

/// A neighbor reached from the current node, with the edge that reached it.
struct Step {
    neighbor: String,
    source: String,
    target: String,
    kind: LinkKind,
}

struct Walk<'a, G: ?Sized> {
    graph: &'a G,
    files: &'a [String],
    resolver: LinkResolver,
    limits: GraphLimits,
    started: Instant,

    /// Links read per file; also the processed-file count.
    links: HashMap<String, Vec<ExtractedLink>>,
    /// Resolved target path -> (source path, kind) for incoming lookups.
    backlinks: HashMap<String, Vec<(String, LinkKind)>>,

    node_ids: HashSet<String>,
    nodes: Vec<GraphNode>,
    edge_keys: HashSet<(String, String)>,
    edges: Vec<GraphEdge>,
    truncated: bool,
}

impl<'a, G: LinkGraph + ?Sized> Walk<'a, G> {
    fn new(graph: &'a G, files: &'a [String], limits: GraphLimits) -> Self {
        Self {
            graph,
            files,
            resolver: LinkResolver::new(files),
            limits,
            started: Instant::now(),
            links: HashMap::new(),
            backlinks: HashMap::new(),
            node_ids: HashSet::new(),
            nodes: Vec::new(),
            edge_keys: HashSet::new(),
            edges: Vec::new(),
            truncated: false,
        }
    }

    fn timed_out(&self) -> bool {
        self.started.elapsed() >= self.limits.timeout
    }

    /// Returns the links of `source` that resolve to vault files, reading
    /// the file at most once per traversal.
    fn resolved_links(&mut self, source: &str) -> Result<Vec<(String, LinkKind)>, GraphError> {
        if !self.links.contains_key(source) {
            let links = self.graph.links_from(source)?;
            self.links.insert(source.to_string(), links);
        }
        let links = self.links.get(source).map(Vec::as_slice).unwrap_or_default();
        Ok(links
            .iter()
            .filter_map(|link| {
                self.resolver
                    .resolve(link.target(), Some(source))
                    .map(|target| (target, link.kind()))
            })
            .collect())
    }

    /// Adds a node unless it is present or the node cap is reached.
    ///
    /// Returns true if the node is in the graph afterwards.
    fn add_node(&mut self, path: &str) -> Result<bool, GraphError> {
        if self.node_ids.contains(path) {
            return Ok(true);
        }
        if self.nodes.len() >= self.limits.max_nodes {
            self.truncated = true;
            return Ok(false);
        }
        self.node_ids.insert(path.to_string());
        self.nodes.push(GraphNode {
            id: path_without_extension(path).to_string(),
            title: self.graph.title(path)?,
            group: parent_folder(path).to_string(),
        });
        Ok(true)
    }

    fn add_edge(&mut self, source: &str, target: &str, kind: LinkKind) {
        let source = path_without_extension(source).to_string();
        let target = path_without_extension(target).to_string();
        if self.edge_keys.insert((source.clone(), target.clone())) {
            self.edges.push(GraphEdge {
                source,
                target,
                kind,
            });
        }
    }

    /// Reads every file's links once and indexes them by resolved target.
    fn build_backlink_index(&mut self) -> Result<(), GraphError> {
        for source in self.files {
            if self.timed_out() {
                self.truncated = true;
                break;
            }
            let resolved = self.resolved_links(source)?;
            for (target, kind) in resolved {
                self.backlinks
                    .entry(target)
                    .or_default()
                    .push((source.clone(), kind));
            }
        }
        Ok(())
    }

    fn neighbors(&mut self, path: &str, request: &GraphRequest) -> Result<Vec<Step>, GraphError> {
        let mut steps = Vec::new();

        if request.direction.includes_out() {
            for (target, kind) in self.resolved_links(path)? {
                steps.push(Step {
                    neighbor: target.clone(),
                    source: path.to_string(),
                    target,
                    kind,
                });
            }
        }

        if request.direction.includes_in()
            && let Some(sources) = self.backlinks.get(path)
        {
            for (source, kind) in sources {
                steps.push(Step {
                    neighbor: source.clone(),
                    source: source.clone(),
                    target: path.to_string(),
                    kind: *kind,
                });
            }
        }

        Ok(steps)
    }

    fn bfs(&mut self, start: &str, request: &GraphRequest) -> Result<(), GraphError> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();

        self.add_node(start)?;
        queue.push_back((start.to_string(), 0));

        while let Some((path, depth)) = queue.pop_front() {
            if self.timed_out() {
                self.truncated = true;
                break;
            }
            if !visited.insert(path.clone()) {
                continue;
            }

            if depth >= self.limits.depth {
                // Only the hard depth cap marks the result truncated
                if self.limits.depth_clamped {
                    let steps = self.neighbors(&path, request)?;
                    if steps.iter().any(|s| !self.node_ids.contains(&s.neighbor)) {
                        self.truncated = true;
                    }
                }
                continue;
            }

            let steps = self.neighbors(&path, request)?;
            for step in steps {
                if !self.add_node(&step.neighbor)? {
                    continue;
                }
                self.add_edge(&step.source, &step.target, step.kind);
                if !visited.contains(&step.neighbor) {
                    queue.push_back((step.neighbor, depth + 1));
                }
            }
        }

        Ok(())
    }

    fn snapshot(&mut self) -> Result<(), GraphError> {
        let limit = SNAPSHOT_NODES.min(self.limits.max_nodes);
        let included: Vec<String> = self.files.iter().take(limit).cloned().collect();
        if self.files.len() > limit {
            self.truncated = true;
        }

        for path in &included {
            self.add_node(path)?;
        }

        for source in &included {
            if self.timed_out() {
                self.truncated = true;
                break;
            }
            let resolved = self.resolved_links(source)?;
            for (target, kind) in resolved {
                if self.node_ids.contains(&target) {
                    self.add_edge(source, &target, kind);
                }
            }
        }

        Ok(())
    }
}
