use crate::{KiloVoltAmperes, NetNode, SectionId};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Walk direction relative to the feeder source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward the source
    Upstream,
    /// Toward the loads
    Downstream,
}

impl Direction {
    fn graph_direction(self) -> petgraph::Direction {
        match self {
            Direction::Upstream => petgraph::Direction::Incoming,
            Direction::Downstream => petgraph::Direction::Outgoing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Upstream => "upstream",
            Direction::Downstream => "downstream",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lazy depth-first walk over sections in one direction.
///
/// Yields `(section, depth)` where depth counts hops from the start node (the
/// first section is depth 1). Sections leaving a node come out in declaration
/// order. A node is expanded again only when it is reached at a strictly
/// smaller depth, so a meshed lateral can re-converge at a shallower depth
/// later in the walk while the walk itself stays finite.
pub struct DirectionalWalk<'a> {
    graph: &'a DiGraph<NetNode, SectionId>,
    direction: Direction,
    stack: Vec<(EdgeIndex, usize)>,
    best_depth: HashMap<NodeIndex, usize>,
}

impl<'a> DirectionalWalk<'a> {
    pub fn new(graph: &'a DiGraph<NetNode, SectionId>, start: NodeIndex, direction: Direction) -> Self {
        let mut walk = Self {
            graph,
            direction,
            stack: Vec::new(),
            best_depth: HashMap::new(),
        };
        walk.best_depth.insert(start, 0);
        walk.push_frontier(start, 0);
        walk
    }

    fn push_frontier(&mut self, node: NodeIndex, depth: usize) {
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(node, self.direction.graph_direction())
            .map(|edge| edge.id())
            .collect();
        // petgraph hands out adjacency newest-first
        edges.sort_unstable();
        for edge in edges.into_iter().rev() {
            self.stack.push((edge, depth + 1));
        }
    }

    fn far_end(&self, edge: EdgeIndex) -> Option<NodeIndex> {
        let (source, target) = self.graph.edge_endpoints(edge)?;
        Some(match self.direction {
            Direction::Upstream => source,
            Direction::Downstream => target,
        })
    }
}

impl Iterator for DirectionalWalk<'_> {
    type Item = (SectionId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (edge, depth) = self.stack.pop()?;
        if let Some(next) = self.far_end(edge) {
            let improves = self
                .best_depth
                .get(&next)
                .map_or(true, |&seen| depth < seen);
            if improves {
                self.best_depth.insert(next, depth);
                self.push_frontier(next, depth);
            }
        }
        Some((self.graph[edge].clone(), depth))
    }
}

/// Aggregate downstream load for every section: the spot loads of all nodes
/// reachable from the section's to-node, each node counted once.
pub fn aggregate_downstream_loads(
    graph: &DiGraph<NetNode, SectionId>,
) -> HashMap<EdgeIndex, KiloVoltAmperes> {
    let mut loads = HashMap::with_capacity(graph.edge_count());
    for edge in graph.edge_references() {
        let mut total = KiloVoltAmperes(0.0);
        let mut dfs = Dfs::new(graph, edge.target());
        while let Some(node) = dfs.next(graph) {
            total = total + graph[node].load;
        }
        loads.insert(edge.id(), total);
    }
    loads
}
