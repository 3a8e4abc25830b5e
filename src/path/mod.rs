//! A* pathfinding over a [`NodeGraph`]
//!
//! Paths include both endpoints. Navigating from a node to itself gives a
//! one-element path; an unreachable goal gives an empty one.

pub mod astar;
pub mod heuristic;

pub use astar::{AStar, ClosedEntry, OpenEntry, PathState, SearchStatus};
pub use heuristic::Heuristic;

use crate::error::Result;
use crate::graph::{NodeGraph, NodeId};
use crate::step::run_to_completion;

/// Run A* to completion
pub fn navigate(from: NodeId, to: NodeId, graph: &NodeGraph, heuristic: Heuristic) -> Vec<NodeId> {
    let mut search = AStar::new(graph, from, to, heuristic);
    run_to_completion(&mut search);
    let path = search.path();
    log::debug!(
        "A* ({}) {} -> {}: {} nodes, status {:?}",
        heuristic.as_str(),
        from,
        to,
        path.len(),
        search.status()
    );
    path
}

/// [`navigate`] with the heuristic looked up by name
pub fn navigate_by_name(from: NodeId, to: NodeId, graph: &NodeGraph, heuristic: &str) -> Result<Vec<NodeId>> {
    let heuristic = Heuristic::parse(heuristic)?;
    Ok(navigate(from, to, graph, heuristic))
}

/// Number of edges along a path
pub fn path_length(path: &[NodeId]) -> usize {
    path.len().saturating_sub(1)
}
