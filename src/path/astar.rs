//! A* search as a step machine
//!
//! Unit edge costs: `g` counts hops. The open list is kept sorted by `f`
//! ascending; equal `f` values stay in insertion order, so a new entry goes
//! after every existing entry with the same `f`.
//!
//! A neighbour that is already open keeps the `g` it was first discovered
//! with, even if a later expansion reaches it in fewer hops. With a consistent
//! heuristic on a grid this rarely matters, but the result is not guaranteed
//! optimal outside trees or the zero heuristic.

use std::collections::HashMap;

use serde::Serialize;

use super::heuristic::Heuristic;
use crate::graph::{NodeGraph, NodeId};
use crate::step::{StepResult, Steppable};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpenEntry {
    pub id: NodeId,
    pub g: u32,
    pub f: f32,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClosedEntry {
    pub id: NodeId,
    /// `None` only for the start node
    pub parent: Option<NodeId>,
}

/// Working set of a search, exposed to observers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathState {
    pub open: Vec<OpenEntry>,
    pub closed: Vec<ClosedEntry>,
    pub current: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    Searching,
    Found,
    NoPath,
}

pub struct AStar<'g> {
    graph: &'g NodeGraph,
    start: NodeId,
    goal: NodeId,
    heuristic: Heuristic,
    state: PathState,
    /// Position of each closed node in `state.closed`
    closed_index: HashMap<NodeId, usize>,
    status: SearchStatus,
    iterations: u64,
}

impl<'g> AStar<'g> {
    pub fn new(graph: &'g NodeGraph, start: NodeId, goal: NodeId, heuristic: Heuristic) -> Self {
        let mut search = Self {
            graph,
            start,
            goal,
            heuristic,
            state: PathState::default(),
            closed_index: HashMap::new(),
            status: SearchStatus::Searching,
            iterations: 0,
        };

        let endpoints_ok = [start, goal]
            .iter()
            .all(|&id| graph.node(id).is_some_and(|n| n.traversable));
        if endpoints_ok {
            let f = search.estimate(start);
            search.state.open.push(OpenEntry {
                id: start,
                g: 0,
                f,
                parent: None,
            });
        } else {
            log::debug!("A* endpoints {} -> {} missing or blocked", start, goal);
            search.status = SearchStatus::NoPath;
        }
        search
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    fn estimate(&self, id: NodeId) -> f32 {
        match (self.graph.node(id), self.graph.node(self.goal)) {
            (Some(a), Some(b)) => self.heuristic.estimate(a, b),
            _ => 0.0,
        }
    }

    fn is_open(&self, id: NodeId) -> bool {
        self.state.open.iter().any(|e| e.id == id)
    }

    /// Insert keeping ascending `f`, FIFO among equals
    fn push_open(&mut self, entry: OpenEntry) {
        let at = self
            .state
            .open
            .iter()
            .position(|e| e.f > entry.f)
            .unwrap_or(self.state.open.len());
        self.state.open.insert(at, entry);
    }

    /// Node ids from start to goal inclusive; empty unless the goal was reached
    pub fn path(&self) -> Vec<NodeId> {
        if self.status != SearchStatus::Found {
            return Vec::new();
        }
        let mut path = Vec::new();
        let mut cursor = self.state.closed.last().copied();
        while let Some(entry) = cursor {
            path.push(entry.id);
            if entry.id == self.start {
                break;
            }
            cursor = entry
                .parent
                .and_then(|p| self.closed_index.get(&p))
                .map(|&i| self.state.closed[i]);
        }
        path.reverse();
        path
    }
}

impl Steppable for AStar<'_> {
    type State = PathState;

    fn step(&mut self) -> StepResult {
        if self.status != SearchStatus::Searching {
            return StepResult::Done;
        }
        if self.state.open.is_empty() {
            self.status = SearchStatus::NoPath;
            return StepResult::Done;
        }
        self.iterations += 1;

        let current = self.state.open.remove(0);
        self.closed_index.insert(current.id, self.state.closed.len());
        self.state.closed.push(ClosedEntry {
            id: current.id,
            parent: current.parent,
        });
        self.state.current = Some(current.id);

        if current.id == self.goal {
            self.status = SearchStatus::Found;
            return StepResult::Done;
        }

        let graph = self.graph;
        let Some(node) = graph.node(current.id) else {
            return StepResult::Continue;
        };
        for &next in &node.connections {
            let traversable = graph.node(next).is_some_and(|n| n.traversable);
            if !traversable || self.closed_index.contains_key(&next) || self.is_open(next) {
                continue;
            }
            let g = current.g + 1;
            let f = g as f32 + self.estimate(next);
            self.push_open(OpenEntry {
                id: next,
                g,
                f,
                parent: Some(current.id),
            });
        }

        if self.state.open.is_empty() {
            self.status = SearchStatus::NoPath;
            StepResult::Done
        } else {
            StepResult::Continue
        }
    }

    fn state(&self) -> &PathState {
        &self.state
    }

    fn cursor(&self) -> Option<usize> {
        self.state.current
    }

    fn iterations(&self) -> u64 {
        self.iterations
    }

    fn is_done(&self) -> bool {
        self.status != SearchStatus::Searching
    }
}
