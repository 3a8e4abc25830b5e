//! Node graph consumed by the pathfinder
//!
//! Nodes live in an arena indexed by id. A graph is built once (from a finished
//! maze, or by hand) and is read-only for every search run against it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::maze::{Direction, Maze2D};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub connections: Vec<NodeId>,
    pub traversable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeGraph {
    nodes: Vec<Node>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Derive the graph of a finished maze.
    ///
    /// One node per tile at its grid coordinates. An edge exists iff both tiles
    /// agree the shared wall is open and neither is a wall tile.
    pub fn from_maze(maze: &Maze2D) -> Self {
        let nodes = maze
            .tiles()
            .iter()
            .map(|tile| {
                let (x, y) = maze.coords(tile.id);
                let connections = if tile.wall {
                    Vec::new()
                } else {
                    Direction::ALL
                        .into_iter()
                        .filter(|&dir| maze.is_open(tile.id, dir))
                        .filter_map(|dir| maze.neighbor(tile.id, dir))
                        .filter(|&n| maze.tile(n).is_some_and(|t| !t.wall))
                        .collect()
                };
                Node {
                    id: tile.id,
                    x: x as f32,
                    y: y as f32,
                    connections,
                    traversable: !tile.wall,
                }
            })
            .collect();
        Self { nodes }
    }

    /// 4-connected `width x height` grid; `blocked` cells are untraversable
    /// and have no edges.
    pub fn grid(width: usize, height: usize, blocked: &[(usize, usize)]) -> Self {
        let is_blocked = |x: usize, y: usize| blocked.contains(&(x, y));
        let mut graph = Self::new();
        for y in 0..height {
            for x in 0..width {
                let id = graph.add_node(x as f32, y as f32);
                graph.nodes[id].traversable = !is_blocked(x, y);
            }
        }
        for y in 0..height {
            for x in 0..width {
                if is_blocked(x, y) {
                    continue;
                }
                let id = y * width + x;
                if x + 1 < width && !is_blocked(x + 1, y) {
                    graph.connect(id, id + 1);
                }
                if y + 1 < height && !is_blocked(x, y + 1) {
                    graph.connect(id, id + width);
                }
            }
        }
        graph
    }

    /// Append a traversable node without connections; returns its id
    pub fn add_node(&mut self, x: f32, y: f32) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            x,
            y,
            connections: Vec::new(),
            traversable: true,
        });
        id
    }

    /// Undirected edge; ignores unknown ids, self-loops and duplicates
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return;
        }
        if !self.nodes[a].connections.contains(&b) {
            self.nodes[a].connections.push(b);
        }
        if !self.nodes[b].connections.contains(&a) {
            self.nodes[b].connections.push(a);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Undirected edge count
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.connections.len()).sum::<usize>() / 2
    }

    /// Hop counts from `from` over traversable nodes (`None` = unreachable)
    pub fn bfs_distances(&self, from: NodeId) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.nodes.len()];
        match self.nodes.get(from) {
            Some(node) if node.traversable => {}
            _ => return dist,
        }

        let mut queue = VecDeque::new();
        dist[from] = Some(0);
        queue.push_back(from);
        while let Some(id) = queue.pop_front() {
            let d = dist[id].unwrap_or(0);
            for &next in &self.nodes[id].connections {
                // Dangling ids in hand-built or deserialized graphs are skipped
                let open = self.nodes.get(next).is_some_and(|n| n.traversable);
                if open && dist[next].is_none() {
                    dist[next] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    /// Sizes of the connected components of traversable nodes, largest first
    pub fn traversable_component_sizes(&self) -> Vec<usize> {
        let mut seen = vec![false; self.nodes.len()];
        let mut sizes = Vec::new();
        for start in 0..self.nodes.len() {
            if seen[start] || !self.nodes[start].traversable {
                continue;
            }
            let dist = self.bfs_distances(start);
            let mut size = 0;
            for (id, d) in dist.iter().enumerate() {
                if d.is_some() {
                    seen[id] = true;
                    size += 1;
                }
            }
            sizes.push(size);
        }
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
}
