//! Randomized Prim's maze generation
//!
//! Grow a tree from one random cell. The frontier holds every unvisited cell
//! touching the tree; each iteration connects one random frontier cell to a
//! random visited neighbour. Exactly one iteration per cell after the first.

use super::grid::Maze2D;
use crate::error::Result;
use crate::rng::RandomSource;
use crate::step::{StepResult, Steppable};

pub struct Prim<R: RandomSource> {
    maze: Maze2D,
    rng: R,
    visited: Vec<bool>,
    /// Unvisited cells adjacent to the tree
    frontier: Vec<usize>,
    in_frontier: Vec<bool>,
    current: usize,
    iterations: u64,
}

impl<R: RandomSource> Prim<R> {
    pub fn new(width: usize, height: usize, mut rng: R) -> Result<Self> {
        let maze = Maze2D::walled(width, height)?;
        let start = rng.pick(maze.len());
        let len = maze.len();

        let mut prim = Self {
            maze,
            rng,
            visited: vec![false; len],
            frontier: Vec::new(),
            in_frontier: vec![false; len],
            current: start,
            iterations: 0,
        };
        prim.visit(start);
        Ok(prim)
    }

    pub fn maze(&self) -> &Maze2D {
        &self.maze
    }

    pub fn into_maze(self) -> Maze2D {
        self.maze
    }

    pub fn frontier(&self) -> &[usize] {
        &self.frontier
    }

    /// Mark visited and push its unvisited neighbours onto the frontier
    fn visit(&mut self, cell: usize) {
        self.visited[cell] = true;
        if self.in_frontier[cell] {
            self.in_frontier[cell] = false;
            self.frontier.retain(|&c| c != cell);
        }

        let fresh: Vec<usize> = self
            .maze
            .neighbors(cell)
            .map(|(_, n)| n)
            .filter(|&n| !self.visited[n] && !self.in_frontier[n])
            .collect();
        for n in fresh {
            self.in_frontier[n] = true;
            self.frontier.push(n);
        }
    }
}

impl<R: RandomSource> Steppable for Prim<R> {
    type State = Maze2D;

    fn step(&mut self) -> StepResult {
        if self.is_done() {
            return StepResult::Done;
        }
        self.iterations += 1;

        let cell = self.frontier[self.rng.pick(self.frontier.len())];
        let visited_neighbors: Vec<usize> = self
            .maze
            .neighbors(cell)
            .map(|(_, n)| n)
            .filter(|&n| self.visited[n])
            .collect();

        // Frontier cells always touch the tree
        if !visited_neighbors.is_empty() {
            let from = visited_neighbors[self.rng.pick(visited_neighbors.len())];
            self.maze.open_between(from, cell);
        } else {
            log::warn!("Frontier cell {} has no visited neighbour", cell);
        }

        self.visit(cell);
        self.current = cell;

        if self.is_done() {
            StepResult::Done
        } else {
            StepResult::Continue
        }
    }

    fn state(&self) -> &Maze2D {
        &self.maze
    }

    fn cursor(&self) -> Option<usize> {
        Some(self.current)
    }

    fn iterations(&self) -> u64 {
        self.iterations
    }

    fn is_done(&self) -> bool {
        self.frontier.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use crate::step::run_to_completion;

    #[test]
    fn test_prim_is_perfect() {
        let mut prim = Prim::new(12, 7, SeededRng::new(77)).unwrap();
        run_to_completion(&mut prim);

        assert_eq!(prim.maze().open_edge_count(), 12 * 7 - 1);
        assert!(prim.maze().is_consistent());
        // One iteration per cell beyond the starting one
        assert_eq!(prim.iterations(), 12 * 7 - 1);
    }

    #[test]
    fn test_frontier_never_holds_visited_or_duplicates() {
        let mut prim = Prim::new(6, 6, SeededRng::new(3)).unwrap();
        loop {
            let mut seen = std::collections::HashSet::new();
            for &c in prim.frontier() {
                assert!(!prim.visited[c]);
                assert!(seen.insert(c));
            }
            if prim.step() == StepResult::Done {
                break;
            }
        }
    }

    #[test]
    fn test_single_row() {
        let mut prim = Prim::new(5, 1, SeededRng::new(5)).unwrap();
        run_to_completion(&mut prim);
        assert_eq!(prim.maze().open_edge_count(), 4);
    }
}
