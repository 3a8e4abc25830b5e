//! Aldous-Broder random-walk maze generation
//!
//! Walk the grid at random; whenever the walk steps into a cell it has never
//! seen, carve the wall it came through. Produces a uniform spanning tree. The
//! cover time of a random walk makes the iteration count unbounded in the worst
//! case and roughly quadratic in the cell count on average.

use super::grid::{Direction, Maze2D};
use crate::error::Result;
use crate::rng::RandomSource;
use crate::step::{StepResult, Steppable};

pub struct AldousBroder<R: RandomSource> {
    maze: Maze2D,
    rng: R,
    visited: Vec<bool>,
    visited_count: usize,
    current: usize,
    iterations: u64,
}

impl<R: RandomSource> AldousBroder<R> {
    pub fn new(width: usize, height: usize, mut rng: R) -> Result<Self> {
        let maze = Maze2D::walled(width, height)?;
        let mut visited = vec![false; maze.len()];
        let current = rng.pick(maze.len());
        visited[current] = true;

        Ok(Self {
            maze,
            rng,
            visited,
            visited_count: 1,
            current,
            iterations: 0,
        })
    }

    pub fn maze(&self) -> &Maze2D {
        &self.maze
    }

    pub fn into_maze(self) -> Maze2D {
        self.maze
    }

    pub fn visited_count(&self) -> usize {
        self.visited_count
    }
}

impl<R: RandomSource> Steppable for AldousBroder<R> {
    type State = Maze2D;

    fn step(&mut self) -> StepResult {
        if self.is_done() {
            return StepResult::Done;
        }
        self.iterations += 1;

        let dir = Direction::ALL[self.rng.pick(Direction::ALL.len())];
        // Off-grid moves are spent iterations that go nowhere
        if let Some(next) = self.maze.neighbor(self.current, dir) {
            if !self.visited[next] {
                self.maze.open_wall(self.current, dir);
                self.visited[next] = true;
                self.visited_count += 1;
            }
            self.current = next;
        }

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
        self.visited_count == self.maze.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use crate::step::run_to_completion;

    #[test]
    fn test_ten_by_ten_is_perfect() {
        let mut walker = AldousBroder::new(10, 10, SeededRng::new(2024)).unwrap();
        run_to_completion(&mut walker);

        assert_eq!(walker.visited_count(), 100);
        assert_eq!(walker.maze().open_edge_count(), 99);
        assert!(walker.maze().is_consistent());
        // A random walk needs at least one move per new cell
        assert!(walker.iterations() >= 99);
    }

    #[test]
    fn test_single_cell_is_done_immediately() {
        let mut walker = AldousBroder::new(1, 1, SeededRng::new(1)).unwrap();
        assert!(walker.is_done());
        assert_eq!(walker.step(), StepResult::Done);
        assert_eq!(walker.iterations(), 0);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut walker = AldousBroder::new(4, 3, SeededRng::new(9)).unwrap();
        while walker.step() == StepResult::Continue {
            assert!(walker.cursor().unwrap() < 12);
        }
    }
}
