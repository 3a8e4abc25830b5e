//! Tile grid model shared by the maze generators
//!
//! Tiles are stored row-major in a single arena (`tiles[y * width + x]`) and
//! addressed by id. Every wall is recorded twice, once on each side; the
//! generators only ever open walls through [`Maze2D::open_wall`], which updates
//! both tiles together.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// Orthogonal direction on the grid (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Top,
        Direction::Bottom,
    ];

    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Top => (0, -1),
            Direction::Bottom => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
        }
    }
}

/// Per-side passability of a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passable {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Passable {
    pub fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Top => self.top,
            Direction::Bottom => self.bottom,
        }
    }

    pub fn set(&mut self, dir: Direction, open: bool) {
        match dir {
            Direction::Left => self.left = open,
            Direction::Right => self.right = open,
            Direction::Top => self.top = open,
            Direction::Bottom => self.bottom = open,
        }
    }

    pub fn open_count(&self) -> usize {
        Direction::ALL.iter().filter(|&&d| self.get(d)).count()
    }
}

/// A single maze cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: usize,
    pub passable: Passable,
    /// Traversal speed multiplier (informational; search treats every edge as cost 1)
    pub speed: f32,
    /// Solid tile inserted by post-processing (thickened mazes)
    pub wall: bool,
}

impl Tile {
    pub fn walled(id: usize) -> Self {
        Self {
            id,
            passable: Passable::default(),
            speed: 1.0,
            wall: false,
        }
    }
}

/// Rectangular maze of tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMaze2D")]
pub struct Maze2D {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

/// Unchecked wire form of [`Maze2D`]
#[derive(Deserialize)]
struct RawMaze2D {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TryFrom<RawMaze2D> for Maze2D {
    type Error = LabError;

    fn try_from(raw: RawMaze2D) -> Result<Self> {
        let RawMaze2D { width, height, tiles } = raw;
        if width == 0 || height == 0 {
            return Err(LabError::InvalidDimensions { width, height });
        }
        let expected = width.checked_mul(height).ok_or(LabError::InvalidDimensions { width, height })?;
        if tiles.len() != expected {
            return Err(LabError::InvalidParameter(format!(
                "{}x{} maze needs {} tiles, got {}",
                width,
                height,
                expected,
                tiles.len()
            )));
        }
        if let Some((index, tile)) = tiles.iter().enumerate().find(|(i, t)| t.id != *i) {
            return Err(LabError::InvalidParameter(format!("tile {} stored at index {}", tile.id, index)));
        }
        Ok(Self { width, height, tiles })
    }
}

impl Maze2D {
    /// Fresh maze with every wall closed
    pub fn walled(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LabError::InvalidDimensions { width, height });
        }
        let tiles = (0..width * height).map(Tile::walled).collect();
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn coords(&self, id: usize) -> (usize, usize) {
        (id % self.width, id / self.width)
    }

    pub fn tile(&self, id: usize) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Option<&Tile> {
        self.index(x, y).and_then(|id| self.tiles.get(id))
    }

    /// Neighbouring tile id, or `None` past the border
    pub fn neighbor(&self, id: usize, dir: Direction) -> Option<usize> {
        if id >= self.tiles.len() {
            return None;
        }
        let (x, y) = self.coords(id);
        let (dx, dy) = dir.offset();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.index(nx, ny)
    }

    /// All in-bounds neighbours with the direction leading to them
    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = (Direction, usize)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(id, dir).map(|n| (dir, n)))
    }

    /// Open the wall between `id` and its neighbour in `dir` on both tiles.
    /// Returns the neighbour id, or `None` (and changes nothing) past the border.
    pub fn open_wall(&mut self, id: usize, dir: Direction) -> Option<usize> {
        let other = self.neighbor(id, dir)?;
        self.tiles[id].passable.set(dir, true);
        self.tiles[other].passable.set(dir.opposite(), true);
        Some(other)
    }

    /// Open the wall between two adjacent tiles
    pub fn open_between(&mut self, a: usize, b: usize) -> bool {
        match self.direction_to(a, b) {
            Some(dir) => self.open_wall(a, dir).is_some(),
            None => false,
        }
    }

    /// Direction from `a` to an adjacent `b`
    pub fn direction_to(&self, a: usize, b: usize) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&dir| self.neighbor(a, dir) == Some(b))
    }

    /// Both tiles agree the shared wall in `dir` is open
    pub fn is_open(&self, id: usize, dir: Direction) -> bool {
        match self.neighbor(id, dir) {
            Some(other) => {
                self.tiles[id].passable.get(dir) && self.tiles[other].passable.get(dir.opposite())
            }
            None => false,
        }
    }

    /// Number of open walls between distinct adjacent tiles
    pub fn open_edge_count(&self) -> usize {
        (0..self.tiles.len())
            .map(|id| {
                [Direction::Right, Direction::Bottom]
                    .into_iter()
                    .filter(|&dir| self.is_open(id, dir))
                    .count()
            })
            .sum()
    }

    /// Every wall is recorded identically on both sides
    pub fn is_consistent(&self) -> bool {
        (0..self.tiles.len()).all(|id| {
            self.neighbors(id).all(|(dir, other)| {
                self.tiles[id].passable.get(dir) == self.tiles[other].passable.get(dir.opposite())
            })
        })
    }

    /// Mark a tile as a solid wall tile
    pub fn set_wall(&mut self, id: usize, wall: bool) {
        if let Some(tile) = self.tiles.get_mut(id) {
            tile.wall = wall;
        }
    }

    /// Expand to a `(2w+1) x (2h+1)` grid where walls become wall tiles.
    ///
    /// Cells and open passages become open tiles; the border and closed walls
    /// become wall tiles. Every tile is marked passable toward all of its
    /// in-bounds neighbours, so connectivity is carried by the wall flag alone.
    pub fn thickened(&self) -> Maze2D {
        let width = self.width * 2 + 1;
        let height = self.height * 2 + 1;
        let mut tiles: Vec<Tile> = (0..width * height)
            .map(|id| Tile {
                id,
                passable: Passable::default(),
                speed: 1.0,
                wall: true,
            })
            .collect();

        for tile in &self.tiles {
            let (x, y) = self.coords(tile.id);
            let (tx, ty) = (2 * x + 1, 2 * y + 1);
            tiles[ty * width + tx].wall = false;
            if self.is_open(tile.id, Direction::Right) {
                tiles[ty * width + tx + 1].wall = false;
            }
            if self.is_open(tile.id, Direction::Bottom) {
                tiles[(ty + 1) * width + tx].wall = false;
            }
        }

        let mut maze = Maze2D {
            width,
            height,
            tiles,
        };
        for id in 0..maze.tiles.len() {
            for dir in Direction::ALL {
                if maze.neighbor(id, dir).is_some() {
                    maze.tiles[id].passable.set(dir, true);
                }
            }
        }
        maze
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(width: usize, height: usize, tiles: Vec<Tile>) -> serde_json::Value {
        serde_json::json!({ "width": width, "height": height, "tiles": tiles })
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let maze = Maze2D::walled(3, 2).unwrap();
        let back: Maze2D = serde_json::from_value(serde_json::to_value(&maze).unwrap()).unwrap();
        assert_eq!(back, maze);

        // Zero dimensions
        assert!(serde_json::from_value::<Maze2D>(raw(0, 3, Vec::new())).is_err());
        // Too few tiles for the grid
        assert!(serde_json::from_value::<Maze2D>(raw(3, 3, vec![Tile::walled(0)])).is_err());
        // Ids out of order
        let swapped = vec![Tile::walled(1), Tile::walled(0)];
        assert!(serde_json::from_value::<Maze2D>(raw(2, 1, swapped)).is_err());
    }

    #[test]
    fn test_walled_rejects_empty() {
        assert!(matches!(
            Maze2D::walled(0, 3),
            Err(LabError::InvalidDimensions { width: 0, height: 3 })
        ));
    }

    #[test]
    fn test_neighbor_bounds() {
        let maze = Maze2D::walled(3, 2).unwrap();
        assert_eq!(maze.neighbor(0, Direction::Left), None);
        assert_eq!(maze.neighbor(0, Direction::Top), None);
        assert_eq!(maze.neighbor(0, Direction::Right), Some(1));
        assert_eq!(maze.neighbor(0, Direction::Bottom), Some(3));
        assert_eq!(maze.neighbor(2, Direction::Right), None);
        assert_eq!(maze.neighbor(5, Direction::Bottom), None);
        assert_eq!(maze.neighbor(99, Direction::Left), None);
        assert_eq!(maze.neighbors(4).count(), 3);
    }

    #[test]
    fn test_open_wall_is_symmetric() {
        let mut maze = Maze2D::walled(2, 2).unwrap();
        assert_eq!(maze.open_wall(0, Direction::Bottom), Some(2));
        assert!(maze.tile(0).unwrap().passable.bottom);
        assert!(maze.tile(2).unwrap().passable.top);
        assert!(maze.is_open(2, Direction::Top));
        assert!(maze.is_consistent());
        assert_eq!(maze.open_edge_count(), 1);

        // Border: nothing changes
        assert_eq!(maze.open_wall(0, Direction::Left), None);
        assert!(!maze.tile(0).unwrap().passable.left);
    }

    #[test]
    fn test_open_between_requires_adjacency() {
        let mut maze = Maze2D::walled(3, 3).unwrap();
        assert!(maze.open_between(4, 5));
        assert!(!maze.open_between(0, 8));
        assert_eq!(maze.open_edge_count(), 1);
    }

    #[test]
    fn test_thickened_layout() {
        let mut maze = Maze2D::walled(2, 1).unwrap();
        maze.open_wall(0, Direction::Right);
        let thick = maze.thickened();

        assert_eq!((thick.width(), thick.height()), (5, 3));
        let open: Vec<usize> = thick
            .tiles()
            .iter()
            .filter(|t| !t.wall)
            .map(|t| t.id)
            .collect();
        // Row 1: cells at x=1 and x=3 plus the passage at x=2
        assert_eq!(open, vec![6, 7, 8]);
        assert!(thick.is_consistent());
    }
}
