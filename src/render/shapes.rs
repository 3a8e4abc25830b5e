//! Per-simulation draw helpers

use glam::Vec2;

use super::{Color, DrawSurface, Viewport, colors, gradient};
use crate::graph::{NodeGraph, NodeId};
use crate::heat::HeatGrid;
use crate::maze::{Direction, Maze2D};
use crate::path::PathState;
use crate::physics::{Body, CollisionTrack, RopeSim, TrailPoint};

/// Square cells laid out to fit a `width x height` grid on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cell: f32,
    pub offset: Vec2,
}

impl GridLayout {
    pub fn fit(width: usize, height: usize, surface: (f32, f32)) -> Self {
        let cell = (surface.0 / width.max(1) as f32).min(surface.1 / height.max(1) as f32);
        let used = Vec2::new(width as f32, height as f32) * cell;
        let offset = (Vec2::new(surface.0, surface.1) - used) * 0.5;
        Self { cell, offset }
    }

    pub fn corner(&self, x: usize, y: usize) -> Vec2 {
        self.offset + Vec2::new(x as f32, y as f32) * self.cell
    }

    pub fn center(&self, x: f32, y: f32) -> Vec2 {
        self.offset + (Vec2::new(x, y) + 0.5) * self.cell
    }

    fn fill_cell(&self, surface: &mut dyn DrawSurface, x: usize, y: usize, color: Color) {
        let at = self.corner(x, y);
        surface.fill_rect(at.x, at.y, self.cell, self.cell, color);
    }
}

/// Wall tiles filled, closed passages stroked
pub fn draw_maze(surface: &mut dyn DrawSurface, maze: &Maze2D, layout: &GridLayout) {
    let line = (layout.cell * 0.08).max(1.0);
    for tile in maze.tiles() {
        let (x, y) = maze.coords(tile.id);
        if tile.wall {
            layout.fill_cell(surface, x, y, colors::WALL_TILE);
            continue;
        }

        let tl = layout.corner(x, y);
        let tr = layout.corner(x + 1, y);
        let bl = layout.corner(x, y + 1);
        let br = layout.corner(x + 1, y + 1);

        // Each interior wall is drawn once, from its left/top tile
        let mut sides = vec![(Direction::Right, tr, br), (Direction::Bottom, bl, br)];
        if x == 0 {
            sides.push((Direction::Left, tl, bl));
        }
        if y == 0 {
            sides.push((Direction::Top, tl, tr));
        }
        for (dir, a, b) in sides {
            if !maze.is_open(tile.id, dir) {
                surface.stroke_path(&[a, b], colors::MAZE_WALL, line, false);
            }
        }
    }
}

/// Highlight the cell a generator is working on
pub fn draw_cursor(surface: &mut dyn DrawSurface, maze: &Maze2D, cursor: usize, layout: &GridLayout) {
    if cursor < maze.len() {
        let (x, y) = maze.coords(cursor);
        layout.fill_cell(surface, x, y, colors::CURSOR);
    }
}

/// Open and closed sets of an A* search
pub fn draw_search(surface: &mut dyn DrawSurface, graph: &NodeGraph, state: &PathState, layout: &GridLayout) {
    let mut fill = |id: NodeId, color: Color| {
        if let Some(node) = graph.node(id) {
            let at = layout.center(node.x, node.y) - Vec2::splat(layout.cell * 0.5);
            surface.fill_rect(at.x, at.y, layout.cell, layout.cell, color);
        }
    };
    for entry in &state.closed {
        fill(entry.id, colors::CLOSED_SET);
    }
    for entry in &state.open {
        fill(entry.id, colors::OPEN_SET);
    }
    if let Some(current) = state.current {
        fill(current, colors::CURSOR);
    }
}

pub fn draw_path(surface: &mut dyn DrawSurface, graph: &NodeGraph, path: &[NodeId], layout: &GridLayout) {
    let points: Vec<Vec2> = path
        .iter()
        .filter_map(|&id| graph.node(id))
        .map(|n| layout.center(n.x, n.y))
        .collect();
    if points.len() >= 2 {
        surface.stroke_path(&points, colors::PATH, (layout.cell * 0.25).max(1.0), false);
    }
}

/// Fading trail colored by speed relative to `max_speed`
pub fn draw_trail(
    surface: &mut dyn DrawSurface,
    view: &Viewport,
    trail: &[TrailPoint],
    width: f32,
    max_speed: f32,
) {
    if trail.len() < 2 {
        return;
    }
    let trail_len = trail.len() as f32;
    for (i, pair) in trail.windows(2).enumerate() {
        // Fade alpha and width along the trail
        let t = i as f32 / trail_len;
        let alpha = (1.0 - t) * 0.8;
        let speed = if max_speed > 0.0 { pair[0].speed / max_speed } else { 0.0 };
        let points = [view.to_screen(pair[0].pos), view.to_screen(pair[1].pos)];
        surface.stroke_path(&points, gradient(speed, alpha), width * (1.0 - t * 0.7), false);
    }
}

pub fn draw_body(surface: &mut dyn DrawSurface, view: &Viewport, body: &Body, color: Color) {
    let radius = view.length(body.radius).max(2.0);
    surface.arc(view.to_screen(body.pos), radius, color, true);
}

/// Horizontal ground line at y = 0
pub fn draw_ground(surface: &mut dyn DrawSurface, view: &Viewport, x0: f32, x1: f32) {
    let points = [view.to_screen(Vec2::new(x0, 0.0)), view.to_screen(Vec2::new(x1, 0.0))];
    surface.stroke_path(&points, colors::GROUND, 2.0, false);
}

pub fn draw_rope(surface: &mut dyn DrawSurface, view: &Viewport, rope: &RopeSim) {
    let points = rope.points();
    for stick in rope.sticks() {
        let segment = [view.to_screen(points[stick.p0].pos), view.to_screen(points[stick.p1].pos)];
        surface.stroke_path(&segment, colors::ROPE, 2.0, false);
    }
    for point in points.iter().filter(|p| p.pinned) {
        surface.arc(view.to_screen(point.pos), 4.0, colors::PIN, true);
    }
}

/// Cells colored between the grid's current min and max temperature
pub fn draw_heat(surface: &mut dyn DrawSurface, grid: &HeatGrid, layout: &GridLayout) {
    let (lo, hi) = grid.temperature_range();
    let span = hi - lo;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let Some(cell) = grid.cell(x, y) else {
                continue;
            };
            let t = if span > 0.0 { (cell.temperature - lo) / span } else { 0.0 };
            layout.fill_cell(surface, x, y, gradient(t as f32, 1.0));
        }
    }
}

pub fn draw_track(surface: &mut dyn DrawSurface, view: &Viewport, track: &CollisionTrack) {
    let length = track.params().length;
    draw_ground(surface, view, 0.0, length);
    for (cart, color) in track.carts().iter().zip([colors::CART_A, colors::CART_B]) {
        let corner = view.to_screen(Vec2::new(cart.left(), cart.width * 0.5));
        let size = view.length(cart.width);
        surface.fill_rect(corner.x, corner.y, size, size * 0.5, color);
    }
}

/// Status text stacked from the top-left corner
pub fn draw_label(surface: &mut dyn DrawSurface, line: usize, text: &str) {
    surface.text(Vec2::new(8.0, 18.0 + line as f32 * 16.0), text, colors::TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{MazeKind, generate_maze};
    use crate::path::{Heuristic, navigate};
    use crate::render::{CommandList, DrawCommand};
    use crate::rng::SeededRng;

    fn strokes(list: &CommandList) -> usize {
        list.count(|c| matches!(c, DrawCommand::StrokePath { .. }))
    }

    #[test]
    fn test_walled_maze_draws_every_wall() {
        let maze = Maze2D::walled(3, 2).unwrap();
        let mut list = CommandList::new(300.0, 200.0);
        let layout = GridLayout::fit(3, 2, list.size());
        draw_maze(&mut list, &maze, &layout);
        // Horizontal segments: 3 x 3 rows; vertical: 4 x 2 columns
        assert_eq!(strokes(&list), 9 + 8);
    }

    #[test]
    fn test_perfect_maze_draws_fewer_walls() {
        let report = generate_maze(MazeKind::Prim, 3, 2, SeededRng::new(1)).unwrap();
        let mut list = CommandList::new(300.0, 200.0);
        let layout = GridLayout::fit(3, 2, list.size());
        draw_maze(&mut list, &report.maze, &layout);
        // One wall removed per spanning-tree edge
        assert_eq!(strokes(&list), 17 - 5);
    }

    #[test]
    fn test_path_is_one_polyline() {
        let graph = NodeGraph::grid(4, 4, &[]);
        let path = navigate(0, 15, &graph, Heuristic::Manhattan);
        let mut list = CommandList::new(100.0, 100.0);
        let layout = GridLayout::fit(4, 4, list.size());
        draw_path(&mut list, &graph, &path, &layout);
        assert_eq!(list.len(), 1);
        match &list.commands[0] {
            DrawCommand::StrokePath { points, .. } => assert_eq!(points.len(), path.len()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_trail_segments_fade() {
        let mut body = Body::new(1, Vec2::ZERO, Vec2::X, 1.0);
        for i in 0..5 {
            body.pos = Vec2::new(i as f32, 0.0);
            body.record_trail();
        }
        let view = Viewport::fit(Vec2::ZERO, Vec2::new(5.0, 5.0), (100.0, 100.0), 0.0);
        let mut list = CommandList::new(100.0, 100.0);
        draw_trail(&mut list, &view, &body.trail, 4.0, 1.0);
        assert_eq!(list.len(), 4);

        let alphas: Vec<f32> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokePath { color, .. } => Some(color[3]),
                _ => None,
            })
            .collect();
        assert!(alphas.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_heat_fills_each_cell() {
        let grid = HeatGrid::from_params(&crate::heat::HeatParams {
            width: 5,
            height: 3,
            ..Default::default()
        })
        .unwrap();
        let mut list = CommandList::new(100.0, 60.0);
        let layout = GridLayout::fit(5, 3, list.size());
        draw_heat(&mut list, &grid, &layout);
        assert_eq!(list.count(|c| matches!(c, DrawCommand::FillRect { .. })), 15);
    }
}
