//! Physics Lab - stepped classroom simulations and graph search
//!
//! Core modules:
//! - `maze`: Tile grids, Aldous-Broder and Prim's generators, derived node graphs
//! - `graph`: Node graph derived from finished mazes
//! - `path`: A* pathfinding with swappable heuristics
//! - `physics`: Projectile, freefall, circular motion, N-body, rope and collision sims
//! - `heat`: Explicit finite-difference heat diffusion grid
//! - `step`: Step machines and the animation driver for visible iteration
//! - `lab`: Frame driver tying a clock, a simulation and a draw surface together
//! - `render`: Draw surface abstraction and per-simulation draw helpers

pub mod clock;
pub mod error;
pub mod graph;
pub mod heat;
pub mod lab;
pub mod maze;
pub mod path;
pub mod physics;
pub mod platform;
pub mod render;
pub mod rng;
pub mod settings;
pub mod step;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{LabError, Result};
pub use lab::{Lab, Simulation, SimulationKind};
pub use settings::{AccuracyPreset, LabSettings};

use glam::Vec2;

/// Lab configuration constants
pub mod consts {
    /// Fixed simulation substep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest host delta accepted per frame (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Standard gravity (m/s²)
    pub const EARTH_GRAVITY: f32 = 9.81;

    /// Default rope relaxation passes per frame
    pub const ROPE_PASSES: u32 = 50;

    /// Trail points kept per body for rendering
    pub const TRAIL_LENGTH: usize = 64;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b` (0 when a == b)
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b { 0.0 } else { (value - a) / (b - a) }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Intersection of segments `a-b` and `c-d`.
///
/// Returns the point and the parameter along `a-b`, or `None` for parallel or
/// non-overlapping segments.
pub fn intersection(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<(Vec2, f32)> {
    let top_t = (d.x - c.x) * (a.y - c.y) - (d.y - c.y) * (a.x - c.x);
    let top_u = (c.y - a.y) * (a.x - b.x) - (c.x - a.x) * (a.y - b.y);
    let bottom = (d.y - c.y) * (b.x - a.x) - (d.x - c.x) * (b.y - a.y);

    if bottom == 0.0 {
        return None;
    }

    let t = top_t / bottom;
    let u = top_u / bottom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t)), t))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_and_inverse() {
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
        assert_eq!(inverse_lerp(0.0, 10.0, 2.5), 0.25);
        assert_eq!(inverse_lerp(3.0, 3.0, 7.0), 0.0);
    }

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_intersection_crossing() {
        let hit = intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        );
        let (point, t) = hit.expect("segments cross");
        assert!((point - Vec2::new(5.0, 5.0)).length() < 1e-5);
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_intersection_parallel_and_disjoint() {
        assert!(
            intersection(
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(10.0, 1.0),
            )
            .is_none()
        );
        assert!(
            intersection(
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(5.0, 0.0),
                Vec2::new(6.0, -1.0),
            )
            .is_none()
        );
    }
}
