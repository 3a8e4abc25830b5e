//! Point-mass entity shared by the simulators

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TRAIL_LENGTH;

/// Trail point for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub mass: f32,
    pub radius: f32,
    /// Trail history (newest first)
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl Body {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, mass: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            acc: Vec2::ZERO,
            mass,
            radius: 1.0,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Record current position to trail
    pub fn record_trail(&mut self) {
        let speed = self.vel.length();
        self.trail.insert(0, TrailPoint { pos: self.pos, speed });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_is_bounded_newest_first() {
        let mut body = Body::new(1, Vec2::ZERO, Vec2::X, 1.0);
        for i in 0..(TRAIL_LENGTH + 10) {
            body.pos = Vec2::new(i as f32, 0.0);
            body.record_trail();
        }
        assert_eq!(body.trail.len(), TRAIL_LENGTH);
        assert_eq!(body.trail[0].pos.x, (TRAIL_LENGTH + 9) as f32);
    }

    #[test]
    fn test_momentum_and_energy() {
        let body = Body::new(1, Vec2::ZERO, Vec2::new(3.0, 4.0), 2.0);
        assert_eq!(body.momentum(), Vec2::new(6.0, 8.0));
        assert!((body.kinetic_energy() - 25.0).abs() < 1e-5);
    }
}
