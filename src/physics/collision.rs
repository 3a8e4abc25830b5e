//! 1-D collisions with restitution, and a two-cart track built on them

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// Post-collision velocities for two bodies on a line.
///
/// `e = 1` is perfectly elastic, `e = 0` perfectly inelastic. Momentum is
/// conserved for any `e`.
pub fn resolve_collision(m1: f32, v1: f32, m2: f32, v2: f32, e: f32) -> (f32, f32) {
    let p = m1 * v1 + m2 * v2;
    let total = m1 + m2;
    let v1_out = (p + m2 * e * (v2 - v1)) / total;
    let v2_out = (p + m1 * e * (v1 - v2)) / total;
    (v1_out, v2_out)
}

/// Perfectly elastic bounce off a fixed wall
pub fn wall_bounce(v: f32) -> f32 {
    -v
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Centre position along the track
    pub pos: f32,
    pub vel: f32,
    pub mass: f32,
    pub width: f32,
}

impl Cart {
    pub fn left(&self) -> f32 {
        self.pos - self.width * 0.5
    }

    pub fn right(&self) -> f32 {
        self.pos + self.width * 0.5
    }

    pub fn momentum(&self) -> f32 {
        self.mass * self.vel
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackParams {
    pub length: f32,
    pub restitution: f32,
    pub cart_width: f32,
    pub mass_a: f32,
    pub velocity_a: f32,
    pub mass_b: f32,
    pub velocity_b: f32,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            length: 20.0,
            restitution: 1.0,
            cart_width: 1.0,
            mass_a: 1.0,
            velocity_a: 3.0,
            mass_b: 2.0,
            velocity_b: -1.0,
        }
    }
}

impl TrackParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(LabError::InvalidParameter("restitution must be within 0..=1".into()));
        }
        if !(self.cart_width > 0.0 && self.length > 2.0 * self.cart_width) {
            return Err(LabError::InvalidParameter("track too short for two carts".into()));
        }
        if !(self.mass_a > 0.0 && self.mass_b > 0.0) {
            return Err(LabError::InvalidParameter("cart masses must be positive".into()));
        }
        if !(self.velocity_a.is_finite() && self.velocity_b.is_finite()) {
            return Err(LabError::InvalidParameter("cart velocities must be finite".into()));
        }
        Ok(())
    }
}

/// Two carts on a bounded track; cart `a` always stays left of cart `b`
#[derive(Debug, Clone)]
pub struct CollisionTrack {
    params: TrackParams,
    carts: [Cart; 2],
    collisions: u32,
    time: f32,
}

impl CollisionTrack {
    pub fn new(params: TrackParams) -> Result<Self> {
        params.validate()?;
        let mut track = Self {
            carts: [Cart {
                pos: 0.0,
                vel: 0.0,
                mass: 0.0,
                width: 0.0,
            }; 2],
            params,
            collisions: 0,
            time: 0.0,
        };
        track.reset();
        Ok(track)
    }

    pub fn params(&self) -> &TrackParams {
        &self.params
    }

    pub fn carts(&self) -> &[Cart; 2] {
        &self.carts
    }

    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn reset(&mut self) {
        let p = &self.params;
        self.carts = [
            Cart {
                pos: p.length * 0.25,
                vel: p.velocity_a,
                mass: p.mass_a,
                width: p.cart_width,
            },
            Cart {
                pos: p.length * 0.75,
                vel: p.velocity_b,
                mass: p.mass_b,
                width: p.cart_width,
            },
        ];
        self.collisions = 0;
        self.time = 0.0;
    }

    pub fn step(&mut self, dt: f32) {
        for cart in self.carts.iter_mut() {
            cart.pos += cart.vel * dt;
        }
        self.time += dt;

        let length = self.params.length;
        let [a, b] = &mut self.carts;
        let overlap = a.right() - b.left();
        if overlap >= 0.0 && a.vel > b.vel {
            let (va, vb) = resolve_collision(a.mass, a.vel, b.mass, b.vel, self.params.restitution);
            a.vel = va;
            b.vel = vb;
            // Back off to touching
            a.pos -= overlap * 0.5;
            b.pos += overlap * 0.5;
            self.collisions += 1;
            log::debug!("Carts collided at t = {:.3}: {:.3}, {:.3}", self.time, va, vb);
        }

        if a.left() < 0.0 {
            a.pos = a.width * 0.5;
            if a.vel < 0.0 {
                a.vel = wall_bounce(a.vel);
            }
        }
        if b.right() > length {
            b.pos = length - b.width * 0.5;
            if b.vel > 0.0 {
                b.vel = wall_bounce(b.vel);
            }
        }
    }

    pub fn total_momentum(&self) -> f32 {
        self.carts.iter().map(Cart::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.carts.iter().map(|c| 0.5 * c.mass * c.vel * c.vel).sum()
    }
}
