//! Projectile and freefall kinematics
//!
//! World coordinates are y-up with the ground at y = 0. Projectiles use the
//! exact constant-acceleration update, so the stepped trajectory matches the
//! closed form up to float rounding. Freefall with drag uses semi-implicit
//! Euler.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::EARTH_GRAVITY;
use crate::error::{LabError, Result};

fn check_finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LabError::InvalidParameter(format!("{name} must be finite")))
    }
}

fn check_positive(name: &str, value: f32) -> Result<()> {
    check_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(LabError::InvalidParameter(format!("{name} must be positive")))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<()> {
    check_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(LabError::InvalidParameter(format!("{name} must not be negative")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileParams {
    /// Launch speed (m/s)
    pub speed: f32,
    /// Launch angle above horizontal (degrees)
    pub angle_deg: f32,
    /// Launch height (m)
    pub height: f32,
    /// Downward gravitational acceleration (m/s²)
    pub gravity: f32,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            speed: 20.0,
            angle_deg: 45.0,
            height: 0.0,
            gravity: EARTH_GRAVITY,
        }
    }
}

impl ProjectileParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("projectile speed", self.speed)?;
        check_finite("projectile angle", self.angle_deg)?;
        check_non_negative("projectile height", self.height)?;
        check_positive("projectile gravity", self.gravity)
    }

    pub fn launch_velocity(&self) -> Vec2 {
        let theta = self.angle_deg.to_radians();
        Vec2::new(theta.cos(), theta.sin()) * self.speed
    }

    /// Time until the projectile returns to y = 0
    pub fn time_of_flight(&self) -> f32 {
        let vy = self.launch_velocity().y;
        (vy + (vy * vy + 2.0 * self.gravity * self.height).sqrt()) / self.gravity
    }

    pub fn max_height(&self) -> f32 {
        let vy = self.launch_velocity().y;
        if vy > 0.0 {
            self.height + vy * vy / (2.0 * self.gravity)
        } else {
            self.height
        }
    }

    /// Horizontal distance covered before landing
    pub fn range(&self) -> f32 {
        self.launch_velocity().x * self.time_of_flight()
    }

    pub fn position_at(&self, t: f32) -> Vec2 {
        let v = self.launch_velocity();
        Vec2::new(v.x * t, self.height + v.y * t - 0.5 * self.gravity * t * t)
    }

    pub fn velocity_at(&self, t: f32) -> Vec2 {
        let v = self.launch_velocity();
        Vec2::new(v.x, v.y - self.gravity * t)
    }
}

#[derive(Debug, Clone)]
pub struct ProjectileSim {
    params: ProjectileParams,
    pub body: Body,
    time: f32,
    landed: bool,
}

impl ProjectileSim {
    pub fn new(params: ProjectileParams) -> Result<Self> {
        params.validate()?;
        let mut sim = Self {
            body: Body::new(1, Vec2::ZERO, Vec2::ZERO, 1.0),
            params,
            time: 0.0,
            landed: false,
        };
        sim.reset();
        Ok(sim)
    }

    pub fn params(&self) -> &ProjectileParams {
        &self.params
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn has_landed(&self) -> bool {
        self.landed
    }

    pub fn reset(&mut self) {
        self.body.pos = Vec2::new(0.0, self.params.height);
        self.body.vel = self.params.launch_velocity();
        self.body.acc = Vec2::new(0.0, -self.params.gravity);
        self.body.clear_trail();
        self.time = 0.0;
        self.landed = self.params.time_of_flight() <= 0.0;
    }

    pub fn step(&mut self, dt: f32) {
        if self.landed {
            return;
        }
        let acc = self.body.acc;
        self.body.pos += self.body.vel * dt + 0.5 * acc * dt * dt;
        self.body.vel += acc * dt;
        self.time += dt;

        if self.body.pos.y <= 0.0 {
            // Snap to the landing point instead of sinking below ground
            let t = self.params.time_of_flight();
            self.time = t;
            self.body.pos = self.params.position_at(t);
            self.body.pos.y = 0.0;
            self.body.vel = self.params.velocity_at(t);
            self.landed = true;
            log::debug!("Projectile landed at x = {:.3} after {:.3} s", self.body.pos.x, t);
        }
        self.body.record_trail();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreefallParams {
    /// Drop height (m)
    pub height: f32,
    pub mass: f32,
    /// Linear drag coefficient (kg/s); 0 disables air resistance
    pub drag: f32,
    pub gravity: f32,
}

impl Default for FreefallParams {
    fn default() -> Self {
        Self {
            height: 50.0,
            mass: 1.0,
            drag: 0.0,
            gravity: EARTH_GRAVITY,
        }
    }
}

impl FreefallParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("freefall height", self.height)?;
        check_positive("freefall mass", self.mass)?;
        check_non_negative("freefall drag", self.drag)?;
        check_positive("freefall gravity", self.gravity)
    }

    /// Speed where drag balances weight (infinite without drag)
    pub fn terminal_velocity(&self) -> f32 {
        if self.drag > 0.0 {
            self.mass * self.gravity / self.drag
        } else {
            f32::INFINITY
        }
    }

    /// Time to reach the ground without drag
    pub fn vacuum_fall_time(&self) -> f32 {
        (2.0 * self.height / self.gravity).sqrt()
    }

    /// Downward speed after `t` seconds (exact for linear drag)
    pub fn speed_at(&self, t: f32) -> f32 {
        if self.drag > 0.0 {
            self.terminal_velocity() * (1.0 - (-self.drag * t / self.mass).exp())
        } else {
            self.gravity * t
        }
    }
}

#[derive(Debug, Clone)]
pub struct FreefallSim {
    params: FreefallParams,
    pub body: Body,
    time: f32,
    landed: bool,
    impact_speed: Option<f32>,
}

impl FreefallSim {
    pub fn new(params: FreefallParams) -> Result<Self> {
        params.validate()?;
        let mut sim = Self {
            body: Body::new(1, Vec2::ZERO, Vec2::ZERO, params.mass),
            params,
            time: 0.0,
            landed: false,
            impact_speed: None,
        };
        sim.reset();
        Ok(sim)
    }

    pub fn params(&self) -> &FreefallParams {
        &self.params
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn has_landed(&self) -> bool {
        self.landed
    }

    pub fn impact_speed(&self) -> Option<f32> {
        self.impact_speed
    }

    pub fn reset(&mut self) {
        self.body.pos = Vec2::new(0.0, self.params.height);
        self.body.vel = Vec2::ZERO;
        self.body.acc = Vec2::ZERO;
        self.body.mass = self.params.mass;
        self.body.clear_trail();
        self.time = 0.0;
        self.landed = self.params.height <= 0.0;
        self.impact_speed = None;
    }

    pub fn step(&mut self, dt: f32) {
        if self.landed {
            return;
        }
        let drag = -self.params.drag / self.params.mass * self.body.vel;
        self.body.acc = Vec2::new(0.0, -self.params.gravity) + drag;
        self.body.vel += self.body.acc * dt;
        self.body.pos += self.body.vel * dt;
        self.time += dt;

        if self.body.pos.y <= 0.0 {
            self.body.pos.y = 0.0;
            self.impact_speed = Some(self.body.vel.length());
            self.body.vel = Vec2::ZERO;
            self.landed = true;
        }
        self.body.record_trail();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_closed_form_level_ground() {
        let params = ProjectileParams {
            speed: 10.0,
            angle_deg: 45.0,
            height: 0.0,
            gravity: 10.0,
        };
        // Range v²/g at 45°
        assert!((params.range() - 10.0).abs() < 1e-4);
        assert!((params.max_height() - 2.5).abs() < 1e-4);
        assert!((params.time_of_flight() - 2f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_stepped_matches_closed_form() {
        let params = ProjectileParams {
            speed: 15.0,
            angle_deg: 30.0,
            height: 5.0,
            gravity: EARTH_GRAVITY,
        };
        let mut sim = ProjectileSim::new(params.clone()).unwrap();

        for _ in 0..60 {
            sim.step(SIM_DT);
        }
        let expected = params.position_at(sim.time());
        assert!((sim.body.pos - expected).length() < 1e-3);

        while !sim.has_landed() {
            sim.step(SIM_DT);
        }
        assert!((sim.body.pos.x - params.range()).abs() < 1e-3);
        assert_eq!(sim.body.pos.y, 0.0);
        assert!((sim.time() - params.time_of_flight()).abs() < 1e-6);
    }

    #[test]
    fn test_reset_restores_launch() {
        let mut sim = ProjectileSim::new(ProjectileParams::default()).unwrap();
        for _ in 0..50 {
            sim.step(SIM_DT);
        }
        sim.reset();
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.body.pos, Vec2::ZERO);
        assert!(sim.body.trail.is_empty());
        assert!(!sim.has_landed());
    }

    #[test]
    fn test_rejects_bad_params() {
        let params = ProjectileParams {
            gravity: 0.0,
            ..Default::default()
        };
        assert!(ProjectileSim::new(params).is_err());
        let params = FreefallParams {
            mass: -1.0,
            ..Default::default()
        };
        assert!(FreefallSim::new(params).is_err());
    }

    #[test]
    fn test_vacuum_freefall_time() {
        let params = FreefallParams {
            height: 20.0,
            ..Default::default()
        };
        let mut sim = FreefallSim::new(params.clone()).unwrap();
        while !sim.has_landed() {
            sim.step(SIM_DT);
        }
        assert!((sim.time() - params.vacuum_fall_time()).abs() < 2.0 * SIM_DT);
        let expected = (2.0 * params.gravity * params.height).sqrt();
        assert!((sim.impact_speed().unwrap() - expected).abs() < 0.2);
    }

    #[test]
    fn test_drag_approaches_terminal_velocity() {
        let params = FreefallParams {
            height: 10_000.0,
            mass: 2.0,
            drag: 4.0,
            gravity: 10.0,
        };
        assert_eq!(params.terminal_velocity(), 5.0);

        let mut sim = FreefallSim::new(params.clone()).unwrap();
        for _ in 0..(120 * 10) {
            sim.step(SIM_DT);
        }
        let speed = -sim.body.vel.y;
        assert!(speed < 5.0 + 1e-3);
        assert!((speed - 5.0).abs() < 0.01);
        assert!((speed - params.speed_at(sim.time())).abs() < 0.01);
    }
}
