//! Uniform circular motion

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::error::{LabError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularParams {
    pub radius: f32,
    /// Radians per second; negative spins clockwise
    pub angular_velocity: f32,
    pub mass: f32,
}

impl Default for CircularParams {
    fn default() -> Self {
        Self {
            radius: 5.0,
            angular_velocity: 1.0,
            mass: 1.0,
        }
    }
}

impl CircularParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(LabError::InvalidParameter("orbit radius must be positive".into()));
        }
        if !self.angular_velocity.is_finite() {
            return Err(LabError::InvalidParameter("angular velocity must be finite".into()));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(LabError::InvalidParameter("orbiting mass must be positive".into()));
        }
        Ok(())
    }

    /// Seconds per revolution (infinite when stationary)
    pub fn period(&self) -> f32 {
        if self.angular_velocity == 0.0 {
            f32::INFINITY
        } else {
            TAU / self.angular_velocity.abs()
        }
    }

    pub fn tangential_speed(&self) -> f32 {
        self.angular_velocity.abs() * self.radius
    }

    /// Magnitude of ω²r
    pub fn centripetal_acceleration(&self) -> f32 {
        self.angular_velocity * self.angular_velocity * self.radius
    }

    pub fn centripetal_force(&self) -> f32 {
        self.mass * self.centripetal_acceleration()
    }
}

#[derive(Debug, Clone)]
pub struct CircularMotionSim {
    params: CircularParams,
    angle: f32,
    time: f32,
    pub body: Body,
}

impl CircularMotionSim {
    pub fn new(params: CircularParams) -> Result<Self> {
        params.validate()?;
        let mut sim = Self {
            body: Body::new(1, Vec2::ZERO, Vec2::ZERO, params.mass),
            params,
            angle: 0.0,
            time: 0.0,
        };
        sim.reset();
        Ok(sim)
    }

    pub fn params(&self) -> &CircularParams {
        &self.params
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn reset(&mut self) {
        self.angle = 0.0;
        self.time = 0.0;
        self.body.clear_trail();
        self.sync_body();
    }

    pub fn step(&mut self, dt: f32) {
        self.angle = (self.angle + self.params.angular_velocity * dt).rem_euclid(TAU);
        self.time += dt;
        self.sync_body();
        self.body.record_trail();
    }

    fn sync_body(&mut self) {
        let (sin, cos) = self.angle.sin_cos();
        let r = self.params.radius;
        let w = self.params.angular_velocity;
        self.body.pos = Vec2::new(cos, sin) * r;
        self.body.vel = Vec2::new(-sin, cos) * (w * r);
        // Points at the centre
        self.body.acc = -self.body.pos * (w * w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_derived_quantities() {
        let params = CircularParams {
            radius: 2.0,
            angular_velocity: 3.0,
            mass: 0.5,
        };
        assert!((params.period() - TAU / 3.0).abs() < 1e-6);
        assert_eq!(params.tangential_speed(), 6.0);
        assert_eq!(params.centripetal_acceleration(), 18.0);
        assert_eq!(params.centripetal_force(), 9.0);
    }

    #[test]
    fn test_stays_on_circle_and_accelerates_inward() {
        let mut sim = CircularMotionSim::new(CircularParams::default()).unwrap();
        for _ in 0..500 {
            sim.step(SIM_DT);
            assert!((sim.body.pos.length() - 5.0).abs() < 1e-4);
            assert!(sim.body.pos.dot(sim.body.vel).abs() < 1e-3);
            assert!(sim.body.acc.dot(sim.body.pos) < 0.0);
        }
    }

    #[test]
    fn test_rejects_zero_radius() {
        let params = CircularParams {
            radius: 0.0,
            ..Default::default()
        };
        assert!(CircularMotionSim::new(params).is_err());
    }
}
