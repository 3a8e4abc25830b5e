//! N-body gravity with Euler and RK4 integrators
//!
//! Pairwise attraction falls off as `1 / distance` (not `1 / distance²`):
//!
//! ```text
//! a_i = Σ_j  G · m_j · (p_j - p_i) / |p_j - p_i| / (|p_j - p_i| · scale)
//! ```
//!
//! Circular orbits under this law have the same speed at every radius, which
//! is what the classroom presets are tuned for. Bodies that come within the
//! collision distance merge into the heavier one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::error::{LabError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Integrator {
    #[default]
    Euler,
    Rk4,
}

impl Integrator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Integrator::Euler => "euler",
            Integrator::Rk4 => "rk4",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "euler" => Some(Integrator::Euler),
            "rk4" | "runge-kutta" => Some(Integrator::Rk4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityParams {
    /// Gravitational constant
    pub g_const: f32,
    /// World units per distance unit in the force law
    pub distance_scale: f32,
    /// Bodies closer than this merge
    pub collision_distance: f32,
    pub integrator: Integrator,
}

impl Default for GravityParams {
    fn default() -> Self {
        Self {
            g_const: 1.0,
            distance_scale: 1.0,
            collision_distance: 1.0,
            integrator: Integrator::Euler,
        }
    }
}

impl GravityParams {
    pub fn validate(&self) -> Result<()> {
        if !self.g_const.is_finite() {
            return Err(LabError::InvalidParameter("G must be finite".into()));
        }
        if !(self.distance_scale.is_finite() && self.distance_scale > 0.0) {
            return Err(LabError::InvalidParameter("distance scale must be positive".into()));
        }
        if !(self.collision_distance.is_finite() && self.collision_distance >= 0.0) {
            return Err(LabError::InvalidParameter(
                "collision distance must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Accelerations for bodies at `positions` with `masses`.
/// Coincident pairs contribute nothing.
pub fn accelerations(positions: &[Vec2], masses: &[f32], params: &GravityParams) -> Vec<Vec2> {
    let mut acc = vec![Vec2::ZERO; positions.len()];
    for (i, a) in acc.iter_mut().enumerate() {
        for j in 0..positions.len() {
            if i == j {
                continue;
            }
            let delta = positions[j] - positions[i];
            let dist = delta.length();
            if dist == 0.0 {
                continue;
            }
            *a += params.g_const * masses[j] * (delta / dist) / (dist * params.distance_scale);
        }
    }
    acc
}

#[derive(Debug, Clone)]
pub struct GravitySim {
    params: GravityParams,
    initial: Vec<Body>,
    bodies: Vec<Body>,
    time: f32,
}

impl GravitySim {
    pub fn new(bodies: Vec<Body>, params: GravityParams) -> Result<Self> {
        params.validate()?;
        if let Some(b) = bodies.iter().find(|b| !(b.mass.is_finite() && b.mass > 0.0)) {
            return Err(LabError::InvalidParameter(format!(
                "body {} needs a positive mass",
                b.id
            )));
        }
        Ok(Self {
            params,
            initial: bodies.clone(),
            bodies,
            time: 0.0,
        })
    }

    /// Heavy star with two light planets on circular orbits
    pub fn star_system(params: GravityParams) -> Result<Self> {
        let star_mass = 1000.0;
        // Circular speed is sqrt(G·M / scale) at any radius
        let speed = (params.g_const * star_mass / params.distance_scale).sqrt();
        let bodies = vec![
            Body::new(1, Vec2::ZERO, Vec2::ZERO, star_mass).with_radius(4.0),
            Body::new(2, Vec2::new(60.0, 0.0), Vec2::new(0.0, speed), 1.0).with_radius(1.5),
            Body::new(3, Vec2::new(0.0, -120.0), Vec2::new(speed, 0.0), 2.0).with_radius(2.0),
        ];
        Self::new(bodies, params)
    }

    pub fn params(&self) -> &GravityParams {
        &self.params
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn reset(&mut self) {
        self.bodies = self.initial.clone();
        self.time = 0.0;
    }

    pub fn step(&mut self, dt: f32) {
        match self.params.integrator {
            Integrator::Euler => self.step_euler(dt),
            Integrator::Rk4 => self.step_rk4(dt),
        }
        self.time += dt;
        self.merge_collisions();
        for body in self.bodies.iter_mut() {
            body.record_trail();
        }
    }

    fn masses(&self) -> Vec<f32> {
        self.bodies.iter().map(|b| b.mass).collect()
    }

    fn positions(&self) -> Vec<Vec2> {
        self.bodies.iter().map(|b| b.pos).collect()
    }

    fn step_euler(&mut self, dt: f32) {
        let acc = accelerations(&self.positions(), &self.masses(), &self.params);
        for (body, a) in self.bodies.iter_mut().zip(acc) {
            body.acc = a;
            body.vel += a * dt;
            body.pos += body.vel * dt;
        }
    }

    fn step_rk4(&mut self, dt: f32) {
        let masses = self.masses();
        let x0 = self.positions();
        let v0: Vec<Vec2> = self.bodies.iter().map(|b| b.vel).collect();

        // Euler substate: state advanced along a derivative by h
        let advance = |base: &[Vec2], slope: &[Vec2], h: f32| -> Vec<Vec2> {
            base.iter().zip(slope).map(|(b, s)| *b + *s * h).collect()
        };

        let k1v = accelerations(&x0, &masses, &self.params);
        let k1x = v0.clone();

        let k2x = advance(&v0, &k1v, dt * 0.5);
        let k2v = accelerations(&advance(&x0, &k1x, dt * 0.5), &masses, &self.params);

        let k3x = advance(&v0, &k2v, dt * 0.5);
        let k3v = accelerations(&advance(&x0, &k2x, dt * 0.5), &masses, &self.params);

        let k4x = advance(&v0, &k3v, dt);
        let k4v = accelerations(&advance(&x0, &k3x, dt), &masses, &self.params);

        for (i, body) in self.bodies.iter_mut().enumerate() {
            body.pos += (k1x[i] + 2.0 * k2x[i] + 2.0 * k3x[i] + k4x[i]) * (dt / 6.0);
            body.vel += (k1v[i] + 2.0 * k2v[i] + 2.0 * k3v[i] + k4v[i]) * (dt / 6.0);
            body.acc = k1v[i];
        }
    }

    /// Fold every too-close pair into its heavier member until none remain
    fn merge_collisions(&mut self) {
        let threshold = self.params.collision_distance;
        loop {
            let mut pair = None;
            'search: for i in 0..self.bodies.len() {
                for j in i + 1..self.bodies.len() {
                    if self.bodies[i].pos.distance(self.bodies[j].pos) < threshold {
                        pair = Some((i, j));
                        break 'search;
                    }
                }
            }
            let Some((i, j)) = pair else {
                break;
            };

            let (keep, gone) = if self.bodies[j].mass > self.bodies[i].mass {
                (j, i)
            } else {
                (i, j)
            };
            let absorbed = self.bodies[gone].mass;
            self.bodies[keep].mass += absorbed;
            log::info!(
                "Body {} absorbed body {} (mass {:.3})",
                self.bodies[keep].id,
                self.bodies[gone].id,
                absorbed
            );
            self.bodies.remove(gone);
        }
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().map(|b| b.momentum()).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(|b| b.kinetic_energy()).sum()
    }

    pub fn total_mass(&self) -> f32 {
        self.bodies.iter().map(|b| b.mass).sum()
    }

    pub fn center_of_mass(&self) -> Vec2 {
        let mass = self.total_mass();
        if mass == 0.0 {
            return Vec2::ZERO;
        }
        self.bodies.iter().map(|b| b.pos * b.mass).sum::<Vec2>() / mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    /// Two bodies on a circular mutual orbit, separation 10, centre of mass at rest
    fn binary(integrator: Integrator) -> GravitySim {
        let (big, small) = (1000.0f32, 1.0f32);
        let total = big + small;
        let sep = 10.0;
        let v_rel = total.sqrt();
        let bodies = vec![
            Body::new(1, Vec2::new(-sep * small / total, 0.0), Vec2::new(0.0, -v_rel * small / total), big),
            Body::new(2, Vec2::new(sep * big / total, 0.0), Vec2::new(0.0, v_rel * big / total), small),
        ];
        let params = GravityParams {
            collision_distance: 0.1,
            integrator,
            ..Default::default()
        };
        GravitySim::new(bodies, params).unwrap()
    }

    fn separation(sim: &GravitySim) -> f32 {
        sim.bodies()[0].pos.distance(sim.bodies()[1].pos)
    }

    #[test]
    fn test_inverse_linear_law() {
        let params = GravityParams::default();
        let near = accelerations(&[Vec2::ZERO, Vec2::new(2.0, 0.0)], &[1.0, 10.0], &params);
        let far = accelerations(&[Vec2::ZERO, Vec2::new(4.0, 0.0)], &[1.0, 10.0], &params);
        assert!((near[0].x - 5.0).abs() < 1e-6);
        // Doubling distance halves the pull
        assert!((near[0].x / far[0].x - 2.0).abs() < 1e-5);
        assert!(near[1].x < 0.0);
    }

    #[test]
    fn test_euler_conserves_momentum() {
        let mut sim = binary(Integrator::Euler);
        let p0 = sim.total_momentum();
        for _ in 0..600 {
            sim.step(SIM_DT);
        }
        assert_eq!(sim.bodies().len(), 2);
        assert!((sim.total_momentum() - p0).length() < 1e-2);
    }

    #[test]
    fn test_rk4_conserves_momentum() {
        let mut sim = binary(Integrator::Rk4);
        let p0 = sim.total_momentum();
        for _ in 0..600 {
            sim.step(SIM_DT);
        }
        assert!((sim.total_momentum() - p0).length() < 1e-2);
    }

    #[test]
    fn test_orbit_separation_holds() {
        let mut rk4 = binary(Integrator::Rk4);
        let mut euler = binary(Integrator::Euler);
        for _ in 0..240 {
            rk4.step(SIM_DT);
            euler.step(SIM_DT);
            assert!((separation(&rk4) - 10.0).abs() < 0.01);
            assert!((separation(&euler) - 10.0).abs() < 0.5);
        }
    }

    #[test]
    fn test_close_bodies_merge_into_heavier() {
        let bodies = vec![
            Body::new(1, Vec2::ZERO, Vec2::ZERO, 2.0),
            Body::new(2, Vec2::new(0.5, 0.0), Vec2::new(1.0, 0.0), 5.0),
            Body::new(3, Vec2::new(50.0, 0.0), Vec2::ZERO, 1.0),
        ];
        let params = GravityParams {
            g_const: 0.0,
            ..Default::default()
        };
        let mut sim = GravitySim::new(bodies, params).unwrap();
        sim.step(SIM_DT);

        assert_eq!(sim.bodies().len(), 2);
        let survivor = &sim.bodies()[0];
        assert_eq!(survivor.id, 2);
        assert_eq!(survivor.mass, 7.0);
        assert_eq!(survivor.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_reset_restores_bodies() {
        let mut sim = GravitySim::star_system(GravityParams::default()).unwrap();
        let before: Vec<Vec2> = sim.bodies().iter().map(|b| b.pos).collect();
        for _ in 0..100 {
            sim.step(SIM_DT);
        }
        sim.reset();
        let after: Vec<Vec2> = sim.bodies().iter().map(|b| b.pos).collect();
        assert_eq!(before, after);
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn test_rejects_massless_body() {
        let bodies = vec![Body::new(1, Vec2::ZERO, Vec2::ZERO, 0.0)];
        assert!(GravitySim::new(bodies, GravityParams::default()).is_err());
    }
}
