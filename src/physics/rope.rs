//! Verlet rope: point chain held together by iteratively relaxed sticks
//!
//! Each step integrates free points with position Verlet, then runs `passes`
//! relaxation sweeps over the sticks. The solver is approximate: more passes
//! give a stiffer rope at a higher cost, fewer passes a stretchier one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{EARTH_GRAVITY, ROPE_PASSES};
use crate::error::{LabError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RopePoint {
    pub pos: Vec2,
    pub old_pos: Vec2,
    pub pinned: bool,
}

impl RopePoint {
    pub fn new(pos: Vec2, pinned: bool) -> Self {
        Self {
            pos,
            old_pos: pos,
            pinned,
        }
    }
}

/// Distance constraint between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    pub p0: usize,
    pub p1: usize,
    pub rest_length: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RopeParams {
    pub segments: usize,
    pub segment_length: f32,
    pub gravity: f32,
    /// Fraction of velocity kept per step
    pub damping: f32,
    pub passes: u32,
    /// Share of a stick's correction applied to each free end
    pub split: f32,
    pub anchor: Vec2,
}

impl Default for RopeParams {
    fn default() -> Self {
        Self {
            segments: 20,
            segment_length: 0.5,
            gravity: EARTH_GRAVITY,
            damping: 0.99,
            passes: ROPE_PASSES,
            split: 0.5,
            anchor: Vec2::new(0.0, 10.0),
        }
    }
}

impl RopeParams {
    pub fn validate(&self) -> Result<()> {
        if self.segments == 0 {
            return Err(LabError::InvalidParameter("rope needs at least one segment".into()));
        }
        if !(self.segment_length.is_finite() && self.segment_length > 0.0) {
            return Err(LabError::InvalidParameter("segment length must be positive".into()));
        }
        if !self.gravity.is_finite() {
            return Err(LabError::InvalidParameter("rope gravity must be finite".into()));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(LabError::InvalidParameter("rope damping must be within 0..=1".into()));
        }
        if !(self.split > 0.0 && self.split <= 0.5) {
            return Err(LabError::InvalidParameter("rope split must be within (0, 0.5]".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RopeSim {
    params: RopeParams,
    initial: Vec<RopePoint>,
    points: Vec<RopePoint>,
    sticks: Vec<Stick>,
    time: f32,
}

impl RopeSim {
    /// Horizontal chain hanging from a pinned anchor
    pub fn new(params: RopeParams) -> Result<Self> {
        params.validate()?;
        let points: Vec<RopePoint> = (0..=params.segments)
            .map(|i| {
                let pos = params.anchor + Vec2::new(i as f32 * params.segment_length, 0.0);
                RopePoint::new(pos, i == 0)
            })
            .collect();
        let sticks = (0..params.segments)
            .map(|i| Stick {
                p0: i,
                p1: i + 1,
                rest_length: params.segment_length,
            })
            .collect();
        Self::from_parts(points, sticks, params)
    }

    /// Arbitrary point/stick layout. Sticks joining a point to itself or
    /// naming a missing point are dropped.
    pub fn from_parts(points: Vec<RopePoint>, sticks: Vec<Stick>, params: RopeParams) -> Result<Self> {
        params.validate()?;
        let sticks = sticks
            .into_iter()
            .filter(|s| {
                let ok = s.p0 != s.p1 && s.p0 < points.len() && s.p1 < points.len();
                if !ok {
                    log::warn!("Dropping degenerate stick {} -> {}", s.p0, s.p1);
                }
                ok
            })
            .collect();
        Ok(Self {
            params,
            initial: points.clone(),
            points,
            sticks,
            time: 0.0,
        })
    }

    pub fn params(&self) -> &RopeParams {
        &self.params
    }

    pub fn points(&self) -> &[RopePoint] {
        &self.points
    }

    pub fn sticks(&self) -> &[Stick] {
        &self.sticks
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn reset(&mut self) {
        self.points = self.initial.clone();
        self.time = 0.0;
    }

    pub fn step(&mut self, dt: f32) {
        self.integrate(dt);
        for _ in 0..self.params.passes {
            self.relax_pass();
        }
        self.time += dt;
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = Vec2::new(0.0, -self.params.gravity) * dt * dt;
        for point in self.points.iter_mut().filter(|p| !p.pinned) {
            let vel = (point.pos - point.old_pos) * self.params.damping;
            point.old_pos = point.pos;
            point.pos += vel + gravity;
        }
    }

    /// One sweep pulling every stick toward its rest length
    pub fn relax_pass(&mut self) {
        let split = self.params.split;
        for stick in &self.sticks {
            let (a, b) = (self.points[stick.p0], self.points[stick.p1]);
            if a.pinned && b.pinned {
                continue;
            }
            let delta = b.pos - a.pos;
            let dist = delta.length();
            if dist == 0.0 {
                continue;
            }
            let correction = delta * ((dist - stick.rest_length) / dist);

            match (a.pinned, b.pinned) {
                (false, false) => {
                    self.points[stick.p0].pos += correction * split;
                    self.points[stick.p1].pos -= correction * split;
                }
                (true, false) => self.points[stick.p1].pos -= correction * (2.0 * split),
                (false, true) => self.points[stick.p0].pos += correction * (2.0 * split),
                (true, true) => {}
            }
        }
    }

    /// Largest deviation of any stick from its rest length
    pub fn max_stretch(&self) -> f32 {
        self.sticks
            .iter()
            .map(|s| {
                let dist = self.points[s.p0].pos.distance(self.points[s.p1].pos);
                (dist - s.rest_length).abs()
            })
            .fold(0.0, f32::max)
    }

    pub fn total_length(&self) -> f32 {
        self.sticks
            .iter()
            .map(|s| self.points[s.p0].pos.distance(self.points[s.p1].pos))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn single_stick(split: f32) -> RopeSim {
        let points = vec![
            RopePoint::new(Vec2::ZERO, true),
            RopePoint::new(Vec2::new(3.0, 0.0), false),
        ];
        let sticks = vec![Stick {
            p0: 0,
            p1: 1,
            rest_length: 1.0,
        }];
        let params = RopeParams {
            split,
            ..Default::default()
        };
        RopeSim::from_parts(points, sticks, params).unwrap()
    }

    #[test]
    fn test_relaxation_converges_monotonically() {
        let mut rope = single_stick(0.25);
        let mut last = rope.max_stretch();
        assert_eq!(last, 2.0);
        for _ in 0..30 {
            rope.relax_pass();
            let err = rope.max_stretch();
            assert!(err <= last);
            last = err;
        }
        assert!(last < 1e-4);
        assert_eq!(rope.points()[0].pos, Vec2::ZERO);
    }

    #[test]
    fn test_pinned_end_takes_nothing() {
        let mut rope = single_stick(0.5);
        rope.relax_pass();
        // Free end gets the doubled share, landing exactly on rest length
        assert_eq!(rope.points()[0].pos, Vec2::ZERO);
        assert!((rope.points()[1].pos.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_anchor_stays_put_while_hanging() {
        let mut rope = RopeSim::new(RopeParams::default()).unwrap();
        let anchor = rope.points()[0].pos;
        for _ in 0..240 {
            rope.step(SIM_DT);
        }
        assert_eq!(rope.points()[0].pos, anchor);
        // Rope swung down below the anchor
        let tail = rope.points().last().unwrap().pos;
        assert!(tail.y < anchor.y);
    }

    #[test]
    fn test_more_passes_stiffer_rope() {
        let stretch_with = |passes| {
            let params = RopeParams {
                passes,
                ..Default::default()
            };
            let mut rope = RopeSim::new(params).unwrap();
            for _ in 0..120 {
                rope.step(SIM_DT);
            }
            rope.max_stretch()
        };
        assert!(stretch_with(50) < stretch_with(1));
    }

    #[test]
    fn test_reset_restores_points() {
        let mut rope = RopeSim::new(RopeParams::default()).unwrap();
        let before: Vec<Vec2> = rope.points().iter().map(|p| p.pos).collect();
        for _ in 0..30 {
            rope.step(SIM_DT);
        }
        rope.reset();
        let after: Vec<Vec2> = rope.points().iter().map(|p| p.pos).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_degenerate_sticks_dropped() {
        let points = vec![RopePoint::new(Vec2::ZERO, true), RopePoint::new(Vec2::X, false)];
        let sticks = vec![
            Stick { p0: 0, p1: 0, rest_length: 1.0 },
            Stick { p0: 0, p1: 5, rest_length: 1.0 },
            Stick { p0: 0, p1: 1, rest_length: 1.0 },
        ];
        let rope = RopeSim::from_parts(points, sticks, RopeParams::default()).unwrap();
        assert_eq!(rope.sticks().len(), 1);
    }

    #[test]
    fn test_rejects_zero_segments() {
        let params = RopeParams {
            segments: 0,
            ..Default::default()
        };
        assert!(RopeSim::new(params).is_err());
    }
}
