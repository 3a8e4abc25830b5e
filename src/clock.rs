//! Simulation clock
//!
//! Turns host frame deltas into a whole number of fixed substeps. The clock
//! owns the only notion of time a simulation sees.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationClock {
    /// Simulated seconds since the last reset
    elapsed: f32,
    /// Paused clocks accept no time at all
    paused: bool,
    /// Multiplier applied to every host delta
    speed: f32,
    /// Unconsumed time below one substep
    accumulator: f32,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            paused: false,
            speed: 1.0,
            accumulator: 0.0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the speed multiplier (negative or non-finite values become 0)
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Back to zero; keeps speed and pause state
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.accumulator = 0.0;
    }

    /// Scaled delta for this frame (0 while paused or for invalid input)
    pub fn scaled(&self, dt: f32) -> f32 {
        if self.paused || !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        dt.min(MAX_FRAME_DT) * self.speed
    }

    /// Feed one host frame; returns how many `SIM_DT` substeps to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = self.scaled(dt);
        if dt == 0.0 {
            return 0;
        }
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            self.elapsed += SIM_DT;
            substeps += 1;
        }
        // Drop the backlog rather than spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}
