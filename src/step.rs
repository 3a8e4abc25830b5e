//! Step machines and the animation driver
//!
//! Long-running algorithms (maze generation, pathfinding) expose one iteration
//! at a time through [`Steppable`]. Running to completion is a plain loop;
//! running "animated" hands the machine to an [`Animator`], which the host
//! advances with its frame delta. The algorithms never see timers or
//! observers.

use serde::Serialize;

/// Outcome of a single iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepResult {
    Continue,
    Done,
}

/// An algorithm that can be advanced one iteration at a time
pub trait Steppable {
    /// Observable working state (maze, search state, ...)
    type State: Clone;

    /// Perform one iteration. Calling again after `Done` is a no-op returning `Done`.
    fn step(&mut self) -> StepResult;

    fn state(&self) -> &Self::State;

    /// Cell/node the algorithm is currently looking at
    fn cursor(&self) -> Option<usize>;

    /// Iterations performed so far
    fn iterations(&self) -> u64;

    fn is_done(&self) -> bool;
}

/// Run a step machine to completion
pub fn run_to_completion<S: Steppable>(machine: &mut S) {
    while machine.step() == StepResult::Continue {}
}

/// Snapshot handed to observers after each animated iteration
#[derive(Debug, Clone, Serialize)]
pub struct Progress<T> {
    pub state: T,
    pub cursor: Option<usize>,
    pub iteration: u64,
    /// Host time fed to the animator so far (seconds)
    pub elapsed: f32,
    pub is_final: bool,
}

type Observer<T> = Box<dyn FnMut(&Progress<T>)>;

/// Cooperative driver that performs one iteration per `delay` of host time
pub struct Animator<S: Steppable> {
    machine: S,
    delay: f32,
    accumulator: f32,
    elapsed: f32,
    playing: bool,
    cancelled: bool,
    observers: Vec<Observer<S::State>>,
}

impl<S: Steppable> Animator<S> {
    /// `delay` is seconds between iterations; 0 runs one iteration per `advance`
    pub fn new(machine: S, delay: f32) -> Self {
        Self {
            machine,
            delay: if delay.is_finite() { delay.max(0.0) } else { 0.0 },
            accumulator: 0.0,
            elapsed: 0.0,
            playing: true,
            cancelled: false,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Progress<S::State>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn machine(&self) -> &S {
        &self.machine
    }

    pub fn is_playing(&self) -> bool {
        self.playing && !self.cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled || self.machine.is_done()
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop for good; further `advance`/`step_once` calls do nothing
    pub fn cancel(&mut self) {
        if !self.cancelled {
            log::debug!("Animator cancelled after {} iterations", self.machine.iterations());
        }
        self.cancelled = true;
    }

    /// Feed host time; returns the number of iterations performed
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.is_playing() || self.machine.is_done() {
            return 0;
        }
        if !dt.is_finite() || dt < 0.0 {
            return 0;
        }
        self.elapsed += dt;
        self.accumulator += dt;

        if self.delay == 0.0 {
            self.accumulator = 0.0;
            return u32::from(self.iterate());
        }

        let mut performed = 0;
        while self.accumulator >= self.delay && !self.machine.is_done() {
            self.accumulator -= self.delay;
            if self.iterate() {
                performed += 1;
            }
        }
        performed
    }

    /// One iteration regardless of timing (still honours pause and cancel)
    pub fn step_once(&mut self) -> StepResult {
        if !self.is_playing() || self.machine.is_done() {
            return if self.machine.is_done() {
                StepResult::Done
            } else {
                StepResult::Continue
            };
        }
        self.iterate();
        if self.machine.is_done() {
            StepResult::Done
        } else {
            StepResult::Continue
        }
    }

    fn iterate(&mut self) -> bool {
        if self.machine.is_done() {
            return false;
        }
        let result = self.machine.step();
        if self.observers.is_empty() {
            return true;
        }
        let progress = Progress {
            state: self.machine.state().clone(),
            cursor: self.machine.cursor(),
            iteration: self.machine.iterations(),
            elapsed: self.elapsed,
            is_final: result == StepResult::Done,
        };
        for observer in self.observers.iter_mut() {
            observer(&progress);
        }
        true
    }
}
