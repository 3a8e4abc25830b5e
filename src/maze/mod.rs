//! Maze generation
//!
//! Both generators start from an all-walled grid and produce a perfect maze
//! (a spanning tree over the cells). They are step machines: run them to
//! completion with [`generate_maze`], or hand them to an
//! [`Animator`](crate::step::Animator) to watch them carve.

pub mod aldous_broder;
pub mod grid;
pub mod prim;

pub use aldous_broder::AldousBroder;
pub use grid::{Direction, Maze2D, Passable, Tile};
pub use prim::Prim;

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};
use crate::platform::now_ms;
use crate::rng::RandomSource;
use crate::step::{StepResult, Steppable, run_to_completion};

/// Available generation algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MazeKind {
    #[default]
    AldousBroder,
    Prim,
}

impl MazeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MazeKind::AldousBroder => "aldous-broder",
            MazeKind::Prim => "prim",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "aldous-broder" | "aldous_broder" | "aldousbroder" => Some(MazeKind::AldousBroder),
            "prim" | "prims" | "prim's" => Some(MazeKind::Prim),
            _ => None,
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| LabError::InvalidParameter(format!("maze algorithm '{name}'")))
    }
}

/// Finished maze plus run statistics
#[derive(Debug, Clone, Serialize)]
pub struct MazeReport {
    pub maze: Maze2D,
    pub execution_time_ms: f64,
    pub iterations: u64,
}

/// Run any maze step machine to completion and report
pub fn generate<S>(mut machine: S) -> MazeReport
where
    S: Steppable<State = Maze2D>,
{
    let start = now_ms();
    run_to_completion(&mut machine);
    let execution_time_ms = (now_ms() - start).max(0.0);

    let maze = machine.state().clone();
    log::debug!(
        "Generated {}x{} maze in {} iterations ({:.2} ms)",
        maze.width(),
        maze.height(),
        machine.iterations(),
        execution_time_ms
    );
    MazeReport {
        maze,
        execution_time_ms,
        iterations: machine.iterations(),
    }
}

/// Either generator behind one step machine type
pub enum MazeGenerator<R: RandomSource> {
    AldousBroder(AldousBroder<R>),
    Prim(Prim<R>),
}

impl<R: RandomSource> MazeGenerator<R> {
    pub fn new(kind: MazeKind, width: usize, height: usize, rng: R) -> Result<Self> {
        Ok(match kind {
            MazeKind::AldousBroder => MazeGenerator::AldousBroder(AldousBroder::new(width, height, rng)?),
            MazeKind::Prim => MazeGenerator::Prim(Prim::new(width, height, rng)?),
        })
    }

    pub fn kind(&self) -> MazeKind {
        match self {
            MazeGenerator::AldousBroder(_) => MazeKind::AldousBroder,
            MazeGenerator::Prim(_) => MazeKind::Prim,
        }
    }
}

impl<R: RandomSource> Steppable for MazeGenerator<R> {
    type State = Maze2D;

    fn step(&mut self) -> StepResult {
        match self {
            MazeGenerator::AldousBroder(g) => g.step(),
            MazeGenerator::Prim(g) => g.step(),
        }
    }

    fn state(&self) -> &Maze2D {
        match self {
            MazeGenerator::AldousBroder(g) => g.state(),
            MazeGenerator::Prim(g) => g.state(),
        }
    }

    fn cursor(&self) -> Option<usize> {
        match self {
            MazeGenerator::AldousBroder(g) => g.cursor(),
            MazeGenerator::Prim(g) => g.cursor(),
        }
    }

    fn iterations(&self) -> u64 {
        match self {
            MazeGenerator::AldousBroder(g) => g.iterations(),
            MazeGenerator::Prim(g) => g.iterations(),
        }
    }

    fn is_done(&self) -> bool {
        match self {
            MazeGenerator::AldousBroder(g) => g.is_done(),
            MazeGenerator::Prim(g) => g.is_done(),
        }
    }
}

/// Generate a maze synchronously with the chosen algorithm
pub fn generate_maze<R: RandomSource>(
    kind: MazeKind,
    width: usize,
    height: usize,
    rng: R,
) -> Result<MazeReport> {
    let report = generate(MazeGenerator::new(kind, width, height, rng)?);
    log::info!(
        "{} maze {}x{}: {} iterations",
        kind.as_str(),
        width,
        height,
        report.iterations
    );
    Ok(report)
}
