//! Frame driver: one clock, one active simulation, one draw surface
//!
//! The host calls [`Lab::frame`] once per animation tick. The lab turns the
//! host delta into fixed `SIM_DT` substeps, advances the simulation and draws
//! it. Everything else (pause, reset, switching simulations) is a method call
//! between frames.

use glam::Vec2;

use crate::clock::SimulationClock;
use crate::consts::SIM_DT;
use crate::error::{LabError, Result};
use crate::graph::{NodeGraph, NodeId};
use crate::heat::HeatGrid;
use crate::maze::{Maze2D, MazeGenerator};
use crate::path::{AStar, Heuristic, PathState, SearchStatus, path_length};
use crate::physics::{
    CircularMotionSim, CollisionTrack, FreefallSim, GravitySim, ProjectileSim, RopeSim,
};
use crate::render::shapes::{
    GridLayout, draw_body, draw_cursor, draw_ground, draw_heat, draw_label, draw_maze, draw_path,
    draw_rope, draw_search, draw_track, draw_trail,
};
use crate::render::{DrawSurface, Viewport, colors};
use crate::rng::{RngState, SeededRng};
use crate::settings::{LabSettings, MazeSettings};
use crate::step::{Animator, Progress, Steppable, run_to_completion};

const MARGIN: f32 = 24.0;

/// A self-contained simulation the lab can drive
pub trait Simulation {
    fn name(&self) -> &'static str;

    /// Advance by `dt` simulated seconds
    fn step(&mut self, dt: f32);

    /// Back to initial conditions
    fn reset(&mut self);

    fn draw(&self, surface: &mut dyn DrawSurface);

    /// HUD lines describing the current state
    fn status(&self) -> Vec<String> {
        Vec::new()
    }

    /// Nothing left to animate
    fn is_finished(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationKind {
    Maze,
    Projectile,
    Freefall,
    Circular,
    Gravity,
    Rope,
    Collision,
    Heat,
}

impl SimulationKind {
    pub const ALL: [SimulationKind; 8] = [
        SimulationKind::Maze,
        SimulationKind::Projectile,
        SimulationKind::Freefall,
        SimulationKind::Circular,
        SimulationKind::Gravity,
        SimulationKind::Rope,
        SimulationKind::Collision,
        SimulationKind::Heat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationKind::Maze => "maze",
            SimulationKind::Projectile => "projectile",
            SimulationKind::Freefall => "freefall",
            SimulationKind::Circular => "circular",
            SimulationKind::Gravity => "gravity",
            SimulationKind::Rope => "rope",
            SimulationKind::Collision => "collision",
            SimulationKind::Heat => "heat",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn parse(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| LabError::UnknownSimulation(name.to_string()))
    }

    /// Build a fresh simulation from the settings tables
    pub fn build(&self, settings: &LabSettings) -> Result<Box<dyn Simulation>> {
        Ok(match self {
            SimulationKind::Maze => Box::new(MazeSim::new(&settings.maze, settings.seed)?),
            SimulationKind::Projectile => Box::new(ProjectileSim::new(settings.projectile.clone())?),
            SimulationKind::Freefall => Box::new(FreefallSim::new(settings.freefall.clone())?),
            SimulationKind::Circular => Box::new(CircularMotionSim::new(settings.circular.clone())?),
            SimulationKind::Gravity => Box::new(GravitySim::star_system(settings.gravity.clone())?),
            SimulationKind::Rope => Box::new(RopeSim::new(settings.rope.clone())?),
            SimulationKind::Collision => Box::new(CollisionTrack::new(settings.collision.clone())?),
            SimulationKind::Heat => Box::new(HeatSim::new(&settings.heat)?),
        })
    }
}

pub struct Lab {
    kind: SimulationKind,
    settings: LabSettings,
    clock: SimulationClock,
    sim: Box<dyn Simulation>,
    frames: u64,
}

impl Lab {
    pub fn new(kind: SimulationKind, settings: LabSettings) -> Result<Self> {
        settings.validate()?;
        let sim = kind.build(&settings)?;
        let mut clock = SimulationClock::new();
        clock.set_speed(settings.speed);
        log::info!("Lab started with {} simulation", kind.as_str());
        Ok(Self {
            kind,
            settings,
            clock,
            sim,
            frames: 0,
        })
    }

    pub fn from_name(name: &str, settings: LabSettings) -> Result<Self> {
        Self::new(SimulationKind::parse(name)?, settings)
    }

    pub fn kind(&self) -> SimulationKind {
        self.kind
    }

    pub fn settings(&self) -> &LabSettings {
        &self.settings
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    pub fn simulation(&self) -> &dyn Simulation {
        self.sim.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance by one host frame and draw; returns the substeps run
    pub fn frame(&mut self, dt: f32, surface: &mut dyn DrawSurface) -> u32 {
        let substeps = self.clock.advance(dt);
        for _ in 0..substeps {
            self.sim.step(SIM_DT);
        }
        self.frames += 1;
        self.draw(surface);
        substeps
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.clear(colors::BACKGROUND);
        self.sim.draw(surface);
        if self.settings.show_labels {
            let mut header = format!("{}  t = {:.2} s", self.sim.name(), self.clock.elapsed());
            if self.clock.is_paused() {
                header.push_str("  [paused]");
            }
            draw_label(surface, 0, &header);
            for (i, line) in self.sim.status().iter().enumerate() {
                draw_label(surface, i + 1, line);
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        self.clock.toggle_pause();
        log::info!("Lab {}", if self.clock.is_paused() { "paused" } else { "resumed" });
    }

    pub fn reset(&mut self) {
        self.clock.reset();
        self.sim.reset();
        self.frames = 0;
        log::info!("Reset {} simulation", self.kind.as_str());
    }

    /// Replace the active simulation; the clock restarts
    pub fn switch(&mut self, kind: SimulationKind) -> Result<()> {
        self.sim = kind.build(&self.settings)?;
        self.kind = kind;
        self.clock.reset();
        self.frames = 0;
        log::info!("Switched to {} simulation", kind.as_str());
        Ok(())
    }

    /// Apply new settings and rebuild the active simulation
    pub fn apply_settings(&mut self, settings: LabSettings) -> Result<()> {
        settings.validate()?;
        self.sim = self.kind.build(&settings)?;
        self.clock.set_speed(settings.speed);
        self.clock.reset();
        self.settings = settings;
        Ok(())
    }
}

// === Maze generation followed by an A* solve ===

/// Solved maze with the search replayed one expansion per step
pub struct MazeSolution {
    pub maze: Maze2D,
    pub graph: NodeGraph,
    pub search: PathState,
    pub path: Vec<NodeId>,
    pub status: SearchStatus,
}

enum MazePhase {
    Generating(Animator<MazeGenerator<SeededRng>>),
    Solving { solution: MazeSolution, revealed: usize },
}

pub struct MazeSim {
    settings: MazeSettings,
    rng: RngState,
    heuristic: Heuristic,
    phase: MazePhase,
}

impl MazeSim {
    pub fn new(settings: &MazeSettings, seed: u64) -> Result<Self> {
        let heuristic = Heuristic::parse(&settings.heuristic)?;
        let rng = RngState::new(seed);
        let phase = Self::start(settings, rng)?;
        Ok(Self {
            settings: settings.clone(),
            rng,
            heuristic,
            phase,
        })
    }

    fn start(settings: &MazeSettings, rng: RngState) -> Result<MazePhase> {
        let generator = MazeGenerator::new(settings.algorithm, settings.width, settings.height, rng.to_source())?;
        let mut animator = Animator::new(generator, settings.delay);
        animator.subscribe(|p: &Progress<Maze2D>| {
            if p.is_final {
                log::debug!("Maze carved in {} iterations ({:.2} s)", p.iteration, p.elapsed);
            }
        });
        Ok(MazePhase::Generating(animator))
    }

    pub fn maze(&self) -> &Maze2D {
        match &self.phase {
            MazePhase::Generating(animator) => animator.machine().state(),
            MazePhase::Solving { solution, .. } => &solution.maze,
        }
    }

    pub fn solution(&self) -> Option<&MazeSolution> {
        match &self.phase {
            MazePhase::Solving { solution, .. } => Some(solution),
            MazePhase::Generating(_) => None,
        }
    }

    /// Solve from the first to the last open tile
    fn solve(&self, maze: Maze2D) -> MazeSolution {
        let maze = if self.settings.thickened { maze.thickened() } else { maze };
        let graph = NodeGraph::from_maze(&maze);
        let from = graph.nodes().iter().position(|n| n.traversable).unwrap_or(0);
        let to = graph.nodes().iter().rposition(|n| n.traversable).unwrap_or(0);

        let mut search = AStar::new(&graph, from, to, self.heuristic);
        run_to_completion(&mut search);
        let path = search.path();
        let status = search.status();
        let state = search.state().clone();
        log::info!(
            "Solved maze with {}: {} steps, {} nodes expanded",
            self.heuristic.as_str(),
            path_length(&path),
            state.closed.len()
        );
        MazeSolution {
            maze,
            graph,
            search: state,
            path,
            status,
        }
    }
}

impl Simulation for MazeSim {
    fn name(&self) -> &'static str {
        SimulationKind::Maze.as_str()
    }

    fn step(&mut self, dt: f32) {
        let finished = match &mut self.phase {
            MazePhase::Generating(animator) => {
                animator.advance(dt);
                animator.is_finished().then(|| animator.machine().state().clone())
            }
            MazePhase::Solving { solution, revealed } => {
                *revealed = (*revealed + 1).min(solution.search.closed.len());
                None
            }
        };
        if let Some(maze) = finished {
            let solution = self.solve(maze);
            self.phase = MazePhase::Solving { solution, revealed: 0 };
        }
    }

    fn reset(&mut self) {
        match Self::start(&self.settings, self.rng) {
            Ok(phase) => self.phase = phase,
            Err(e) => log::warn!("Maze reset failed: {}", e),
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let maze = self.maze();
        let layout = GridLayout::fit(maze.width(), maze.height(), surface.size());
        match &self.phase {
            MazePhase::Generating(animator) => {
                draw_maze(surface, maze, &layout);
                if let Some(cursor) = animator.machine().cursor() {
                    draw_cursor(surface, maze, cursor, &layout);
                }
            }
            MazePhase::Solving { solution, revealed } => {
                let done = *revealed >= solution.search.closed.len();
                let shown = PathState {
                    open: if done { solution.search.open.clone() } else { Vec::new() },
                    closed: solution.search.closed[..*revealed].to_vec(),
                    current: revealed.checked_sub(1).map(|i| solution.search.closed[i].id),
                };
                draw_search(surface, &solution.graph, &shown, &layout);
                draw_maze(surface, maze, &layout);
                if done {
                    draw_path(surface, &solution.graph, &solution.path, &layout);
                }
            }
        }
    }

    fn status(&self) -> Vec<String> {
        match &self.phase {
            MazePhase::Generating(animator) => vec![format!(
                "{} {}x{}: {} iterations",
                animator.machine().kind().as_str(),
                self.settings.width,
                self.settings.height,
                animator.machine().iterations()
            )],
            MazePhase::Solving { solution, revealed } => vec![
                format!("A* ({}): {} / {} expanded", self.heuristic.as_str(), revealed, solution.search.closed.len()),
                format!("path length {}", path_length(&solution.path)),
            ],
        }
    }

    fn is_finished(&self) -> bool {
        match &self.phase {
            MazePhase::Generating(_) => false,
            MazePhase::Solving { solution, revealed } => *revealed >= solution.search.closed.len(),
        }
    }
}

// === Heat grid ===

/// Heat grid advanced at `time_scale` simulated seconds per lab second
pub struct HeatSim {
    grid: HeatGrid,
    time_scale: f64,
}

impl HeatSim {
    pub fn new(params: &crate::heat::HeatParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            grid: HeatGrid::from_params(params)?,
            time_scale: params.time_scale,
        })
    }

    pub fn grid(&self) -> &HeatGrid {
        &self.grid
    }
}

impl Simulation for HeatSim {
    fn name(&self) -> &'static str {
        SimulationKind::Heat.as_str()
    }

    fn step(&mut self, dt: f32) {
        self.grid.step(f64::from(dt) * self.time_scale);
    }

    fn reset(&mut self) {
        self.grid.reset();
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let layout = GridLayout::fit(self.grid.width(), self.grid.height(), surface.size());
        draw_heat(surface, &self.grid, &layout);
    }

    fn status(&self) -> Vec<String> {
        let (lo, hi) = self.grid.temperature_range();
        vec![
            format!("{:.0} s simulated", self.grid.time()),
            format!("{:.1} K .. {:.1} K, mean {:.1} K", lo, hi, self.grid.mean_temperature()),
        ]
    }
}

// === Physics simulators ===

impl Simulation for ProjectileSim {
    fn name(&self) -> &'static str {
        SimulationKind::Projectile.as_str()
    }

    fn step(&mut self, dt: f32) {
        ProjectileSim::step(self, dt);
    }

    fn reset(&mut self) {
        ProjectileSim::reset(self);
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let p = self.params();
        let max = Vec2::new(p.range().max(1.0), p.max_height().max(1.0));
        let view = Viewport::fit(Vec2::ZERO, max, surface.size(), MARGIN);
        draw_ground(surface, &view, 0.0, max.x);
        draw_trail(surface, &view, &self.body.trail, 3.0, p.speed.max(1.0));
        draw_body(surface, &view, &self.body, colors::BODY);
    }

    fn status(&self) -> Vec<String> {
        let p = self.params();
        vec![
            format!("x = {:.2} m, y = {:.2} m", self.body.pos.x, self.body.pos.y),
            format!("range {:.2} m, peak {:.2} m, flight {:.2} s", p.range(), p.max_height(), p.time_of_flight()),
        ]
    }

    fn is_finished(&self) -> bool {
        self.has_landed()
    }
}

impl Simulation for FreefallSim {
    fn name(&self) -> &'static str {
        SimulationKind::Freefall.as_str()
    }

    fn step(&mut self, dt: f32) {
        FreefallSim::step(self, dt);
    }

    fn reset(&mut self) {
        FreefallSim::reset(self);
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let height = self.params().height.max(1.0);
        let view = Viewport::fit(Vec2::new(-height * 0.25, 0.0), Vec2::new(height * 0.25, height), surface.size(), MARGIN);
        draw_ground(surface, &view, -height * 0.25, height * 0.25);
        draw_body(surface, &view, &self.body, colors::BODY);
    }

    fn status(&self) -> Vec<String> {
        let mut lines = vec![format!("height {:.2} m, speed {:.2} m/s", self.body.pos.y, self.body.vel.length())];
        let terminal = self.params().terminal_velocity();
        if terminal.is_finite() {
            lines.push(format!("terminal velocity {:.2} m/s", terminal));
        }
        if let Some(impact) = self.impact_speed() {
            lines.push(format!("impact at {:.2} m/s", impact));
        }
        lines
    }

    fn is_finished(&self) -> bool {
        self.has_landed()
    }
}

impl Simulation for CircularMotionSim {
    fn name(&self) -> &'static str {
        SimulationKind::Circular.as_str()
    }

    fn step(&mut self, dt: f32) {
        CircularMotionSim::step(self, dt);
    }

    fn reset(&mut self) {
        CircularMotionSim::reset(self);
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let r = self.params().radius;
        let view = Viewport::fit(Vec2::splat(-r * 1.2), Vec2::splat(r * 1.2), surface.size(), MARGIN);
        let centre = view.to_screen(Vec2::ZERO);
        surface.arc(centre, view.length(r), colors::GROUND, false);
        surface.stroke_path(&[centre, view.to_screen(self.body.pos)], colors::GROUND, 1.0, false);
        draw_trail(surface, &view, &self.body.trail, 3.0, self.params().tangential_speed().max(1.0));
        draw_body(surface, &view, &self.body, colors::BODY);
    }

    fn status(&self) -> Vec<String> {
        let p = self.params();
        vec![
            format!("period {:.2} s, speed {:.2} m/s", p.period(), p.tangential_speed()),
            format!(
                "centripetal {:.2} m/s², force {:.2} N",
                p.centripetal_acceleration(),
                p.centripetal_force()
            ),
        ]
    }
}

impl Simulation for GravitySim {
    fn name(&self) -> &'static str {
        SimulationKind::Gravity.as_str()
    }

    fn step(&mut self, dt: f32) {
        GravitySim::step(self, dt);
    }

    fn reset(&mut self) {
        GravitySim::reset(self);
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let com = self.center_of_mass();
        let extent = self
            .bodies()
            .iter()
            .map(|b| b.pos.distance(com))
            .fold(10.0f32, f32::max)
            * 1.2;
        let view = Viewport::fit(com - Vec2::splat(extent), com + Vec2::splat(extent), surface.size(), MARGIN);
        let heaviest = self.bodies().iter().map(|b| b.mass).fold(0.0f32, f32::max);
        for body in self.bodies() {
            let max_speed = body.trail.iter().map(|t| t.speed).fold(1.0f32, f32::max);
            draw_trail(surface, &view, &body.trail, 2.0, max_speed);
            let color = if body.mass == heaviest { colors::STAR } else { colors::BODY };
            draw_body(surface, &view, body, color);
        }
    }

    fn status(&self) -> Vec<String> {
        let p = self.total_momentum();
        vec![
            format!("{} bodies, {}", self.bodies().len(), self.params().integrator.as_str()),
            format!("momentum ({:.3}, {:.3}), kinetic {:.2}", p.x, p.y, self.kinetic_energy()),
        ]
    }
}

impl Simulation for RopeSim {
    fn name(&self) -> &'static str {
        SimulationKind::Rope.as_str()
    }

    fn step(&mut self, dt: f32) {
        RopeSim::step(self, dt);
    }

    fn reset(&mut self) {
        RopeSim::reset(self);
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let p = self.params();
        let reach = p.segments as f32 * p.segment_length * 1.1;
        let view = Viewport::fit(p.anchor - Vec2::splat(reach), p.anchor + Vec2::new(reach, reach * 0.25), surface.size(), MARGIN);
        draw_rope(surface, &view, self);
    }

    fn status(&self) -> Vec<String> {
        vec![
            format!("{} passes per step", self.params().passes),
            format!("stretch {:.4} m", self.max_stretch()),
            format!("length {:.3} m", self.total_length()),
        ]
    }
}

impl Simulation for CollisionTrack {
    fn name(&self) -> &'static str {
        SimulationKind::Collision.as_str()
    }

    fn step(&mut self, dt: f32) {
        CollisionTrack::step(self, dt);
    }

    fn reset(&mut self) {
        CollisionTrack::reset(self);
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        let length = self.params().length;
        let view = Viewport::fit(Vec2::ZERO, Vec2::new(length, length * 0.25), surface.size(), MARGIN);
        draw_track(surface, &view, self);
    }

    fn status(&self) -> Vec<String> {
        let [a, b] = self.carts();
        vec![
            format!("v1 = {:.2} m/s, v2 = {:.2} m/s", a.vel, b.vel),
            format!(
                "momentum {:.3}, kinetic {:.3}, {} collisions",
                self.total_momentum(),
                self.kinetic_energy(),
                self.collisions()
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::MazeKind;
    use crate::render::{CommandList, DrawCommand};

    fn small_settings() -> LabSettings {
        let mut settings = LabSettings::default();
        settings.maze.width = 6;
        settings.maze.height = 5;
        settings
    }

    #[test]
    fn test_unknown_simulation() {
        assert!(matches!(
            Lab::from_name("warp-drive", LabSettings::default()),
            Err(LabError::UnknownSimulation(_))
        ));
        assert_eq!(SimulationKind::from_name("Rope"), Some(SimulationKind::Rope));
    }

    #[test]
    fn test_every_kind_runs_and_draws() {
        for kind in SimulationKind::ALL {
            let mut lab = Lab::new(kind, small_settings()).unwrap();
            let mut list = CommandList::new(640.0, 480.0);
            for _ in 0..30 {
                list.clear_commands();
                lab.frame(1.0 / 60.0, &mut list);
            }
            assert_eq!(list.commands.first(), Some(&DrawCommand::Clear { color: colors::BACKGROUND }));
            assert!(list.len() > 2, "{} drew nothing", kind.as_str());
            assert!(lab.clock().elapsed() > 0.4);
        }
    }

    #[test]
    fn test_frame_runs_fixed_substeps() {
        let mut lab = Lab::new(SimulationKind::Projectile, LabSettings::default()).unwrap();
        let mut list = CommandList::new(320.0, 240.0);
        assert_eq!(lab.frame(2.25 * SIM_DT, &mut list), 2);
        assert_eq!(lab.frame(0.8 * SIM_DT, &mut list), 1);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut lab = Lab::new(SimulationKind::Circular, LabSettings::default()).unwrap();
        let mut list = CommandList::new(320.0, 240.0);
        lab.frame(0.05, &mut list);
        lab.toggle_pause();
        let before = lab.clock().elapsed();
        for _ in 0..10 {
            assert_eq!(lab.frame(0.05, &mut list), 0);
        }
        assert_eq!(lab.clock().elapsed(), before);
        assert!(list.commands.iter().any(|c| matches!(c, DrawCommand::Text { text, .. } if text.contains("[paused]"))));
    }

    #[test]
    fn test_reset_replays_identically() {
        for kind in [SimulationKind::Gravity, SimulationKind::Rope, SimulationKind::Maze] {
            let mut lab = Lab::new(kind, small_settings()).unwrap();
            let mut first = CommandList::new(320.0, 240.0);
            lab.frame(1.0 / 60.0, &mut first);
            let mut scratch = CommandList::new(320.0, 240.0);
            for _ in 0..20 {
                lab.frame(1.0 / 60.0, &mut scratch);
            }

            lab.reset();
            assert_eq!(lab.clock().elapsed(), 0.0);
            let mut again = CommandList::new(320.0, 240.0);
            lab.frame(1.0 / 60.0, &mut again);
            assert_eq!(again, first, "{} reset drifted", kind.as_str());
        }
    }

    #[test]
    fn test_maze_generates_then_solves() {
        let settings = small_settings();
        let mut sim = MazeSim::new(&settings.maze, settings.seed).unwrap();
        let mut steps = 0;
        while !sim.is_finished() {
            sim.step(SIM_DT);
            steps += 1;
            assert!(steps < 10_000);
        }

        let solution = sim.solution().unwrap();
        assert_eq!(solution.maze.open_edge_count(), 6 * 5 - 1);
        assert_eq!(solution.status, SearchStatus::Found);
        let bfs = solution.graph.bfs_distances(0)[29].unwrap();
        assert_eq!(path_length(&solution.path), bfs);
    }

    #[test]
    fn test_thickened_maze_solves_between_open_tiles() {
        let mut settings = small_settings();
        settings.maze.thickened = true;
        settings.maze.algorithm = MazeKind::AldousBroder;
        let mut sim = MazeSim::new(&settings.maze, 3).unwrap();
        while !sim.is_finished() {
            sim.step(SIM_DT);
        }
        let solution = sim.solution().unwrap();
        assert_eq!(solution.maze.width(), 13);
        assert_eq!(solution.status, SearchStatus::Found);
        assert_eq!(solution.path.first(), Some(&(13 + 1)));
    }

    #[test]
    fn test_status_reports_generator_and_rope_length() {
        let mut settings = small_settings();
        settings.maze.algorithm = MazeKind::AldousBroder;
        let sim = MazeSim::new(&settings.maze, 5).unwrap();
        assert!(sim.status()[0].starts_with("aldous-broder 6x5"));

        let rope = SimulationKind::Rope.build(&settings).unwrap();
        let expected = settings.rope.segments as f32 * settings.rope.segment_length;
        assert_eq!(rope.status()[2], format!("length {:.3} m", expected));
    }

    #[test]
    fn test_negative_heat_time_scale_is_rejected() {
        let mut settings = small_settings();
        settings.heat.time_scale = -200.0;
        assert!(matches!(
            Lab::new(SimulationKind::Heat, settings),
            Err(LabError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_bad_heuristic_fails_before_running() {
        let mut settings = small_settings();
        settings.maze.heuristic = "as-the-crow-flies".into();
        assert!(matches!(
            Lab::new(SimulationKind::Maze, settings),
            Err(LabError::UnknownHeuristic(_))
        ));
    }

    #[test]
    fn test_switch_restarts_clock() {
        let mut lab = Lab::new(SimulationKind::Rope, LabSettings::default()).unwrap();
        let mut list = CommandList::new(320.0, 240.0);
        lab.frame(0.05, &mut list);
        lab.switch(SimulationKind::Heat).unwrap();
        assert_eq!(lab.kind(), SimulationKind::Heat);
        assert_eq!(lab.clock().elapsed(), 0.0);
        assert_eq!(lab.simulation().name(), "heat");
    }

    #[test]
    fn test_projectile_finishes() {
        let mut lab = Lab::new(SimulationKind::Projectile, LabSettings::default()).unwrap();
        let mut list = CommandList::new(320.0, 240.0);
        for _ in 0..400 {
            lab.frame(1.0 / 60.0, &mut list);
        }
        assert!(lab.simulation().is_finished());
    }
}
