//! Lab settings: one parameter table per simulation plus an accuracy preset
//!
//! Persisted in LocalStorage on the web; native builds start from defaults.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};
use crate::heat::HeatParams;
use crate::maze::MazeKind;
use crate::path::Heuristic;
use crate::physics::{
    CircularParams, FreefallParams, GravityParams, Integrator, ProjectileParams, RopeParams, TrackParams,
};

/// Accuracy preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccuracyPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl AccuracyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccuracyPreset::Low => "Low",
            AccuracyPreset::Medium => "Medium",
            AccuracyPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(AccuracyPreset::Low),
            "medium" | "med" => Some(AccuracyPreset::Medium),
            "high" => Some(AccuracyPreset::High),
            _ => None,
        }
    }

    /// Rope relaxation passes per step
    pub fn rope_passes(&self) -> u32 {
        match self {
            AccuracyPreset::Low => 10,
            AccuracyPreset::Medium => 50,
            AccuracyPreset::High => 200,
        }
    }

    pub fn integrator(&self) -> Integrator {
        match self {
            AccuracyPreset::Low => Integrator::Euler,
            AccuracyPreset::Medium => Integrator::Euler,
            AccuracyPreset::High => Integrator::Rk4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeSettings {
    pub width: usize,
    pub height: usize,
    pub algorithm: MazeKind,
    /// Seconds between animated iterations; 0 animates one per frame
    pub delay: f32,
    /// Heuristic name for the solver run on the finished maze
    pub heuristic: String,
    /// Solve the thickened (wall tile) version
    pub thickened: bool,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            width: 20,
            height: 15,
            algorithm: MazeKind::Prim,
            delay: 0.0,
            heuristic: "manhattan".into(),
            thickened: false,
        }
    }
}

/// Lab settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabSettings {
    pub accuracy: AccuracyPreset,
    /// Seed for every randomized component
    pub seed: u64,
    /// Clock speed multiplier
    pub speed: f32,

    // === HUD ===
    /// Simulation name, clock and status lines over the drawing
    pub show_labels: bool,

    // === Simulations ===
    pub maze: MazeSettings,
    pub projectile: ProjectileParams,
    pub freefall: FreefallParams,
    pub circular: CircularParams,
    pub gravity: GravityParams,
    pub rope: RopeParams,
    pub heat: HeatParams,
    pub collision: TrackParams,
}

impl Default for LabSettings {
    fn default() -> Self {
        Self {
            accuracy: AccuracyPreset::Medium,
            seed: 2024,
            speed: 1.0,

            show_labels: true,

            maze: MazeSettings::default(),
            projectile: ProjectileParams::default(),
            freefall: FreefallParams::default(),
            circular: CircularParams::default(),
            gravity: GravityParams::default(),
            rope: RopeParams::default(),
            heat: HeatParams::default(),
            collision: TrackParams::default(),
        }
    }
}

impl LabSettings {
    /// Create settings from an accuracy preset (applies preset defaults)
    pub fn from_preset(preset: AccuracyPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply an accuracy preset (updates accuracy-dependent parameters)
    pub fn apply_preset(&mut self, preset: AccuracyPreset) {
        self.accuracy = preset;
        self.rope.passes = preset.rope_passes();
        self.gravity.integrator = preset.integrator();
    }

    pub fn heuristic(&self) -> Result<Heuristic> {
        Heuristic::parse(&self.maze.heuristic)
    }

    /// Check every table so bad names and ranges fail before a run starts
    pub fn validate(&self) -> Result<()> {
        if self.maze.width == 0 || self.maze.height == 0 {
            return Err(LabError::InvalidDimensions {
                width: self.maze.width,
                height: self.maze.height,
            });
        }
        self.heuristic()?;
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(LabError::InvalidParameter("speed must not be negative".into()));
        }
        self.projectile.validate()?;
        self.freefall.validate()?;
        self.circular.validate()?;
        self.gravity.validate()?;
        self.rope.validate()?;
        self.collision.validate()?;
        self.heat.validate()?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "physics_lab_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable; settings not saved");
            return;
        };
        match self.to_json() {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {:?}", e),
            },
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
