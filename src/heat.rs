//! Explicit heat diffusion over a grid of material cells
//!
//! Every non-source cell exchanges `q = k · area · ΔT · dt` with each of its
//! up-to-4 orthogonal neighbours, where `k` is the mean conductivity of the
//! pair, and turns the net heat into `ΔT = q / (mass · c)`. Deltas come from
//! the previous step's temperatures. The scheme is forward Euler with no
//! stability limit: a large `dt` or `k` overshoots and can diverge.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// Bulk thermal properties (SI units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// kg/m³
    pub density: f64,
    /// W/(m·K)
    pub conductivity: f64,
    /// J/(kg·K)
    pub specific_heat: f64,
}

impl Material {
    pub const COPPER: Material = Material {
        density: 8960.0,
        conductivity: 401.0,
        specific_heat: 385.0,
    };
    pub const ALUMINUM: Material = Material {
        density: 2700.0,
        conductivity: 237.0,
        specific_heat: 897.0,
    };
    pub const STEEL: Material = Material {
        density: 7850.0,
        conductivity: 50.0,
        specific_heat: 500.0,
    };
    pub const GLASS: Material = Material {
        density: 2500.0,
        conductivity: 1.0,
        specific_heat: 840.0,
    };
    pub const WOOD: Material = Material {
        density: 700.0,
        conductivity: 0.15,
        specific_heat: 1700.0,
    };

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "copper" => Some(Self::COPPER),
            "aluminum" | "aluminium" => Some(Self::ALUMINUM),
            "steel" => Some(Self::STEEL),
            "glass" => Some(Self::GLASS),
            "wood" => Some(Self::WOOD),
            _ => None,
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| LabError::InvalidParameter(format!("unknown material: {name}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatCell {
    /// Kelvin
    pub temperature: f64,
    pub density: f64,
    pub conductivity: f64,
    pub specific_heat: f64,
    /// Held at a fixed temperature
    pub source: bool,
}

impl HeatCell {
    pub fn new(material: Material, temperature: f64) -> Self {
        Self {
            temperature,
            density: material.density,
            conductivity: material.conductivity,
            specific_heat: material.specific_heat,
            source: false,
        }
    }

    pub fn set_material(&mut self, material: Material) {
        self.density = material.density;
        self.conductivity = material.conductivity;
        self.specific_heat = material.specific_heat;
    }
}

/// Lab configuration: a bar heated along its left edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatParams {
    pub width: usize,
    pub height: usize,
    /// Cell edge length (m)
    pub cell_size: f64,
    pub material: String,
    pub ambient: f64,
    pub source_temperature: f64,
    /// Simulated seconds per wall-clock second
    pub time_scale: f64,
}

impl Default for HeatParams {
    fn default() -> Self {
        Self {
            width: 40,
            height: 20,
            cell_size: 0.01,
            material: "copper".into(),
            ambient: 293.15,
            source_temperature: 373.15,
            time_scale: 200.0,
        }
    }
}

impl HeatParams {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LabError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(LabError::InvalidParameter("cell size must be positive".into()));
        }
        if !(self.ambient.is_finite() && self.source_temperature.is_finite()) {
            return Err(LabError::InvalidParameter("heat temperatures must be finite".into()));
        }
        // Negative time would run diffusion backwards
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(LabError::InvalidParameter("heat time scale must not be negative".into()));
        }
        Material::parse(&self.material)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HeatGrid {
    width: usize,
    height: usize,
    cell_size: f64,
    cells: Vec<HeatCell>,
    next: Vec<f64>,
    initial: Vec<HeatCell>,
    time: f64,
}

impl HeatGrid {
    pub fn new(width: usize, height: usize, cell_size: f64, material: Material, ambient: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LabError::InvalidDimensions { width, height });
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(LabError::InvalidParameter("cell size must be positive".into()));
        }
        let cells = vec![HeatCell::new(material, ambient); width * height];
        Ok(Self {
            width,
            height,
            cell_size,
            next: vec![ambient; cells.len()],
            initial: cells.clone(),
            cells,
            time: 0.0,
        })
    }

    pub fn from_params(params: &HeatParams) -> Result<Self> {
        let material = Material::parse(&params.material)?;
        let mut grid = Self::new(params.width, params.height, params.cell_size, material, params.ambient)?;
        for y in 0..params.height {
            grid.set_source(0, y, params.source_temperature)?;
        }
        grid.mark_initial();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn cells(&self) -> &[HeatCell] {
        &self.cells
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&HeatCell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut HeatCell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    pub fn set_source(&mut self, x: usize, y: usize, temperature: f64) -> Result<()> {
        let cell = self
            .cell_mut(x, y)
            .ok_or_else(|| LabError::InvalidParameter(format!("cell ({x}, {y}) outside grid")))?;
        cell.temperature = temperature;
        cell.source = true;
        Ok(())
    }

    pub fn set_temperature(&mut self, x: usize, y: usize, temperature: f64) -> Result<()> {
        let cell = self
            .cell_mut(x, y)
            .ok_or_else(|| LabError::InvalidParameter(format!("cell ({x}, {y}) outside grid")))?;
        cell.temperature = temperature;
        Ok(())
    }

    /// Current cells become the state `reset` returns to
    pub fn mark_initial(&mut self) {
        self.initial = self.cells.clone();
    }

    pub fn reset(&mut self) {
        self.cells = self.initial.clone();
        self.time = 0.0;
    }

    pub fn face_area(&self) -> f64 {
        self.cell_size * self.cell_size
    }

    pub fn cell_volume(&self) -> f64 {
        self.cell_size * self.cell_size * self.cell_size
    }

    pub fn step(&mut self, dt: f64) {
        let area = self.face_area();
        let volume = self.cell_volume();

        for y in 0..self.height {
            for x in 0..self.width {
                let i = y * self.width + x;
                let cell = self.cells[i];
                if cell.source {
                    self.next[i] = cell.temperature;
                    continue;
                }

                let neighbours = [
                    x.checked_sub(1).map(|nx| (nx, y)),
                    (x + 1 < self.width).then_some((x + 1, y)),
                    y.checked_sub(1).map(|ny| (x, ny)),
                    (y + 1 < self.height).then_some((x, y + 1)),
                ];
                let q: f64 = neighbours
                    .into_iter()
                    .flatten()
                    .map(|(nx, ny)| {
                        let other = &self.cells[ny * self.width + nx];
                        let k = (cell.conductivity + other.conductivity) * 0.5;
                        k * area * (other.temperature - cell.temperature) * dt
                    })
                    .sum();

                let mass = cell.density * volume;
                self.next[i] = cell.temperature + q / (mass * cell.specific_heat);
            }
        }

        for (cell, t) in self.cells.iter_mut().zip(&self.next) {
            cell.temperature = *t;
        }
        self.time += dt;
    }

    /// Σ m·c·T over all cells (J)
    pub fn thermal_energy(&self) -> f64 {
        let volume = self.cell_volume();
        self.cells
            .iter()
            .map(|c| c.density * volume * c.specific_heat * c.temperature)
            .sum()
    }

    pub fn temperature_range(&self) -> (f64, f64) {
        self.cells.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.temperature), hi.max(c.temperature))
        })
    }

    pub fn mean_temperature(&self) -> f64 {
        self.cells.iter().map(|c| c.temperature).sum::<f64>() / self.cells.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hot_spot() -> HeatGrid {
        let mut grid = HeatGrid::new(6, 4, 0.01, Material::COPPER, 300.0).unwrap();
        grid.set_temperature(2, 1, 500.0).unwrap();
        grid
    }

    #[test]
    fn test_energy_conserved_without_sources() {
        let mut grid = hot_spot();
        let before = grid.thermal_energy();
        for _ in 0..500 {
            grid.step(0.01);
        }
        let after = grid.thermal_energy();
        assert!(((after - before) / before).abs() < 1e-9);
    }

    #[test]
    fn test_heat_flows_from_hot_to_cold() {
        let mut grid = hot_spot();
        grid.step(0.01);
        assert!(grid.cell(2, 1).unwrap().temperature < 500.0);
        assert!(grid.cell(3, 1).unwrap().temperature > 300.0);
        // Diagonal cells only warm on the following step
        assert_eq!(grid.cell(3, 2).unwrap().temperature, 300.0);
        grid.step(0.01);
        assert!(grid.cell(3, 2).unwrap().temperature > 300.0);
    }

    #[test]
    fn test_sources_hold_temperature() {
        let mut grid = HeatGrid::from_params(&HeatParams::default()).unwrap();
        for _ in 0..200 {
            grid.step(1.0);
        }
        for y in 0..grid.height() {
            assert_eq!(grid.cell(0, y).unwrap().temperature, 373.15);
        }
        assert!(grid.cell(1, 0).unwrap().temperature > 293.15);
    }

    #[test]
    fn test_uses_previous_step_snapshot() {
        // 1x3 bar: the middle cell's update must not see its left neighbour's new value
        let mut grid = HeatGrid::new(3, 1, 1.0, Material::STEEL, 0.0).unwrap();
        grid.set_temperature(0, 0, 100.0).unwrap();
        grid.step(1.0);
        assert_eq!(grid.cell(2, 0).unwrap().temperature, 0.0);
    }

    #[test]
    fn test_large_dt_overshoots_unclamped() {
        let mat = Material {
            density: 1.0,
            conductivity: 1.0,
            specific_heat: 1.0,
        };
        let mut grid = HeatGrid::new(2, 1, 1.0, mat, 0.0).unwrap();
        grid.set_temperature(0, 0, 100.0).unwrap();

        // k·A·dt / (m·c) = 3, far past stable
        grid.step(3.0);
        let (lo, hi) = grid.temperature_range();
        assert!(lo < 0.0);
        assert!(hi > 100.0);

        for _ in 0..10 {
            grid.step(3.0);
        }
        let (lo, hi) = grid.temperature_range();
        assert!(hi - lo > 1000.0);
    }

    #[test]
    fn test_nan_propagates() {
        let mut grid = HeatGrid::new(3, 1, 1.0, Material::STEEL, 0.0).unwrap();
        grid.set_temperature(1, 0, f64::NAN).unwrap();
        grid.step(1.0);
        assert!(grid.cells().iter().all(|c| c.temperature.is_nan()));
    }

    #[test]
    fn test_mixed_materials_use_mean_conductivity() {
        let mut grid = HeatGrid::new(2, 1, 1.0, Material::COPPER, 0.0).unwrap();
        grid.cell_mut(1, 0).unwrap().set_material(Material::WOOD);
        grid.set_temperature(1, 0, 10.0).unwrap();
        grid.step(1e-3);

        let k = (Material::COPPER.conductivity + Material::WOOD.conductivity) * 0.5;
        let expected = k * 10.0 * 1e-3 / (Material::COPPER.density * Material::COPPER.specific_heat);
        assert!((grid.cell(0, 0).unwrap().temperature - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_setup() {
        assert!(HeatGrid::new(0, 3, 1.0, Material::STEEL, 0.0).is_err());
        let params = HeatParams {
            material: "unobtainium".into(),
            ..Default::default()
        };
        assert!(HeatGrid::from_params(&params).is_err());
        let mut grid = HeatGrid::new(2, 2, 1.0, Material::STEEL, 0.0).unwrap();
        assert!(grid.set_source(5, 0, 1.0).is_err());
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut grid = HeatGrid::from_params(&HeatParams::default()).unwrap();
        let before = grid.thermal_energy();
        for _ in 0..20 {
            grid.step(1.0);
        }
        grid.reset();
        assert_eq!(grid.thermal_energy(), before);
        assert_eq!(grid.time(), 0.0);
    }
}
