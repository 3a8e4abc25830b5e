//! Draw surface abstraction
//!
//! Simulations draw into any [`DrawSurface`]. The browser build implements it
//! on a canvas 2D context; [`CommandList`] records commands for headless runs
//! and tests.

pub mod shapes;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGBA, each channel 0..=1
pub type Color = [f32; 4];

/// Palette shared by the draw helpers
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.02, 0.02, 0.05, 1.0];
    pub const GROUND: Color = [0.3, 0.3, 0.4, 1.0];
    pub const MAZE_WALL: Color = [0.7, 0.7, 0.8, 1.0];
    pub const WALL_TILE: Color = [0.15, 0.15, 0.2, 1.0];
    pub const OPEN_SET: Color = [0.2, 0.8, 0.4, 0.5];
    pub const CLOSED_SET: Color = [0.4, 0.7, 1.0, 0.35];
    pub const CURSOR: Color = [1.0, 0.4, 0.2, 1.0];
    pub const PATH: Color = [0.9, 0.85, 0.3, 1.0];
    pub const BODY: Color = [1.0, 1.0, 1.0, 1.0];
    pub const STAR: Color = [0.9, 0.85, 0.3, 1.0];
    pub const ROPE: Color = [0.6, 0.2, 0.8, 1.0];
    pub const PIN: Color = [1.0, 0.4, 0.2, 1.0];
    pub const CART_A: Color = [0.4, 0.7, 1.0, 1.0];
    pub const CART_B: Color = [1.0, 0.4, 0.2, 1.0];
    pub const TEXT: Color = [0.9, 0.9, 0.9, 1.0];
}

/// CSS `rgba()` string for a color
pub fn css(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// Gradient for a value in 0..=1: blue (low) -> cyan -> green -> yellow -> red (high)
pub fn gradient(t: f32, alpha: f32) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let (r, g, b) = if t < 0.25 {
        let u = t / 0.25;
        (0.2, 0.4 + 0.4 * u, 1.0)
    } else if t < 0.5 {
        let u = (t - 0.25) / 0.25;
        (0.2, 0.8, 1.0 - 0.6 * u)
    } else if t < 0.75 {
        let u = (t - 0.5) / 0.25;
        (0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u)
    } else {
        let u = (t - 0.75) / 0.25;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };
    [r, g, b, alpha]
}

/// Render sink. Coordinates are screen pixels, y down.
pub trait DrawSurface {
    fn size(&self) -> (f32, f32);

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    fn stroke_path(&mut self, points: &[Vec2], color: Color, width: f32, closed: bool);

    /// Full circle, filled or outlined
    fn arc(&mut self, center: Vec2, radius: f32, color: Color, fill: bool);

    fn text(&mut self, pos: Vec2, text: &str, color: Color);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    StrokePath {
        points: Vec<Vec2>,
        color: Color,
        width: f32,
        closed: bool,
    },
    Arc {
        center: Vec2,
        radius: f32,
        color: Color,
        fill: bool,
    },
    Text {
        pos: Vec2,
        text: String,
        color: Color,
    },
}

/// Recording surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandList {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl DrawSurface for CommandList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn stroke_path(&mut self, points: &[Vec2], color: Color, width: f32, closed: bool) {
        self.commands.push(DrawCommand::StrokePath {
            points: points.to_vec(),
            color,
            width,
            closed,
        });
    }

    fn arc(&mut self, center: Vec2, radius: f32, color: Color, fill: bool) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            color,
            fill,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            color,
        });
    }
}

/// Maps y-up world coordinates onto the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pixels per world unit
    pub scale: f32,
    /// Screen position of the world origin
    pub origin: Vec2,
}

impl Viewport {
    /// Fit the world box `min..max` inside a surface with `margin` pixels spare
    pub fn fit(min: Vec2, max: Vec2, surface: (f32, f32), margin: f32) -> Self {
        let extent = (max - min).max(Vec2::splat(f32::EPSILON));
        let avail = Vec2::new(surface.0, surface.1) - Vec2::splat(2.0 * margin);
        let scale = (avail.x / extent.x).min(avail.y / extent.y).max(f32::EPSILON);
        // Centre the box
        let used = extent * scale;
        let offset = (Vec2::new(surface.0, surface.1) - used) * 0.5;
        let origin = Vec2::new(offset.x - min.x * scale, offset.y + used.y + min.y * scale);
        Self { scale, origin }
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(self.origin.x + world.x * self.scale, self.origin.y - world.y * self.scale)
    }

    pub fn length(&self, world: f32) -> f32 {
        world * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_string() {
        assert_eq!(css([1.0, 0.0, 0.5, 0.25]), "rgba(255, 0, 128, 0.25)");
    }

    #[test]
    fn test_gradient_ends() {
        assert_eq!(gradient(0.0, 1.0), [0.2, 0.4, 1.0, 1.0]);
        let hot = gradient(1.0, 0.5);
        assert_eq!(hot[0], 1.0);
        assert_eq!(hot[3], 0.5);
        assert_eq!(gradient(f32::NAN, 1.0), gradient(0.0, 1.0));
    }

    #[test]
    fn test_viewport_flips_y_and_fits() {
        let view = Viewport::fit(Vec2::ZERO, Vec2::new(10.0, 5.0), (200.0, 100.0), 0.0);
        assert_eq!(view.scale, 20.0);
        assert_eq!(view.to_screen(Vec2::ZERO), Vec2::new(0.0, 100.0));
        assert_eq!(view.to_screen(Vec2::new(10.0, 5.0)), Vec2::new(200.0, 0.0));
    }

    #[test]
    fn test_command_list_records_and_serializes() {
        let mut list = CommandList::new(64.0, 32.0);
        list.clear(colors::BACKGROUND);
        list.fill_rect(1.0, 2.0, 3.0, 4.0, colors::PATH);
        list.arc(Vec2::new(5.0, 5.0), 2.0, colors::BODY, true);
        assert_eq!(list.len(), 3);

        let json = list.to_json().unwrap();
        assert!(json.contains("\"op\":\"fill_rect\""));
        let back: CommandList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
