//! Browser bindings: canvas draw surface and the exported `WasmLab`

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::LabError;
use crate::lab::{Lab, SimulationKind};
use crate::render::{Color, DrawSurface, css};
use crate::settings::{AccuracyPreset, LabSettings};

impl From<LabError> for JsValue {
    fn from(e: LabError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Canvas 2D context as a draw surface
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
}

impl CanvasSurface {
    pub fn from_canvas_id(canvas_id: &str) -> Result<Self, LabError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| LabError::Canvas("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| LabError::Canvas(format!("no element #{canvas_id}")))?
            .dyn_into()
            .map_err(|_| LabError::Canvas(format!("#{canvas_id} is not a canvas")))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| LabError::Canvas(format!("{e:?}")))?
            .ok_or_else(|| LabError::Canvas("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| LabError::Canvas("unexpected context type".into()))?;
        ctx.set_font("13px monospace");
        Ok(Self {
            ctx,
            width: canvas.width() as f32,
            height: canvas.height() as f32,
        })
    }

    fn trace(&self, points: &[Vec2], closed: bool) {
        self.ctx.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(p.x as f64, p.y as f64);
            } else {
                self.ctx.line_to(p.x as f64, p.y as f64);
            }
        }
        if closed {
            self.ctx.close_path();
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.fill_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn stroke_path(&mut self, points: &[Vec2], color: Color, width: f32, closed: bool) {
        if points.len() < 2 {
            return;
        }
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.set_line_width(width as f64);
        self.trace(points, closed);
        self.ctx.stroke();
    }

    fn arc(&mut self, center: Vec2, radius: f32, color: Color, fill: bool) {
        self.ctx.begin_path();
        if let Err(e) = self.ctx.arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU) {
            log::warn!("arc failed: {:?}", e);
            return;
        }
        if fill {
            self.ctx.set_fill_style_str(&css(color));
            self.ctx.fill();
        } else {
            self.ctx.set_stroke_style_str(&css(color));
            self.ctx.set_line_width(1.0);
            self.ctx.stroke();
        }
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.ctx.set_fill_style_str(&css(color));
        if let Err(e) = self.ctx.fill_text(text, pos.x as f64, pos.y as f64) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }
}

/// Lab bound to a canvas, driven by the page
#[wasm_bindgen]
pub struct WasmLab {
    lab: Lab,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl WasmLab {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, kind: &str, seed: u64) -> Result<WasmLab, JsValue> {
        let mut settings = LabSettings::load();
        settings.seed = seed;
        let lab = Lab::from_name(kind, settings)?;
        let surface = CanvasSurface::from_canvas_id(canvas_id)?;
        log::info!("WasmLab ready on #{} ({})", canvas_id, kind);
        Ok(Self { lab, surface })
    }

    /// Advance by `dt` seconds of page time and redraw
    pub fn frame(&mut self, dt: f32) -> u32 {
        self.lab.frame(dt, &mut self.surface)
    }

    pub fn reset(&mut self) {
        self.lab.reset();
        self.lab.draw(&mut self.surface);
    }

    pub fn toggle_pause(&mut self) {
        self.lab.toggle_pause();
    }

    pub fn is_paused(&self) -> bool {
        self.lab.clock().is_paused()
    }

    pub fn switch(&mut self, kind: &str) -> Result<(), JsValue> {
        self.lab.switch(SimulationKind::parse(kind)?)?;
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.lab.clock_mut().set_speed(speed);
    }

    /// Apply an accuracy preset by name and persist it
    pub fn set_accuracy(&mut self, preset: &str) -> Result<(), JsValue> {
        let preset = AccuracyPreset::from_str(preset)
            .ok_or_else(|| LabError::InvalidParameter(format!("accuracy preset '{preset}'")))?;
        let mut settings = self.lab.settings().clone();
        settings.apply_preset(preset);
        settings.save();
        self.lab.apply_settings(settings)?;
        Ok(())
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        Ok(self.lab.settings().to_json()?)
    }

    /// Replace all settings from JSON and persist them
    pub fn load_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = LabSettings::from_json(json)?;
        settings.save();
        self.lab.apply_settings(settings)?;
        Ok(())
    }
}

/// Drive a lab with `requestAnimationFrame` until the page goes away
#[wasm_bindgen]
pub fn run(canvas_id: &str, kind: &str) -> Result<(), JsValue> {
    let seed = js_sys::Date::now() as u64;
    let lab = Rc::new(RefCell::new(WasmLab::new(canvas_id, kind, seed)?));
    request_animation_frame(lab, 0.0);
    Ok(())
}

fn request_animation_frame(lab: Rc<RefCell<WasmLab>>, last_time: f64) {
    let Some(window) = web_sys::window() else {
        log::warn!("No window; animation loop stopped");
        return;
    };
    let closure = Closure::once(move |time: f64| {
        let dt = if last_time > 0.0 {
            ((time - last_time) / 1000.0) as f32
        } else {
            crate::consts::SIM_DT
        };
        lab.borrow_mut().frame(dt);
        request_animation_frame(lab, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already set: {e}")));
    }
    log::info!("Physics Lab starting...");
}
