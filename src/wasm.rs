//! Browser bindings
//!
//! The page owns the canvas and input; it calls `update` once per animation
//! frame and copies `width * height` pixels from `draw_buffer_ptr` into an
//! `ImageData` (use `PixelFormat::Abgr8888` so little-endian bytes read as
//! RGBA).

use glam::IVec2;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{Material, PixelFormat, Simulation};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Cellular Automata starting...");
}

/// One simulation bound to a page
#[wasm_bindgen]
pub struct Automaton {
    sim: Simulation,
    settings: Settings,
}

#[wasm_bindgen]
impl Automaton {
    /// Build with the builtin rules; the seed is random when absent
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, seed: Option<u64>) -> Result<Automaton, JsError> {
        let settings = Settings {
            width,
            height,
            seed,
            pixel_format: PixelFormat::Abgr8888,
            ..Default::default()
        };
        let sim = Simulation::from_settings(&settings).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { sim, settings })
    }

    pub fn update(&mut self) {
        self.sim.update();
    }

    /// Fill the grid with one material (EMPTY when the index is unknown)
    pub fn reset(&mut self, material: u8) {
        self.sim.reset(material_or_empty(material));
    }

    /// Paint a brush stroke between two cursor samples; the radius is clamped
    /// to the brush limits
    pub fn stamp_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, radius: i32, material: u8) {
        let Some(material) = Material::from_index(material as usize) else {
            log::warn!("Ignoring stroke with unknown material {}", material);
            return;
        };
        let radius = self.settings.clamp_brush_radius(radius);
        self.sim
            .stamp_line(IVec2::new(x0, y0), IVec2::new(x1, y1), radius, material);
    }

    pub fn width(&self) -> u32 {
        self.sim.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.sim.height() as u32
    }

    /// Pointer into wasm memory; valid until the next mutating call
    pub fn draw_buffer_ptr(&self) -> *const u32 {
        self.sim.draw_buffer().as_ptr()
    }

    pub fn material_names(&self) -> Vec<String> {
        self.sim
            .material_names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn formatted_names(&self) -> String {
        self.sim.formatted_names()
    }
}

fn material_or_empty(index: u8) -> Material {
    Material::from_index(index as usize).unwrap_or_default()
}
