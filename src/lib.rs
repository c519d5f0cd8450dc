use wasm_bindgen::prelude::*;

// ============================================================================
// BACKDROP ENGINE - Water ripple and orrery backgrounds for the site
// ============================================================================
//
// Two independent animations, each owning its own buffers:
//   ripple/  height-field water over a gradient backdrop (2D canvas)
//   orbit/   sun + planets, starfield, belt, rendered by render/ with bloom
//
// Hosts either drive them frame by frame through the buffer API below
// (`tick`, then read `output_ptr`/`output_len` as RGBA), or hand a DOM
// element to `web::` and let the engine run its own loop.

pub mod config;
pub mod frame;
pub mod orbit;
pub mod render;
pub mod ripple;
pub mod rng;

#[cfg(target_arch = "wasm32")]
pub mod web;

use config::{RippleConfig, SceneConfig, SceneOptions};
use ripple::{Impulse, PointerInput, RippleSim, Viewport};

// ============================================================================
// Buffer API: ripple
// ============================================================================

#[wasm_bindgen]
pub struct Ripple {
    sim: RippleSim,
}

#[wasm_bindgen]
impl Ripple {
    #[wasm_bindgen(constructor)]
    pub fn new(w: u32, h: u32) -> Self {
        Self { sim: RippleSim::new(w, h, RippleConfig::default()) }
    }

    /// Advance one frame; `now_ms` drives the ambient drip timer
    pub fn tick(&mut self, now_ms: f64) {
        self.sim.tick(now_ms);
    }

    /// Drop at buffer-pixel coordinates
    #[wasm_bindgen(js_name = drop)]
    pub fn drop_at(&mut self, x: f32, y: f32, radius: f32, strength: f32) {
        self.sim.impulse(Impulse::new(x, y, radius, strength));
    }

    /// Pointer moved, coordinates already in buffer pixels
    pub fn hover(&mut self, x: f32, y: f32) {
        let view = Viewport::identity(self.sim.width(), self.sim.height());
        self.sim.pointer(PointerInput::Move { x, y }, &view);
    }

    pub fn press(&mut self, x: f32, y: f32) {
        let view = Viewport::identity(self.sim.width(), self.sim.height());
        self.sim.pointer(PointerInput::Down { x, y }, &view);
    }

    pub fn release(&mut self) {
        let view = Viewport::identity(self.sim.width(), self.sim.height());
        self.sim.pointer(PointerInput::Up, &view);
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.sim.resize(w, h);
    }

    pub fn output_ptr(&self) -> *const u8 { self.sim.output_ptr() }
    pub fn output_len(&self) -> usize { self.sim.output_len() }
    pub fn width(&self) -> u32 { self.sim.width() }
    pub fn height(&self) -> u32 { self.sim.height() }
}

// ============================================================================
// Buffer API: orrery
// ============================================================================

#[wasm_bindgen]
pub struct Orrery {
    inner: orbit::Orrery,
}

#[wasm_bindgen]
impl Orrery {
    #[wasm_bindgen(constructor)]
    pub fn new(w: u32, h: u32, show_orbits: bool, auto_rotate: bool) -> Self {
        let options = SceneOptions { show_orbits, auto_rotate };
        Self { inner: orbit::Orrery::new(w, h, SceneConfig::default(), options) }
    }

    pub fn tick(&mut self) {
        self.inner.tick();
    }

    pub fn set_show_orbits(&mut self, show: bool) {
        self.inner.set_show_orbits(show);
    }

    pub fn set_auto_rotate(&mut self, on: bool) {
        self.inner.set_auto_rotate(on);
    }

    /// Camera drag in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.inner.rotate(dx, dy);
    }

    pub fn zoom(&mut self, delta_y: f32) {
        self.inner.zoom(delta_y);
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.inner.resize(w, h);
    }

    pub fn time(&self) -> f64 { self.inner.scene().time() }
    pub fn output_ptr(&self) -> *const u8 { self.inner.output_ptr() }
    pub fn output_len(&self) -> usize { self.inner.output_len() }
    pub fn width(&self) -> u32 { self.inner.width() }
    pub fn height(&self) -> u32 { self.inner.height() }
}
