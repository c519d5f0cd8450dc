// ripple/ - Water ripple backdrop
//
// A height field evolving under a damped wave equation, rendered as a
// refraction of a static gradient image. Input arrives as impulses from the
// pointer and from an ambient drip timer.

mod ambient;
mod field;
mod pointer;
mod refract;
mod source;

pub use ambient::AmbientDrip;
pub use field::{HeightField, Impulse};
pub use pointer::{PointerInput, PointerTracker, Viewport};
pub use refract::Refractor;
pub use source::SourceImage;

use crate::config::RippleConfig;
use crate::rng::XorShift;

pub struct RippleSim {
    w: u32,
    h: u32,
    config: RippleConfig,

    field: HeightField,
    source: SourceImage,
    ambient: AmbientDrip,
    pointer: PointerTracker,

    // Output
    out: Refractor,

    rng: XorShift,
}

impl RippleSim {
    pub fn new(w: u32, h: u32, config: RippleConfig) -> Self {
        let config = config.sanitized();
        let mut rng = XorShift::new(config.seed);
        let (uw, uh) = (w as usize, h as usize);

        let source = SourceImage::generate(uw, uh, config.noise_dots, &mut rng);
        let ambient = AmbientDrip::new(config.ambient.clone(), &mut rng);
        let mut out = Refractor::new(uw, uh);
        out.blit(&source);

        log::debug!("ripple init {w}x{h}, damping {}", config.damping);

        Self {
            w,
            h,
            field: HeightField::new(uw, uh, config.damping),
            source,
            ambient,
            pointer: PointerTracker::new(&config),
            out,
            rng,
            config,
        }
    }

    /// Rebuild everything at the new size. Wave state is not carried over.
    pub fn resize(&mut self, w: u32, h: u32) {
        *self = Self::new(w, h, self.config.clone());
    }

    /// One frame: propagate, render, maybe drip.
    pub fn tick(&mut self, now_ms: f64) {
        self.field.step();
        self.out.render(&self.field, &self.source, self.config.refraction, self.config.gleam);

        // Lands now, shows up from the next frame
        if let Some(imp) = self.ambient.poll(now_ms, self.w as usize, self.h as usize, &mut self.rng) {
            self.field.drop(imp);
        }
    }

    pub fn impulse(&mut self, imp: Impulse) {
        self.field.drop(imp);
    }

    /// Feed a pointer/touch event; coordinates are mapped through `view`.
    pub fn pointer(&mut self, input: PointerInput, view: &Viewport) {
        if let Some(imp) = self.pointer.handle(input, view) {
            self.field.drop(imp);
        }
    }

    /// Show the undisturbed backdrop (reduced motion)
    pub fn render_still(&mut self) {
        self.out.blit(&self.source);
    }

    pub fn field(&self) -> &HeightField { &self.field }
    pub fn source(&self) -> &SourceImage { &self.source }
    pub fn config(&self) -> &RippleConfig { &self.config }
    pub fn pixels(&self) -> &[u8] { self.out.pixels() }

    // Accessors for WASM
    pub fn output_ptr(&self) -> *const u8 { self.out.ptr() }
    pub fn output_len(&self) -> usize { self.out.len() }
    pub fn width(&self) -> u32 { self.w }
    pub fn height(&self) -> u32 { self.h }
}
