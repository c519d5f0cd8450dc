// refract.rs - Height field -> displaced RGBA frame
//
// Each interior pixel looks up the source image at an offset given by the
// local field gradient, so the backdrop appears to sit under moving water.
// Disturbed pixels also gain alpha ("gleam"). Border pixels copy the source.

use super::field::HeightField;
use super::source::SourceImage;

pub struct Refractor {
    out: Vec<u8>,
    w: usize,
    h: usize,
}

impl Refractor {
    pub fn new(w: usize, h: usize) -> Self {
        Self { out: vec![0; w * h * 4], w, h }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.out
    }

    pub fn ptr(&self) -> *const u8 {
        self.out.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Plain copy of the source, used for still frames
    pub fn blit(&mut self, src: &SourceImage) {
        let n = self.out.len().min(src.pixels().len());
        self.out[..n].copy_from_slice(&src.pixels()[..n]);
    }

    pub fn render(&mut self, field: &HeightField, src: &SourceImage, refraction: f32, gleam: f32) {
        if self.w != field.width() || self.h != field.height() {
            return;
        }
        self.blit(src);
        if self.w < 3 || self.h < 3 {
            return;
        }

        let w = self.w;
        let u = field.current();

        for y in 1..self.h - 1 {
            for x in 1..w - 1 {
                let i = y * w + x;
                // Truncating cast: small slopes leave the pixel untouched
                let dx = ((u[i - 1] - u[i + 1]) * refraction) as i32;
                let dy = ((u[i - w] - u[i + w]) * refraction) as i32;
                if dx == 0 && dy == 0 {
                    continue;
                }

                let [r, g, b, a] = src.sample((x as i32).saturating_add(dx), (y as i32).saturating_add(dy));
                let boost = dx.unsigned_abs().saturating_add(dy.unsigned_abs()) as f32 * gleam;
                let o = i * 4;
                self.out[o] = r;
                self.out[o + 1] = g;
                self.out[o + 2] = b;
                self.out[o + 3] = (a as f32 + boost).min(255.0) as u8;
            }
        }
    }
}
