// render/ - Software renderer for the orrery
//
// Draws into a linear float target with a depth buffer, runs bloom on it and
// resolves to RGBA8 for the canvas. Values above 1.0 are legal in the float
// target; that headroom is what the bloom pass feeds on.

mod bloom;
mod raster;

pub use bloom::Bloom;

use glam::Vec3;

use crate::config::BloomConfig;
use crate::orbit::{Camera, OrbitalScene};

const BACKGROUND: Vec3 = Vec3::new(0.0, 0.0, 0.012);

/// Hex 0xRRGGBB -> 0..1 floats
pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    )
}

pub struct HdrTarget {
    w: usize,
    h: usize,
    color: Vec<Vec3>,
    depth: Vec<f32>,
}

impl HdrTarget {
    pub fn new(w: usize, h: usize) -> Self {
        Self { w, h, color: vec![Vec3::ZERO; w * h], depth: vec![f32::INFINITY; w * h] }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.color = vec![Vec3::ZERO; w * h];
        self.depth = vec![f32::INFINITY; w * h];
    }

    pub fn clear(&mut self, bg: Vec3) {
        self.color.fill(bg);
        self.depth.fill(f32::INFINITY);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if (x as u32) < (self.w as u32) && (y as u32) < (self.h as u32) {
            Some(y as usize * self.w + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Vec3 {
        self.index(x, y).map_or(Vec3::ZERO, |i| self.color[i])
    }

    pub fn depth_at(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map_or(f32::INFINITY, |i| self.depth[i])
    }

    /// Opaque write, nearest surface wins
    #[inline]
    pub fn write(&mut self, x: i32, y: i32, c: Vec3, depth: f32) {
        if let Some(i) = self.index(x, y) {
            if depth < self.depth[i] {
                self.depth[i] = depth;
                self.color[i] = c;
            }
        }
    }

    /// Additive, depth-tested but leaves depth alone
    #[inline]
    pub fn add(&mut self, x: i32, y: i32, c: Vec3, depth: f32) {
        if let Some(i) = self.index(x, y) {
            if depth < self.depth[i] {
                self.color[i] += c;
            }
        }
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.color
    }

    pub fn colors_mut(&mut self) -> &mut [Vec3] {
        &mut self.color
    }

    /// Clamp to 0..1 and pack as opaque RGBA8
    pub fn resolve(&self, out: &mut [u8]) {
        for (px, c) in out.chunks_exact_mut(4).zip(&self.color) {
            let c = c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0 + 0.5;
            px[0] = c.x as u8;
            px[1] = c.y as u8;
            px[2] = c.z as u8;
            px[3] = 255;
        }
    }
}

pub struct SceneRenderer {
    w: u32,
    h: u32,
    target: HdrTarget,
    bloom: Bloom,
    out: Vec<u8>,
}

impl SceneRenderer {
    pub fn new(w: u32, h: u32, bloom: BloomConfig) -> Self {
        Self {
            w,
            h,
            target: HdrTarget::new(w as usize, h as usize),
            bloom: Bloom::new(bloom, w as usize, h as usize),
            out: vec![0; w as usize * h as usize * 4],
        }
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.target.resize(w as usize, h as usize);
        self.bloom.resize(w as usize, h as usize);
        self.out = vec![0; w as usize * h as usize * 4];
    }

    pub fn render(&mut self, scene: &OrbitalScene, camera: &Camera) {
        if self.w == 0 || self.h == 0 {
            return;
        }
        let lens = camera.lens(self.w, self.h);

        self.target.clear(BACKGROUND);

        // Solids first so the additive layers can depth-test against them
        raster::draw_bodies(&mut self.target, &lens, scene);
        raster::draw_stars(&mut self.target, &lens, scene.stars());
        raster::draw_belt(&mut self.target, &lens, scene.belt());
        raster::draw_paths(&mut self.target, &lens, scene.paths());
        raster::draw_rings(&mut self.target, &lens, scene.bodies());

        self.bloom.apply(&mut self.target);
        self.target.resolve(&mut self.out);
    }

    pub fn target(&self) -> &HdrTarget { &self.target }
    pub fn pixels(&self) -> &[u8] { &self.out }
    pub fn ptr(&self) -> *const u8 { self.out.as_ptr() }
    pub fn len(&self) -> usize { self.out.len() }
    pub fn is_empty(&self) -> bool { self.out.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_unpack() {
        assert_eq!(rgb(0xFF0000), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(rgb(0x00FF00), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn nearer_write_wins_and_additive_respects_depth() {
        let mut t = HdrTarget::new(4, 4);
        t.write(1, 1, Vec3::ONE, 10.0);
        t.write(1, 1, Vec3::ZERO, 20.0);
        assert_eq!(t.get(1, 1), Vec3::ONE);

        t.add(1, 1, Vec3::splat(0.5), 30.0); // behind, ignored
        assert_eq!(t.get(1, 1), Vec3::ONE);
        t.add(1, 1, Vec3::splat(0.5), 5.0);
        assert_eq!(t.get(1, 1), Vec3::splat(1.5));
        assert_eq!(t.depth_at(1, 1), 10.0);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut t = HdrTarget::new(2, 2);
        t.write(-1, 0, Vec3::ONE, 1.0);
        t.add(2, 0, Vec3::ONE, 1.0);
        assert!(t.colors().iter().all(|c| *c == Vec3::ZERO));
    }

    #[test]
    fn resolve_clamps_overbright() {
        let mut t = HdrTarget::new(1, 1);
        t.write(0, 0, Vec3::new(3.0, 0.5, -1.0), 1.0);
        let mut out = [0u8; 4];
        t.resolve(&mut out);
        assert_eq!(out, [255, 128, 0, 255]);
    }
}
