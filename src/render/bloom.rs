// bloom.rs - Glow around bright pixels
//
// Bright-pass at half resolution, two rounds of separable box blur
// (close to a gaussian), then added back on top of the full-size image.

use glam::Vec3;

use super::HdrTarget;
use crate::config::BloomConfig;

const LUMA: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Blur radius in half-res pixels at `radius` = 1.0
const MAX_SPREAD: f32 = 12.0;
const ROUNDS: usize = 2;

pub struct Bloom {
    cfg: BloomConfig,
    hw: usize,
    hh: usize,
    bright: Vec<Vec3>,
    scratch: Vec<Vec3>,
}

impl Bloom {
    pub fn new(cfg: BloomConfig, w: usize, h: usize) -> Self {
        let mut b = Self { cfg, hw: 0, hh: 0, bright: Vec::new(), scratch: Vec::new() };
        b.resize(w, h);
        b
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.hw = w.div_ceil(2);
        self.hh = h.div_ceil(2);
        self.bright = vec![Vec3::ZERO; self.hw * self.hh];
        self.scratch = vec![Vec3::ZERO; self.hw * self.hh];
    }

    fn spread(&self) -> usize {
        ((self.cfg.radius * MAX_SPREAD).round() as usize).max(1)
    }

    pub fn apply(&mut self, target: &mut HdrTarget) {
        let (w, h) = (target.width(), target.height());
        if w == 0 || h == 0 || self.cfg.strength <= 0.0 {
            return;
        }
        if self.hw != w.div_ceil(2) || self.hh != h.div_ceil(2) {
            self.resize(w, h);
        }

        if !self.bright_pass(target) {
            return;
        }

        let r = self.spread();
        for _ in 0..ROUNDS {
            box_pass(&self.bright, &mut self.scratch, self.hw, self.hh, r, true);
            box_pass(&self.scratch, &mut self.bright, self.hw, self.hh, r, false);
        }

        let strength = self.cfg.strength;
        let hw = self.hw;
        let colors = target.colors_mut();
        for y in 0..h {
            for x in 0..w {
                let glow = self.bright[(y / 2) * hw + x / 2].max(Vec3::ZERO);
                colors[y * w + x] += glow * strength;
            }
        }
    }

    /// Downsample 2x2 and keep what exceeds the threshold.
    /// Returns false when nothing is bright enough.
    fn bright_pass(&mut self, target: &HdrTarget) -> bool {
        let (w, h) = (target.width(), target.height());
        let src = target.colors();
        let threshold = self.cfg.threshold;
        let mut any = false;

        for hy in 0..self.hh {
            for hx in 0..self.hw {
                let mut sum = Vec3::ZERO;
                let mut n = 0.0;
                for (x, y) in [(2 * hx, 2 * hy), (2 * hx + 1, 2 * hy), (2 * hx, 2 * hy + 1), (2 * hx + 1, 2 * hy + 1)] {
                    if x < w && y < h {
                        sum += src[y * w + x];
                        n += 1.0;
                    }
                }
                let c = sum / n;
                let l = c.dot(LUMA);
                let out = if l > threshold {
                    any = true;
                    c * ((l - threshold) / l)
                } else {
                    Vec3::ZERO
                };
                self.bright[hy * self.hw + hx] = out;
            }
        }
        any
    }
}

/// Sliding-window box blur along rows (`horizontal`) or columns, zero outside
fn box_pass(src: &[Vec3], dst: &mut [Vec3], w: usize, h: usize, r: usize, horizontal: bool) {
    let (lines, len) = if horizontal { (h, w) } else { (w, h) };
    let idx = |line: usize, i: usize| if horizontal { line * w + i } else { i * w + line };
    let norm = 1.0 / (2 * r + 1) as f32;

    for line in 0..lines {
        let mut sum = Vec3::ZERO;
        for i in 0..=r.min(len - 1) {
            sum += src[idx(line, i)];
        }
        for i in 0..len {
            dst[idx(line, i)] = sum * norm;
            let enter = i + r + 1;
            if enter < len {
                sum += src[idx(line, enter)];
            }
            if i >= r {
                sum -= src[idx(line, i - r)];
            }
        }
    }
}
