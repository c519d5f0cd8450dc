// source.rs - Static backdrop the ripple refracts
//
// Radial gradient (indigo -> violet -> navy -> black) plus a scatter of soft
// light dots. Built once per size, read-only afterwards.

use crate::rng::XorShift;

/// Gradient stops: (offset, r, g, b, a)
const STOPS: [(f32, f32, f32, f32, f32); 4] = [
    (0.00, 79.0, 70.0, 229.0, 255.0),  // indigo
    (0.35, 124.0, 58.0, 237.0, 250.0), // violet
    (0.70, 15.0, 23.0, 42.0, 235.0),   // dark navy
    (1.00, 0.0, 0.0, 0.0, 210.0),      // black, slightly see-through
];

// Gradient centre sits a little above the middle
const CENTER_X: f32 = 0.5;
const CENTER_Y: f32 = 0.4;
const REACH: f32 = 0.8;

const DOT_MIN_RADIUS: f32 = 2.0;
const DOT_MAX_RADIUS: f32 = 9.0;
const DOT_MIN_ALPHA: f32 = 0.03;
const DOT_MAX_ALPHA: f32 = 0.14;

#[derive(Clone, Debug)]
pub struct SourceImage {
    w: usize,
    h: usize,
    rgba: Vec<u8>,
}

impl SourceImage {
    pub fn generate(w: usize, h: usize, dots: u32, rng: &mut XorShift) -> Self {
        let mut img = Self { w, h, rgba: vec![0; w * h * 4] };
        if w == 0 || h == 0 {
            return img;
        }
        img.paint_gradient();
        for _ in 0..dots {
            let x = rng.next_f32() * w as f32;
            let y = rng.next_f32() * h as f32;
            let r = rng.range(DOT_MIN_RADIUS, DOT_MAX_RADIUS);
            let a = rng.range(DOT_MIN_ALPHA, DOT_MAX_ALPHA);
            img.paint_dot(x, y, r, a);
        }
        img
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    /// RGBA at (x, y), clamped to the image edge
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> [u8; 4] {
        if self.w == 0 || self.h == 0 {
            return [0; 4];
        }
        let x = x.clamp(0, self.w as i32 - 1) as usize;
        let y = y.clamp(0, self.h as i32 - 1) as usize;
        let i = (y * self.w + x) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    fn paint_gradient(&mut self) {
        let cx = self.w as f32 * CENTER_X;
        let cy = self.h as f32 * CENTER_Y;
        let reach = self.w.max(self.h) as f32 * REACH;

        for y in 0..self.h {
            for x in 0..self.w {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let t = ((dx * dx + dy * dy).sqrt() / reach).min(1.0);
                let c = gradient_at(t);
                let i = (y * self.w + x) * 4;
                for k in 0..4 {
                    self.rgba[i + k] = c[k].round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    /// Source-over a white dot with linear alpha falloff
    fn paint_dot(&mut self, cx: f32, cy: f32, r: f32, alpha: f32) {
        let x0 = ((cx - r).floor() as i32).max(0);
        let x1 = ((cx + r).ceil() as i32).min(self.w as i32 - 1);
        let y0 = ((cy - r).floor() as i32).max(0);
        let y1 = ((cy + r).ceil() as i32).min(self.h as i32 - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d >= r {
                    continue;
                }
                let a = alpha * (1.0 - d / r);
                let i = (y as usize * self.w + x as usize) * 4;
                for k in 0..3 {
                    let c = self.rgba[i + k] as f32;
                    self.rgba[i + k] = (c + (255.0 - c) * a).round() as u8;
                }
                let ca = self.rgba[i + 3] as f32;
                self.rgba[i + 3] = (ca + (255.0 - ca) * a).round() as u8;
            }
        }
    }
}

fn gradient_at(t: f32) -> [f32; 4] {
    for pair in STOPS.windows(2) {
        let (t0, r0, g0, b0, a0) = pair[0];
        let (t1, r1, g1, b1, a1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { ((t - t0) / (t1 - t0)).clamp(0.0, 1.0) } else { 0.0 };
            return [lerp(r0, r1, f), lerp(g0, g1, f), lerp(b0, b1, f), lerp(a0, a1, f)];
        }
    }
    let (_, r, g, b, a) = STOPS[STOPS.len() - 1];
    [r, g, b, a]
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }
