// field.rs - Double-buffered height field
//
// Two flat w*h buffers and an index saying which one is current. A step
// writes the other buffer in place (it still holds the field from two steps
// ago) and flips the index, so a frame never allocates.
//
// The 1-cell border is a fixed zero boundary: neither steps nor impulses
// write it.

/// A point disturbance. Applied immediately, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impulse {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub strength: f32,
}

impl Impulse {
    pub fn new(x: f32, y: f32, radius: f32, strength: f32) -> Self {
        Self { x, y, radius, strength }
    }
}

#[derive(Clone, Debug)]
pub struct HeightField {
    w: usize,
    h: usize,
    bufs: [Vec<f32>; 2],
    cur: usize,
    damping: f32,
}

impl HeightField {
    pub fn new(w: usize, h: usize, damping: f32) -> Self {
        Self {
            w,
            h,
            bufs: [vec![0.0; w * h], vec![0.0; w * h]],
            cur: 0,
            damping,
        }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }
    pub fn damping(&self) -> f32 { self.damping }

    /// Field read for rendering and neighbour lookups
    pub fn current(&self) -> &[f32] {
        &self.bufs[self.cur]
    }

    /// Field one step behind `current`
    pub fn previous(&self) -> &[f32] {
        &self.bufs[self.cur ^ 1]
    }

    /// Value at (x, y), zero outside the grid
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return 0.0;
        }
        self.bufs[self.cur][y as usize * self.w + x as usize]
    }

    /// Whether any cell can ever move (needs at least one interior cell)
    #[inline]
    fn has_interior(&self) -> bool {
        self.w > 2 && self.h > 2
    }

    /// Add `strength * (1 - d/r)^2` to every interior cell within `radius`.
    ///
    /// The bump goes into both buffers: the surface is displaced at rest and
    /// released, rather than kicked. Out-of-grid cells are skipped.
    pub fn drop(&mut self, imp: Impulse) {
        if !self.has_interior() {
            return;
        }
        if !(imp.radius > 0.0 && imp.radius.is_finite()) || !imp.strength.is_finite() {
            return;
        }
        if !(imp.x.is_finite() && imp.y.is_finite()) {
            return;
        }

        let cx = imp.x as i32;
        let cy = imp.y as i32;
        let reach = imp.radius.ceil() as i32;
        let r2 = imp.radius * imp.radius;

        // Clip the bounding box to the interior
        let x0 = cx.saturating_sub(reach).max(1);
        let x1 = cx.saturating_add(reach).min(self.w as i32 - 2);
        let y0 = cy.saturating_sub(reach).max(1);
        let y1 = cy.saturating_add(reach).min(self.h as i32 - 2);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let w = self.w;
        let [a, b] = &mut self.bufs;
        for y in y0..=y1 {
            let dy = y as f32 - cy as f32;
            for x in x0..=x1 {
                let dx = x as f32 - cx as f32;
                let d2 = dx * dx + dy * dy;
                if d2 >= r2 {
                    continue;
                }
                let falloff = 1.0 - d2.sqrt() / imp.radius;
                let add = imp.strength * falloff * falloff;
                let i = y as usize * w + x as usize;
                a[i] += add;
                b[i] += add;
            }
        }
    }

    /// One leap-frog step:
    /// `next = damping * (half-sum of current's 4 neighbours - next)`
    /// then swap roles.
    pub fn step(&mut self) {
        if !self.has_interior() {
            return;
        }

        let w = self.w;
        let d = self.damping;
        let (cur, next) = if self.cur == 0 {
            let (a, b) = self.bufs.split_at_mut(1);
            (&a[0], &mut b[0])
        } else {
            let (a, b) = self.bufs.split_at_mut(1);
            (&b[0], &mut a[0])
        };

        for y in 1..self.h - 1 {
            let row = y * w;
            for x in 1..w - 1 {
                let i = row + x;
                let sum = cur[i - 1] + cur[i + 1] + cur[i - w] + cur[i + w];
                next[i] = d * (sum * 0.5 - next[i]);
            }
        }

        self.cur ^= 1;
    }

    /// Discrete energy of the leap-frog scheme,
    /// `|u|^2 - d<u, Lv> + d|v|^2` with u current, v previous and L the
    /// neighbour half-sum. Each step scales it by exactly `damping`, and it
    /// is zero only for a flat field.
    pub fn energy(&self) -> f64 {
        if !self.has_interior() {
            return 0.0;
        }

        let w = self.w;
        let d = self.damping as f64;
        let u = self.current();
        let v = self.previous();
        let mut uu = 0.0f64;
        let mut vv = 0.0f64;
        let mut ulv = 0.0f64;

        for y in 1..self.h - 1 {
            let row = y * w;
            for x in 1..w - 1 {
                let i = row + x;
                let ui = u[i] as f64;
                let vi = v[i] as f64;
                let lv = 0.5 * (v[i - 1] as f64 + v[i + 1] as f64 + v[i - w] as f64 + v[i + w] as f64);
                uu += ui * ui;
                vv += vi * vi;
                ulv += ui * lv;
            }
        }

        uu - d * ulv + d * vv
    }

    /// Largest absolute displacement in the current buffer
    pub fn peak(&self) -> f32 {
        self.current().iter().fold(0.0f32, |m, v| m.max(v.abs()))
    }
}
