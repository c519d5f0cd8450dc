// ambient.rs - Autonomous drips
//
// Keeps the surface alive without input: after a random wait drawn from the
// configured interval, one small impulse lands somewhere random, and a new
// wait is drawn.

use super::field::Impulse;
use crate::config::AmbientConfig;
use crate::rng::XorShift;

#[derive(Clone, Debug)]
pub struct AmbientDrip {
    cfg: AmbientConfig,
    last_ms: Option<f64>,
    wait_ms: f64,
}

impl AmbientDrip {
    pub fn new(cfg: AmbientConfig, rng: &mut XorShift) -> Self {
        let wait_ms = Self::draw_wait(&cfg, rng);
        Self { cfg, last_ms: None, wait_ms }
    }

    /// Returns a drip if the wait since the last one has elapsed.
    /// The first call only starts the clock.
    pub fn poll(&mut self, now_ms: f64, w: usize, h: usize, rng: &mut XorShift) -> Option<Impulse> {
        if !self.cfg.enabled || !now_ms.is_finite() {
            return None;
        }
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return None;
        };
        if now_ms - last <= self.wait_ms {
            return None;
        }

        self.last_ms = Some(now_ms);
        self.wait_ms = Self::draw_wait(&self.cfg, rng);

        if w < 3 || h < 3 {
            return None;
        }
        let x = rng.range(1.0, (w - 1) as f32);
        let y = rng.range(1.0, (h - 1) as f32);
        let radius = rng.range(self.cfg.min_radius, self.cfg.max_radius);
        let strength = rng.range(self.cfg.min_strength, self.cfg.max_strength);
        Some(Impulse::new(x, y, radius, strength))
    }

    fn draw_wait(cfg: &AmbientConfig, rng: &mut XorShift) -> f64 {
        let t = rng.next_f32() as f64;
        cfg.min_interval_ms + (cfg.max_interval_ms - cfg.min_interval_ms) * t
    }
}
