// config.rs - Tunables for both backdrops
//
// Hosts hand these over as plain objects (JS) or JSON files (preview tool).
// Every field has a default, so an empty object is a valid config.
// `sanitized()` never fails: bad values fall back to their defaults.

use serde::{Deserialize, Serialize};

// ============================================================================
// Ripple
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpulseSpec {
    pub radius: f32,
    pub strength: f32,
}

impl ImpulseSpec {
    pub const fn new(radius: f32, strength: f32) -> Self {
        Self { radius, strength }
    }

    fn is_valid(&self) -> bool {
        self.radius.is_finite() && self.radius >= 0.0 && self.strength.is_finite()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AmbientConfig {
    pub enabled: bool,
    pub min_interval_ms: f64,
    pub max_interval_ms: f64,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_strength: f32,
    pub max_strength: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval_ms: 1200.0,
            max_interval_ms: 2800.0,
            min_radius: 6.0,
            max_radius: 16.0,
            min_strength: 60.0,
            max_strength: 160.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RippleConfig {
    /// Per-tick decay multiplier, 0.97..=0.99 looks right
    pub damping: f32,
    /// Gradient scale used for the displacement lookup
    pub refraction: f32,
    /// Alpha added per pixel of displacement
    pub gleam: f32,
    pub hover: ImpulseSpec,
    pub press: ImpulseSpec,
    pub drag: ImpulseSpec,
    pub ambient: AmbientConfig,
    pub noise_dots: u32,
    pub seed: u32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            damping: 0.986,
            refraction: 0.25,
            gleam: 3.0,
            hover: ImpulseSpec::new(8.0, 40.0),
            press: ImpulseSpec::new(22.0, 280.0),
            drag: ImpulseSpec::new(14.0, 130.0),
            ambient: AmbientConfig::default(),
            noise_dots: 120,
            seed: 0x5EED_1234,
        }
    }
}

impl RippleConfig {
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();

        if !(self.damping > 0.0 && self.damping < 1.0) {
            log::warn!("ripple damping {} outside (0, 1), using {}", self.damping, d.damping);
            self.damping = d.damping;
        }
        if !self.refraction.is_finite() {
            log::warn!("ripple refraction {} is not finite", self.refraction);
            self.refraction = d.refraction;
        }
        if !(self.gleam.is_finite() && self.gleam >= 0.0) {
            log::warn!("ripple gleam {} must be >= 0", self.gleam);
            self.gleam = d.gleam;
        }
        for (name, spec, fallback) in [
            ("hover", &mut self.hover, d.hover),
            ("press", &mut self.press, d.press),
            ("drag", &mut self.drag, d.drag),
        ] {
            if !spec.is_valid() {
                log::warn!("ripple {name} impulse {spec:?} invalid, using {fallback:?}");
                *spec = fallback;
            }
        }

        let a = &mut self.ambient;
        let da = &d.ambient;
        if !(a.min_interval_ms.is_finite() && a.min_interval_ms > 0.0 && a.max_interval_ms >= a.min_interval_ms) {
            log::warn!("ambient interval {}..{} ms invalid", a.min_interval_ms, a.max_interval_ms);
            a.min_interval_ms = da.min_interval_ms;
            a.max_interval_ms = da.max_interval_ms;
        }
        if !(a.min_radius.is_finite() && a.min_radius >= 0.0 && a.max_radius >= a.min_radius) {
            log::warn!("ambient radius {}..{} invalid", a.min_radius, a.max_radius);
            a.min_radius = da.min_radius;
            a.max_radius = da.max_radius;
        }
        if !(a.min_strength.is_finite() && a.max_strength.is_finite() && a.max_strength >= a.min_strength) {
            log::warn!("ambient strength {}..{} invalid", a.min_strength, a.max_strength);
            a.min_strength = da.min_strength;
            a.max_strength = da.max_strength;
        }

        self
    }
}

// ============================================================================
// Orrery
// ============================================================================

/// Display toggles owned by the host page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneOptions {
    pub show_orbits: bool,
    pub auto_rotate: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self { show_orbits: true, auto_rotate: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BloomConfig {
    pub strength: f32,
    /// Blur spread, 0..1
    pub radius: f32,
    /// Luminance above which pixels glow
    pub threshold: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self { strength: 1.5, radius: 0.4, threshold: 0.85 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlsConfig {
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self { damping: 0.05, min_distance: 150.0, max_distance: 1500.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    /// Simulation time added per frame
    pub time_step: f64,
    pub star_count: u32,
    pub star_extent: f32,
    pub belt_particles: u32,
    pub bloom: BloomConfig,
    pub controls: ControlsConfig,
    pub seed: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            star_count: 10_000,
            star_extent: 1000.0,
            belt_particles: 1500,
            bloom: BloomConfig::default(),
            controls: ControlsConfig::default(),
            seed: 0x0B17_A1,
        }
    }
}

impl SceneConfig {
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();

        if !(self.time_step.is_finite() && self.time_step >= 0.0) {
            log::warn!("scene time step {} invalid, using {}", self.time_step, d.time_step);
            self.time_step = d.time_step;
        }
        if !(self.star_extent.is_finite() && self.star_extent > 0.0) {
            log::warn!("star extent {} invalid", self.star_extent);
            self.star_extent = d.star_extent;
        }

        let b = &mut self.bloom;
        if !(b.strength.is_finite() && b.strength >= 0.0) {
            log::warn!("bloom strength {} invalid", b.strength);
            b.strength = d.bloom.strength;
        }
        if !(b.radius.is_finite() && (0.0..=1.0).contains(&b.radius)) {
            log::warn!("bloom radius {} outside 0..1", b.radius);
            b.radius = d.bloom.radius;
        }
        if !(b.threshold.is_finite() && b.threshold >= 0.0) {
            log::warn!("bloom threshold {} invalid", b.threshold);
            b.threshold = d.bloom.threshold;
        }

        let c = &mut self.controls;
        if !(c.damping > 0.0 && c.damping <= 1.0) {
            log::warn!("controls damping {} outside (0, 1]", c.damping);
            c.damping = d.controls.damping;
        }
        if !(c.min_distance.is_finite() && c.min_distance > 0.0 && c.max_distance >= c.min_distance) {
            log::warn!("controls distance {}..{} invalid", c.min_distance, c.max_distance);
            c.min_distance = d.controls.min_distance;
            c.max_distance = d.controls.max_distance;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg: RippleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, RippleConfig::default());
        let cfg: SceneConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, SceneConfig::default());
    }

    #[test]
    fn camel_case_fields_override_defaults() {
        let cfg: RippleConfig = serde_json::from_str(
            r#"{"damping":0.98,"noiseDots":12,"hover":{"radius":5,"strength":10},"ambient":{"enabled":false}}"#,
        )
        .unwrap();
        assert_eq!(cfg.damping, 0.98);
        assert_eq!(cfg.noise_dots, 12);
        assert_eq!(cfg.hover, ImpulseSpec::new(5.0, 10.0));
        assert!(!cfg.ambient.enabled);
        assert_eq!(cfg.ambient.min_interval_ms, 1200.0);

        let opts: SceneOptions = serde_json::from_str(r#"{"showOrbits":false}"#).unwrap();
        assert!(!opts.show_orbits);
        assert!(opts.auto_rotate);
    }

    #[test]
    fn damping_outside_unit_interval_is_replaced() {
        for bad in [0.0, 1.0, 1.5, -0.2, f32::NAN] {
            let cfg = RippleConfig { damping: bad, ..Default::default() }.sanitized();
            assert_eq!(cfg.damping, 0.986);
        }
        let cfg = RippleConfig { damping: 0.97, ..Default::default() }.sanitized();
        assert_eq!(cfg.damping, 0.97);
    }

    #[test]
    fn inverted_ambient_range_falls_back() {
        let mut cfg = RippleConfig::default();
        cfg.ambient.min_interval_ms = 3000.0;
        cfg.ambient.max_interval_ms = 1000.0;
        let cfg = cfg.sanitized();
        assert_eq!(cfg.ambient.min_interval_ms, 1200.0);
        assert_eq!(cfg.ambient.max_interval_ms, 2800.0);
    }

    #[test]
    fn negative_impulse_radius_is_rejected() {
        let cfg = RippleConfig { hover: ImpulseSpec::new(-3.0, 40.0), ..Default::default() }.sanitized();
        assert_eq!(cfg.hover, ImpulseSpec::new(8.0, 40.0));
    }

    #[test]
    fn scene_controls_range_is_checked() {
        let mut cfg = SceneConfig::default();
        cfg.controls.min_distance = 900.0;
        cfg.controls.max_distance = 100.0;
        cfg.bloom.radius = 4.0;
        let cfg = cfg.sanitized();
        assert_eq!(cfg.controls, ControlsConfig::default());
        assert_eq!(cfg.bloom.radius, 0.4);
    }
}
