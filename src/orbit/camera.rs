// camera.rs - Perspective camera and damped orbit controls
//
// The controls keep the camera on a sphere around the target. Drag and wheel
// input accumulate into pending deltas; each update applies a `damping`
// fraction of what is pending, so motion eases out over following frames.

use glam::{Mat4, Vec3, Vec4Swizzles};
use std::f32::consts::PI;

use crate::config::ControlsConfig;

pub const FOV_Y: f32 = 60.0 * PI / 180.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 5000.0;

/// Above and behind the origin
pub const HOME: Vec3 = Vec3::new(0.0, 300.0, 600.0);

// Keep the polar angle off the poles so look_at stays well defined
const POLAR_EPS: f32 = 0.01;
const ZOOM_STEP: f32 = 0.95;

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// Projected point: pixel position plus distance along the view axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self { eye: HOME, target: Vec3::ZERO, fov_y: FOV_Y, aspect, near: NEAR, far: FAR }
    }

    pub fn set_aspect(&mut self, w: u32, h: u32) {
        if w > 0 && h > 0 {
            self.aspect = w as f32 / h as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Pixels per world unit at distance 1
    pub fn focal(&self, h: u32) -> f32 {
        h as f32 * 0.5 / (self.fov_y * 0.5).tan()
    }

    pub fn lens(&self, w: u32, h: u32) -> Lens {
        Lens { view: self.view(), proj: self.projection(), w: w as f32, h: h as f32, focal: self.focal(h), near: self.near, far: self.far }
    }
}

/// Camera matrices frozen for one frame
#[derive(Clone, Copy, Debug)]
pub struct Lens {
    pub view: Mat4,
    pub proj: Mat4,
    pub w: f32,
    pub h: f32,
    pub focal: f32,
    near: f32,
    far: f32,
}

impl Lens {
    pub fn to_view(&self, p: Vec3) -> Vec3 {
        self.view.transform_point3(p)
    }

    /// World -> pixels. None when behind the near plane or past far.
    pub fn project(&self, p: Vec3) -> Option<ScreenPoint> {
        self.project_view(self.to_view(p))
    }

    pub fn project_view(&self, v: Vec3) -> Option<ScreenPoint> {
        let depth = -v.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let clip = self.proj * v.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        Some(ScreenPoint {
            x: (ndc.x * 0.5 + 0.5) * self.w,
            y: (0.5 - ndc.y * 0.5) * self.h,
            depth,
        })
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
    cfg: ControlsConfig,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3, cfg: ControlsConfig) -> Self {
        let offset = eye - target;
        let radius = offset.length().clamp(cfg.min_distance, cfg.max_distance);
        let phi = (offset.y / offset.length().max(f32::EPSILON)).clamp(-1.0, 1.0).acos();
        let theta = offset.x.atan2(offset.z);
        Self {
            target,
            radius,
            theta,
            phi: phi.clamp(POLAR_EPS, PI - POLAR_EPS),
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            cfg,
        }
    }

    pub fn distance(&self) -> f32 { self.radius }
    pub fn azimuth(&self) -> f32 { self.theta }
    pub fn polar(&self) -> f32 { self.phi }

    /// Drag by (dx, dy) pixels on a viewport `h` pixels tall
    pub fn rotate(&mut self, dx: f32, dy: f32, h: f32) {
        if !(h > 0.0) || !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.pending_theta -= 2.0 * PI * dx / h;
        self.pending_phi -= 2.0 * PI * dy / h;
    }

    /// Wheel input; positive moves away from the target
    pub fn zoom(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.pending_scale /= ZOOM_STEP;
        } else if delta_y < 0.0 {
            self.pending_scale *= ZOOM_STEP;
        }
    }

    /// Advance one damping step and return the new eye position
    pub fn update(&mut self) -> Vec3 {
        let k = self.cfg.damping;

        self.theta += self.pending_theta * k;
        self.phi = (self.phi + self.pending_phi * k).clamp(POLAR_EPS, PI - POLAR_EPS);
        let radius = self.radius * self.pending_scale.powf(k);
        self.radius = radius.clamp(self.cfg.min_distance, self.cfg.max_distance);

        self.pending_theta *= 1.0 - k;
        self.pending_phi *= 1.0 - k;
        self.pending_scale = self.pending_scale.powf(1.0 - k);
        // Zoom pushing past a limit is spent, not stored up
        if radius != self.radius {
            self.pending_scale = 1.0;
        }

        self.eye()
    }

    pub fn eye(&self) -> Vec3 {
        let (st, ct) = self.theta.sin_cos();
        let (sp, cp) = self.phi.sin_cos();
        self.target + self.radius * Vec3::new(sp * st, cp, sp * ct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_eye_round_trips_through_spherical() {
        let c = OrbitControls::new(HOME, Vec3::ZERO, ControlsConfig::default());
        assert!((c.eye() - HOME).length() < 1e-2);
    }

    #[test]
    fn damped_rotation_eases_to_the_full_drag() {
        let mut c = OrbitControls::new(HOME, Vec3::ZERO, ControlsConfig::default());
        let start = c.azimuth();
        c.rotate(-100.0, 0.0, 628.0);
        let expected = 2.0 * PI * 100.0 / 628.0;

        c.update();
        let first = c.azimuth() - start;
        assert!((first - expected * 0.05).abs() < 1e-4);

        for _ in 0..400 {
            c.update();
        }
        assert!((c.azimuth() - start - expected).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = OrbitControls::new(HOME, Vec3::ZERO, ControlsConfig::default());
        for _ in 0..200 {
            c.zoom(-1.0);
            c.update();
        }
        assert_eq!(c.distance(), 150.0);
        for _ in 0..200 {
            c.zoom(1.0);
            c.update();
        }
        assert_eq!(c.distance(), 1500.0);
    }

    #[test]
    fn wheel_zoom_eases_in_over_frames() {
        let mut c = OrbitControls::new(HOME, Vec3::ZERO, ControlsConfig::default());
        let start = c.distance();
        c.zoom(-1.0);

        c.update();
        let first = c.distance();
        assert!((first - start * ZOOM_STEP.powf(0.05)).abs() < 1e-2);
        assert!(first > start * ZOOM_STEP, "one frame must not apply the whole step");

        for _ in 0..400 {
            c.update();
        }
        assert!((c.distance() - start * ZOOM_STEP).abs() < 0.5);
    }

    #[test]
    fn zoom_held_at_a_limit_does_not_wind_up() {
        let mut c = OrbitControls::new(HOME, Vec3::ZERO, ControlsConfig::default());
        for _ in 0..300 {
            c.zoom(-1.0);
            c.update();
        }
        assert_eq!(c.distance(), 150.0);
        c.zoom(1.0);
        c.update();
        assert!(c.distance() > 150.0, "zooming out leaves the limit at once");
    }

    #[test]
    fn polar_angle_never_reaches_the_pole() {
        let mut c = OrbitControls::new(HOME, Vec3::ZERO, ControlsConfig::default());
        c.rotate(0.0, 10_000.0, 100.0);
        for _ in 0..200 {
            c.update();
        }
        assert!(c.polar() >= POLAR_EPS);
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let cam = Camera::new(800.0 / 600.0);
        let lens = cam.lens(800, 600);
        let p = lens.project(Vec3::ZERO).unwrap();
        assert!((p.x - 400.0).abs() < 1e-2);
        assert!((p.y - 300.0).abs() < 1e-2);
        assert!((p.depth - HOME.length()).abs() < 1e-2);
    }

    #[test]
    fn points_behind_the_camera_are_dropped() {
        let cam = Camera::new(1.0);
        let lens = cam.lens(100, 100);
        assert!(lens.project(HOME * 2.0).is_none());
    }
}
