// decor.rs - Starfield, asteroid belt, orbit paths
//
// Geometry is generated once. Per frame only the spin angles change, and the
// orbit paths only flip visibility.

use glam::{Mat3, Vec3};
use std::f32::consts::TAU;

use crate::rng::XorShift;

pub const ORBIT_SEGMENTS: usize = 128;
pub const ORBIT_OPACITY: f32 = 0.25;
pub const BELT_OPACITY: f32 = 0.35;

const STAR_SPIN: f32 = 0.0001;
const BELT_SPIN: f32 = 0.0005;

#[derive(Clone, Debug)]
pub struct Starfield {
    pub points: Vec<Vec3>,
    pub rotation: f32,
}

impl Starfield {
    /// Uniform scatter inside the cube [-extent, extent]^3
    pub fn new(count: u32, extent: f32, rng: &mut XorShift) -> Self {
        let points = (0..count)
            .map(|_| Vec3::new(rng.signed(extent), rng.signed(extent), rng.signed(extent)))
            .collect();
        Self { points, rotation: 0.0 }
    }

    pub fn spin(&mut self) {
        self.rotation += STAR_SPIN;
    }

    pub fn transform(&self) -> Mat3 {
        Mat3::from_rotation_y(self.rotation)
    }
}

/// Flat torus of rubble around the sun, drawn as sampled points
#[derive(Clone, Debug)]
pub struct AsteroidBelt {
    pub radius: f32,
    pub tube: f32,
    pub points: Vec<Vec3>,
    pub rotation: f32,
    pub opacity: f32,
}

impl AsteroidBelt {
    pub fn new(radius: f32, tube: f32, count: u32, rng: &mut XorShift) -> Self {
        let points = (0..count)
            .map(|_| {
                let u = rng.next_f32() * TAU; // around the sun
                let v = rng.next_f32() * TAU; // around the tube
                let ring = radius + tube * v.cos();
                Vec3::new(ring * u.cos(), tube * v.sin(), ring * u.sin())
            })
            .collect();
        Self { radius, tube, points, rotation: 0.0, opacity: BELT_OPACITY }
    }

    pub fn spin(&mut self) {
        self.rotation += BELT_SPIN;
    }

    pub fn transform(&self) -> Mat3 {
        Mat3::from_rotation_y(self.rotation)
    }
}

/// Closed polyline in the ecliptic (xz) plane
#[derive(Clone, Debug)]
pub struct OrbitPath {
    pub radius: f32,
    /// ORBIT_SEGMENTS + 1 vertices, last equals first
    pub vertices: Vec<Vec3>,
    pub visible: bool,
    pub opacity: f32,
}

impl OrbitPath {
    pub fn new(radius: f32, visible: bool) -> Self {
        let vertices = (0..=ORBIT_SEGMENTS)
            .map(|i| {
                let a = (i % ORBIT_SEGMENTS) as f32 / ORBIT_SEGMENTS as f32 * TAU;
                Vec3::new(radius * a.cos(), 0.0, radius * a.sin())
            })
            .collect();
        Self { radius, vertices, visible, opacity: ORBIT_OPACITY }
    }
}
