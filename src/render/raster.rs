// raster.rs - Scene primitives -> HDR target
//
// Spheres are shaded screen-space discs (normal rebuilt per pixel), stars and
// belt rubble are single additive pixels, orbit paths are additive lines and
// Saturn's ring is a densely sampled annulus.

use glam::{Mat3, Vec3};
use std::f32::consts::TAU;

use super::{HdrTarget, rgb};
use crate::orbit::{AsteroidBelt, Body, Lens, OrbitPath, OrbitalScene, RING_INNER, RING_OUTER, ScreenPoint, Starfield};

const EMISSIVE_GAIN: f32 = 1.8;
const SUN_LIGHT: f32 = 0.9;

const STAR_COLOR: Vec3 = Vec3::new(0.85, 0.88, 1.0);
const STAR_FADE: f32 = 2500.0;
const BELT_COLOR: u32 = 0x8A7F72;
const RING_COLOR: u32 = 0xC9B38A;

// Segments longer than this are mostly off-screen; skip rather than walk them
const MAX_LINE_STEPS: f32 = 8192.0;

pub fn draw_bodies(t: &mut HdrTarget, lens: &Lens, scene: &OrbitalScene) {
    // View -> world for normals
    let to_world = Mat3::from_mat4(lens.view).transpose();
    let sun = scene
        .bodies()
        .iter()
        .find(|b| b.spec.emissive)
        .map_or(Vec3::ZERO, |b| b.world_position());

    for body in scene.bodies() {
        draw_sphere(t, lens, body, to_world, sun, scene.ambient);
    }
}

fn draw_sphere(t: &mut HdrTarget, lens: &Lens, body: &Body, to_world: Mat3, sun: Vec3, ambient: f32) {
    let center = body.world_position();
    let Some(sp) = lens.project_view(lens.to_view(center)) else { return };

    let r = body.spec.radius;
    let pr = r * lens.focal / sp.depth;
    let base = rgb(body.spec.color);
    let light = (sun - center).normalize_or_zero();

    // Too small for a disc, still worth a pixel
    if pr < 0.75 {
        let c = if body.spec.emissive { base * EMISSIVE_GAIN } else { base * (ambient + SUN_LIGHT * 0.5) };
        t.write(sp.x.floor() as i32, sp.y.floor() as i32, c, sp.depth - r);
        return;
    }

    let x0 = ((sp.x - pr).floor() as i32).max(0);
    let x1 = ((sp.x + pr).ceil() as i32).min(t.width() as i32 - 1);
    let y0 = ((sp.y - pr).floor() as i32).max(0);
    let y1 = ((sp.y + pr).ceil() as i32).min(t.height() as i32 - 1);

    for py in y0..=y1 {
        let ny = (sp.y - (py as f32 + 0.5)) / pr;
        for px in x0..=x1 {
            let nx = (px as f32 + 0.5 - sp.x) / pr;
            let d2 = nx * nx + ny * ny;
            if d2 > 1.0 {
                continue;
            }
            let nz = (1.0 - d2).sqrt();
            let n = to_world * Vec3::new(nx, ny, nz);

            let c = if body.spec.emissive {
                // Slight limb darkening
                base * EMISSIVE_GAIN * (0.75 + 0.25 * nz)
            } else {
                let lambert = n.dot(light).max(0.0);
                base * (ambient + SUN_LIGHT * lambert) * bands(n, body.rotation)
            };
            t.write(px, py, c, sp.depth - nz * r);
        }
    }
}

/// Faint latitude-weighted stripes that turn with the body
#[inline]
fn bands(n: Vec3, rotation: f32) -> f32 {
    let lon = n.z.atan2(n.x) - rotation;
    0.92 + 0.08 * (3.0 * lon).sin() * (1.0 - n.y * n.y)
}

pub fn draw_stars(t: &mut HdrTarget, lens: &Lens, stars: &Starfield) {
    let rot = stars.transform();
    for p in &stars.points {
        let Some(sp) = lens.project(rot * *p) else { continue };
        let fade = (1.0 - sp.depth / STAR_FADE).clamp(0.25, 1.0);
        plot(t, sp, STAR_COLOR * 0.8 * fade);
    }
}

pub fn draw_belt(t: &mut HdrTarget, lens: &Lens, belt: &AsteroidBelt) {
    let rot = belt.transform();
    let c = rgb(BELT_COLOR) * belt.opacity;
    for p in &belt.points {
        if let Some(sp) = lens.project(rot * *p) {
            plot(t, sp, c);
        }
    }
}

pub fn draw_paths(t: &mut HdrTarget, lens: &Lens, paths: &[OrbitPath]) {
    for path in paths.iter().filter(|p| p.visible) {
        let c = Vec3::ONE * path.opacity;
        for seg in path.vertices.windows(2) {
            let (Some(a), Some(b)) = (lens.project(seg[0]), lens.project(seg[1])) else { continue };
            line(t, a, b, c);
        }
    }
}

pub fn draw_rings(t: &mut HdrTarget, lens: &Lens, bodies: &[Body]) {
    for body in bodies.iter().filter(|b| b.spec.ring) {
        let center = body.world_position();
        let Some(sp) = lens.project(center) else { continue };

        let inner = body.spec.radius * RING_INNER;
        let outer = body.spec.radius * RING_OUTER;
        let pr = outer * lens.focal / sp.depth;
        let width = pr * (1.0 - RING_INNER / RING_OUTER);

        // Dense enough that neighbouring samples land on adjacent pixels
        let n_ang = (pr * TAU * 1.5).clamp(64.0, 4096.0) as usize;
        let n_rad = (width * 1.5).clamp(4.0, 512.0) as usize;

        let spin = Mat3::from_rotation_y(body.rotation);
        let base = rgb(RING_COLOR);

        for i in 0..n_rad {
            let f = (i as f32 + 0.5) / n_rad as f32;
            let rr = inner + (outer - inner) * f;
            // Banded: darker gap a little past the middle
            let shade = 0.8 + 0.2 * (f * 9.0).sin() - if (0.55..0.62).contains(&f) { 0.35 } else { 0.0 };
            let c = base * shade;
            for j in 0..n_ang {
                let a = j as f32 / n_ang as f32 * TAU;
                let local = spin * Vec3::new(a.cos() * rr, 0.0, a.sin() * rr);
                if let Some(p) = lens.project(center + local) {
                    t.write(p.x.floor() as i32, p.y.floor() as i32, c, p.depth);
                }
            }
        }
    }
}

#[inline]
fn plot(t: &mut HdrTarget, sp: ScreenPoint, c: Vec3) {
    t.add(sp.x.floor() as i32, sp.y.floor() as i32, c, sp.depth);
}

/// Additive DDA line, depth interpolated along it. The end pixel is left
/// for the next segment.
fn line(t: &mut HdrTarget, a: ScreenPoint, b: ScreenPoint, c: Vec3) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let steps = dx.abs().max(dy.abs()).ceil();
    if !steps.is_finite() || steps > MAX_LINE_STEPS {
        return;
    }
    if steps < 1.0 {
        plot(t, a, c);
        return;
    }

    let n = steps as u32;
    for i in 0..n {
        let s = i as f32 / steps;
        let p = ScreenPoint { x: a.x + dx * s, y: a.y + dy * s, depth: a.depth + (b.depth - a.depth) * s };
        plot(t, p, c);
    }
}
