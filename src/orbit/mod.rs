// orbit/ - Solar-system backdrop
//
// A sun and eight planets on circular orbits, with a starfield, an asteroid
// belt and faint orbit paths. Orbital phase comes straight from the scene
// clock, so a body's position is a pure function of simulation time.
//
// The clock moves a fixed step per frame, not per wall-clock second:
// animation speed follows the display's frame rate.

mod camera;
mod catalog;
mod decor;

pub use camera::{Camera, Lens, OrbitControls, ScreenPoint};
pub use catalog::{BELT_RADIUS, BELT_TUBE, BodySpec, CATALOG, RING_INNER, RING_OUTER, find};
pub use decor::{AsteroidBelt, ORBIT_SEGMENTS, OrbitPath, Starfield};

use glam::{DVec3, Vec3};
use std::f64::consts::TAU;

use crate::config::{SceneConfig, SceneOptions};
use crate::render::SceneRenderer;
use crate::rng::XorShift;

/// Light every surface gets regardless of where the sun is
pub const AMBIENT_LIGHT: f32 = 0.3;

#[derive(Clone, Debug)]
pub struct Body {
    pub spec: BodySpec,
    /// Angle at t = 0, drawn once
    pub phase: f64,
    /// Self-rotation angle about the body's own y axis
    pub rotation: f32,
    pub position: DVec3,
}

impl Body {
    pub fn new(spec: BodySpec, rng: &mut XorShift) -> Self {
        let phase = if spec.orbit_radius > 0.0 { rng.next_f32() as f64 * TAU } else { 0.0 };
        let mut body = Self { spec, phase, rotation: 0.0, position: DVec3::ZERO };
        body.position = body.position_at(0.0);
        body
    }

    pub fn orbits(&self) -> bool {
        self.spec.orbit_radius > 0.0
    }

    /// Position on the orbit circle in the xz plane at simulation time `t`
    pub fn position_at(&self, t: f64) -> DVec3 {
        if !self.orbits() {
            return DVec3::ZERO;
        }
        let angle = self.phase + t * self.spec.orbit_speed;
        let r = self.spec.orbit_radius;
        DVec3::new(angle.cos() * r, 0.0, angle.sin() * r)
    }

    /// Time for one full orbit, None for the sun
    pub fn period(&self) -> Option<f64> {
        (self.orbits() && self.spec.orbit_speed != 0.0).then(|| TAU / self.spec.orbit_speed.abs())
    }

    pub fn world_position(&self) -> Vec3 {
        self.position.as_vec3()
    }
}

/// Monotonic simulation time, advanced a fixed step per frame
#[derive(Clone, Copy, Debug)]
pub struct SceneClock {
    t: f64,
    step: f64,
}

impl SceneClock {
    pub fn new(step: f64) -> Self {
        Self { t: 0.0, step: step.max(0.0) }
    }

    pub fn advance(&mut self) -> f64 {
        self.t += self.step;
        self.t
    }

    pub fn time(&self) -> f64 {
        self.t
    }
}

#[derive(Clone, Debug)]
pub struct OrbitalScene {
    bodies: Vec<Body>,
    paths: Vec<OrbitPath>,
    belt: AsteroidBelt,
    stars: Starfield,
    clock: SceneClock,
    options: SceneOptions,
    pub ambient: f32,
}

impl OrbitalScene {
    pub fn new(config: &SceneConfig, options: SceneOptions) -> Self {
        let mut rng = XorShift::new(config.seed);

        let stars = Starfield::new(config.star_count, config.star_extent, &mut rng);
        let bodies: Vec<Body> = CATALOG.iter().map(|spec| Body::new(*spec, &mut rng)).collect();
        let paths = bodies
            .iter()
            .filter(|b| b.orbits())
            .map(|b| OrbitPath::new(b.spec.orbit_radius as f32, options.show_orbits))
            .collect();
        let belt = AsteroidBelt::new(BELT_RADIUS, BELT_TUBE, config.belt_particles, &mut rng);

        Self {
            bodies,
            paths,
            belt,
            stars,
            clock: SceneClock::new(config.time_step),
            options,
            ambient: AMBIENT_LIGHT,
        }
    }

    /// Advance one frame. Orbits always move; self-rotation only with
    /// auto-rotate on. Decorations drift regardless.
    pub fn tick(&mut self) {
        let t = self.clock.advance();
        let spin = self.options.auto_rotate;

        for body in &mut self.bodies {
            body.position = body.position_at(t);
            if spin {
                body.rotation += body.spec.rotation_speed;
            }
        }

        self.stars.spin();
        self.belt.spin();
    }

    pub fn options(&self) -> SceneOptions {
        self.options
    }

    pub fn set_options(&mut self, options: SceneOptions) {
        self.set_show_orbits(options.show_orbits);
        self.set_auto_rotate(options.auto_rotate);
    }

    /// Visibility only, geometry is kept
    pub fn set_show_orbits(&mut self, show: bool) {
        self.options.show_orbits = show;
        for path in &mut self.paths {
            path.visible = show;
        }
    }

    pub fn set_auto_rotate(&mut self, on: bool) {
        self.options.auto_rotate = on;
    }

    /// Drop every object. Ticking and rendering an empty scene is fine.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.paths.clear();
        self.belt.points.clear();
        self.stars.points.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.paths.is_empty() && self.belt.points.is_empty() && self.stars.points.is_empty()
    }

    pub fn time(&self) -> f64 { self.clock.time() }
    pub fn bodies(&self) -> &[Body] { &self.bodies }
    pub fn paths(&self) -> &[OrbitPath] { &self.paths }
    pub fn belt(&self) -> &AsteroidBelt { &self.belt }
    pub fn stars(&self) -> &Starfield { &self.stars }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.spec.name.eq_ignore_ascii_case(name))
    }
}

/// Scene + camera + render pipeline, one per mounted surface
pub struct Orrery {
    w: u32,
    h: u32,
    scene: OrbitalScene,
    camera: Camera,
    controls: OrbitControls,
    renderer: SceneRenderer,
}

impl Orrery {
    pub fn new(w: u32, h: u32, config: SceneConfig, options: SceneOptions) -> Self {
        let config = config.sanitized();
        let aspect = if w > 0 && h > 0 { w as f32 / h as f32 } else { 1.0 };
        let camera = Camera::new(aspect);
        let controls = OrbitControls::new(camera.eye, camera.target, config.controls);

        log::debug!("orrery init {w}x{h}, {} stars", config.star_count);

        Self {
            w,
            h,
            scene: OrbitalScene::new(&config, options),
            camera,
            controls,
            renderer: SceneRenderer::new(w, h, config.bloom),
        }
    }

    /// One frame: move bodies, ease the camera, draw.
    pub fn tick(&mut self) {
        self.scene.tick();
        self.camera.eye = self.controls.update();
        self.render();
    }

    pub fn render(&mut self) {
        self.renderer.render(&self.scene, &self.camera);
    }

    /// Camera aspect and buffers follow the surface, geometry is untouched.
    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.camera.set_aspect(w, h);
        self.renderer.resize(w, h);
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.controls.rotate(dx, dy, self.h as f32);
    }

    pub fn zoom(&mut self, delta_y: f32) {
        self.controls.zoom(delta_y);
    }

    pub fn set_options(&mut self, options: SceneOptions) { self.scene.set_options(options); }
    pub fn set_show_orbits(&mut self, show: bool) { self.scene.set_show_orbits(show); }
    pub fn set_auto_rotate(&mut self, on: bool) { self.scene.set_auto_rotate(on); }

    pub fn clear(&mut self) {
        self.scene.clear();
    }

    pub fn scene(&self) -> &OrbitalScene { &self.scene }
    pub fn camera(&self) -> &Camera { &self.camera }
    pub fn pixels(&self) -> &[u8] { self.renderer.pixels() }

    // Accessors for WASM
    pub fn output_ptr(&self) -> *const u8 { self.renderer.ptr() }
    pub fn output_len(&self) -> usize { self.renderer.len() }
    pub fn width(&self) -> u32 { self.w }
    pub fn height(&self) -> u32 { self.h }
}
