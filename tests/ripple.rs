// Wave field and ripple simulator behaviour

use backdrop_engine::config::RippleConfig;
use backdrop_engine::ripple::{HeightField, Impulse, PointerInput, Refractor, RippleSim, SourceImage, Viewport};
use backdrop_engine::rng::XorShift;

fn field_with_drop(w: usize, h: usize, damping: f32) -> HeightField {
    let mut f = HeightField::new(w, h, damping);
    f.drop(Impulse::new(w as f32 / 2.0, h as f32 / 2.0, 10.0, 200.0));
    f
}

/// Per-pixel refraction rebuilt from the field and the source image
fn refracted(field: &HeightField, src: &SourceImage, refraction: f32, gleam: f32) -> (Vec<u8>, usize, usize) {
    let (w, h) = (field.width(), field.height());
    let u = field.current();
    let mut out = src.pixels().to_vec();
    let (mut moved, mut clamped) = (0, 0);
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            let dx = ((u[i - 1] - u[i + 1]) * refraction) as i32;
            let dy = ((u[i - w] - u[i + w]) * refraction) as i32;
            if dx == 0 && dy == 0 {
                continue;
            }
            moved += 1;
            let (sx, sy) = (x as i32 + dx, y as i32 + dy);
            if sx < 0 || sy < 0 || sx >= w as i32 || sy >= h as i32 {
                clamped += 1;
            }
            let [r, g, b, a] = src.sample(sx, sy);
            let alpha = (a as f32 + (dx.abs() + dy.abs()) as f32 * gleam).min(255.0) as u8;
            out[i * 4..i * 4 + 4].copy_from_slice(&[r, g, b, alpha]);
        }
    }
    (out, moved, clamped)
}

fn border_is_zero(f: &HeightField) -> bool {
    let (w, h) = (f.width() as i32, f.height() as i32);
    (0..w).all(|x| f.get(x, 0) == 0.0 && f.get(x, h - 1) == 0.0)
        && (0..h).all(|y| f.get(0, y) == 0.0 && f.get(w - 1, y) == 0.0)
}

#[test]
fn test_energy_strictly_decreases_for_any_damping() {
    for d in [0.5, 0.9, 0.97, 0.986, 0.99] {
        let mut f = field_with_drop(64, 48, d);
        let mut last = f.energy();
        assert!(last > 0.0);
        for tick in 0..60 {
            f.step();
            let e = f.energy();
            assert!(e < last, "damping {d}: energy rose at tick {tick} ({last} -> {e})");
            last = e;
        }
    }
}

#[test]
fn test_energy_scales_by_damping_each_tick() {
    let mut f = field_with_drop(80, 60, 0.986);
    for _ in 0..20 {
        let before = f.energy();
        f.step();
        let ratio = f.energy() / before;
        assert!((ratio - 0.986).abs() < 1e-3, "ratio {ratio}");
    }
}

#[test]
fn test_example_scenario_100x100() {
    let mut f = HeightField::new(100, 100, 0.986);
    f.drop(Impulse::new(50.0, 50.0, 10.0, 200.0));

    let start = f.peak();
    assert_eq!(start, 200.0);

    // Nothing beyond the radius before the first tick
    for y in 0..100i32 {
        for x in 0..100i32 {
            let (dx, dy) = (x - 50, y - 50);
            if dx * dx + dy * dy > 100 {
                assert_eq!(f.get(x, y), 0.0, "({x}, {y}) touched");
            }
        }
    }

    for _ in 0..5 {
        f.step();
    }
    assert!(f.peak() < start, "peak {} after 5 ticks", f.peak());
}

#[test]
fn test_single_drop_is_radially_symmetric() {
    let f = field_with_drop(101, 101, 0.986);
    let c = 50;
    for dy in -12..=12 {
        for dx in -12..=12 {
            let v = f.get(c + dx, c + dy);
            assert_eq!(v, f.get(c - dx, c + dy));
            assert_eq!(v, f.get(c + dx, c - dy));
            assert_eq!(v, f.get(c + dy, c + dx));
        }
    }
}

#[test]
fn test_edge_and_outside_drops_are_clipped() {
    let mut f = HeightField::new(40, 30, 0.986);
    for (x, y) in [(0.0, 0.0), (39.0, 29.0), (-5.0, 10.0), (45.0, 31.0), (-1000.0, -1000.0), (1e9, 5.0)] {
        f.drop(Impulse::new(x, y, 12.0, 150.0));
    }
    assert!(border_is_zero(&f));
    for _ in 0..200 {
        f.step();
        assert!(border_is_zero(&f));
    }
    assert!(f.current().iter().all(|v| v.is_finite()));
}

#[test]
fn test_degenerate_drops_are_ignored() {
    let mut f = HeightField::new(20, 20, 0.986);
    f.drop(Impulse::new(10.0, 10.0, 0.0, 100.0));
    f.drop(Impulse::new(10.0, 10.0, -3.0, 100.0));
    f.drop(Impulse::new(f32::NAN, 10.0, 5.0, 100.0));
    f.drop(Impulse::new(10.0, 10.0, f32::INFINITY, 100.0));
    f.drop(Impulse::new(10.0, 10.0, 5.0, f32::NAN));
    assert_eq!(f.energy(), 0.0);
    assert_eq!(f.peak(), 0.0);
}

#[test]
fn test_overlapping_drops_accumulate() {
    let mut f = HeightField::new(50, 50, 0.986);
    f.drop(Impulse::new(25.0, 25.0, 5.0, 100.0));
    f.drop(Impulse::new(25.0, 25.0, 5.0, 100.0));
    assert_eq!(f.get(25, 25), 200.0);
}

#[test]
fn test_tiny_fields_do_not_panic() {
    for (w, h) in [(0, 0), (1, 1), (2, 5), (3, 3)] {
        let mut f = HeightField::new(w, h, 0.986);
        f.drop(Impulse::new(1.0, 1.0, 4.0, 50.0));
        f.step();
        assert!(f.energy() >= 0.0);
    }
}

#[test]
fn test_flat_field_renders_the_source_unchanged() {
    let mut sim = RippleSim::new(64, 40, RippleConfig::default());
    sim.tick(0.0);
    assert_eq!(sim.pixels(), sim.source().pixels());
}

#[test]
fn test_disturbed_field_displaces_pixels() {
    let mut sim = RippleSim::new(64, 40, RippleConfig::default());
    sim.impulse(Impulse::new(32.0, 20.0, 10.0, 200.0));
    sim.tick(0.0);
    assert_ne!(sim.pixels(), sim.source().pixels());
}

#[test]
fn test_refraction_samples_the_displaced_source_pixel() {
    let (w, h) = (64, 64);
    let src = SourceImage::generate(w, h, 40, &mut XorShift::new(7));
    let mut field = HeightField::new(w, h, 0.986);
    field.drop(Impulse::new(32.0, 32.0, 12.0, 300.0));
    // Near a corner so some offsets reach past the edge
    field.drop(Impulse::new(3.0, 3.0, 6.0, 300.0));
    field.step();

    let mut out = Refractor::new(w, h);
    out.render(&field, &src, 1.0, 1.5);
    let (expected, moved, clamped) = refracted(&field, &src, 1.0, 1.5);
    assert!(moved > 0);
    assert!(clamped > 0, "no offset reached the edge");
    for (i, (got, want)) in out.pixels().chunks(4).zip(expected.chunks(4)).enumerate() {
        assert_eq!(got, want, "pixel ({}, {})", i % w, i / w);
    }
}

#[test]
fn test_gleam_saturates_alpha() {
    let (w, h) = (48, 48);
    let src = SourceImage::generate(w, h, 0, &mut XorShift::new(1));
    let mut field = HeightField::new(w, h, 0.986);
    field.drop(Impulse::new(24.0, 24.0, 10.0, 300.0));
    field.step();

    let mut out = Refractor::new(w, h);
    out.render(&field, &src, 1.0, 1000.0);
    let (expected, moved, _) = refracted(&field, &src, 1.0, 1000.0);
    assert!(moved > 0);
    assert_eq!(out.pixels(), &expected[..]);

    let u = field.current();
    let mut lit = 0;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            let dx = (u[i - 1] - u[i + 1]) as i32;
            let dy = (u[i - w] - u[i + w]) as i32;
            if dx != 0 || dy != 0 {
                assert_eq!(out.pixels()[i * 4 + 3], 255);
                lit += 1;
            }
        }
    }
    assert_eq!(lit, moved);
}

#[test]
fn test_render_still_shows_the_undisturbed_source() {
    let mut sim = RippleSim::new(64, 40, RippleConfig::default());
    sim.impulse(Impulse::new(32.0, 20.0, 10.0, 200.0));
    sim.tick(0.0);
    assert_ne!(sim.pixels(), sim.source().pixels());
    sim.render_still();
    assert_eq!(sim.pixels(), sim.source().pixels());
}

#[test]
fn test_ambient_drips_arrive_on_their_own() {
    let mut sim = RippleSim::new(96, 64, RippleConfig::default());
    for frame in 0..200 {
        sim.tick(frame as f64 * 16.0);
    }
    assert!(sim.field().energy() > 0.0, "no drip within 3.2 s");
}

#[test]
fn test_disabled_ambient_stays_calm() {
    let mut config = RippleConfig::default();
    config.ambient.enabled = false;
    let mut sim = RippleSim::new(96, 64, config);
    for frame in 0..400 {
        sim.tick(frame as f64 * 16.0);
    }
    assert_eq!(sim.field().energy(), 0.0);
}

#[test]
fn test_pointer_press_lands_in_buffer_pixels() {
    let mut sim = RippleSim::new(200, 100, RippleConfig::default());
    // Canvas shown at half its backing size
    let view = Viewport::new(100.0, 50.0, 200, 100);
    sim.pointer(PointerInput::Down { x: 50.0, y: 25.0 }, &view);
    assert_eq!(sim.field().get(100, 50), 280.0);
}

#[test]
fn test_resize_resets_to_calm() {
    let mut sim = RippleSim::new(64, 64, RippleConfig::default());
    sim.impulse(Impulse::new(32.0, 32.0, 10.0, 200.0));
    sim.tick(0.0);
    assert!(sim.field().energy() > 0.0);

    sim.resize(80, 50);
    assert_eq!((sim.width(), sim.height()), (80, 50));
    assert_eq!(sim.field().energy(), 0.0);
    assert_eq!(sim.output_len(), 80 * 50 * 4);
    assert_eq!(sim.pixels(), sim.source().pixels());
}

#[test]
fn test_zero_size_simulator_is_inert() {
    let mut sim = RippleSim::new(0, 0, RippleConfig::default());
    sim.impulse(Impulse::new(0.0, 0.0, 10.0, 100.0));
    sim.tick(0.0);
    sim.tick(5000.0);
    assert_eq!(sim.output_len(), 0);
}
