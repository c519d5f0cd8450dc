// catalog.rs - The fixed set of bodies
//
// Visual units, not astronomy: radii and distances are picked to read well on
// screen, speeds are relative to Earth = 1.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySpec {
    pub name: &'static str,
    /// Sphere radius
    pub radius: f32,
    pub color: u32,
    /// Distance from the sun, 0 = does not orbit
    pub orbit_radius: f64,
    /// Radians per unit of simulation time
    pub orbit_speed: f64,
    /// Radians added per frame while auto-rotate is on
    pub rotation_speed: f32,
    pub ring: bool,
    pub emissive: bool,
}

const fn body(
    name: &'static str,
    radius: f32,
    color: u32,
    orbit_radius: f64,
    orbit_speed: f64,
    rotation_speed: f32,
) -> BodySpec {
    BodySpec { name, radius, color, orbit_radius, orbit_speed, rotation_speed, ring: false, emissive: false }
}

pub static CATALOG: [BodySpec; 9] = [
    BodySpec { emissive: true, ..body("Sun", 20.0, 0xFDB813, 0.0, 0.0, 0.001) },
    body("Mercury", 2.5, 0x8C7853, 50.0, 1.6, 0.004),
    body("Venus", 4.0, 0xFFC649, 80.0, 1.2, 0.002),
    body("Earth", 4.5, 0x6B93D6, 120.0, 1.0, 0.02),
    body("Mars", 3.5, 0xC1440E, 160.0, 0.8, 0.018),
    body("Jupiter", 11.0, 0xD8CA9D, 250.0, 0.45, 0.04),
    BodySpec { ring: true, ..body("Saturn", 9.0, 0xFAD5A5, 330.0, 0.35, 0.038) },
    body("Uranus", 7.0, 0x4FD0E7, 400.0, 0.25, 0.03),
    body("Neptune", 7.0, 0x4B70DD, 460.0, 0.2, 0.032),
];

/// Asteroid belt sits between Mars and Jupiter
pub const BELT_RADIUS: f32 = 205.0;
pub const BELT_TUBE: f32 = 12.0;

/// Saturn's ring, as multiples of the planet radius
pub const RING_INNER: f32 = 1.4;
pub const RING_OUTER: f32 = 2.3;

pub fn find(name: &str) -> Option<&'static BodySpec> {
    CATALOG.iter().find(|b| b.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_emissive_body_at_the_centre() {
        let suns: Vec<_> = CATALOG.iter().filter(|b| b.emissive).collect();
        assert_eq!(suns.len(), 1);
        assert_eq!(suns[0].orbit_radius, 0.0);
    }

    #[test]
    fn only_saturn_has_a_ring() {
        let ringed: Vec<_> = CATALOG.iter().filter(|b| b.ring).map(|b| b.name).collect();
        assert_eq!(ringed, ["Saturn"]);
    }

    #[test]
    fn belt_sits_between_mars_and_jupiter() {
        let mars = find("mars").unwrap().orbit_radius as f32;
        let jupiter = find("Jupiter").unwrap().orbit_radius as f32;
        assert!(BELT_RADIUS - BELT_TUBE > mars);
        assert!(BELT_RADIUS + BELT_TUBE < jupiter);
    }
}
