use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Radius of the globe sphere in scene units.
pub const GLOBE_RADIUS: f64 = 200.0;

/// A geographic position in degrees. Only used as input; everything
/// downstream works on [`Orientation`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPosition {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Angular position around the globe center.
/// `x` is the azimuth (unbounded), `y` the elevation in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
}

impl Orientation {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same azimuth with the elevation clamped into [-π/2, π/2].
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            x: self.x,
            y: clamp_elevation(self.y),
        }
    }
}

#[inline(always)]
pub fn clamp_elevation(y: f64) -> f64 {
    y.clamp(-FRAC_PI_2, FRAC_PI_2)
}

/// Convert a lat/lon pair into the azimuth/elevation used for placement.
#[inline]
pub fn to_orientation(geo: GeoPosition) -> Orientation {
    let phi = (90.0 + geo.lon) * PI / 180.0;
    let theta = (180.0 - geo.lat) * PI / 180.0;
    Orientation::new(phi, PI - theta)
}

/// Inverse of [`to_orientation`]. Longitude is wrapped into [-180, 180).
pub fn to_geo(orientation: Orientation) -> GeoPosition {
    let lon = (orientation.x * 180.0 / PI - 90.0 + 180.0).rem_euclid(360.0) - 180.0;
    let lat = clamp_elevation(orientation.y) * 180.0 / PI;
    GeoPosition::new(lat, lon)
}

/// Cartesian position at `altitude` from the origin along `orientation`.
#[inline(always)]
pub fn to_cartesian(orientation: Orientation, altitude: f64) -> DVec3 {
    let (sin_x, cos_x) = orientation.x.sin_cos();
    let (sin_y, cos_y) = orientation.y.sin_cos();
    DVec3::new(
        altitude * sin_x * cos_y,
        altitude * sin_y,
        altitude * cos_x * cos_y,
    )
}

/// Point above (or on) the surface for a lat/lon pair.
#[inline]
pub fn surface_point(geo: GeoPosition, altitude: f64) -> DVec3 {
    to_cartesian(to_orientation(geo), altitude)
}

/// Walk the great-circle arc between two points on a sphere of the same
/// radius, calling `visitor` for each subdivision point (endpoint included,
/// start excluded). Segments are ~2° apart.
pub fn walk_arc(a: DVec3, b: DVec3, mut visitor: impl FnMut(DVec3)) {
    let radius = a.length();
    if radius < 1e-10 || b.length() < 1e-10 {
        visitor(b);
        return;
    }

    let ua = a / radius;
    let ub = b.normalize();
    let angle = ua.dot(ub).clamp(-1.0, 1.0).acos();
    let steps = ((angle.to_degrees() / 2.0).ceil() as usize).max(1);

    let sin_angle = angle.sin();
    if steps == 1 || sin_angle.abs() < 1e-10 {
        visitor(b);
        return;
    }

    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let sa = ((1.0 - t) * angle).sin() / sin_angle;
        let sb = (t * angle).sin() / sin_angle;
        visitor((ua * sa + ub * sb) * radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_orientation_of_origin() {
        let o = to_orientation(GeoPosition::new(0.0, 0.0));
        assert!((o.x - FRAC_PI_2).abs() < EPS);
        assert!(o.y.abs() < EPS);
    }

    #[test]
    fn test_orientation_is_deterministic() {
        let geo = GeoPosition::new(52.37, 4.89);
        assert_eq!(to_orientation(geo), to_orientation(geo));
    }

    #[test]
    fn test_cartesian_distance_equals_altitude() {
        for lat in [-90.0, -45.5, 0.0, 12.3, 89.9, 90.0] {
            for lon in [-180.0, -73.9, 0.0, 4.9, 139.7, 180.0] {
                for altitude in [1.0, 200.0, 200.5, 900.0] {
                    let p = surface_point(GeoPosition::new(lat, lon), altitude);
                    assert!((p.length() - altitude).abs() < 1e-6, "{lat},{lon},{altitude}");
                }
            }
        }
    }

    #[test]
    fn test_equator_prime_meridian_lies_on_x_axis() {
        let p = surface_point(GeoPosition::new(0.0, 0.0), 200.5);
        assert!((p.x - 200.5).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
        assert!(p.z.abs() < 1e-9);
    }

    #[test]
    fn test_north_pole_is_up() {
        let p = surface_point(GeoPosition::new(90.0, 0.0), GLOBE_RADIUS);
        assert!((p.y - GLOBE_RADIUS).abs() < 1e-9);
    }

    #[test]
    fn test_to_geo_inverts_to_orientation() {
        for (lat, lon) in [(0.0, 0.0), (52.37, 4.89), (-33.9, 151.2), (40.7, -74.0)] {
            let geo = to_geo(to_orientation(GeoPosition::new(lat, lon)));
            assert!((geo.lat - lat).abs() < 1e-9);
            assert!((geo.lon - lon).abs() < 1e-9);
        }
        let wrapped = to_geo(Orientation::new(FRAC_PI_2 + 2.0 * PI, 0.0));
        assert!(wrapped.lon.abs() < 1e-9);
    }

    #[test]
    fn test_clamped_keeps_azimuth() {
        let o = Orientation::new(7.5, 3.0).clamped();
        assert_eq!(o.x, 7.5);
        assert_eq!(o.y, FRAC_PI_2);
        assert_eq!(Orientation::new(0.0, -9.0).clamped().y, -FRAC_PI_2);
    }

    #[test]
    fn test_walk_arc_stays_on_sphere() {
        let a = surface_point(GeoPosition::new(0.0, 0.0), GLOBE_RADIUS);
        let b = surface_point(GeoPosition::new(40.0, 60.0), GLOBE_RADIUS);
        let mut count = 0;
        let mut last = a;
        walk_arc(a, b, |p| {
            assert!((p.length() - GLOBE_RADIUS).abs() < 1e-6);
            count += 1;
            last = p;
        });
        assert!(count > 1);
        assert!(last.distance(b) < 1e-6);
    }
}
