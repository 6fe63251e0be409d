use glam::{DMat4, DVec3};

/// Vertical field of view in degrees.
const FOV_Y_DEGREES: f64 = 30.0;
const NEAR: f64 = 1.0;
const FAR: f64 = 1000.0;

/// Perspective camera projecting world points onto the Braille pixel grid.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub position: DVec3,
    pub target: DVec3,
    /// Pixel width over pixel height.
    pub aspect: f64,
}

/// A projected point in canvas pixels plus its view depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

impl ScreenPoint {
    #[inline(always)]
    pub fn pixel(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 900.0),
            target: DVec3::ZERO,
            aspect: 1.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn half_fov_tan(&self) -> f64 {
        (FOV_Y_DEGREES.to_radians() / 2.0).tan()
    }

    fn forward(&self) -> DVec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// World up, swapped out when looking straight along it.
    fn up(&self) -> DVec3 {
        if self.forward().cross(DVec3::Y).length_squared() < 1e-12 {
            DVec3::Z
        } else {
            DVec3::Y
        }
    }

    pub fn view_projection(&self) -> DMat4 {
        let proj = DMat4::perspective_rh(FOV_Y_DEGREES.to_radians(), self.aspect, NEAR, FAR);
        let view = DMat4::look_at_rh(self.position, self.target, self.up());
        proj * view
    }

    /// Project `p` onto a `width` x `height` pixel grid. `None` when `p` is
    /// behind the near plane.
    #[inline]
    pub fn project(&self, view_proj: &DMat4, p: DVec3, width: usize, height: usize) -> Option<ScreenPoint> {
        let clip = *view_proj * p.extend(1.0);
        if clip.w < NEAR {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some(ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * width as f64,
            y: (1.0 - ndc_y) * 0.5 * height as f64,
            depth: clip.w,
        })
    }

    /// On-screen radius in pixels of a sphere of `radius` centered at the
    /// origin.
    pub fn sphere_screen_radius(&self, radius: f64, height: usize) -> f64 {
        let distance = self.position.length();
        if distance <= radius {
            return height as f64;
        }
        let angular = (radius / distance).asin();
        angular.tan() / self.half_fov_tan() * height as f64 / 2.0
    }

    /// Pixels covered by `size` world units at view depth `depth`.
    pub fn world_to_pixels(&self, size: f64, depth: f64, height: usize) -> f64 {
        if depth <= 0.0 {
            return 0.0;
        }
        size / depth / self.half_fov_tan() * height as f64 / 2.0
    }
}

/// Whether the segment from `eye` to `p` enters the sphere of `radius`
/// around the origin before reaching `p`.
pub fn hidden_by_sphere(eye: DVec3, p: DVec3, radius: f64) -> bool {
    let d = p - eye;
    let a = d.dot(d);
    if a < 1e-12 {
        return false;
    }
    let b = 2.0 * eye.dot(d);
    let c = eye.dot(eye) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return false;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    t > 0.0 && t < 1.0 - 1e-9
}

/// Whether a point on the sphere surface faces the eye.
#[inline(always)]
pub fn faces_eye(eye: DVec3, surface: DVec3) -> bool {
    (eye - surface).dot(surface) > 0.0
}
