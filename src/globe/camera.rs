use glam::DVec3;

use crate::geo::{to_cartesian, Orientation};

/// Closest the camera may get to the globe center.
pub const MIN_ZOOM: f64 = 300.0;
/// Farthest the camera may get from the globe center.
pub const MAX_ZOOM: f64 = 900.0;

/// Fraction of the remaining orientation gap closed per tick.
const ORIENTATION_EASING: f64 = 0.1;
/// Fraction of the remaining zoom gap closed per tick.
const ZOOM_EASING: f64 = 0.3;
/// Angular shift of the light relative to the camera.
const LIGHT_OFFSET: f64 = -150.0;

pub const DEFAULT_ORIENTATION: Orientation = Orientation::new(2.0, 1.0);

#[inline(always)]
pub fn clamp_zoom(z: f64) -> f64 {
    z.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Camera orbit around the globe. Current values chase their targets with a
/// first-order low-pass filter, one step per [`CameraRig::tick`].
#[derive(Clone, Debug)]
pub struct CameraRig {
    rotation: Orientation,
    target: Orientation,
    distance: f64,
    distance_target: f64,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(DEFAULT_ORIENTATION, MAX_ZOOM)
    }
}

impl CameraRig {
    pub fn new(orientation: Orientation, zoom: f64) -> Self {
        let orientation = orientation.clamped();
        let zoom = clamp_zoom(zoom);
        Self {
            rotation: orientation,
            target: orientation,
            distance: zoom,
            distance_target: zoom,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.rotation
    }

    pub fn target_orientation(&self) -> Orientation {
        self.target
    }

    pub fn zoom(&self) -> f64 {
        self.distance
    }

    pub fn target_zoom(&self) -> f64 {
        self.distance_target
    }

    pub fn set_target_orientation(&mut self, orientation: Orientation) {
        self.target = orientation.clamped();
    }

    pub fn set_current_and_target_orientation(&mut self, orientation: Orientation) {
        let orientation = orientation.clamped();
        self.target = orientation;
        self.rotation = orientation;
    }

    pub fn set_target_zoom(&mut self, zoom: f64) {
        self.distance_target = clamp_zoom(zoom);
    }

    pub fn set_immediate_zoom(&mut self, zoom: f64) {
        let zoom = clamp_zoom(zoom);
        self.distance_target = zoom;
        self.distance = zoom;
    }

    /// Positive `delta` moves the camera towards the globe.
    pub fn adjust_zoom_relative(&mut self, delta: f64) {
        self.distance_target = clamp_zoom(self.distance_target - delta);
    }

    /// Ease current orientation and zoom one step towards their targets.
    pub fn tick(&mut self) {
        self.rotation.x += (self.target.x - self.rotation.x) * ORIENTATION_EASING;
        self.rotation.y += (self.target.y - self.rotation.y) * ORIENTATION_EASING;
        self.distance += (self.distance_target - self.distance) * ZOOM_EASING;
    }

    pub fn camera_position(&self) -> DVec3 {
        to_cartesian(self.rotation, self.distance)
    }

    /// The light orbits with the camera at a fixed angular offset. The shifted
    /// angles are intentionally left unclamped.
    pub fn light_position(&self) -> DVec3 {
        let shifted = Orientation::new(
            self.rotation.x + LIGHT_OFFSET,
            self.rotation.y + LIGHT_OFFSET,
        );
        to_cartesian(shifted, self.distance)
    }
}
