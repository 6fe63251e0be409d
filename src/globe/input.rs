use crate::geo::{clamp_elevation, Orientation};
use crate::globe::camera::CameraRig;

/// Radians of rotation per pointer unit before zoom damping.
const DRAG_SENSITIVITY: f64 = 0.005;
/// Zoom distance at which the drag damping factor is 1.
const ZOOM_DAMP_REFERENCE: f64 = 1000.0;

/// Raw scroll amount in one of the two wheel conventions seen in the wild.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollDelta {
    /// ±120 per notch, positive when scrolling up (towards the globe).
    WheelDelta(f64),
    /// ±3 per notch, positive when scrolling down (away from the globe).
    Detail(f64),
}

impl ScrollDelta {
    /// Zoom units, positive meaning "zoom in". One notch is 60 units for
    /// wheel deltas and 45 for line details.
    pub fn zoom_units(self) -> f64 {
        match self {
            ScrollDelta::WheelDelta(d) => d * 0.5,
            ScrollDelta::Detail(d) => -d * 15.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct DragAnchor {
    pointer: (f64, f64),
    target: Orientation,
}

/// Turns pointer drags and wheel ticks into camera rig targets.
#[derive(Clone, Debug, Default)]
pub struct InputController {
    anchor: Option<DragAnchor>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Horizontal axis is mirrored so that the surface follows the pointer.
    #[inline(always)]
    fn pointer_space(x: f64, y: f64) -> (f64, f64) {
        (-x, y)
    }

    pub fn on_drag_start(&mut self, x: f64, y: f64, rig: &CameraRig) {
        self.anchor = Some(DragAnchor {
            pointer: Self::pointer_space(x, y),
            target: rig.target_orientation(),
        });
    }

    pub fn on_drag_move(&mut self, x: f64, y: f64, rig: &mut CameraRig) {
        let Some(anchor) = self.anchor else {
            return;
        };

        let (px, py) = Self::pointer_space(x, y);
        let zoom_damp = rig.zoom() / ZOOM_DAMP_REFERENCE;
        let scale = DRAG_SENSITIVITY * zoom_damp;

        let target = Orientation::new(
            anchor.target.x + (px - anchor.pointer.0) * scale,
            clamp_elevation(anchor.target.y + (py - anchor.pointer.1) * scale),
        );
        rig.set_target_orientation(target);
    }

    pub fn on_drag_end(&mut self) {
        self.anchor = None;
    }

    pub fn on_scroll(&mut self, delta: ScrollDelta, rig: &mut CameraRig) {
        rig.adjust_zoom_relative(delta.zoom_units());
    }
}
