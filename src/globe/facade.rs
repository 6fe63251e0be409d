use glam::DVec3;
use tracing::{debug, info};

use crate::geo::{to_orientation, GeoPosition};
use crate::globe::backend::{GlobeBackend, GlobeTextures, MeshHandle};
use crate::globe::camera::CameraRig;
use crate::globe::input::{InputController, ScrollDelta};
use crate::globe::markers::{BlockSpec, Marker, MarkerAnimator};
use crate::globe::GlobeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    Destroyed,
}

/// An earth globe with blocks on it.
///
/// Owns the camera rig, the input controller, the marker animator, every
/// placed marker and the backend that draws them. The host calls
/// [`Globe::tick`] once per display refresh.
pub struct Globe<B: GlobeBackend> {
    backend: B,
    textures: GlobeTextures,
    rig: CameraRig,
    input: InputController,
    animator: MarkerAnimator,
    markers: Vec<Marker>,
    last_block: Option<MeshHandle>,
    lifecycle: Lifecycle,
}

impl<B: GlobeBackend> Globe<B> {
    /// Fails when no earth image is given; bump and specular are optional.
    pub fn new(backend: B, textures: GlobeTextures) -> Result<Self, GlobeError> {
        Self::with_rig(backend, textures, CameraRig::default())
    }

    pub fn with_rig(backend: B, textures: GlobeTextures, rig: CameraRig) -> Result<Self, GlobeError> {
        if textures.earth().is_none() {
            return Err(GlobeError::MissingEarthTexture);
        }

        Ok(Self {
            backend,
            textures,
            rig,
            input: InputController::new(),
            animator: MarkerAnimator::new(),
            markers: Vec::new(),
            last_block: None,
            lifecycle: Lifecycle::Created,
        })
    }

    /// Build the scene and start listening for input. From here on every
    /// [`Globe::tick`] renders a frame.
    pub fn init(&mut self) -> Result<&mut Self, GlobeError> {
        if self.lifecycle != Lifecycle::Created {
            return Ok(self);
        }

        self.backend.load_globe(&self.textures)?;
        self.backend.attach_listeners()?;
        self.backend.set_camera_position(self.rig.camera_position());
        self.lifecycle = Lifecycle::Running;

        info!(earth = ?self.textures.earth(), "globe initialized");
        Ok(self)
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Stop listening for input. Later ticks do nothing.
    pub fn destroy(&mut self) -> &mut Self {
        if self.lifecycle == Lifecycle::Running {
            self.backend.detach_listeners();
            info!("globe destroyed");
        }
        self.lifecycle = Lifecycle::Destroyed;
        self
    }

    /// One frame: levitate blocks, ease the camera, draw.
    pub fn tick(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }

        self.animator.tick(&mut self.markers, &mut self.backend);
        self.rig.tick();

        self.backend.set_camera_position(self.rig.camera_position());
        self.backend.set_light_position(self.rig.light_position());
        self.backend.camera_look_at(DVec3::ZERO);
        self.backend.render();
    }

    pub fn resize(&mut self, width: u32, height: u32) -> &mut Self {
        self.backend.set_viewport(width, height);
        self
    }

    // Camera

    /// Positive values zoom towards the earth, negative away from it.
    pub fn zoom_relative(&mut self, delta: f64) -> &mut Self {
        self.rig.adjust_zoom_relative(delta);
        self
    }

    /// Ease the camera to `altitude` from the earth's center.
    pub fn zoom_to(&mut self, altitude: f64) -> &mut Self {
        self.rig.set_target_zoom(altitude);
        self
    }

    pub fn zoom_immediately_to(&mut self, altitude: f64) -> &mut Self {
        self.rig.set_immediate_zoom(altitude);
        self
    }

    /// Ease the camera until `pos` faces it.
    pub fn center(&mut self, pos: GeoPosition) -> &mut Self {
        self.rig.set_target_orientation(to_orientation(pos));
        self
    }

    pub fn center_immediate(&mut self, pos: GeoPosition) -> &mut Self {
        self.rig.set_current_and_target_orientation(to_orientation(pos));
        self
    }

    // Input

    pub fn drag_start(&mut self, x: f64, y: f64) -> &mut Self {
        self.input.on_drag_start(x, y, &self.rig);
        self
    }

    pub fn drag_move(&mut self, x: f64, y: f64) -> &mut Self {
        self.input.on_drag_move(x, y, &mut self.rig);
        self
    }

    pub fn drag_end(&mut self) -> &mut Self {
        self.input.on_drag_end();
        self
    }

    pub fn scroll(&mut self, delta: ScrollDelta) -> &mut Self {
        self.input.on_scroll(delta, &mut self.rig);
        self
    }

    // Blocks

    fn spawn_mesh(&mut self, spec: &BlockSpec) -> Marker {
        let mesh = self.backend.create_block(&spec.color);
        self.backend.set_mesh_scale(mesh, spec.size);
        Marker::resting(mesh, spec)
    }

    /// Place a block resting on the surface.
    pub fn add_block(&mut self, spec: &BlockSpec) -> &mut Self {
        let marker = self.spawn_mesh(spec);
        self.backend.set_mesh_position(marker.mesh, marker.position());
        self.backend.mesh_look_at(marker.mesh, DVec3::ZERO);

        debug!(mesh = marker.mesh.0, lat = spec.lat, lon = spec.lon, "block added");
        self.last_block = Some(marker.mesh);
        self.markers.push(marker);
        self
    }

    /// Place a block just beneath the surface that rises out of it over the
    /// following ticks.
    pub fn add_levitating_block(&mut self, spec: &BlockSpec) -> &mut Self {
        let mut marker = self.spawn_mesh(spec);
        self.animator.begin_levitation(&mut marker);
        self.backend.set_mesh_position(marker.mesh, marker.position());
        self.backend.mesh_look_at(marker.mesh, DVec3::ZERO);

        debug!(mesh = marker.mesh.0, lat = spec.lat, lon = spec.lon, "levitating block added");
        self.last_block = Some(marker.mesh);
        self.markers.push(marker);
        self
    }

    /// Remove one block, wherever it is in its animation.
    pub fn remove_block(&mut self, mesh: MeshHandle) -> &mut Self {
        let before = self.markers.len();
        self.markers.retain(|m| m.mesh != mesh);
        if self.markers.len() != before {
            self.animator.cancel(mesh);
            self.backend.remove_mesh(mesh);
            if self.last_block == Some(mesh) {
                self.last_block = None;
            }
        }
        self
    }

    /// Remove every block, including the ones still levitating.
    pub fn remove_all_blocks(&mut self) -> &mut Self {
        for marker in self.markers.drain(..) {
            self.backend.remove_mesh(marker.mesh);
        }
        self.animator.clear();
        self.last_block = None;
        self
    }

    // Accessors

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn levitating_count(&self) -> usize {
        self.animator.len()
    }

    /// Handle of the most recently placed block, if it still exists.
    pub fn last_block(&self) -> Option<MeshHandle> {
        self.last_block
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: GlobeBackend> Drop for Globe<B> {
    fn drop(&mut self) {
        if self.lifecycle == Lifecycle::Running {
            self.backend.detach_listeners();
        }
    }
}
