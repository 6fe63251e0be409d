//! In-memory backend that records every call, for unit tests.

use std::collections::HashMap;

use glam::DVec3;

use crate::globe::backend::{GlobeBackend, GlobeTextures, MeshHandle};
use crate::globe::GlobeError;

#[derive(Clone, Debug, Default)]
pub struct RecordedMesh {
    pub color: String,
    pub position: DVec3,
    pub scale: f64,
    pub look_at: Option<DVec3>,
}

#[derive(Default)]
pub struct RecordingBackend {
    pub meshes: HashMap<MeshHandle, RecordedMesh>,
    pub loaded: Option<GlobeTextures>,
    pub camera: DVec3,
    pub camera_target: Option<DVec3>,
    pub light: DVec3,
    pub viewport: Option<(u32, u32)>,
    pub renders: usize,
    pub listening: bool,
    pub fail_load: bool,
    next_id: u64,
}

impl RecordingBackend {
    /// A backend whose `load_globe` always fails.
    pub fn failing() -> Self {
        Self {
            fail_load: true,
            ..Default::default()
        }
    }

    pub fn position(&self, mesh: MeshHandle) -> Option<DVec3> {
        self.meshes.get(&mesh).map(|m| m.position)
    }
}

impl GlobeBackend for RecordingBackend {
    fn load_globe(&mut self, textures: &GlobeTextures) -> Result<(), GlobeError> {
        if self.fail_load {
            return Err(GlobeError::Backend("load refused".to_string()));
        }
        self.loaded = Some(textures.clone());
        Ok(())
    }

    fn create_block(&mut self, color: &str) -> MeshHandle {
        self.next_id += 1;
        let handle = MeshHandle(self.next_id);
        self.meshes.insert(
            handle,
            RecordedMesh {
                color: color.to_string(),
                scale: 1.0,
                ..Default::default()
            },
        );
        handle
    }

    fn remove_mesh(&mut self, mesh: MeshHandle) {
        self.meshes.remove(&mesh);
    }

    fn set_mesh_position(&mut self, mesh: MeshHandle, position: DVec3) {
        // Orphaned handles must not resurrect meshes.
        if let Some(m) = self.meshes.get_mut(&mesh) {
            m.position = position;
        }
    }

    fn set_mesh_scale(&mut self, mesh: MeshHandle, scale: f64) {
        if let Some(m) = self.meshes.get_mut(&mesh) {
            m.scale = scale;
        }
    }

    fn mesh_look_at(&mut self, mesh: MeshHandle, target: DVec3) {
        if let Some(m) = self.meshes.get_mut(&mesh) {
            m.look_at = Some(target);
        }
    }

    fn set_camera_position(&mut self, position: DVec3) {
        self.camera = position;
    }

    fn camera_look_at(&mut self, target: DVec3) {
        self.camera_target = Some(target);
    }

    fn set_light_position(&mut self, position: DVec3) {
        self.light = position;
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }

    fn render(&mut self) {
        self.renders += 1;
    }

    fn attach_listeners(&mut self) -> Result<(), GlobeError> {
        self.listening = true;
        Ok(())
    }

    fn detach_listeners(&mut self) {
        self.listening = false;
    }
}
