//! Contract between the globe core and whatever draws it.
//!
//! The core never touches pixels. It hands positions, scales and
//! orientations to a [`GlobeBackend`], which owns the scene graph, the
//! camera, the light and the renderer.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::globe::GlobeError;

/// Opaque reference to a mesh living in the backend's scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

/// Image sources for the earth sphere. `earth` is mandatory, the other two
/// are optional enhancements a backend may ignore.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeTextures {
    pub earth: Option<String>,
    pub bump: Option<String>,
    pub specular: Option<String>,
}

impl GlobeTextures {
    pub fn new(earth: impl Into<String>) -> Self {
        Self {
            earth: Some(earth.into()),
            bump: None,
            specular: None,
        }
    }

    pub fn with_bump(mut self, bump: impl Into<String>) -> Self {
        self.bump = Some(bump.into());
        self
    }

    pub fn with_specular(mut self, specular: impl Into<String>) -> Self {
        self.specular = Some(specular.into());
        self
    }

    /// The earth source, if present and non-empty.
    pub fn earth(&self) -> Option<&str> {
        self.earth.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Scene, camera, light and renderer of the host environment.
pub trait GlobeBackend {
    /// Build the earth sphere, its atmosphere and the lights.
    fn load_globe(&mut self, textures: &GlobeTextures) -> Result<(), GlobeError>;

    /// Add a unit cube with the given color to the scene.
    fn create_block(&mut self, color: &str) -> MeshHandle;

    fn remove_mesh(&mut self, mesh: MeshHandle);

    fn set_mesh_position(&mut self, mesh: MeshHandle, position: DVec3);

    fn set_mesh_scale(&mut self, mesh: MeshHandle, scale: f64);

    /// Rotate a mesh so that it faces `target`.
    fn mesh_look_at(&mut self, mesh: MeshHandle, target: DVec3);

    fn set_camera_position(&mut self, position: DVec3);

    fn camera_look_at(&mut self, target: DVec3);

    fn set_light_position(&mut self, position: DVec3);

    /// Refresh camera aspect and render target size.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Draw the scene from the camera.
    fn render(&mut self);

    /// Start receiving pointer and wheel input for the globe.
    fn attach_listeners(&mut self) -> Result<(), GlobeError>;

    fn detach_listeners(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_earth_counts_as_missing() {
        let textures = GlobeTextures {
            earth: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(textures.earth().is_none());
        assert_eq!(GlobeTextures::new("earth.json").earth(), Some("earth.json"));
    }
}
