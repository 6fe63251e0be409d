//! Globe core: camera rig, input handling, marker animation and the facade
//! that sequences them each frame.

mod backend;
mod camera;
mod facade;
mod input;
mod markers;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;

pub use backend::{GlobeBackend, GlobeTextures, MeshHandle};
pub use camera::{clamp_zoom, CameraRig, DEFAULT_ORIENTATION, MAX_ZOOM, MIN_ZOOM};
pub use facade::Globe;
pub use input::{InputController, ScrollDelta};
pub use markers::{
    rest_altitude, spawn_altitude, BlockSpec, Marker, MarkerAnimator, MarkerMode, LEVITATION_RATE,
};

/// Errors raised while setting up a globe.
#[derive(Debug, thiserror::Error)]
pub enum GlobeError {
    /// The earth image is mandatory.
    #[error("no image source provided for the earth")]
    MissingEarthTexture,

    /// A texture could not be loaded by the backend.
    #[error("failed to load texture {}: {source}", path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("backend error: {0}")]
    Backend(String),
}
