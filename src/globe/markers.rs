use std::collections::HashMap;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::{to_cartesian, to_orientation, GeoPosition, Orientation, GLOBE_RADIUS};
use crate::globe::backend::{GlobeBackend, MeshHandle};

/// Altitude gained by a levitating marker per tick.
pub const LEVITATION_RATE: f64 = 0.1;

/// Altitude at which a block of `size` rests on the surface.
#[inline(always)]
pub fn rest_altitude(size: f64) -> f64 {
    GLOBE_RADIUS + size / 2.0
}

/// Altitude a levitating block of `size` spawns at, just beneath the surface.
#[inline(always)]
pub fn spawn_altitude(size: f64) -> f64 {
    GLOBE_RADIUS - size / 1.5
}

/// A placement request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub lat: f64,
    pub lon: f64,
    pub size: f64,
    pub color: String,
}

impl BlockSpec {
    pub fn new(lat: f64, lon: f64, size: f64, color: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            size,
            color: color.into(),
        }
    }

    pub fn position(&self) -> GeoPosition {
        GeoPosition::new(self.lat, self.lon)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerMode {
    Static,
    Levitating,
    /// Finished levitating; stays at its last altitude.
    Settled,
}

/// A block placed on the globe.
#[derive(Clone, Debug)]
pub struct Marker {
    pub mesh: MeshHandle,
    pub color: String,
    pub size: f64,
    pub orientation: Orientation,
    pub altitude: f64,
    pub mode: MarkerMode,
    pub levitation_rate: f64,
}

impl Marker {
    /// A marker resting on the surface.
    pub fn resting(mesh: MeshHandle, spec: &BlockSpec) -> Self {
        Self {
            mesh,
            color: spec.color.clone(),
            size: spec.size,
            orientation: to_orientation(spec.position()),
            altitude: rest_altitude(spec.size),
            mode: MarkerMode::Static,
            levitation_rate: 0.0,
        }
    }

    pub fn position(&self) -> DVec3 {
        to_cartesian(self.orientation, self.altitude)
    }

    pub fn rest_altitude(&self) -> f64 {
        rest_altitude(self.size)
    }

    pub fn is_levitating(&self) -> bool {
        self.mode == MarkerMode::Levitating
    }
}

/// Drives markers out of the surface, one step per tick.
#[derive(Clone, Debug, Default)]
pub struct MarkerAnimator {
    active: Vec<MeshHandle>,
}

impl MarkerAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink `marker` beneath the surface and start levitating it.
    pub fn begin_levitation(&mut self, marker: &mut Marker) {
        marker.altitude = spawn_altitude(marker.size);
        marker.levitation_rate = LEVITATION_RATE;
        marker.mode = MarkerMode::Levitating;
        self.active.push(marker.mesh);
    }

    /// Advance every levitating marker and push its new position to the
    /// backend. Markers that reach rest altitude leave the active set.
    pub fn tick<B: GlobeBackend>(&mut self, markers: &mut [Marker], backend: &mut B) {
        if self.active.is_empty() {
            return;
        }

        let index: HashMap<MeshHandle, usize> = markers
            .iter()
            .enumerate()
            .map(|(i, m)| (m.mesh, i))
            .collect();

        self.active.retain(|&mesh| {
            let Some(marker) = index.get(&mesh).and_then(|&i| markers.get_mut(i)) else {
                return false;
            };

            marker.altitude += marker.levitation_rate;
            backend.set_mesh_position(mesh, marker.position());

            if marker.altitude >= marker.rest_altitude() {
                marker.mode = MarkerMode::Settled;
                debug!(mesh = mesh.0, altitude = marker.altitude, "block settled");
                return false;
            }
            true
        });
    }

    /// Stop animating one marker. Returns whether it was active.
    pub fn cancel(&mut self, mesh: MeshHandle) -> bool {
        let before = self.active.len();
        self.active.retain(|&m| m != mesh);
        self.active.len() != before
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_active(&self, mesh: MeshHandle) -> bool {
        self.active.contains(&mesh)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
