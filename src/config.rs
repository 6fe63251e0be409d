//! Runtime settings, persisted as RON and overridable from the command line.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::data::BUILTIN_EARTH;
use crate::globe::{GlobeTextures, DEFAULT_ORIENTATION, MAX_ZOOM};

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    pub textures: GlobeTextures,
    pub camera: CameraConfig,
    pub feed: FeedConfig,
    pub debug: DebugConfig,
    /// Delay between frames while waiting for input.
    pub frame_interval_ms: u64,
}

/// Where the camera starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub azimuth: f64,
    pub elevation: f64,
    pub zoom: f64,
}

/// Demo stream of levitating blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub enabled: bool,
    /// Frames between two spawned blocks.
    pub spawn_interval: u64,
    /// Clear the globe once this many blocks are placed.
    pub max_blocks: usize,
    pub min_size: f64,
    pub max_size: f64,
    pub seed: u64,
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Filter directives, e.g. "info" or "tui_globe=debug".
    pub log_level: String,
    /// Logs are discarded when unset; the terminal belongs to the UI.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            textures: GlobeTextures::new(BUILTIN_EARTH),
            camera: CameraConfig::default(),
            feed: FeedConfig::default(),
            debug: DebugConfig::default(),
            frame_interval_ms: 16,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            azimuth: DEFAULT_ORIENTATION.x,
            elevation: DEFAULT_ORIENTATION.y,
            zoom: MAX_ZOOM,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_interval: 12,
            max_blocks: 400,
            min_size: 1.5,
            max_size: 6.0,
            seed: 0x5eed,
            palette: ["#ff5555", "#ffb86c", "#f1fa8c", "#50fa7b", "#8be9fd", "#bd93f9"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl GlobeConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&content).map_err(ConfigError::ParseError)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::default();
        let content = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(path, content).map_err(ConfigError::WriteError)
    }

    /// Write the defaults to `path` when nothing is there yet, so users get
    /// a file to edit. Returns whether a file was written.
    pub fn write_default_if_missing(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save(path)?;
        Ok(true)
    }

    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref earth) = args.earth {
            self.textures.earth = Some(earth.clone());
        }
        if let Some(ref bump) = args.bump {
            self.textures.bump = Some(bump.clone());
        }
        if let Some(ref specular) = args.specular {
            self.textures.specular = Some(specular.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref file) = args.log_file {
            self.debug.log_file = Some(file.clone());
        }
        if args.no_feed {
            self.feed.enabled = false;
        }
    }
}

/// Command-line arguments. Values override `globe.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tui-globe", about = "Interactive earth globe in the terminal")]
pub struct CliArgs {
    /// Path to the RON config file.
    #[arg(long, default_value = "globe.ron")]
    pub config: PathBuf,

    /// Coastline GeoJSON used as the earth layer ("builtin" for coarse outlines).
    #[arg(long)]
    pub earth: Option<String>,

    /// Borders GeoJSON overlay.
    #[arg(long)]
    pub bump: Option<String>,

    /// Lakes/rivers GeoJSON overlay.
    #[arg(long)]
    pub specular: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// File to write logs to.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Start without the demo block feed.
    #[arg(long)]
    pub no_feed: bool,
}
