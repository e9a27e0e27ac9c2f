//! TOML run file format.
//!
//! ```toml
//! source = "landscape.pgm"
//! waypoints = [[0, 0], [400, 120], [800, 0]]
//! output_dir = "frames"
//! max_frames = 2000
//! pan_speed = 5.0
//! addressing = "wrap"
//!
//! [frame]
//! width = 320
//! height = 240
//!
//! [[outputs]]
//! name = "plain"
//! transform = "none"
//! ```

use super::ConfigError;
use crate::path::Waypoint;
use crate::raster::AddressingMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Frame size as written in a run file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameSection {
    /// Frame width in pixels.
    pub width: i64,
    /// Frame height in pixels.
    pub height: i64,
}

/// One `[[outputs]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputEntry {
    /// Artifact name prefix.
    pub name: String,
    /// Transform token.
    #[serde(default = "default_transform")]
    pub transform: String,
}

fn default_transform() -> String {
    "none".to_string()
}

/// Full run file format. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunFile {
    /// Source raster path.
    pub source: Option<PathBuf>,
    /// Camera path as `[x, y]` pairs.
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    /// Output frame size.
    pub frame: Option<FrameSection>,
    /// Output profiles.
    #[serde(default)]
    pub outputs: Vec<OutputEntry>,
    /// Directory artifacts are written into.
    pub output_dir: Option<PathBuf>,
    /// Frame ceiling.
    pub max_frames: Option<u64>,
    /// Peak pan speed boost.
    pub pan_speed: Option<f64>,
    /// Row addressing policy.
    pub addressing: Option<AddressingMode>,
}

impl RunFile {
    /// Loads a run file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parses a run file from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
