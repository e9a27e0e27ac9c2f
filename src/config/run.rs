//! Validated run configuration.

use super::RunFile;
use crate::output::{profiles_from_tokens, OutputProfile};
use crate::path::{DirectiveError, PathDirective, Waypoint, MAX_PAN_SPEED};
use crate::raster::AddressingMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default ceiling on written artifacts.
pub const MAX_FRAMES: u64 = 2000;

/// Configuration errors. All of them abort the run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame width/height {width}x{height} (both must be positive)")]
    InvalidFrameSize { width: i64, height: i64 },
    #[error("frame width/height not given")]
    MissingFrameSize,
    #[error("source raster path not given")]
    MissingSource,
    #[error("path needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),
    #[error("pan speed must be finite and non-negative, got {0}")]
    InvalidPanSpeed(f64),
    #[error("invalid path directive: {0}")]
    Directive(#[from] DirectiveError),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Dimensions of every output frame. Both are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    width: u32,
    height: u32,
}

impl FrameSize {
    /// Checks and converts a requested frame size.
    pub fn new(width: i64, height: i64) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidFrameSize { width, height };
        let w = u32::try_from(width).map_err(|_| invalid())?;
        let h = u32::try_from(height).map_err(|_| invalid())?;
        if w == 0 || h == 0 {
            return Err(invalid());
        }
        Ok(Self {
            width: w,
            height: h,
        })
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Numeric limits of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationLimits {
    /// Generation stops once more than this many artifacts are written.
    /// Reversed profiles also count down from this value.
    pub max_frames: u64,
    /// Peak speed boost at the middle of each leg.
    pub pan_speed: f64,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_frames: MAX_FRAMES,
            pan_speed: MAX_PAN_SPEED,
        }
    }
}

/// Everything a generation run consumes.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Source raster path.
    pub source: PathBuf,
    /// Camera path, at least two points.
    pub waypoints: Vec<Waypoint>,
    /// Output frame size.
    pub frame: FrameSize,
    /// Output profiles, written in this order for every frame.
    pub outputs: Vec<OutputProfile>,
    /// Directory artifacts are written into.
    pub output_dir: Option<PathBuf>,
    /// Frame ceiling and pan speed.
    pub limits: GenerationLimits,
    /// Row addressing policy.
    pub addressing: AddressingMode,
}

impl RunConfig {
    /// Creates a configuration with no outputs and default limits.
    pub fn new(source: impl Into<PathBuf>, waypoints: Vec<Waypoint>, frame: FrameSize) -> Self {
        Self {
            source: source.into(),
            waypoints,
            frame,
            outputs: Vec::new(),
            output_dir: None,
            limits: GenerationLimits::default(),
            addressing: AddressingMode::default(),
        }
    }

    /// Adds an output profile.
    pub fn with_output(mut self, profile: OutputProfile) -> Self {
        self.outputs.push(profile);
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Sets the generation limits.
    pub fn with_limits(mut self, limits: GenerationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the addressing policy.
    pub fn with_addressing(mut self, addressing: AddressingMode) -> Self {
        self.addressing = addressing;
        self
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints(self.waypoints.len()));
        }
        let k = self.limits.pan_speed;
        if !k.is_finite() || k < 0.0 {
            return Err(ConfigError::InvalidPanSpeed(k));
        }
        Ok(())
    }

    /// Combines a config file with command-line overrides.
    ///
    /// Scalars given on the command line win. Command-line path directives
    /// replace the file's waypoints when any are given, and command-line
    /// outputs are appended after the file's.
    pub fn assemble(file: Option<RunFile>, overrides: RunOverrides) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let source = overrides
            .source
            .or(file.source)
            .ok_or(ConfigError::MissingSource)?;

        let waypoints = if overrides.directives.is_empty() {
            file.waypoints
        } else {
            PathDirective::flatten(&overrides.directives)
        };

        let (width, height) = overrides
            .frame
            .or(file.frame.map(|f| (f.width, f.height)))
            .ok_or(ConfigError::MissingFrameSize)?;
        let frame = FrameSize::new(width, height)?;

        let mut outputs = profiles_from_tokens(
            file.outputs
                .into_iter()
                .map(|entry| (entry.transform, entry.name)),
        );
        outputs.extend(profiles_from_tokens(overrides.outputs));

        let defaults = GenerationLimits::default();
        let limits = GenerationLimits {
            max_frames: overrides
                .max_frames
                .or(file.max_frames)
                .unwrap_or(defaults.max_frames),
            pan_speed: overrides
                .pan_speed
                .or(file.pan_speed)
                .unwrap_or(defaults.pan_speed),
        };

        let config = Self {
            source,
            waypoints,
            frame,
            outputs,
            output_dir: overrides.output_dir.or(file.output_dir),
            limits,
            addressing: overrides
                .addressing
                .or(file.addressing)
                .unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Source raster path.
    pub source: Option<PathBuf>,
    /// Path directives in command-line order.
    pub directives: Vec<PathDirective>,
    /// Requested frame width and height, unchecked.
    pub frame: Option<(i64, i64)>,
    /// `(transform token, name)` pairs in command-line order.
    pub outputs: Vec<(String, String)>,
    /// Output directory.
    pub output_dir: Option<PathBuf>,
    /// Frame ceiling.
    pub max_frames: Option<u64>,
    /// Peak pan speed boost.
    pub pan_speed: Option<f64>,
    /// Addressing policy.
    pub addressing: Option<AddressingMode>,
}
