//! Run configuration.
//!
//! A run is described by a [`RunConfig`]. It can be assembled from an
//! optional TOML [`RunFile`] with command-line [`RunOverrides`] layered on
//! top, and is validated before any frame is generated.

mod file;
mod run;

pub use file::{FrameSection, OutputEntry, RunFile};
pub use run::{ConfigError, FrameSize, GenerationLimits, RunConfig, RunOverrides, MAX_FRAMES};
