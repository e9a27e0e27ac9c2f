//! PGM Pan Library
//!
//! Extracts a sequence of fixed-size frames from one large grayscale
//! raster by simulating a camera panning along a polyline path. Each frame
//! is written under one or more output profiles, optionally inverted or
//! named in reverse order, ready to be assembled into an animation.
//!
//! # Architecture
//!
//! ```text
//! waypoints ─→ path (eased origins) ─→ sequence ─→ window.read ─→ output (per profile)
//!                                        ↑                ↑
//!                                     config        raster (header, addressing)
//! ```
//!
//! # Design Principles
//!
//! - **One buffer**: a single frame window is reused for every frame;
//!   frames are flushed to disk, never retained
//! - **Skip, don't abort**: an unreadable frame or unopenable artifact is
//!   logged and skipped; only setup failures end a run
//! - **Bounded**: a global artifact ceiling stops runaway paths
//! - **Wrap by default**: out-of-range origins alias back into the raster;
//!   the addressing policy can be swapped to reject them instead
//!
//! # Example
//!
//! ```no_run
//! use pgm_pan::{
//!     config::{FrameSize, RunConfig},
//!     output::{OutputProfile, Transform},
//!     path::Waypoint,
//!     sequence::SequenceGenerator,
//! };
//!
//! let config = RunConfig::new(
//!     "landscape.pgm",
//!     vec![Waypoint::new(0, 0), Waypoint::new(400, 120)],
//!     FrameSize::new(320, 240).unwrap(),
//! )
//! .with_output(OutputProfile::new("plain", Transform::NONE))
//! .with_output(OutputProfile::new("negative", Transform::INVERT))
//! .with_output_dir("frames");
//!
//! let summary = SequenceGenerator::new(config).run().unwrap();
//! println!("wrote {} frames", summary.frames_written);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod output;
pub mod path;
pub mod raster;
pub mod sequence;
pub mod window;

// Re-export commonly used types at crate root
pub use config::{ConfigError, FrameSize, GenerationLimits, RunConfig, RunFile, MAX_FRAMES};
pub use output::{ArtifactSink, DirectorySink, MemorySink, OutputProfile, Transform};
pub use path::{PathDirective, PathPlanner, Waypoint, MAX_PAN_SPEED};
pub use raster::{AddressingMode, RasterMetadata};
pub use sequence::{GeneratorError, GeneratorState, RunSummary, SequenceGenerator};
pub use window::FrameWindow;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
