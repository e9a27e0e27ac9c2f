//! Prometheus counters for generation runs.
//!
//! # Metrics Exposed
//!
//! - `pgm_pan_frames_generated_total` - Frame origins produced by the planner
//! - `pgm_pan_frames_skipped_total` - Frames whose pixels could not be read
//! - `pgm_pan_artifacts_written_total` - Artifacts written successfully
//! - `pgm_pan_artifacts_skipped_total` - Artifacts that could not be written
//! - `pgm_pan_legs_total` - Path legs walked
//!
//! # Example
//!
//! ```no_run
//! use pgm_pan::metrics::MetricsRegistry;
//! use pgm_pan::sequence::RunSummary;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.update(&RunSummary {
//!     frames_written: 40,
//!     frames_generated: 20,
//!     frames_skipped: 0,
//!     artifacts_skipped: 0,
//!     legs: 2,
//! });
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry};
