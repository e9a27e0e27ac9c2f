//! Run counter collection and registry.

use crate::sequence::RunSummary;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus registry holding the generation counters.
pub struct MetricsRegistry {
    registry: Registry,
    frames_generated: IntCounter,
    frames_skipped: IntCounter,
    artifacts_written: IntCounter,
    artifacts_skipped: IntCounter,
    legs: IntCounter,
}

impl MetricsRegistry {
    /// Creates a registry with every counter registered at zero.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_generated = IntCounter::new(
            "pgm_pan_frames_generated_total",
            "Frame origins produced by the path planner",
        )?;
        let frames_skipped = IntCounter::new(
            "pgm_pan_frames_skipped_total",
            "Frames skipped because their pixels could not be read",
        )?;
        let artifacts_written = IntCounter::new(
            "pgm_pan_artifacts_written_total",
            "Output artifacts written successfully",
        )?;
        let artifacts_skipped = IntCounter::new(
            "pgm_pan_artifacts_skipped_total",
            "Output artifacts that could not be opened or written",
        )?;
        let legs = IntCounter::new("pgm_pan_legs_total", "Path legs walked")?;

        registry.register(Box::new(frames_generated.clone()))?;
        registry.register(Box::new(frames_skipped.clone()))?;
        registry.register(Box::new(artifacts_written.clone()))?;
        registry.register(Box::new(artifacts_skipped.clone()))?;
        registry.register(Box::new(legs.clone()))?;

        Ok(Self {
            registry,
            frames_generated,
            frames_skipped,
            artifacts_written,
            artifacts_skipped,
            legs,
        })
    }

    /// Brings the counters up to the totals in `summary`.
    ///
    /// Counters only move forward; a summary lower than what has already
    /// been recorded leaves the counter unchanged.
    pub fn update(&self, summary: &RunSummary) {
        advance(&self.frames_generated, summary.frames_generated);
        advance(&self.frames_skipped, summary.frames_skipped);
        advance(&self.artifacts_written, summary.frames_written);
        advance(&self.artifacts_skipped, summary.artifacts_skipped);
        advance(&self.legs, summary.legs);
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}
