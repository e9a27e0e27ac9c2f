//! Run orchestration.

use super::GeneratorState;
use crate::config::{ConfigError, RunConfig};
use crate::output::{ArtifactSink, DirectorySink, OutputProfile};
use crate::path::PathPlanner;
use crate::raster::{AddressingPolicy, HeaderError, RasterMetadata, RasterReader};
use crate::window::FrameWindow;
use std::fs::File;
use std::io::{self, BufRead, Seek};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Errors that abort a run before any frame is generated.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("cannot open source raster {path:?}: {source}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse source raster header: {0}")]
    Header(#[from] HeaderError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Artifacts written successfully.
    pub frames_written: u64,
    /// Frame origins produced by the planner.
    pub frames_generated: u64,
    /// Frames whose pixels could not be read.
    pub frames_skipped: u64,
    /// Artifacts that could not be created or written.
    pub artifacts_skipped: u64,
    /// Legs walked.
    pub legs: u64,
}

/// Drives one generation run.
#[derive(Debug)]
pub struct SequenceGenerator {
    config: RunConfig,
    state: GeneratorState,
}

impl SequenceGenerator {
    /// Creates a generator for `config`.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            state: GeneratorState::Idle,
        }
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Runs against the configured source file, writing artifacts into the
    /// configured output directory. The file is read through a
    /// [`RasterReader`].
    pub fn run(&mut self) -> Result<RunSummary, GeneratorError> {
        self.state = GeneratorState::Idle;
        if let Err(e) = self.config.validate() {
            self.state.advance(GeneratorState::Aborted);
            return Err(e.into());
        }

        let opened = File::open(&self.config.source).and_then(RasterReader::new);
        let mut reader = match opened {
            Ok(reader) => reader,
            Err(source) => {
                self.state.advance(GeneratorState::Aborted);
                return Err(GeneratorError::SourceOpen {
                    path: self.config.source.clone(),
                    source,
                });
            }
        };
        let mut sink = DirectorySink::new(self.config.output_dir.clone());
        self.run_with(&mut reader, &mut sink)
    }

    /// Runs against an already opened source, writing artifacts to `sink`.
    pub fn run_with<R, S>(
        &mut self,
        source: &mut R,
        sink: &mut S,
    ) -> Result<RunSummary, GeneratorError>
    where
        R: BufRead + Seek,
        S: ArtifactSink,
    {
        let Self { config, state } = self;
        *state = GeneratorState::Idle;

        if let Err(e) = config.validate() {
            state.advance(GeneratorState::Aborted);
            return Err(e.into());
        }
        let metadata = match RasterMetadata::parse(source) {
            Ok(metadata) => metadata,
            Err(e) => {
                state.advance(GeneratorState::Aborted);
                return Err(e.into());
            }
        };
        state.advance(GeneratorState::HeaderParsed);

        info!(
            source = %config.source.display(),
            source_width = metadata.width(),
            source_height = metadata.height(),
            frame_width = config.frame.width(),
            frame_height = config.frame.height(),
            waypoints = config.waypoints.len(),
            outputs = config.outputs.len(),
            addressing = %config.addressing,
            "Generating frame sequence"
        );
        if config.outputs.is_empty() {
            warn!("No output profiles configured; frames will be read but not written");
        }

        let mut window = FrameWindow::with_policy(
            config.frame.width(),
            config.frame.height(),
            metadata,
            config.addressing,
        );

        state.advance(GeneratorState::Generating);
        let summary = generate(config, &mut window, source, sink);
        state.advance(GeneratorState::Done);

        info!(
            frames_written = summary.frames_written,
            frames_generated = summary.frames_generated,
            frames_skipped = summary.frames_skipped,
            artifacts_skipped = summary.artifacts_skipped,
            legs = summary.legs,
            "Frame sequence complete"
        );
        Ok(summary)
    }
}

/// Walks every leg, reading one frame per planned origin and writing it
/// under every profile, until the path ends or the ceiling is passed.
fn generate<P, R, S>(
    config: &RunConfig,
    window: &mut FrameWindow<P>,
    source: &mut R,
    sink: &mut S,
) -> RunSummary
where
    P: AddressingPolicy,
    R: BufRead + Seek,
    S: ArtifactSink,
{
    let max_frames = config.limits.max_frames;
    let planner = PathPlanner::new(&config.waypoints, config.limits.pan_speed);
    let mut summary = RunSummary::default();
    // Shared by all profiles: one index per (frame, profile) pair.
    let mut file_index: u64 = 0;

    'legs: for leg in planner.legs() {
        if summary.frames_written > max_frames {
            break;
        }
        summary.legs += 1;
        debug!(
            leg = leg.index,
            from = %leg.start,
            to = %leg.end,
            length = leg.length(),
            "Walking leg"
        );

        for step in leg.origins() {
            summary.frames_generated += 1;
            window.set_origin(step.origin.x, step.origin.y);
            if let Err(e) = window.read_from(source) {
                summary.frames_skipped += 1;
                warn!(
                    leg = leg.index,
                    x = step.origin.x,
                    y = step.origin.y,
                    error = %e,
                    "Skipping frame"
                );
                continue;
            }

            for profile in &config.outputs {
                let name = profile.artifact_name(file_index, max_frames);
                file_index += 1;
                match write_artifact(sink, &name, profile, window) {
                    Ok(()) => {
                        summary.frames_written += 1;
                        trace!(
                            artifact = %name,
                            written = summary.frames_written,
                            "Wrote artifact"
                        );
                    }
                    Err(e) => {
                        summary.artifacts_skipped += 1;
                        warn!(artifact = %name, error = %e, "Unable to write output artifact");
                    }
                }
            }

            if summary.frames_written > max_frames {
                warn!(max_frames, "Frame ceiling reached; stopping generation");
                break 'legs;
            }
        }
    }
    summary
}

/// Writes one artifact. The writer is closed before this returns, on
/// success and on error. An artifact that fails after it was created is
/// discarded so no truncated file is left behind.
fn write_artifact<S, P>(
    sink: &mut S,
    name: &str,
    profile: &OutputProfile,
    window: &mut FrameWindow<P>,
) -> io::Result<()>
where
    S: ArtifactSink,
    P: AddressingPolicy,
{
    let mut writer = sink.create(name)?;
    window.set_inverted(profile.transform().invert);
    let result = RasterMetadata::write(&mut writer, window.width(), window.height())
        .and_then(|()| window.write_to(&mut writer))
        .and_then(|()| sink.finish(name, writer));

    if result.is_err() {
        if let Err(e) = sink.discard(name) {
            warn!(artifact = %name, error = %e, "Unable to remove incomplete artifact");
        }
    }
    result
}
