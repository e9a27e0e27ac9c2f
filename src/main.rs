//! PGM Pan CLI
//!
//! Command-line front end: builds a run configuration from arguments and
//! an optional TOML file, runs the generator and reports the frame count.

use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use pgm_pan::{
    config::{ConfigError, RunConfig, RunFile, RunOverrides},
    metrics::MetricsRegistry,
    path::{DirectiveError, PathDirective},
    raster::AddressingMode,
    sequence::{RunSummary, SequenceGenerator},
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Extract a panning frame sequence from a large PGM raster.
#[derive(Parser, Debug)]
#[command(name = "pgm-pan", version)]
struct Cli {
    /// Source PGM raster.
    source: Option<PathBuf>,

    /// Leg from (X1, Y1) to (X2, Y2). Repeatable.
    #[arg(
        short = 't',
        long = "track",
        num_args = 4,
        value_names = ["X1", "Y1", "X2", "Y2"],
        allow_negative_numbers = true,
        action = ArgAction::Append
    )]
    track: Vec<i64>,

    /// Point list: a count N followed by N X/Y pairs. Repeatable.
    #[arg(
        short = 'p',
        long = "points",
        num_args = 1..,
        value_name = "N X Y",
        allow_negative_numbers = true,
        action = ArgAction::Append
    )]
    points: Vec<i64>,

    /// Frame width and height.
    #[arg(
        short = 's',
        long = "size",
        num_args = 2,
        value_names = ["WIDTH", "HEIGHT"],
        allow_negative_numbers = true
    )]
    size: Option<Vec<i64>>,

    /// Output profile: OP is none, invert, reverse or revinvert. Repeatable.
    #[arg(
        short = 'w',
        long = "write",
        num_args = 2,
        value_names = ["OP", "NAME"],
        action = ArgAction::Append
    )]
    write: Vec<String>,

    /// Directory to write frames into.
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// TOML run file; command-line values take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop once more than this many frames are written.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Peak pan speed boost at the middle of each leg.
    #[arg(long)]
    pan_speed: Option<f64>,

    /// Skip frames that leave the raster instead of wrapping around.
    #[arg(long)]
    reject_out_of_range: bool,

    /// Write run counters in Prometheus text format to this file.
    #[arg(long)]
    metrics_out: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    info!("PGM Pan v{}", pgm_pan::VERSION);

    let config = match build_config(&cli, &matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let started = Instant::now();
    let mut generator = SequenceGenerator::new(config);
    let summary = match generator.run() {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "Wrote {} frames in {}ms",
        summary.frames_written,
        started.elapsed().as_millis()
    );

    if let Some(path) = &cli.metrics_out {
        if let Err(e) = write_metrics(path, &summary) {
            warn!(path = %path.display(), "Failed to write metrics: {}", e);
        }
    }
}

fn build_config(cli: &Cli, matches: &ArgMatches) -> Result<RunConfig, ConfigError> {
    let file = cli.config.as_deref().map(RunFile::from_file).transpose()?;
    let overrides = RunOverrides {
        source: cli.source.clone(),
        directives: path_directives(matches)?,
        frame: match cli.size.as_deref() {
            Some(&[width, height]) => Some((width, height)),
            _ => None,
        },
        outputs: cli
            .write
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect(),
        output_dir: cli.output_dir.clone(),
        max_frames: cli.max_frames,
        pan_speed: cli.pan_speed,
        addressing: cli.reject_out_of_range.then_some(AddressingMode::Reject),
    };
    RunConfig::assemble(file, overrides)
}

/// Collects `-t` and `-p` directives in the order they were given.
fn path_directives(matches: &ArgMatches) -> Result<Vec<PathDirective>, DirectiveError> {
    let mut ordered = Vec::new();
    // clap delivers exactly four values per `-t`.
    for (index, values) in occurrences(matches, "track") {
        for c in values.chunks_exact(4) {
            ordered.push((index, PathDirective::track([c[0], c[1], c[2], c[3]])));
        }
    }
    for (index, values) in occurrences(matches, "points") {
        ordered.push((index, PathDirective::points(&values)?));
    }
    ordered.sort_by_key(|(index, _)| *index);
    Ok(ordered.into_iter().map(|(_, directive)| directive).collect())
}

/// Values of each occurrence of `id`, keyed by the argument index of the
/// occurrence's first value.
fn occurrences(matches: &ArgMatches, id: &str) -> Vec<(usize, Vec<i64>)> {
    let Some(groups) = matches.get_occurrences::<i64>(id) else {
        return Vec::new();
    };
    let indices: Vec<usize> = matches
        .indices_of(id)
        .map(Iterator::collect)
        .unwrap_or_default();
    let mut cursor = 0;
    groups
        .map(|group| {
            let values: Vec<i64> = group.copied().collect();
            let index = indices.get(cursor).copied().unwrap_or(usize::MAX);
            cursor += values.len();
            (index, values)
        })
        .collect()
}

fn write_metrics(path: &Path, summary: &RunSummary) -> Result<(), Box<dyn std::error::Error>> {
    let registry = MetricsRegistry::new()?;
    registry.update(summary);
    std::fs::write(path, registry.encode()?)?;
    info!(path = %path.display(), "Wrote run metrics");
    Ok(())
}
