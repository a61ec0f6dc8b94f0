use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use gbtrack_core::detection::DetectionFormat;
use gbtrack_core::pipeline::config::{
    AlgorithmConfig, BerclazConfig, NStageConfig, TrackingConfig,
};
use gbtrack_core::pipeline::run_tracking;

use crate::summary::print_run_summary;

#[derive(Args)]
pub struct RunArgs {
    /// Tracking config file (TOML); replaces the other options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Algorithm to run: n-stage or berclaz
    #[arg(long, default_value = "n-stage")]
    pub algorithm: String,

    /// Detection CSV file
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Output CSV file for the tracks
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// External header for headerless input files
    #[arg(long)]
    pub input_header: Option<String>,

    /// Input format: 2D, Box or Angular
    #[arg(long, default_value = "2D")]
    pub input_format: String,

    /// Delimiter separating values in the input file
    #[arg(long, default_value = ";")]
    pub input_delimiter: char,

    /// Delimiter separating values in the output file
    #[arg(long, default_value = ";")]
    pub output_delimiter: char,

    /// Image width in pixels
    #[arg(long, default_value = "1")]
    pub image_width: f64,

    /// Image height in pixels
    #[arg(long, default_value = "1")]
    pub image_height: f64,

    /// Temporal weight for detection comparison
    #[arg(long, default_value = "1")]
    pub temporal_weight: f64,

    /// Spatial weight for detection comparison
    #[arg(long, default_value = "1")]
    pub spatial_weight: f64,

    /// Angular weight for detection comparison
    #[arg(long, default_value = "1")]
    pub angular_weight: f64,

    /// (n-stage) Comma-separated maximum frame skips per stage
    #[arg(long, default_value = "1,1")]
    pub max_frame_skip: String,

    /// (n-stage) Comma-separated maximum tracklet counts per stage
    #[arg(long, default_value = "-1,1")]
    pub max_tracklet_count: String,

    /// (n-stage) Comma-separated source/sink penalties per stage
    #[arg(long, default_value = "0,0")]
    pub penalty_value: String,

    /// (berclaz) Number of horizontal grid cells
    #[arg(long, default_value = "10")]
    pub horizontal_resolution: usize,

    /// (berclaz) Number of vertical grid cells
    #[arg(long, default_value = "10")]
    pub vertical_resolution: usize,

    /// (berclaz) Cells a detection can travel between two frames
    #[arg(long, default_value = "1")]
    pub vicinity_size: usize,

    /// (berclaz) Maximum number of tracks to extract per batch
    #[arg(long, default_value = "1")]
    pub max_track_count: usize,

    /// (berclaz) Number of frames per processing batch
    #[arg(long, default_value = "100")]
    pub batch_size: usize,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid tracking config")?
    } else {
        build_config_from_args(args)?
    };

    print_run_summary(&config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message("Tracking");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let tracks = run_tracking(&config)?;

    spinner.finish_with_message(format!("{} track(s) found", tracks.len()));
    if let Some(ref output) = config.output {
        println!("\nTracks written to {}", output.display());
    }

    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> Result<TrackingConfig> {
    let Some(ref input) = args.input_file else {
        bail!("--input-file is required unless --config is given");
    };

    let input_format: DetectionFormat = args.input_format.parse()?;

    let algorithm = match args.algorithm.as_str() {
        "n-stage" => AlgorithmConfig::NStage(NStageConfig {
            max_frame_skip: parse_list(&args.max_frame_skip)?,
            penalty_value: parse_list(&args.penalty_value)?,
            max_tracklet_count: parse_list(&args.max_tracklet_count)?,
        }),
        "berclaz" => AlgorithmConfig::Berclaz(BerclazConfig {
            horizontal_resolution: args.horizontal_resolution,
            vertical_resolution: args.vertical_resolution,
            vicinity_size: args.vicinity_size,
            max_track_count: args.max_track_count,
            batch_size: args.batch_size,
        }),
        other => bail!("unknown algorithm: {other} (expected n-stage or berclaz)"),
    };

    Ok(TrackingConfig {
        input: input.clone(),
        output: args.output_path.clone(),
        input_header: args.input_header.clone(),
        input_format,
        input_delimiter: args.input_delimiter,
        output_delimiter: args.output_delimiter,
        image_width: args.image_width,
        image_height: args.image_height,
        temporal_weight: args.temporal_weight,
        spatial_weight: args.spatial_weight,
        angular_weight: args.angular_weight,
        algorithm,
    })
}

fn parse_list<T: std::str::FromStr>(input: &str) -> Result<Vec<T>> {
    input
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<T>()
                .map_err(|_| anyhow::anyhow!("invalid list entry: {part}"))
        })
        .collect()
}
