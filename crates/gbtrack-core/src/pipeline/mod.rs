//! End-to-end tracking pipeline: read detections, track, interpolate, write.

pub mod config;

use std::time::Instant;

use tracing::{info, warn};

use crate::detection::{parse_sequence, ParseOptions};
use crate::error::{Result, TrackError};
use crate::io::csv;
use crate::track::Tracklet;
use crate::tracker::{Berclaz, NStage};

use self::config::{AlgorithmConfig, TrackingConfig};

/// Runs the full tracking pipeline described by `config` and returns the
/// tracks. The output CSV is written when an output path is configured.
pub fn run_tracking(config: &TrackingConfig) -> Result<Vec<Tracklet>> {
    if config.input.as_os_str().is_empty() {
        return Err(TrackError::Config("no input file configured".into()));
    }

    let rows = match &config.input_header {
        Some(header) => csv::read_rows_with_header(&config.input, header, config.input_delimiter)?,
        None => csv::read_rows(&config.input, config.input_delimiter)?,
    };

    let options = ParseOptions {
        image_width: config.image_width,
        image_height: config.image_height,
        temporal_weight: config.temporal_weight,
        spatial_weight: config.spatial_weight,
        angular_weight: config.angular_weight,
    };
    let sequence = parse_sequence(&rows, config.input_format, &options);

    let started = Instant::now();
    let mut tracks = match &config.algorithm {
        AlgorithmConfig::NStage(params) => {
            info!("running n-stage");
            let tracker = NStage::new(
                params.frame_skips(),
                params.penalty_value.clone(),
                params.tracklet_counts(),
            );
            tracker.run(&sequence)
        }
        AlgorithmConfig::Berclaz(params) => {
            info!("running berclaz");
            let tracker = Berclaz::new(
                params.horizontal_resolution,
                params.vertical_resolution,
                params.vicinity_size,
            );
            tracker.run(&sequence, params.batch_size, params.max_track_count)
        }
    };
    info!(
        tracks = tracks.len(),
        elapsed = ?started.elapsed(),
        "tracking finished"
    );

    info!("interpolating missing frames");
    for track in &mut tracks {
        track.interpolate_missing_frames();
    }

    if let Some(output) = &config.output {
        if tracks.is_empty() {
            warn!("no tracks found, skipping output");
        } else {
            csv::write_tracks(&tracks, output, config.output_delimiter)?;
        }
    }

    Ok(tracks)
}
