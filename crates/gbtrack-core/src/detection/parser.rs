//! Converts raw key/value rows into detection sequences and occupancy grids.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use ndarray::arr2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::{GRID_SMOOTHING_KERNEL, GRID_SMOOTHING_MULTIPLIER};
use crate::detection::{inverse_lerp, Detection, DetectionSequence, Point};
use crate::error::TrackError;
use crate::grid::Grid;

/// One CSV row: column name to numeric value.
pub type Row = HashMap<String, f64>;

pub const KEY_FRAME: &str = "frame";
pub const KEY_ID: &str = "id";
pub const KEY_SCORE: &str = "score";
pub const KEY_X: &str = "x";
pub const KEY_Y: &str = "y";
pub const KEY_WIDTH: &str = "width";
pub const KEY_HEIGHT: &str = "height";
pub const KEY_ANGLE: &str = "angle";

/// The detection variant rows are parsed into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionFormat {
    #[default]
    #[serde(rename = "2D")]
    Point,
    Box,
    Angular,
}

impl fmt::Display for DetectionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionFormat::Point => write!(f, "2D"),
            DetectionFormat::Box => write!(f, "Box"),
            DetectionFormat::Angular => write!(f, "Angular"),
        }
    }
}

impl FromStr for DetectionFormat {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2D" => Ok(DetectionFormat::Point),
            "Box" => Ok(DetectionFormat::Box),
            "Angular" => Ok(DetectionFormat::Angular),
            other => Err(TrackError::InvalidFormat(other.to_string())),
        }
    }
}

/// Shared knobs for row parsing.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Image width in pixels, used to normalize x coordinates into [0, 1].
    pub image_width: f64,
    /// Image height in pixels, used to normalize y coordinates into [0, 1].
    pub image_height: f64,
    pub temporal_weight: f64,
    pub spatial_weight: f64,
    pub angular_weight: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            image_width: 1.0,
            image_height: 1.0,
            temporal_weight: 1.0,
            spatial_weight: 1.0,
            angular_weight: 1.0,
        }
    }
}

/// Parses rows into a detection sequence of the requested format.
///
/// Positions are normalized by the image dimensions, scores by the global
/// score range of the input (a degenerate range normalizes to 0). Angular
/// detections additionally convert their angle from degrees to radians and
/// remap the normalized score into [0.5, 1.0], keeping a prior that angular
/// detections are real.
pub fn parse_sequence(
    rows: &[Row],
    format: DetectionFormat,
    options: &ParseOptions,
) -> DetectionSequence {
    info!(count = rows.len(), %format, "parsing detections");

    let (min_score, max_score) = score_range(rows);
    debug!(min_score, max_score, "score range");

    let mut sequence = DetectionSequence::new();
    for row in rows {
        let value = |key: &str| row.get(key).copied().unwrap_or(0.0);

        let frame = value(KEY_FRAME).abs() as usize;
        let position = Point::new(
            value(KEY_X) / options.image_width,
            value(KEY_Y) / options.image_height,
        );
        let score = inverse_lerp(min_score, max_score, value(KEY_SCORE));

        let mut detection = match format {
            DetectionFormat::Point => Detection::new_point(frame, position),
            DetectionFormat::Box => Detection::new_box(
                frame,
                position,
                Point::new(
                    value(KEY_WIDTH) / options.image_width,
                    value(KEY_HEIGHT) / options.image_height,
                ),
            ),
            DetectionFormat::Angular => {
                let mut d = Detection::new_angular(frame, position, value(KEY_ANGLE).to_radians());
                d.set_angular_weight(options.angular_weight);
                d
            }
        };

        detection.temporal_weight = options.temporal_weight;
        detection.spatial_weight = options.spatial_weight;
        detection.score = match format {
            DetectionFormat::Angular => score * 0.5 + 0.5,
            _ => score,
        };

        sequence.add(detection);
    }

    debug!(frames = sequence.frame_count(), "detections parsed");
    sequence
}

fn score_range(rows: &[Row]) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for row in rows {
        let score = row.get(KEY_SCORE).copied().unwrap_or(0.0);
        min = min.min(score);
        max = max.max(score);
    }
    (min, max)
}

/// Quantizes the frames `[start, stop)` of a sequence into an occupancy
/// grid. Every cell starts as a score-0 virtual placeholder; each real
/// detection lands in its cell, keeping the better-scoring one (equal scores
/// favor the newcomer). Each frame layer is then smoothed with a small
/// Gaussian kernel so scores bleed into neighboring cells.
#[allow(clippy::too_many_arguments)]
pub fn parse_grid(
    sequence: &DetectionSequence,
    start: usize,
    stop: usize,
    min_x: f64,
    max_x: f64,
    res_x: usize,
    min_y: f64,
    max_y: f64,
    res_y: usize,
) -> Grid {
    let stop = stop.min(sequence.frame_count());
    let depth = stop.saturating_sub(start);
    let mut grid = Grid::new(
        res_x,
        res_y,
        depth.max(1),
        max_x - min_x,
        max_y - min_y,
        depth as f64,
    );

    for frame in start..stop {
        for detection in sequence.objects(frame) {
            let position = detection.position();
            let (xi, yi, _) = grid.position_to_index(position.x - min_x, position.y - min_y, 0.0);
            let zi = frame - start;

            if grid.get(xi, yi, zi).score <= detection.score {
                grid.set(xi, yi, zi, *detection);
            }
        }
    }

    let kernel = arr2(&GRID_SMOOTHING_KERNEL);
    grid.convolve_2d(&kernel, GRID_SMOOTHING_MULTIPLIER);

    grid
}
