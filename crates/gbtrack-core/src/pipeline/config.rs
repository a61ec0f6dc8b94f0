use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::detection::DetectionFormat;

/// Top-level tracking configuration, loadable from TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Detection CSV to read.
    #[serde(default)]
    pub input: PathBuf,
    /// Track CSV to write; `None` skips writing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// External header for headerless input files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_header: Option<String>,
    #[serde(default)]
    pub input_format: DetectionFormat,
    #[serde(default = "default_delimiter")]
    pub input_delimiter: char,
    #[serde(default = "default_delimiter")]
    pub output_delimiter: char,
    /// Image width in pixels, used to normalize positions into [0, 1].
    #[serde(default = "default_dimension")]
    pub image_width: f64,
    /// Image height in pixels, used to normalize positions into [0, 1].
    #[serde(default = "default_dimension")]
    pub image_height: f64,
    #[serde(default = "default_weight")]
    pub temporal_weight: f64,
    #[serde(default = "default_weight")]
    pub spatial_weight: f64,
    #[serde(default = "default_weight")]
    pub angular_weight: f64,
    #[serde(default)]
    pub algorithm: AlgorithmConfig,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            input_header: None,
            input_format: DetectionFormat::default(),
            input_delimiter: default_delimiter(),
            output_delimiter: default_delimiter(),
            image_width: default_dimension(),
            image_height: default_dimension(),
            temporal_weight: default_weight(),
            spatial_weight: default_weight(),
            angular_weight: default_weight(),
            algorithm: AlgorithmConfig::default(),
        }
    }
}

fn default_delimiter() -> char {
    ';'
}

fn default_dimension() -> f64 {
    1.0
}

fn default_weight() -> f64 {
    1.0
}

/// Which tracker runs, and with what parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum AlgorithmConfig {
    NStage(NStageConfig),
    Berclaz(BerclazConfig),
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        AlgorithmConfig::NStage(NStageConfig::default())
    }
}

impl fmt::Display for AlgorithmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmConfig::NStage(_) => write!(f, "n-stage"),
            AlgorithmConfig::Berclaz(_) => write!(f, "berclaz"),
        }
    }
}

/// Parameters of the n-stage tracker, one entry per stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NStageConfig {
    /// Maximum frame gap per stage; zero or negative means unbounded.
    #[serde(default = "default_frame_skips")]
    pub max_frame_skip: Vec<i64>,
    /// Source/sink penalty per stage.
    #[serde(default = "default_penalties")]
    pub penalty_value: Vec<f64>,
    /// Maximum tracklets to extract per stage; negative means unlimited.
    #[serde(default = "default_tracklet_counts")]
    pub max_tracklet_count: Vec<i64>,
}

impl Default for NStageConfig {
    fn default() -> Self {
        Self {
            max_frame_skip: default_frame_skips(),
            penalty_value: default_penalties(),
            max_tracklet_count: default_tracklet_counts(),
        }
    }
}

fn default_frame_skips() -> Vec<i64> {
    vec![1, 1]
}

fn default_penalties() -> Vec<f64> {
    vec![0.0, 0.0]
}

fn default_tracklet_counts() -> Vec<i64> {
    vec![-1, 1]
}

impl NStageConfig {
    /// Frame skips with the "unbounded" encoding resolved.
    pub fn frame_skips(&self) -> Vec<usize> {
        self.max_frame_skip
            .iter()
            .map(|&v| if v <= 0 { usize::MAX } else { v as usize })
            .collect()
    }

    /// Tracklet counts with the "unlimited" encoding resolved.
    pub fn tracklet_counts(&self) -> Vec<usize> {
        self.max_tracklet_count
            .iter()
            .map(|&v| if v < 0 { usize::MAX } else { v as usize })
            .collect()
    }
}

/// Parameters of the Berclaz grid tracker.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BerclazConfig {
    /// Number of horizontal grid cells.
    #[serde(default = "default_resolution")]
    pub horizontal_resolution: usize,
    /// Number of vertical grid cells.
    #[serde(default = "default_resolution")]
    pub vertical_resolution: usize,
    /// Cells a detection can travel between two frames.
    #[serde(default = "default_vicinity")]
    pub vicinity_size: usize,
    /// Maximum number of tracks to extract per batch.
    #[serde(default = "default_track_count")]
    pub max_track_count: usize,
    /// Number of frames per processing batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for BerclazConfig {
    fn default() -> Self {
        Self {
            horizontal_resolution: default_resolution(),
            vertical_resolution: default_resolution(),
            vicinity_size: default_vicinity(),
            max_track_count: default_track_count(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_resolution() -> usize {
    10
}

fn default_vicinity() -> usize {
    1
}

fn default_track_count() -> usize {
    1
}

fn default_batch_size() -> usize {
    100
}
