/// 3x3 Gaussian kernel applied per frame layer after grid cell assignment.
pub const GRID_SMOOTHING_KERNEL: [[f64; 3]; 3] = [
    [0.002284, 0.043222, 0.002284],
    [0.043222, 0.817976, 0.043222],
    [0.002284, 0.043222, 0.002284],
];

/// Multiplier for the grid smoothing convolution.
pub const GRID_SMOOTHING_MULTIPLIER: f64 = 1.0;

/// Cell scores are clamped into [MIN_CELL_SCORE, MAX_CELL_SCORE] before the
/// log-likelihood edge weight is computed, keeping the logarithm finite.
pub const MIN_CELL_SCORE: f64 = 1e-6;
pub const MAX_CELL_SCORE: f64 = 1.0 - 1e-6;

/// Weight of source edges and of intermediate cell-to-sink links.
pub const VIRTUAL_EDGE_WEIGHT: f64 = 0.0;
