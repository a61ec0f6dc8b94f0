//! Detection model: per-frame object observations with pluggable metrics.

pub mod parser;
pub mod sequence;

pub use parser::{parse_grid, parse_sequence, DetectionFormat, ParseOptions};
pub use sequence::DetectionSequence;

/// A 2D position in normalized image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Linear interpolation from `a` to `b`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a) * t + a
}

/// Maps `value` from the range [a, b] into [0, 1]. A degenerate range maps
/// to 0.
pub(crate) fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if (b - a).abs() < f64::EPSILON {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

fn lerp_point(a: &Point, b: &Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Kind-specific payload of a detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DetectionKind {
    /// Plain 2D point observation.
    Point { position: Point },
    /// Axis-aligned box anchored at its top-left corner.
    Box { position: Point, size: Point },
    /// Point observation with an orientation angle in radians.
    Angular {
        position: Point,
        angle: f64,
        angular_weight: f64,
    },
}

/// A single object observation in one frame.
///
/// Virtual detections are placeholders: they label graph sources and sinks
/// and fill empty grid cells, and are never part of an emitted track.
#[derive(Clone, Copy, Debug)]
pub struct Detection {
    pub frame: usize,
    pub score: f64,
    pub is_virtual: bool,
    pub temporal_weight: f64,
    pub spatial_weight: f64,
    pub kind: DetectionKind,
}

impl Detection {
    /// Creates a virtual placeholder detection.
    pub fn new_virtual() -> Self {
        Self {
            frame: 0,
            score: 0.0,
            is_virtual: true,
            temporal_weight: 1.0,
            spatial_weight: 1.0,
            kind: DetectionKind::Point {
                position: Point::default(),
            },
        }
    }

    pub fn new_point(frame: usize, position: Point) -> Self {
        Self {
            frame,
            score: 0.0,
            is_virtual: false,
            temporal_weight: 1.0,
            spatial_weight: 1.0,
            kind: DetectionKind::Point { position },
        }
    }

    pub fn new_box(frame: usize, position: Point, size: Point) -> Self {
        Self {
            kind: DetectionKind::Box { position, size },
            ..Self::new_point(frame, position)
        }
    }

    pub fn new_angular(frame: usize, position: Point, angle: f64) -> Self {
        Self {
            kind: DetectionKind::Angular {
                position,
                angle,
                angular_weight: 1.0,
            },
            ..Self::new_point(frame, position)
        }
    }

    pub fn position(&self) -> Point {
        match self.kind {
            DetectionKind::Point { position } => position,
            DetectionKind::Box { position, .. } => position,
            DetectionKind::Angular { position, .. } => position,
        }
    }

    /// The comparison anchor: box detections compare by their center, the
    /// other kinds by their position.
    pub fn center(&self) -> Point {
        match self.kind {
            DetectionKind::Box { position, size } => {
                Point::new(position.x + size.x * 0.5, position.y + size.y * 0.5)
            }
            _ => self.position(),
        }
    }

    pub fn angle(&self) -> Option<f64> {
        match self.kind {
            DetectionKind::Angular { angle, .. } => Some(angle),
            _ => None,
        }
    }

    /// Sets the angular weight; no effect on non-angular kinds.
    pub fn set_angular_weight(&mut self, weight: f64) {
        if let DetectionKind::Angular { angular_weight, .. } = &mut self.kind {
            *angular_weight = weight;
        }
    }

    /// Dissimilarity cost between two detections, used as an edge weight.
    /// Smaller is a better match; identical detections compare to 0.
    /// Virtual operands compare to 0.
    pub fn compare(&self, other: &Detection) -> f64 {
        if self.is_virtual || other.is_virtual {
            return 0.0;
        }

        let d_temp = self.frame.abs_diff(other.frame) as f64;
        let d_spat = self.center().distance_to(&other.center());
        let mut cost = d_temp * self.temporal_weight + d_spat * self.spatial_weight;

        if let (
            DetectionKind::Angular {
                angle: a,
                angular_weight,
                ..
            },
            DetectionKind::Angular { angle: b, .. },
        ) = (&self.kind, &other.kind)
        {
            cost += (b - a).abs() * angular_weight;
        }

        cost
    }

    /// Linearly interpolates every numeric field towards `other`. A fraction
    /// of 0 clones `self`, a fraction of 1 clones `other`. The frame index
    /// is rounded to the nearest non-negative integer.
    pub fn interpolate(&self, other: &Detection, fraction: f64) -> Detection {
        let frame = lerp(self.frame as f64, other.frame as f64, fraction)
            .round()
            .max(0.0) as usize;

        let kind = match (&self.kind, &other.kind) {
            (DetectionKind::Point { position: a }, DetectionKind::Point { position: b }) => {
                DetectionKind::Point {
                    position: lerp_point(a, b, fraction),
                }
            }
            (
                DetectionKind::Box {
                    position: pa,
                    size: sa,
                },
                DetectionKind::Box {
                    position: pb,
                    size: sb,
                },
            ) => DetectionKind::Box {
                position: lerp_point(pa, pb, fraction),
                size: lerp_point(sa, sb, fraction),
            },
            (
                DetectionKind::Angular {
                    position: pa,
                    angle: aa,
                    angular_weight: wa,
                },
                DetectionKind::Angular {
                    position: pb,
                    angle: ab,
                    angular_weight: wb,
                },
            ) => DetectionKind::Angular {
                position: lerp_point(pa, pb, fraction),
                angle: lerp(*aa, *ab, fraction),
                angular_weight: lerp(*wa, *wb, fraction),
            },
            // Mixed kinds should not meet in one graph; fall back to points.
            _ => DetectionKind::Point {
                position: lerp_point(&self.position(), &other.position(), fraction),
            },
        };

        Detection {
            frame,
            score: lerp(self.score, other.score, fraction),
            is_virtual: false,
            temporal_weight: lerp(self.temporal_weight, other.temporal_weight, fraction),
            spatial_weight: lerp(self.spatial_weight, other.spatial_weight, fraction),
            kind,
        }
    }
}
