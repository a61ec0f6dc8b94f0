//! Tracklets: ordered, gap-tolerant paths of detections.

use crate::detection::Detection;

/// A single entry in a tracklet path: either a raw detection or a
/// lower-stage tracklet (the nested case produced by multi-stage linking).
#[derive(Clone, Debug)]
pub enum TrackNode {
    Detection(Detection),
    Tracklet(Tracklet),
}

impl TrackNode {
    pub fn first_frame(&self) -> usize {
        match self {
            TrackNode::Detection(d) => d.frame,
            TrackNode::Tracklet(t) => t.first_frame(),
        }
    }

    pub fn last_frame(&self) -> usize {
        match self {
            TrackNode::Detection(d) => d.frame,
            TrackNode::Tracklet(t) => t.last_frame(),
        }
    }

    /// The earliest raw detection reachable through this node.
    pub fn first_detection(&self) -> Option<&Detection> {
        match self {
            TrackNode::Detection(d) => Some(d),
            TrackNode::Tracklet(t) => t.first_detection(),
        }
    }

    /// The latest raw detection reachable through this node.
    pub fn last_detection(&self) -> Option<&Detection> {
        match self {
            TrackNode::Detection(d) => Some(d),
            TrackNode::Tracklet(t) => t.last_detection(),
        }
    }

    pub fn is_virtual(&self) -> bool {
        match self {
            TrackNode::Detection(d) => d.is_virtual,
            TrackNode::Tracklet(_) => false,
        }
    }

    /// Dissimilarity between the end of this node and the start of the
    /// other, used as an edge weight between graph vertices.
    pub fn compare(&self, other: &TrackNode) -> f64 {
        match (self.last_detection(), other.first_detection()) {
            (Some(a), Some(b)) => a.compare(b),
            _ => 0.0,
        }
    }
}

/// An ordered path of detections believed to belong to one physical object.
///
/// The path is kept sorted strictly ascending by frame index. After a
/// multi-stage run the entries are themselves tracklets; [`Tracklet::flatten`]
/// unwraps one nesting level.
#[derive(Clone, Debug, Default)]
pub struct Tracklet {
    path: Vec<TrackNode>,
}

impl Tracklet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_frame(&self) -> usize {
        self.path.first().map(TrackNode::first_frame).unwrap_or(0)
    }

    pub fn last_frame(&self) -> usize {
        self.path.last().map(TrackNode::last_frame).unwrap_or(0)
    }

    pub fn first_detection(&self) -> Option<&Detection> {
        self.path.first().and_then(TrackNode::first_detection)
    }

    pub fn last_detection(&self) -> Option<&Detection> {
        self.path.last().and_then(TrackNode::last_detection)
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn nodes(&self) -> &[TrackNode] {
        &self.path
    }

    /// Raw detections of a flat tracklet in frame order.
    pub fn detections(&self) -> impl Iterator<Item = &Detection> {
        self.path.iter().filter_map(|node| match node {
            TrackNode::Detection(d) => Some(d),
            TrackNode::Tracklet(_) => None,
        })
    }

    pub fn add_detection(&mut self, detection: Detection) {
        self.add_node(TrackNode::Detection(detection), false);
    }

    pub fn add_tracklet(&mut self, tracklet: Tracklet) {
        self.add_node(TrackNode::Tracklet(tracklet), false);
    }

    /// Inserts a node keeping the path sorted by frame index. Virtual
    /// detections are dropped, they are recreated by interpolation later.
    /// An entry at an already occupied frame replaces the existing one only
    /// when `overwrite` is set.
    pub fn add_node(&mut self, node: TrackNode, overwrite: bool) {
        if node.is_virtual() {
            return;
        }

        let frame = node.first_frame();
        let index = self
            .path
            .iter()
            .position(|existing| existing.first_frame() >= frame)
            .unwrap_or(self.path.len());

        let occupied = self
            .path
            .get(index)
            .is_some_and(|existing| existing.first_frame() == frame);

        if occupied {
            if overwrite {
                self.path[index] = node;
            }
        } else {
            self.path.insert(index, node);
        }
    }

    /// Cost between this tracklet's last detection and the other's first.
    pub fn compare_to(&self, other: &Tracklet) -> f64 {
        match (self.last_detection(), other.first_detection()) {
            (Some(a), Some(b)) => a.compare(b),
            _ => 0.0,
        }
    }

    /// Interpolation between the facing endpoints of two tracklets.
    pub fn interpolate_with(&self, other: &Tracklet, fraction: f64) -> Option<Detection> {
        match (self.last_detection(), other.first_detection()) {
            (Some(a), Some(b)) => Some(a.interpolate(b, fraction)),
            _ => None,
        }
    }

    /// Subdivides every frame gap larger than one by inserting midpoint
    /// interpolations until the path covers consecutive frames. Idempotent
    /// once all gaps equal one.
    pub fn interpolate_missing_frames(&mut self) {
        let mut i = 1;
        while i < self.path.len() {
            let gap = self.path[i]
                .first_frame()
                .saturating_sub(self.path[i - 1].last_frame());
            if gap > 1 {
                let interpolant =
                    match (self.path[i - 1].last_detection(), self.path[i].first_detection()) {
                        (Some(a), Some(b)) => a.interpolate(b, 0.5),
                        _ => {
                            i += 1;
                            continue;
                        }
                    };
                // Re-examine the pair on the next pass; the left half is
                // subdivided first.
                self.path.insert(i, TrackNode::Detection(interpolant));
            } else {
                i += 1;
            }
        }
    }

    /// Replaces each nested tracklet entry by its own path entries, keeping
    /// order. Plain detection entries pass through unchanged.
    pub fn flatten(&mut self) {
        let nodes = std::mem::take(&mut self.path);
        for node in nodes {
            match node {
                TrackNode::Tracklet(tracklet) => self.path.extend(tracklet.path),
                TrackNode::Detection(detection) => self.path.push(TrackNode::Detection(detection)),
            }
        }
    }

    /// Merges another tracklet's entries into this one.
    pub fn combine(&mut self, other: Tracklet) {
        for node in other.path {
            self.add_node(node, false);
        }
    }

    /// The detection observed at the given frame, if any.
    pub fn frame_object(&self, frame: usize) -> Option<&Detection> {
        self.path.iter().find_map(|node| match node {
            TrackNode::Detection(d) if d.frame == frame => Some(d),
            _ => None,
        })
    }
}
