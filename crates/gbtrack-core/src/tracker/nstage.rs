//! N-stage graph tracker: detections are linked into tracklets by iterated
//! shortest-path extraction, then tracklets are re-linked over a widening
//! temporal horizon, one graph stage per configured level.

use tracing::{debug, info};

use crate::detection::{Detection, DetectionSequence};
use crate::graph::sssp::dijkstra;
use crate::graph::{DiGraph, Vertex};
use crate::track::{TrackNode, Tracklet};

type TrackGraph = DiGraph<TrackNode>;

pub struct NStage {
    max_frame_skips: Vec<usize>,
    penalties: Vec<f64>,
    max_tracklet_counts: Vec<usize>,
    stage_count: usize,
}

impl NStage {
    /// The stage-`i` graph links frame gaps up to `max_frame_skips[i]` and
    /// weights its source/sink edges with `penalties[i]`; extraction from it
    /// stops after `max_tracklet_counts[i]` tracklets. The stage count is
    /// the shorter of the penalty and tracklet-count vectors; a short skip
    /// vector repeats its last entry.
    pub fn new(
        max_frame_skips: Vec<usize>,
        penalties: Vec<f64>,
        max_tracklet_counts: Vec<usize>,
    ) -> Self {
        let stage_count = penalties.len().min(max_tracklet_counts.len());

        let mut max_frame_skips = max_frame_skips;
        if max_frame_skips.is_empty() {
            max_frame_skips.push(1);
        }
        while max_frame_skips.len() < stage_count {
            let last = max_frame_skips.last().copied().unwrap_or(1);
            max_frame_skips.push(last);
        }

        Self {
            max_frame_skips,
            penalties,
            max_tracklet_counts,
            stage_count,
        }
    }

    /// Runs all stages over the sequence and returns the flattened tracks.
    pub fn run(&self, sequence: &DetectionSequence) -> Vec<Tracklet> {
        let frame_count = sequence.frame_count();

        let mut graph = self.create_object_graph(sequence);
        for stage in 0..self.stage_count {
            let tracklets = extract_tracklets(&mut graph, self.max_tracklet_counts[stage]);

            if stage + 1 == self.stage_count {
                return self.finalize_tracks(tracklets);
            }
            graph = self.create_tracklet_graph(tracklets, frame_count, stage + 1);
        }

        Vec::new()
    }

    /// Builds the stage-0 graph: one vertex per detection between a virtual
    /// source (first index) and sink (last index). Every detection connects
    /// forward to all detections within the stage-0 frame-skip window.
    fn create_object_graph(&self, sequence: &DetectionSequence) -> TrackGraph {
        info!("creating object graph");

        let mut graph = TrackGraph::new();
        let source = graph.add_vertex(TrackNode::Detection(Detection::new_virtual()));

        let mut layers: Vec<Vec<Vertex>> = Vec::with_capacity(sequence.frame_count());
        for frame in 0..sequence.frame_count() {
            let layer = sequence
                .objects(frame)
                .iter()
                .map(|detection| graph.add_vertex(TrackNode::Detection(*detection)))
                .collect();
            layers.push(layer);
        }

        let sink = graph.add_vertex(TrackNode::Detection(Detection::new_virtual()));

        let max_skip = self.max_frame_skips.first().copied().unwrap_or(1);
        let penalty = self.penalties.first().copied().unwrap_or(0.0);
        let frame_count = layers.len();

        for frame in 0..frame_count {
            let horizon = frame_count.min(frame.saturating_add(max_skip).saturating_add(1));

            for layer_index in 0..layers[frame].len() {
                let u = layers[frame][layer_index];

                for next in frame + 1..horizon {
                    for &v in &layers[next] {
                        let weight = graph.label(u).compare(graph.label(v));
                        graph.add_edge(u, v, weight);
                    }
                }

                graph.add_edge(source, u, (frame + 1) as f64 * penalty);
                graph.add_edge(u, sink, (frame_count - frame) as f64 * penalty);
            }
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "object graph built"
        );
        graph
    }

    /// Builds the stage-`stage` graph with one vertex per prior tracklet.
    /// Tracklets link forward when the frame gap between them is inside the
    /// stage's skip window.
    fn create_tracklet_graph(
        &self,
        tracklets: Vec<Tracklet>,
        frame_count: usize,
        stage: usize,
    ) -> TrackGraph {
        info!(stage, "creating tracklet graph");

        let mut graph = TrackGraph::new();
        let source = graph.add_vertex(TrackNode::Detection(Detection::new_virtual()));
        for tracklet in tracklets {
            graph.add_vertex(TrackNode::Tracklet(tracklet));
        }
        let sink = graph.add_vertex(TrackNode::Detection(Detection::new_virtual()));

        let max_skip = self.max_frame_skips[stage];
        let penalty = self.penalties[stage];

        for u in 1..graph.vertex_count() - 1 {
            let TrackNode::Tracklet(u_tracklet) = graph.label(u) else {
                continue;
            };
            let u_first = u_tracklet.first_frame();
            let u_last = u_tracklet.last_frame();

            for v in 1..graph.vertex_count() - 1 {
                if u == v {
                    continue;
                }
                let TrackNode::Tracklet(v_tracklet) = graph.label(v) else {
                    continue;
                };
                let v_first = v_tracklet.first_frame();

                // Link only tracklets in temporal order within the window.
                if u_last < v_first && v_first - u_last < max_skip {
                    let weight = graph.label(u).compare(graph.label(v));
                    graph.add_edge(u, v, weight);
                }
            }

            graph.add_edge(source, u, (u_first + 1) as f64 * penalty);
            graph.add_edge(u, sink, (frame_count - u_last) as f64 * penalty);
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "tracklet graph built"
        );
        graph
    }

    /// Flattens the stage nesting of the final tracklets down to raw
    /// detections.
    fn finalize_tracks(&self, tracklets: Vec<Tracklet>) -> Vec<Tracklet> {
        info!("extracting tracks");

        let depth = self.stage_count.saturating_sub(1);
        let mut tracks = tracklets;
        for track in &mut tracks {
            for _ in 0..depth {
                track.flatten();
            }
        }

        debug!(count = tracks.len(), "tracks extracted");
        tracks
    }
}

/// Extracts up to `max_count` tracklets from the graph by repeated Dijkstra
/// searches between the conventional source (first vertex) and sink (last).
///
/// Deliberately mutates `graph`: every out-edge of a non-virtual vertex on
/// an extracted path is saturated to infinity so later searches cannot reuse
/// it.
fn extract_tracklets(graph: &mut TrackGraph, max_count: usize) -> Vec<Tracklet> {
    let source = 0;
    let sink = graph.vertex_count() - 1;

    let mut tracklets = Vec::new();
    for iteration in 0..max_count {
        let sp = dijkstra(graph, source);
        if !sp.dist[sink].is_finite() {
            debug!(iteration, "no further path from source to sink");
            break;
        }

        let mut tracklet = Tracklet::new();
        let mut u = sp.pred[sink];
        while u != source {
            tracklet.add_node(graph.label(u).clone(), false);

            if !graph.label(u).is_virtual() {
                for edge in graph.out_edges_mut(u) {
                    edge.weight = f64::INFINITY;
                }
            }

            u = sp.pred[u];
        }

        tracklets.push(tracklet);
    }

    debug!(count = tracklets.len(), "tracklets extracted");
    tracklets
}
