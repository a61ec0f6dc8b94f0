//! Berclaz grid tracker: frames are quantized into an occupancy grid, the
//! grid becomes a spatio-temporal DAG and the K vertex-disjoint shortest
//! paths through it become tracks.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::{MAX_CELL_SCORE, MIN_CELL_SCORE, VIRTUAL_EDGE_WEIGHT};
use crate::detection::{parse_grid, Detection, DetectionSequence};
use crate::graph::ksp::k_shortest_paths;
use crate::graph::{DiGraph, Vertex};
use crate::grid::Grid;
use crate::track::{TrackNode, Tracklet};

pub struct Berclaz {
    h_res: usize,
    v_res: usize,
    vicinity: usize,
}

impl Berclaz {
    /// `h_res`/`v_res` are the horizontal and vertical grid resolutions;
    /// `vicinity` is the Chebyshev distance a detection may travel between
    /// consecutive frames, in cells.
    pub fn new(h_res: usize, v_res: usize, vicinity: usize) -> Self {
        Self {
            h_res,
            v_res,
            vicinity,
        }
    }

    /// Processes the sequence in batches of `batch_size` frames, extracting
    /// at most `max_track_count` tracks per batch. Batches are independent
    /// and run in parallel; results keep batch order. Tracks of a split
    /// sequence are connected across batch borders afterwards.
    pub fn run(
        &self,
        sequence: &DetectionSequence,
        batch_size: usize,
        max_track_count: usize,
    ) -> Vec<Tracklet> {
        let batch_size = batch_size.max(1);
        let frame_count = sequence.frame_count();
        let starts: Vec<usize> = (0..frame_count).step_by(batch_size).collect();

        let mut tracks: Vec<Tracklet> = starts
            .par_iter()
            .map(|&start| self.run_batch(sequence, start, start + batch_size, max_track_count))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        if batch_size < frame_count {
            debug!("connecting tracks across batches");
            Self::connect_tracks(&mut tracks);
        }

        tracks
    }

    fn run_batch(
        &self,
        sequence: &DetectionSequence,
        start: usize,
        stop: usize,
        max_track_count: usize,
    ) -> Vec<Tracklet> {
        debug!(start, "processing batch");

        let grid = parse_grid(
            sequence, start, stop, 0.0, 1.0, self.h_res, 0.0, 1.0, self.v_res,
        );

        debug!("creating graph");
        let (graph, source, sink) = self.create_graph(&grid);

        debug!("running k shortest paths");
        let paths = k_shortest_paths(&graph, source, sink, max_track_count);

        debug!("extracting tracks");
        let mut tracks = Vec::new();
        for path in paths {
            let mut tracklet = Tracklet::new();
            for vertex in path {
                // Virtual cells and the endpoints are dropped here; missing
                // frames are interpolated from the real detections later.
                tracklet.add_node(graph.label(vertex).clone(), false);
            }
            if !tracklet.is_empty() {
                tracks.push(tracklet);
            }
        }
        tracks
    }

    /// Builds the spatio-temporal DAG over the grid cells. Cell vertices are
    /// laid out width-major (`x + y*width + z*layer`), followed by the
    /// source and sink.
    pub fn create_graph(&self, grid: &Grid) -> (DiGraph<TrackNode>, Vertex, Vertex) {
        let (w, h, d) = (grid.width_count(), grid.height_count(), grid.depth_count());

        let mut graph = DiGraph::new();
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    graph.add_vertex(TrackNode::Detection(*grid.get(x, y, z)));
                }
            }
        }
        let source = graph.add_vertex(TrackNode::Detection(Detection::new_virtual()));
        let sink = graph.add_vertex(TrackNode::Detection(Detection::new_virtual()));

        let layer = w * h;
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    let u = x + y * w + z * layer;

                    let score = grid.get(x, y, z).score.clamp(MIN_CELL_SCORE, MAX_CELL_SCORE);
                    let weight = -(score / (1.0 - score)).ln();

                    if z < d - 1 {
                        // Connect to every cell within the vicinity in the
                        // next frame, clipped at the grid borders.
                        for ny in y.saturating_sub(self.vicinity)..=(y + self.vicinity).min(h - 1) {
                            for nx in
                                x.saturating_sub(self.vicinity)..=(x + self.vicinity).min(w - 1)
                            {
                                let v = nx + ny * w + (z + 1) * layer;
                                graph.add_edge(u, v, weight);
                            }
                        }
                        graph.add_edge(u, sink, VIRTUAL_EDGE_WEIGHT);
                    } else {
                        graph.add_edge(u, sink, weight);
                    }

                    graph.add_edge(source, u, VIRTUAL_EDGE_WEIGHT);
                }
            }
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "grid graph built"
        );
        (graph, source, sink)
    }

    /// Joins tracks split by batching: every track merges with the best
    /// later track starting after it ends, if such a track exists.
    fn connect_tracks(tracks: &mut Vec<Tracklet>) {
        let mut i = 0;
        while i < tracks.len() {
            let mut best: Option<(usize, f64)> = None;
            for k in i + 1..tracks.len() {
                if tracks[i].last_frame() < tracks[k].first_frame() {
                    let value = tracks[i].compare_to(&tracks[k]);
                    if best.map_or(true, |(_, best_value)| value < best_value) {
                        best = Some((k, value));
                    }
                }
            }

            if let Some((k, _)) = best {
                let other = tracks.remove(k);
                tracks[i].combine(other);
            }
            i += 1;
        }

        info!(count = tracks.len(), "tracks connected");
    }
}
