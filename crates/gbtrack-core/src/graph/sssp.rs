//! Single-source shortest paths: Dijkstra for non-negative weights,
//! Bellman-Ford when negative edges are present.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use thiserror::Error;
use tracing::debug;

use super::{DiGraph, PredecessorMap, Vertex};

/// Distance and predecessor tables of a full shortest-path run.
/// `pred[source] == source`; unreachable vertices keep `dist = +inf` and
/// `pred` pointing at themselves.
#[derive(Clone, Debug)]
pub struct ShortestPaths {
    pub dist: Vec<f64>,
    pub pred: Vec<Vertex>,
}

/// Failure modes of a source-to-sink path search.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("no path from source to sink")]
    NoPath,
    #[error("negative cycle at vertex {0}")]
    NegativeCycle(Vertex),
}

/// A successful source-to-sink search: the predecessor map along the path
/// and the distance table of the whole run.
#[derive(Clone, Debug)]
pub struct PathSearch {
    pub pred: PredecessorMap,
    pub dist: Vec<f64>,
}

/// Priority-queue entry ordered by distance; equal distances pop the lower
/// vertex index first, which fixes the tie-breaking rule of the engine.
#[derive(Clone, Copy, Debug)]
struct QueueEntry {
    dist: f64,
    vertex: Vertex,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the smallest pops first.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm. Assumes non-negative edge weights.
pub fn dijkstra<L>(graph: &DiGraph<L>, source: Vertex) -> ShortestPaths {
    let n = graph.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred: Vec<Vertex> = (0..n).collect();
    if n == 0 {
        return ShortestPaths { dist, pred };
    }

    let mut heap = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(QueueEntry {
        dist: 0.0,
        vertex: source,
    });

    while let Some(QueueEntry { dist: d, vertex: u }) = heap.pop() {
        if d > dist[u] {
            continue;
        }
        for edge in graph.out_edges(u) {
            let candidate = d + edge.weight;
            if candidate < dist[edge.target] {
                dist[edge.target] = candidate;
                pred[edge.target] = u;
                heap.push(QueueEntry {
                    dist: candidate,
                    vertex: edge.target,
                });
            }
        }
    }

    ShortestPaths { dist, pred }
}

/// Bellman-Ford with early exit. Handles negative edge weights; negative
/// cycles are caught by the predecessor walk in [`find_path`].
pub fn bellman_ford<L>(graph: &DiGraph<L>, source: Vertex) -> ShortestPaths {
    let n = graph.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred: Vec<Vertex> = (0..n).collect();
    if n == 0 {
        return ShortestPaths { dist, pred };
    }

    dist[source] = 0.0;
    for _ in 1..n {
        let mut changed = false;
        for (u, edge) in graph.edges() {
            if dist[u].is_finite() && dist[u] + edge.weight < dist[edge.target] {
                dist[edge.target] = dist[u] + edge.weight;
                pred[edge.target] = u;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    ShortestPaths { dist, pred }
}

/// Runs the appropriate backend (Bellman-Ford when any edge is negative,
/// Dijkstra otherwise) and walks the predecessors from `sink` back to
/// `source`. A vertex visited twice during the walk means the backend
/// relaxed along a negative cycle.
pub fn find_path<L>(
    graph: &DiGraph<L>,
    source: Vertex,
    sink: Vertex,
) -> Result<PathSearch, PathError> {
    let negative = graph.has_negative_edge();
    debug!(negative_edges = negative, "running single-source shortest paths");

    let sp = if negative {
        bellman_ford(graph, source)
    } else {
        dijkstra(graph, source)
    };

    if !sp.dist[sink].is_finite() {
        return Err(PathError::NoPath);
    }

    let mut visited = vec![false; graph.vertex_count()];
    let mut pred = PredecessorMap::new();
    let mut u = sink;
    while u != source {
        if visited[u] {
            return Err(PathError::NegativeCycle(u));
        }
        visited[u] = true;

        let v = sp.pred[u];
        if v == u {
            // Broken chain: the sink has a finite distance but no
            // predecessor path reaches the source.
            return Err(PathError::NoPath);
        }
        pred.insert(u, v);
        u = v;
    }

    Ok(PathSearch {
        pred,
        dist: sp.dist,
    })
}
