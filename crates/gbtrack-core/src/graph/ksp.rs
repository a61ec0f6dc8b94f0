//! K vertex-disjoint shortest paths (Suurballe/Bhandari).
//!
//! Finds up to `k` pairwise vertex-disjoint source-to-sink paths with
//! minimal combined weight. Each round reverses the edges of the paths
//! found so far and splits their interior vertices in a transformed graph,
//! so the next search may trade away edges of earlier paths for a globally
//! better disjoint set.

use std::collections::BTreeMap;

use tracing::{debug, error, info};

use super::sssp::{self, PathError};
use super::{DiGraph, MultiPredecessorMap, PredecessorMap, Vertex};

/// Finds up to `k` pairwise vertex-disjoint shortest paths from `source` to
/// `sink`. Every returned path starts at `source` and ends at `sink`; fewer
/// than `k` paths are returned once the graph is exhausted. The input graph
/// is never mutated.
pub fn k_shortest_paths<L>(
    graph: &DiGraph<L>,
    source: Vertex,
    sink: Vertex,
    k: usize,
) -> Vec<Vec<Vertex>> {
    let paths = match k {
        0 => MultiPredecessorMap::new(),
        1 => find_single(graph, source, sink),
        2 => find_pair(graph, source, sink),
        _ => find_iterative(graph, source, sink, k),
    };

    let extracted = extract_paths(&paths, source, sink);
    debug!(count = extracted.len(), "paths found");
    extracted
}

fn find_single<L>(graph: &DiGraph<L>, source: Vertex, sink: Vertex) -> MultiPredecessorMap {
    let mut paths = MultiPredecessorMap::new();
    match sssp::find_path(graph, source, sink) {
        Ok(search) => merge_path(&search.pred, &mut paths),
        Err(err) => info!(%err, "not even a single path could be found"),
    }
    paths
}

/// The path-pair procedure: one Suurballe transformation round on the
/// original weights.
fn find_pair<L>(graph: &DiGraph<L>, source: Vertex, sink: Vertex) -> MultiPredecessorMap {
    let mut paths = MultiPredecessorMap::new();

    debug!("searching the first path in the original graph");
    let first = match sssp::find_path(graph, source, sink) {
        Ok(search) => search.pred,
        Err(err) => {
            info!(%err, "not even a single path could be found");
            return paths;
        }
    };
    merge_path(&first, &mut paths);

    let base = copy_weights(graph);
    let (trans, new_to_old) = transform_graph(&base, &paths, source, sink);

    debug!("searching the second path in the transformed graph");
    let second = match sssp::find_path(&trans, source, sink) {
        Ok(search) => search.pred,
        Err(PathError::NoPath) => {
            info!("no disjoint second path exists");
            return paths;
        }
        Err(err @ PathError::NegativeCycle(_)) => {
            error!(%err, "aborting path search");
            return paths;
        }
    };

    merge_path(&map_to_original(&second, &new_to_old, source, sink), &mut paths);
    cancel_opposing_edges(&mut paths);
    paths
}

/// The iterative procedure for `k > 2`: the first search fixes Johnson
/// potentials, then every round transforms the reweighted graph around all
/// paths found so far.
fn find_iterative<L>(
    graph: &DiGraph<L>,
    source: Vertex,
    sink: Vertex,
    k: usize,
) -> MultiPredecessorMap {
    let mut paths = MultiPredecessorMap::new();

    let search = match sssp::find_path(graph, source, sink) {
        Ok(search) => search,
        Err(err) => {
            info!(%err, "not even a single path could be found");
            return paths;
        }
    };
    merge_path(&search.pred, &mut paths);

    // Potential reweighting: w'(u,v) = w(u,v) + dist[u] - dist[v]. Edges on
    // a shortest path become 0 and all others non-negative, so Dijkstra
    // handles the residual graphs.
    let mut base = copy_weights(graph);
    let dist = search.dist;
    base.reweight(|u, v, w| {
        if dist[u].is_finite() && dist[v].is_finite() {
            dist[u] + w - dist[v]
        } else {
            f64::INFINITY
        }
    });

    for iteration in 1..k {
        debug!(iteration, "building the transformed graph");
        let (trans, new_to_old) = transform_graph(&base, &paths, source, sink);

        let next = match sssp::find_path(&trans, source, sink) {
            Ok(search) => search.pred,
            Err(PathError::NoPath) => {
                info!(found = iteration, "no more disjoint paths can be found");
                break;
            }
            Err(err @ PathError::NegativeCycle(_)) => {
                error!(%err, "aborting path search");
                break;
            }
        };

        merge_path(&map_to_original(&next, &new_to_old, source, sink), &mut paths);
        cancel_opposing_edges(&mut paths);
    }

    paths
}

/// Copies the vertices and weighted edges of any labelled graph into a
/// label-free working graph.
fn copy_weights<L>(graph: &DiGraph<L>) -> DiGraph<()> {
    let mut copy = DiGraph::new();
    for _ in 0..graph.vertex_count() {
        copy.add_vertex(());
    }
    for (u, edge) in graph.edges() {
        copy.add_edge(u, edge.target, edge.weight);
    }
    copy
}

/// Builds the Suurballe transformation of `base` with respect to the edges
/// recorded in `paths`: path edges are reversed with negated weight, every
/// interior path vertex is split into a twin that takes over its external
/// in-edges, and the twin is wired back to the path predecessor.
fn transform_graph(
    base: &DiGraph<()>,
    paths: &MultiPredecessorMap,
    source: Vertex,
    sink: Vertex,
) -> (DiGraph<()>, BTreeMap<Vertex, Vertex>) {
    let mut trans = DiGraph::new();
    for _ in 0..base.vertex_count() {
        trans.add_vertex(());
    }

    // Reverse the edges of all found paths; queue the rest for later.
    let mut queued: Vec<(Vertex, Vertex, f64)> = Vec::new();
    for (u, edge) in base.edges() {
        let on_path = paths
            .get(&edge.target)
            .is_some_and(|preds| preds.contains(&u));
        if on_path {
            trans.add_edge(edge.target, u, -edge.weight);
        } else {
            queued.push((u, edge.target, edge.weight));
        }
    }

    // Split the interior path vertices.
    let mut old_to_new: BTreeMap<Vertex, Vertex> = BTreeMap::new();
    let mut new_to_old: BTreeMap<Vertex, Vertex> = BTreeMap::new();
    for (&target, preds) in paths {
        if target == source || target == sink {
            continue;
        }
        let Some(&pred) = preds.first() else { continue };

        let twin = trans.add_vertex(());
        old_to_new.insert(target, twin);
        new_to_old.insert(twin, target);

        let weight = match base.edge_between(pred, target) {
            Some(edge) => edge.weight,
            None => {
                error!(source = pred, target, "path edge missing in the graph");
                0.0
            }
        };
        trans.add_edge(twin, pred, -weight);
    }

    // Copy the remaining edges, re-targeting those that end in a split
    // vertex. Edges into the source or sink stay untouched.
    for (u, v, w) in queued {
        if v == source || v == sink {
            trans.add_edge(u, v, w);
        } else if let Some(&twin) = old_to_new.get(&v) {
            trans.add_edge(u, twin, w);
        } else {
            trans.add_edge(u, v, w);
        }
    }

    (trans, new_to_old)
}

/// Maps a path found in a transformed graph back onto the original
/// vertices, undoing the vertex splits.
fn map_to_original(
    path: &PredecessorMap,
    new_to_old: &BTreeMap<Vertex, Vertex>,
    source: Vertex,
    sink: Vertex,
) -> PredecessorMap {
    let mut mapped = PredecessorMap::new();
    let mut u = sink;
    while u != source {
        let Some(&v) = path.get(&u) else {
            error!(vertex = u, "broken predecessor chain");
            break;
        };
        let orig_u = new_to_old.get(&u).copied().unwrap_or(u);
        let orig_v = new_to_old.get(&v).copied().unwrap_or(v);
        mapped.insert(orig_u, orig_v);
        u = v;
    }
    mapped
}

fn merge_path(path: &PredecessorMap, out: &mut MultiPredecessorMap) {
    for (&u, &v) in path {
        if u != v {
            out.entry(u).or_default().insert(v);
        }
    }
}

/// Erases edge pairs used in both directions; such pairs cancel out and the
/// remaining edges reassemble into vertex-disjoint paths.
fn cancel_opposing_edges(paths: &mut MultiPredecessorMap) {
    let snapshot: Vec<(Vertex, Vec<Vertex>)> = paths
        .iter()
        .map(|(&target, preds)| (target, preds.iter().copied().collect()))
        .collect();

    for (target, preds) in snapshot {
        for pred in preds {
            let opposing = paths
                .get(&pred)
                .is_some_and(|set| set.contains(&target));
            if opposing {
                if let Some(set) = paths.get_mut(&pred) {
                    set.remove(&target);
                }
                if let Some(set) = paths.get_mut(&target) {
                    set.remove(&pred);
                }
            }
        }
    }

    paths.retain(|_, preds| !preds.is_empty());
}

/// Walks the accumulated predecessor sets backwards from the sink and emits
/// every path in source-to-sink order. After cancellation each vertex has a
/// unique predecessor; remaining ties resolve to the lowest vertex index.
fn extract_paths(
    paths: &MultiPredecessorMap,
    source: Vertex,
    sink: Vertex,
) -> Vec<Vec<Vertex>> {
    let mut result = Vec::new();
    let Some(sink_preds) = paths.get(&sink) else {
        return result;
    };

    for &first in sink_preds {
        let mut path = vec![sink];
        let mut u = first;
        loop {
            path.push(u);
            if u == source {
                break;
            }
            match paths.get(&u).and_then(|preds| preds.first()) {
                Some(&v) => u = v,
                None => {
                    error!(vertex = u, "broken predecessor chain");
                    break;
                }
            }
        }
        path.reverse();
        result.push(path);
    }

    result
}
