use gbtrack_core::graph::DiGraph;

#[test]
fn test_vertices_get_dense_indices() {
    let mut graph: DiGraph<&str> = DiGraph::new();
    assert_eq!(graph.add_vertex("a"), 0);
    assert_eq!(graph.add_vertex("b"), 1);
    assert_eq!(graph.add_vertex("c"), 2);
    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(*graph.label(1), "b");

    let labels: Vec<&str> = graph.labels().copied().collect();
    assert_eq!(labels, vec!["a", "b", "c"]);
}

#[test]
fn test_out_edges_keep_insertion_order() {
    let mut graph: DiGraph<()> = DiGraph::new();
    for _ in 0..4 {
        graph.add_vertex(());
    }
    graph.add_edge(0, 3, 3.0);
    graph.add_edge(0, 1, 1.0);
    graph.add_edge(0, 2, 2.0);

    let targets: Vec<usize> = graph.out_edges(0).iter().map(|e| e.target).collect();
    assert_eq!(targets, vec![3, 1, 2]);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_parallel_edges_are_allowed() {
    let mut graph: DiGraph<()> = DiGraph::new();
    graph.add_vertex(());
    graph.add_vertex(());
    graph.add_edge(0, 1, 5.0);
    graph.add_edge(0, 1, 7.0);

    assert_eq!(graph.edge_count(), 2);
    // edge_between returns the first inserted edge.
    assert_eq!(graph.edge_between(0, 1).unwrap().weight, 5.0);
}

#[test]
fn test_clear_out_edges() {
    let mut graph: DiGraph<()> = DiGraph::new();
    for _ in 0..3 {
        graph.add_vertex(());
    }
    graph.add_edge(0, 1, 1.0);
    graph.add_edge(0, 2, 2.0);
    graph.add_edge(1, 2, 3.0);

    graph.clear_out_edges(0);

    assert!(graph.out_edges(0).is_empty());
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.out_edges(1).len(), 1);
}

#[test]
fn test_set_edge_weight() {
    let mut graph: DiGraph<()> = DiGraph::new();
    graph.add_vertex(());
    graph.add_vertex(());
    graph.add_edge(0, 1, 1.0);
    graph.add_edge(0, 1, 2.0);

    graph.set_edge_weight(0, 1, 9.0);

    assert_eq!(graph.out_edges(0)[0].weight, 1.0);
    assert_eq!(graph.out_edges(0)[1].weight, 9.0);
}

#[test]
fn test_out_edges_mut_updates_weights() {
    let mut graph: DiGraph<()> = DiGraph::new();
    graph.add_vertex(());
    graph.add_vertex(());
    graph.add_edge(0, 1, 1.0);

    for edge in graph.out_edges_mut(0) {
        edge.weight = f64::INFINITY;
    }

    assert!(graph.out_edges(0)[0].weight.is_infinite());
}

#[test]
fn test_edges_iterates_all() {
    let mut graph: DiGraph<()> = DiGraph::new();
    for _ in 0..3 {
        graph.add_vertex(());
    }
    graph.add_edge(0, 1, 1.0);
    graph.add_edge(1, 2, 2.0);
    graph.add_edge(2, 0, 3.0);

    let collected: Vec<(usize, usize)> = graph.edges().map(|(u, e)| (u, e.target)).collect();
    assert_eq!(collected, vec![(0, 1), (1, 2), (2, 0)]);
}

#[test]
fn test_reweight() {
    let mut graph: DiGraph<()> = DiGraph::new();
    graph.add_vertex(());
    graph.add_vertex(());
    graph.add_edge(0, 1, 2.0);

    graph.reweight(|u, v, w| w + (u + v) as f64);

    assert_eq!(graph.out_edges(0)[0].weight, 3.0);
}

#[test]
fn test_has_negative_edge() {
    let mut graph: DiGraph<()> = DiGraph::new();
    graph.add_vertex(());
    graph.add_vertex(());
    graph.add_edge(0, 1, 0.0);
    assert!(!graph.has_negative_edge());

    graph.add_edge(0, 1, -0.5);
    assert!(graph.has_negative_edge());
}
