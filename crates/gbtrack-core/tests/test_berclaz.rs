use gbtrack_core::detection::{Detection, DetectionSequence, Point};
use gbtrack_core::graph::ksp::k_shortest_paths;
use gbtrack_core::grid::Grid;
use gbtrack_core::tracker::Berclaz;

fn scored_virtual(score: f64) -> Detection {
    let mut detection = Detection::new_virtual();
    detection.score = score;
    detection
}

/// One clear 3-cell track along x=0, y=0 in a 3x3x3 grid; every other cell
/// carries an indifferent score of 0.5 (edge weight 0).
#[test]
fn test_clear_track_through_grid() {
    let mut grid = Grid::new(3, 3, 3, 1.0, 1.0, 3.0);
    for z in 0..3 {
        for y in 0..3 {
            for x in 0..3 {
                grid.set(x, y, z, scored_virtual(0.5));
            }
        }
    }
    for z in 0..3 {
        let mut detection = Detection::new_point(z, Point::new(1.0 / 6.0, 1.0 / 6.0));
        detection.score = 1.0;
        grid.set(0, 0, z, detection);
    }

    let tracker = Berclaz::new(3, 3, 1);
    let (graph, source, sink) = tracker.create_graph(&grid);

    // 27 cells, then source and sink.
    assert_eq!(source, 27);
    assert_eq!(sink, 28);

    let paths = k_shortest_paths(&graph, source, sink, 1);
    assert_eq!(paths.len(), 1);
    // Cells are width-major: (0, 0, z) has index 9 * z.
    assert_eq!(paths[0], vec![27, 0, 9, 18, 28]);
}

#[test]
fn test_graph_shape() {
    let grid = Grid::new(2, 2, 2, 1.0, 1.0, 2.0);
    let tracker = Berclaz::new(2, 2, 1);
    let (graph, _, _) = tracker.create_graph(&grid);

    assert_eq!(graph.vertex_count(), 10);
    // First layer: each of the 4 cells reaches all 4 next-layer cells plus
    // the sink, plus its source edge. Last layer: sink and source edges.
    assert_eq!(graph.edge_count(), 4 * 6 + 4 * 2);
}

#[test]
fn test_run_extracts_single_track() {
    let mut sequence = DetectionSequence::new();
    for frame in 0..3 {
        let mut detection = Detection::new_point(frame, Point::new(0.05, 0.05));
        detection.score = 1.0;
        sequence.add(detection);
    }

    let tracker = Berclaz::new(3, 3, 1);
    let tracks = tracker.run(&sequence, 10, 1);

    assert_eq!(tracks.len(), 1);
    let frames: Vec<usize> = tracks[0].detections().map(|d| d.frame).collect();
    assert_eq!(frames, vec![0, 1, 2]);
    for detection in tracks[0].detections() {
        assert!((detection.position().x - 0.05).abs() < 1e-12);
        assert!((detection.position().y - 0.05).abs() < 1e-12);
    }
}

#[test]
fn test_batches_are_connected() {
    let mut sequence = DetectionSequence::new();
    for frame in 0..4 {
        let mut detection = Detection::new_point(frame, Point::new(0.05, 0.05));
        detection.score = 1.0;
        sequence.add(detection);
    }

    // Two batches of two frames each; the per-batch tracks are merged.
    let tracker = Berclaz::new(3, 3, 1);
    let tracks = tracker.run(&sequence, 2, 1);

    assert_eq!(tracks.len(), 1);
    let frames: Vec<usize> = tracks[0].detections().map(|d| d.frame).collect();
    assert_eq!(frames, vec![0, 1, 2, 3]);
}

#[test]
fn test_empty_sequence_gives_no_tracks() {
    let sequence = DetectionSequence::new();
    let tracker = Berclaz::new(3, 3, 1);
    assert!(tracker.run(&sequence, 10, 2).is_empty());
}

#[test]
fn test_disjoint_tracks_for_two_objects() {
    let mut sequence = DetectionSequence::new();
    for frame in 0..3 {
        let mut a = Detection::new_point(frame, Point::new(0.05, 0.05));
        a.score = 1.0;
        sequence.add(a);

        let mut b = Detection::new_point(frame, Point::new(0.95, 0.95));
        b.score = 0.9;
        sequence.add(b);
    }

    let tracker = Berclaz::new(3, 3, 1);
    let tracks = tracker.run(&sequence, 10, 2);

    assert_eq!(tracks.len(), 2);
    for track in &tracks {
        assert_eq!(track.detections().count(), 3);
        let xs: Vec<f64> = track.detections().map(|d| d.position().x).collect();
        for x in &xs {
            assert!((x - xs[0]).abs() < 1e-9, "track mixes objects");
        }
    }
}
