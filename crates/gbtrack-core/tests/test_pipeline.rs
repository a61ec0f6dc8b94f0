use std::fs;

use gbtrack_core::pipeline::config::{
    AlgorithmConfig, BerclazConfig, NStageConfig, TrackingConfig,
};
use gbtrack_core::pipeline::run_tracking;

fn write_two_object_csv(path: &std::path::Path) {
    // Two objects over three frames in a 100x100 image, one moving right
    // along y=10 and one moving left along y=80.
    let content = "\
frame;x;y;score
0;10;10;0.9
0;80;80;0.8
1;12;10;0.95
1;78;80;0.7
2;14;10;0.9
2;76;80;0.75
";
    fs::write(path, content).unwrap();
}

#[test]
fn test_nstage_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("detections.csv");
    let output = dir.path().join("tracks.csv");
    write_two_object_csv(&input);

    let config = TrackingConfig {
        input: input.clone(),
        output: Some(output.clone()),
        image_width: 100.0,
        image_height: 100.0,
        algorithm: AlgorithmConfig::NStage(NStageConfig {
            max_frame_skip: vec![1],
            penalty_value: vec![10.0],
            max_tracklet_count: vec![-1],
        }),
        ..TrackingConfig::default()
    };

    let tracks = run_tracking(&config).unwrap();

    assert_eq!(tracks.len(), 2);
    for track in &tracks {
        assert_eq!(track.detections().count(), 3);

        // Positions are normalized by the image dimensions and each track
        // stays on one object.
        let ys: Vec<f64> = track.detections().map(|d| d.position().y).collect();
        for y in &ys {
            assert!((y - ys[0]).abs() < 1e-9);
            assert!((y - 0.1).abs() < 1e-9 || (y - 0.8).abs() < 1e-9);
        }
    }

    // One output row per frame.
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 3);
}

#[test]
fn test_berclaz_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("detections.csv");
    let output = dir.path().join("tracks.csv");

    let content = "\
frame;x;y;score
0;5;5;1.0
1;5;5;0.9
2;5;5;1.0
1;90;90;0.1
";
    fs::write(&input, content).unwrap();

    let config = TrackingConfig {
        input: input.clone(),
        output: Some(output.clone()),
        image_width: 100.0,
        image_height: 100.0,
        algorithm: AlgorithmConfig::Berclaz(BerclazConfig {
            horizontal_resolution: 3,
            vertical_resolution: 3,
            vicinity_size: 1,
            max_track_count: 1,
            batch_size: 100,
        }),
        ..TrackingConfig::default()
    };

    let tracks = run_tracking(&config).unwrap();

    assert_eq!(tracks.len(), 1);
    let frames: Vec<usize> = tracks[0].detections().map(|d| d.frame).collect();
    assert_eq!(frames, vec![0, 1, 2]);
    assert!(output.exists());
}

#[test]
fn test_gap_is_interpolated() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("detections.csv");

    let content = "\
frame;x;y;score
0;10;10;0.9
1;12;10;0.8
4;18;10;0.9
5;20;10;0.8
";
    fs::write(&input, content).unwrap();

    let config = TrackingConfig {
        input,
        image_width: 100.0,
        image_height: 100.0,
        algorithm: AlgorithmConfig::NStage(NStageConfig {
            max_frame_skip: vec![1, 5],
            penalty_value: vec![10.0, 10.0],
            max_tracklet_count: vec![-1, 1],
        }),
        ..TrackingConfig::default()
    };

    let tracks = run_tracking(&config).unwrap();

    assert_eq!(tracks.len(), 1);
    let frames: Vec<usize> = tracks[0].detections().map(|d| d.frame).collect();
    assert_eq!(frames, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_empty_input_yields_no_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("detections.csv");
    let output = dir.path().join("tracks.csv");
    fs::write(&input, "frame;x;y;score\n").unwrap();

    let config = TrackingConfig {
        input,
        output: Some(output.clone()),
        algorithm: AlgorithmConfig::NStage(NStageConfig::default()),
        ..TrackingConfig::default()
    };

    let tracks = run_tracking(&config).unwrap();
    assert!(tracks.is_empty());
    assert!(!output.exists());
}

#[test]
fn test_missing_input_fails() {
    let config = TrackingConfig {
        input: "/nonexistent/detections.csv".into(),
        ..TrackingConfig::default()
    };
    assert!(run_tracking(&config).is_err());
}

#[test]
fn test_unset_input_is_a_config_error() {
    let config = TrackingConfig::default();
    assert!(matches!(
        run_tracking(&config),
        Err(gbtrack_core::error::TrackError::Config(_))
    ));
}
