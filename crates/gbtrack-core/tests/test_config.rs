use gbtrack_core::detection::DetectionFormat;
use gbtrack_core::pipeline::config::{
    AlgorithmConfig, BerclazConfig, NStageConfig, TrackingConfig,
};

#[test]
fn test_defaults() {
    let config = TrackingConfig::default();
    assert_eq!(config.input_delimiter, ';');
    assert_eq!(config.output_delimiter, ';');
    assert_eq!(config.image_width, 1.0);
    assert_eq!(config.image_height, 1.0);
    assert_eq!(config.temporal_weight, 1.0);
    assert_eq!(config.input_format, DetectionFormat::Point);
    assert!(config.output.is_none());
    assert!(matches!(config.algorithm, AlgorithmConfig::NStage(_)));
}

#[test]
fn test_nstage_defaults() {
    let config = NStageConfig::default();
    assert_eq!(config.max_frame_skip, vec![1, 1]);
    assert_eq!(config.penalty_value, vec![0.0, 0.0]);
    assert_eq!(config.max_tracklet_count, vec![-1, 1]);
}

#[test]
fn test_berclaz_defaults() {
    let config = BerclazConfig::default();
    assert_eq!(config.horizontal_resolution, 10);
    assert_eq!(config.vertical_resolution, 10);
    assert_eq!(config.vicinity_size, 1);
    assert_eq!(config.max_track_count, 1);
    assert_eq!(config.batch_size, 100);
}

#[test]
fn test_frame_skip_resolution() {
    let config = NStageConfig {
        max_frame_skip: vec![-1, 2, 0],
        ..NStageConfig::default()
    };
    assert_eq!(config.frame_skips(), vec![usize::MAX, 2, usize::MAX]);
}

#[test]
fn test_tracklet_count_resolution() {
    let config = NStageConfig::default();
    assert_eq!(config.tracklet_counts(), vec![usize::MAX, 1]);
}

#[test]
fn test_config_from_toml() {
    let toml_input = r#"
        input = "detections.csv"
        input_format = "Angular"
        image_width = 1920.0
        image_height = 1080.0

        [algorithm.Berclaz]
        horizontal_resolution = 5
        vertical_resolution = 4
        batch_size = 50
    "#;

    let config: TrackingConfig = toml::from_str(toml_input).unwrap();
    assert_eq!(config.input.to_str(), Some("detections.csv"));
    assert_eq!(config.input_format, DetectionFormat::Angular);
    assert_eq!(config.image_width, 1920.0);

    // Defaults fill the unset fields.
    assert_eq!(config.input_delimiter, ';');
    match config.algorithm {
        AlgorithmConfig::Berclaz(ref params) => {
            assert_eq!(params.horizontal_resolution, 5);
            assert_eq!(params.vertical_resolution, 4);
            assert_eq!(params.batch_size, 50);
            assert_eq!(params.vicinity_size, 1);
            assert_eq!(params.max_track_count, 1);
        }
        _ => panic!("expected the berclaz algorithm"),
    }
}

#[test]
fn test_config_toml_roundtrip() {
    let config = TrackingConfig {
        input: "in.csv".into(),
        output: Some("out.csv".into()),
        input_format: DetectionFormat::Box,
        image_width: 640.0,
        image_height: 480.0,
        ..TrackingConfig::default()
    };

    let serialized = toml::to_string(&config).unwrap();
    let restored: TrackingConfig = toml::from_str(&serialized).unwrap();

    assert_eq!(restored.input, config.input);
    assert_eq!(restored.output, config.output);
    assert_eq!(restored.input_format, DetectionFormat::Box);
    assert_eq!(restored.image_width, 640.0);
    assert!(matches!(restored.algorithm, AlgorithmConfig::NStage(_)));
}

#[test]
fn test_algorithm_display() {
    assert_eq!(AlgorithmConfig::default().to_string(), "n-stage");
    assert_eq!(
        AlgorithmConfig::Berclaz(BerclazConfig::default()).to_string(),
        "berclaz"
    );
}
