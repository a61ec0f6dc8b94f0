use console::Style;

use gbtrack_core::pipeline::config::{AlgorithmConfig, TrackingConfig};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_summary(config: &TrackingConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Tracking Run"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    // Input / Output
    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    match config.output {
        Some(ref output) => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(output.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!();

    // Parsing
    println!("  {}", s.header.apply_to("Parsing"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Format"),
        s.value.apply_to(config.input_format)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Image"),
        s.value
            .apply_to(format!("{}x{}", config.image_width, config.image_height))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Weights"),
        s.value.apply_to(format!(
            "temporal={} spatial={} angular={}",
            config.temporal_weight, config.spatial_weight, config.angular_weight
        ))
    );
    println!();

    // Algorithm
    println!(
        "  {:<14}{}",
        s.header.apply_to("Algorithm"),
        s.method.apply_to(&config.algorithm)
    );
    match &config.algorithm {
        AlgorithmConfig::NStage(params) => {
            println!(
                "    {:<12}{:?}",
                s.label.apply_to("Skips"),
                params.max_frame_skip
            );
            println!(
                "    {:<12}{:?}",
                s.label.apply_to("Penalties"),
                params.penalty_value
            );
            println!(
                "    {:<12}{:?}",
                s.label.apply_to("Tracklets"),
                params.max_tracklet_count
            );
        }
        AlgorithmConfig::Berclaz(params) => {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Grid"),
                s.value.apply_to(format!(
                    "{}x{}",
                    params.horizontal_resolution, params.vertical_resolution
                ))
            );
            println!(
                "    {:<12}{}",
                s.label.apply_to("Vicinity"),
                s.value.apply_to(params.vicinity_size)
            );
            println!(
                "    {:<12}{}",
                s.label.apply_to("Max Tracks"),
                s.value.apply_to(params.max_track_count)
            );
            println!(
                "    {:<12}{}",
                s.label.apply_to("Batch Size"),
                s.value.apply_to(params.batch_size)
            );
        }
    }
    println!();
}
