use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use gbtrack_core::detection::parser::{KEY_FRAME, KEY_SCORE};
use gbtrack_core::io::csv;

#[derive(Args)]
pub struct InfoArgs {
    /// Detection CSV file
    pub file: PathBuf,

    /// Delimiter separating values in the file
    #[arg(long, default_value = ";")]
    pub delimiter: char,

    /// External header for headerless files
    #[arg(long)]
    pub header: Option<String>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let rows = match &args.header {
        Some(header) => csv::read_rows_with_header(&args.file, header, args.delimiter)?,
        None => csv::read_rows(&args.file, args.delimiter)?,
    };

    println!("File:        {}", args.file.display());
    println!("Detections:  {}", rows.len());

    let mut keys: Vec<&str> = rows
        .first()
        .map(|row| row.keys().map(String::as_str).collect())
        .unwrap_or_default();
    keys.sort_unstable();
    println!("Keys:        {}", keys.join(", "));

    if !rows.is_empty() {
        let max_frame = rows
            .iter()
            .filter_map(|row| row.get(KEY_FRAME))
            .fold(0.0f64, |acc, &frame| acc.max(frame));
        println!("Frames:      {}", max_frame as usize + 1);

        let scores: Vec<f64> = rows
            .iter()
            .filter_map(|row| row.get(KEY_SCORE).copied())
            .collect();
        if !scores.is_empty() {
            let min = scores.iter().cloned().fold(f64::MAX, f64::min);
            let max = scores.iter().cloned().fold(f64::MIN, f64::max);
            println!("Score range: {min} .. {max}");
        }
    }

    Ok(())
}
