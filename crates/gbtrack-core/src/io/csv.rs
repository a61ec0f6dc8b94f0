//! CSV interfaces: detection input rows and track output tables.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, error, info};

use crate::detection::parser::Row;
use crate::detection::{Detection, Point};
use crate::error::{Result, TrackError};
use crate::track::Tracklet;

/// Reads a detection CSV whose first non-empty line is the header.
pub fn read_rows(path: &Path, delimiter: char) -> Result<Vec<Row>> {
    info!(path = %path.display(), "reading detection file");

    let content = std::fs::read_to_string(path)?;
    let mut lines = content.lines();
    let header = lines
        .by_ref()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .to_string();

    Ok(parse_rows(lines, &header, delimiter))
}

/// Reads a headerless detection CSV using an externally provided header.
/// Every non-empty line is treated as a data row.
pub fn read_rows_with_header(path: &Path, header: &str, delimiter: char) -> Result<Vec<Row>> {
    info!(path = %path.display(), "reading detection file with external header");

    let content = std::fs::read_to_string(path)?;
    Ok(parse_rows(content.lines(), header, delimiter))
}

fn parse_rows<'a>(
    lines: impl Iterator<Item = &'a str>,
    header: &str,
    delimiter: char,
) -> Vec<Row> {
    let keys: Vec<&str> = header.split(delimiter).map(str::trim).collect();
    debug!(?keys, "parsed header");

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let mut row = Row::new();
        for (key, cell) in keys.iter().zip(line.split(delimiter)) {
            let value = match cell.trim().parse::<f64>() {
                Ok(value) => value,
                Err(err) => {
                    error!(cell, %err, "unparseable value, substituting 0");
                    0.0
                }
            };
            row.insert((*key).to_string(), value);
        }
        rows.push(row);
    }

    debug!(count = rows.len(), "rows read");
    rows
}

/// Writes tracks as one row per frame between the earliest and latest
/// detection over all tracks. Each row holds an `x`/`y` cell pair per
/// track; both cells stay empty for frames the track does not cover.
pub fn write_tracks(tracks: &[Tracklet], path: &Path, delimiter: char) -> Result<()> {
    let Some(first) = tracks.iter().map(Tracklet::first_frame).min() else {
        return Err(TrackError::EmptyTrackSet);
    };
    let last = tracks.iter().map(Tracklet::last_frame).max().unwrap_or(first);

    info!(path = %path.display(), tracks = tracks.len(), "writing tracks");

    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let separator = delimiter.to_string();

    for frame in first..=last {
        let mut cells: Vec<String> = Vec::with_capacity(tracks.len() * 2);
        for track in tracks {
            match track.frame_object(frame) {
                Some(detection) => {
                    let position = detection.position();
                    cells.push(position.x.to_string());
                    cells.push(position.y.to_string());
                }
                None => {
                    cells.push(String::new());
                    cells.push(String::new());
                }
            }
        }
        writeln!(out, "{}", cells.join(&separator))?;
    }

    Ok(())
}

/// Reads a track CSV written by [`write_tracks`] back into flat point
/// tracklets. The running index of non-empty lines becomes the frame index.
pub fn read_tracks(path: &Path, delimiter: char) -> Result<Vec<Tracklet>> {
    info!(path = %path.display(), "reading track file");

    let content = std::fs::read_to_string(path)?;

    let mut tracks: Vec<Tracklet> = Vec::new();
    let mut frame = 0;
    for line in content.lines() {
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(delimiter).collect();
        while tracks.len() < parts.len() / 2 {
            tracks.push(Tracklet::new());
        }

        for i in (1..parts.len()).step_by(2) {
            let (sx, sy) = (parts[i - 1].trim(), parts[i].trim());
            if sx.is_empty() || sy.is_empty() {
                continue;
            }
            match (sx.parse::<f64>(), sy.parse::<f64>()) {
                (Ok(x), Ok(y)) => tracks[(i - 1) / 2]
                    .add_detection(Detection::new_point(frame, Point::new(x, y))),
                _ => error!(frame, "unparseable track cell"),
            }
        }
        frame += 1;
    }

    Ok(tracks)
}
