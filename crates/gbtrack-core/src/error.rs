use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown input format: {0} (expected 2D, Box or Angular)")]
    InvalidFormat(String),

    #[error("No tracks to write")]
    EmptyTrackSet,
}

pub type Result<T> = std::result::Result<T, TrackError>;
