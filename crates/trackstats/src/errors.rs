use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Track has no points")]
    EmptyInput,

    #[error("Track point {index} has no {field}")]
    MalformedPoint { index: usize, field: &'static str },

    #[error("Track has no timestamped points")]
    MissingTimestamps,
}

#[derive(Error, Debug)]
pub enum GpxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GPX parse error: {0}")]
    Parse(#[from] gpx::errors::GpxError),

    #[error("No tracks found in GPX file")]
    NoTracks,

    #[error("No track segments found")]
    NoSegments,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
