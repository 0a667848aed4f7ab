//! Elevation, distance and altimetry metrics for recorded GPS tracks.
//!
//! ```rust,ignore
//! use trackstats::{ElevationKind, GpxReader};
//!
//! let activity = GpxReader::load_file("ride.gpx")?;
//! let gain = activity.default_elevation_gain()?;
//! let max = activity.elevation(ElevationKind::Max)?;
//! let profile = activity.altimetry_summary()?;
//! ```

pub mod config;
pub mod distance;
pub mod elevation;
pub mod errors;
pub mod extract;
pub mod gpx_reader;
pub mod metrics;
pub mod models;

pub use config::AnalysisConfig;
pub use distance::distance_km;
pub use errors::{AnalysisError, GpxError};
pub use extract::{RawPoint, extract_track_points};
pub use gpx_reader::{Activity, GpxReader};
pub use metrics::{
    DEFAULT_GAIN_THRESHOLD_KM, TrackMetric, altimetry_summary, duration, elevation_gain, end_time,
    start_time, total_distance_km,
};
pub use models::{
    ActivityType, Altimetry, AltimetrySummary, ElevationKind, ElevationSource, ElevationStats,
    RawTrackPoint, TrackPoint, TrackSummary,
};
