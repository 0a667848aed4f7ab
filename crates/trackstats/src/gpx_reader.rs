//! GPX loading and the per-activity facade.
//!
//! Only the first track and its first segment are analyzed; further tracks
//! and segments are ignored.

use std::io::Read;
use std::path::Path;

use gpx::{Gpx, read};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::elevation;
use crate::errors::{AnalysisError, GpxError};
use crate::extract::{RawPoint, extract_track_points};
use crate::metrics::{self, DEFAULT_GAIN_THRESHOLD_KM};
use crate::models::{
    ActivityType, AltimetrySummary, ElevationKind, ElevationStats, TrackPoint, TrackSummary,
};

pub struct GpxReader;

impl GpxReader {
    pub fn load_file(path: impl AsRef<Path>) -> Result<Activity, GpxError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn load_bytes(data: &[u8]) -> Result<Activity, GpxError> {
        Self::from_reader(std::io::Cursor::new(data))
    }

    pub fn from_reader(reader: impl Read) -> Result<Activity, GpxError> {
        let gpx: Gpx = read(reader)?;
        Self::from_gpx(&gpx)
    }

    pub fn from_gpx(gpx: &Gpx) -> Result<Activity, GpxError> {
        let track = gpx.tracks.first().ok_or(GpxError::NoTracks)?;
        let segment = track.segments.first().ok_or(GpxError::NoSegments)?;

        if segment.points.is_empty() {
            return Err(GpxError::NoSegments);
        }
        if gpx.tracks.len() > 1 || track.segments.len() > 1 {
            debug!(
                tracks = gpx.tracks.len(),
                segments = track.segments.len(),
                "Ignoring all but the first track segment"
            );
        }

        let points = extract_track_points(&segment.points)?;

        Ok(Activity {
            name: track.name.clone(),
            activity_type: ActivityType::from_gpx_type(track.type_.as_deref()),
            points,
        })
    }
}

/// A single recorded activity: its name, type and normalized points.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    name: Option<String>,
    activity_type: Option<ActivityType>,
    points: Vec<TrackPoint>,
}

impl Activity {
    /// Builds an activity from records produced by any parser.
    pub fn from_points<I>(name: Option<String>, records: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator,
        I::Item: RawPoint,
    {
        Ok(Self {
            name,
            activity_type: None,
            points: extract_track_points(records)?,
        })
    }

    pub fn with_activity_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = Some(activity_type);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn activity_type(&self) -> Option<ActivityType> {
        self.activity_type
    }

    pub fn track_points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn elevation(&self, kind: ElevationKind) -> Result<f64, AnalysisError> {
        elevation::elevation(&self.points, kind)
    }

    /// Elevation gain in meters, see [`metrics::ElevationGainMetric`].
    pub fn elevation_gain(&self, threshold_km: f64) -> Result<f64, AnalysisError> {
        metrics::elevation_gain(&self.points, threshold_km)
    }

    pub fn default_elevation_gain(&self) -> Result<f64, AnalysisError> {
        self.elevation_gain(DEFAULT_GAIN_THRESHOLD_KM)
    }

    pub fn start_time(&self) -> Result<OffsetDateTime, AnalysisError> {
        metrics::start_time(&self.points)
    }

    pub fn end_time(&self) -> Result<OffsetDateTime, AnalysisError> {
        metrics::end_time(&self.points)
    }

    pub fn duration(&self) -> Result<Duration, AnalysisError> {
        metrics::duration(&self.points)
    }

    pub fn total_distance_km(&self) -> f64 {
        metrics::total_distance_km(&self.points)
    }

    pub fn altimetry_summary(&self) -> Result<AltimetrySummary, AnalysisError> {
        metrics::altimetry_summary(&self.points)
    }

    pub fn summary(&self, config: &AnalysisConfig) -> Result<TrackSummary, AnalysisError> {
        let stats = ElevationStats::from_points(&self.points)?;
        let scores = metrics::score_track(&self.points, config.gain_threshold_km)?;
        let (started_at, ended_at) = scores.time_span.unzip();

        Ok(TrackSummary {
            name: self.name.clone(),
            activity_type: self.activity_type,
            point_count: self.points.len(),
            min_elevation: stats.min,
            max_elevation: stats.max,
            avg_elevation: stats.avg,
            elevation_gain: scores.elevation_gain,
            total_distance_km: scores.distance_km,
            started_at,
            ended_at,
            duration_seconds: scores
                .time_span
                .map(|(start, end)| (end - start).whole_seconds()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElevationSource, RawTrackPoint};
    use time::macros::datetime;

    const SAMPLE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="trackstats" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning Ride</name>
    <type>1</type>
    <trkseg>
      <trkpt lat="45.7000000" lon="12.3000000">
        <ele>20.0</ele>
        <time>2018-08-25T07:57:32Z</time>
      </trkpt>
      <trkpt lat="45.7030000" lon="12.3000000">
        <time>2018-08-25T07:58:32Z</time>
      </trkpt>
      <trkpt lat="45.7060000" lon="12.3000000">
        <ele>30.0</ele>
        <time>2018-08-25T07:59:32Z</time>
      </trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="46.0000000" lon="13.0000000">
        <ele>900.0</ele>
      </trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

    #[test]
    fn test_load_bytes() {
        let activity = GpxReader::load_bytes(SAMPLE_GPX.as_bytes()).unwrap();

        assert_eq!(activity.name(), Some("Morning Ride"));
        assert_eq!(activity.activity_type(), Some(ActivityType::Ride));
        // second segment ignored
        assert_eq!(activity.track_points().len(), 3);
        assert_eq!(activity.track_points()[1].elevation, 20.0);
        assert_eq!(
            activity.track_points()[1].elevation_source,
            ElevationSource::CarriedForward
        );
        assert_eq!(activity.elevation(ElevationKind::Max).unwrap(), 30.0);
        assert_eq!(
            activity.start_time().unwrap(),
            datetime!(2018-08-25 07:57:32 UTC)
        );
        assert_eq!(activity.duration().unwrap(), Duration::minutes(2));
    }

    #[test]
    fn test_no_tracks() {
        let gpx = r#"<?xml version="1.0"?>
<gpx version="1.1" creator="trackstats" xmlns="http://www.topografix.com/GPX/1/1"></gpx>"#;
        assert!(matches!(
            GpxReader::load_bytes(gpx.as_bytes()),
            Err(GpxError::NoTracks)
        ));
    }

    #[test]
    fn test_empty_segment() {
        let gpx = r#"<?xml version="1.0"?>
<gpx version="1.1" creator="trackstats" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><name>Empty</name><trkseg></trkseg></trk>
</gpx>"#;
        assert!(matches!(
            GpxReader::load_bytes(gpx.as_bytes()),
            Err(GpxError::NoSegments)
        ));
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            GpxReader::load_bytes(b"definitely not xml"),
            Err(GpxError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            GpxReader::load_file("/nonexistent/track.gpx"),
            Err(GpxError::Io(_))
        ));
    }

    #[test]
    fn test_summary_from_points() {
        let records = vec![
            RawTrackPoint::new(45.0, 12.0, Some(100.0))
                .with_timestamp(datetime!(2024-05-01 10:00:00 UTC)),
            RawTrackPoint::new(45.003, 12.0, Some(110.0))
                .with_timestamp(datetime!(2024-05-01 10:01:00 UTC)),
            RawTrackPoint::new(45.006, 12.0, None)
                .with_timestamp(datetime!(2024-05-01 10:02:00 UTC)),
        ];
        let activity = Activity::from_points(Some("Test".to_string()), &records)
            .unwrap()
            .with_activity_type(ActivityType::Run);
        let summary = activity.summary(&AnalysisConfig::default()).unwrap();

        assert_eq!(summary.name.as_deref(), Some("Test"));
        assert_eq!(summary.activity_type, Some(ActivityType::Run));
        assert_eq!(summary.point_count, 3);
        assert_eq!(summary.max_elevation, 110.0);
        assert_eq!(summary.duration_seconds, Some(120));
        assert!((summary.elevation_gain - 10.0).abs() < 1e-9);
        assert_eq!(summary.total_distance_km, activity.total_distance_km());
    }

    #[test]
    fn test_summary_without_timestamps() {
        let records = vec![RawTrackPoint::new(45.0, 12.0, Some(1.0))];
        let activity = Activity::from_points(None, &records).unwrap();
        let summary = activity.summary(&AnalysisConfig::default()).unwrap();

        assert!(summary.started_at.is_none());
        assert!(summary.duration_seconds.is_none());
        assert_eq!(summary.total_distance_km, 0.0);
    }

    #[test]
    fn test_summary_of_empty_activity() {
        let records: Vec<RawTrackPoint> = Vec::new();
        let activity = Activity::from_points(None, &records).unwrap();
        assert_eq!(
            activity.summary(&AnalysisConfig::default()),
            Err(AnalysisError::EmptyInput)
        );
    }
}
