//! Streaming metrics over a track point sequence.
//!
//! Each metric consumes points one at a time through [`TrackMetric`], so
//! several of them can share a single pass over the track (see
//! [`score_track`]). The free functions wrap the common one-metric cases.

use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::errors::AnalysisError;
use crate::models::{Altimetry, AltimetrySummary, ElevationStats, TrackPoint};

/// Minimum segment length, in kilometers, used by the elevation-gain filter.
pub const DEFAULT_GAIN_THRESHOLD_KM: f64 = 0.22;

pub trait TrackMetric {
    type Score;
    fn next_point(&mut self, point: &TrackPoint);
    fn finish(&mut self) -> Self::Score;
}

/// Feeds every point to `metric` and returns its score.
pub fn run_metric<M: TrackMetric>(mut metric: M, points: &[TrackPoint]) -> M::Score {
    for point in points {
        metric.next_point(point);
    }
    metric.finish()
}

/// Sum of point-to-point distances in kilometers.
#[derive(Debug, Clone, Default)]
pub struct DistanceMetric {
    total_km: f64,
    last_point: Option<TrackPoint>,
}

impl TrackMetric for DistanceMetric {
    type Score = f64;
    fn next_point(&mut self, point: &TrackPoint) {
        self.total_km += self.last_point.map_or(0.0, |prev| prev.distance_to(point));
        self.last_point = Some(*point);
    }

    fn finish(&mut self) -> f64 {
        self.total_km
    }
}

/// Elevation profile: one `(elevation, cumulative km)` sample per point.
#[derive(Debug, Clone, Default)]
pub struct AltimetryMetric {
    samples: Vec<Altimetry>,
    previous: Option<TrackPoint>,
}

impl AltimetryMetric {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            previous: None,
        }
    }
}

impl TrackMetric for AltimetryMetric {
    type Score = Vec<Altimetry>;
    fn next_point(&mut self, point: &TrackPoint) {
        // the first point is paired with itself
        let previous = self.previous.unwrap_or(*point);
        let segment_km = previous.distance_to(point);
        let last_km = self
            .samples
            .last()
            .map_or(0.0, |sample| sample.cumulative_distance_km);

        self.samples.push(Altimetry {
            elevation: point.elevation,
            cumulative_distance_km: segment_km + last_km,
        });
        self.previous = Some(*point);
    }

    fn finish(&mut self) -> Vec<Altimetry> {
        std::mem::take(&mut self.samples)
    }
}

/// Threshold-filtered elevation gain in meters.
///
/// Distance is measured from an anchor point, not point to point, so short
/// hops add up until the anchor is at least `threshold_km` away. Only then is
/// the elevation difference considered, and the anchor moves to the current
/// point whether or not the difference was credited.
///
/// The same threshold value also gates the elevation difference, which is in
/// meters. The mixed units are intentional: they reproduce the established
/// gain figures, so do not convert them.
#[derive(Debug, Clone)]
pub struct ElevationGainMetric {
    threshold_km: f64,
    anchor: Option<TrackPoint>,
    total_gain: f64,
}

impl ElevationGainMetric {
    pub fn new(threshold_km: f64) -> Self {
        Self {
            threshold_km,
            anchor: None,
            total_gain: 0.0,
        }
    }
}

impl Default for ElevationGainMetric {
    fn default() -> Self {
        Self::new(DEFAULT_GAIN_THRESHOLD_KM)
    }
}

impl TrackMetric for ElevationGainMetric {
    type Score = f64;
    fn next_point(&mut self, point: &TrackPoint) {
        let anchor = *self.anchor.get_or_insert(*point);

        if anchor.distance_to(point) < self.threshold_km {
            return;
        }

        let delta = point.elevation - anchor.elevation;
        if delta > self.threshold_km {
            self.total_gain += delta;
        }
        self.anchor = Some(*point);
    }

    fn finish(&mut self) -> f64 {
        self.total_gain
    }
}

/// Earliest and latest timestamp seen, regardless of point order.
#[derive(Debug, Clone, Default)]
pub struct TimeSpanMetric {
    start: Option<OffsetDateTime>,
    end: Option<OffsetDateTime>,
}

impl TrackMetric for TimeSpanMetric {
    type Score = Option<(OffsetDateTime, OffsetDateTime)>;
    fn next_point(&mut self, point: &TrackPoint) {
        if let Some(time) = point.timestamp {
            self.start = Some(self.start.map_or(time, |start| start.min(time)));
            self.end = Some(self.end.map_or(time, |end| end.max(time)));
        }
    }

    fn finish(&mut self) -> Self::Score {
        self.start.zip(self.end)
    }
}

/// Distance, gain and time span computed in a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackScores {
    pub distance_km: f64,
    pub elevation_gain: f64,
    pub time_span: Option<(OffsetDateTime, OffsetDateTime)>,
}

#[derive(Debug, Clone)]
struct Metrics {
    distance: DistanceMetric,
    elevation_gain: ElevationGainMetric,
    time_span: TimeSpanMetric,
}

impl TrackMetric for Metrics {
    type Score = TrackScores;
    fn next_point(&mut self, point: &TrackPoint) {
        self.distance.next_point(point);
        self.elevation_gain.next_point(point);
        self.time_span.next_point(point);
    }

    fn finish(&mut self) -> TrackScores {
        TrackScores {
            distance_km: self.distance.finish(),
            elevation_gain: self.elevation_gain.finish(),
            time_span: self.time_span.finish(),
        }
    }
}

pub fn score_track(points: &[TrackPoint], threshold_km: f64) -> Result<TrackScores, AnalysisError> {
    if points.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let scores = run_metric(
        Metrics {
            distance: DistanceMetric::default(),
            elevation_gain: ElevationGainMetric::new(threshold_km),
            time_span: TimeSpanMetric::default(),
        },
        points,
    );
    debug!(
        points = points.len(),
        distance_km = scores.distance_km,
        elevation_gain = scores.elevation_gain,
        "Scored track"
    );

    Ok(scores)
}

/// Total track length in kilometers; zero for fewer than two points.
pub fn total_distance_km(points: &[TrackPoint]) -> f64 {
    run_metric(DistanceMetric::default(), points)
}

pub fn altimetry_summary(points: &[TrackPoint]) -> Result<AltimetrySummary, AnalysisError> {
    let stats = ElevationStats::from_points(points)?;
    let samples = run_metric(AltimetryMetric::with_capacity(points.len()), points);

    Ok(AltimetrySummary {
        min_elevation: stats.min,
        max_elevation: stats.max,
        avg_elevation: stats.avg,
        samples,
    })
}

pub fn elevation_gain(points: &[TrackPoint], threshold_km: f64) -> Result<f64, AnalysisError> {
    if points.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    Ok(run_metric(ElevationGainMetric::new(threshold_km), points))
}

fn time_span(points: &[TrackPoint]) -> Result<(OffsetDateTime, OffsetDateTime), AnalysisError> {
    if points.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    run_metric(TimeSpanMetric::default(), points).ok_or(AnalysisError::MissingTimestamps)
}

pub fn start_time(points: &[TrackPoint]) -> Result<OffsetDateTime, AnalysisError> {
    time_span(points).map(|(start, _)| start)
}

pub fn end_time(points: &[TrackPoint]) -> Result<OffsetDateTime, AnalysisError> {
    time_span(points).map(|(_, end)| end)
}

pub fn duration(points: &[TrackPoint]) -> Result<Duration, AnalysisError> {
    time_span(points).map(|(start, end)| end - start)
}
