use crate::errors::AnalysisError;
use crate::models::{ElevationKind, ElevationStats, TrackPoint};

impl ElevationStats {
    /// Statistics over every point, gap-filled elevations included.
    pub fn from_points(points: &[TrackPoint]) -> Result<Self, AnalysisError> {
        Self::from_elevations(points.iter().map(|p| p.elevation))
    }

    /// Statistics over recorded elevations only, ignoring carried-forward
    /// and defaulted values.
    pub fn from_recorded(points: &[TrackPoint]) -> Result<Self, AnalysisError> {
        Self::from_elevations(
            points
                .iter()
                .filter(|p| p.has_recorded_elevation())
                .map(|p| p.elevation),
        )
    }

    fn from_elevations(elevations: impl Iterator<Item = f64>) -> Result<Self, AnalysisError> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for elevation in elevations {
            count += 1;
            sum += elevation;
            min = min.min(elevation);
            max = max.max(elevation);
        }

        if count == 0 {
            return Err(AnalysisError::EmptyInput);
        }

        Ok(Self {
            min,
            max,
            avg: sum / count as f64,
        })
    }

    pub fn get(&self, kind: ElevationKind) -> f64 {
        match kind {
            ElevationKind::Min => self.min,
            ElevationKind::Max => self.max,
            ElevationKind::Avg => self.avg,
        }
    }
}

/// Minimum, maximum or average elevation of the track in meters.
pub fn elevation(points: &[TrackPoint], kind: ElevationKind) -> Result<f64, AnalysisError> {
    ElevationStats::from_points(points).map(|stats| stats.get(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_track_points;
    use crate::models::RawTrackPoint;

    fn points(elevations: &[f64]) -> Vec<TrackPoint> {
        elevations
            .iter()
            .enumerate()
            .map(|(i, e)| TrackPoint::new(45.0 + i as f64 * 0.001, 12.0, *e))
            .collect()
    }

    #[test]
    fn test_min_max_avg() {
        let pts = points(&[10.0, 30.0, 20.0, 40.0]);
        assert_eq!(elevation(&pts, ElevationKind::Min).unwrap(), 10.0);
        assert_eq!(elevation(&pts, ElevationKind::Max).unwrap(), 40.0);
        assert_eq!(elevation(&pts, ElevationKind::Avg).unwrap(), 25.0);
    }

    #[test]
    fn test_single_point() {
        let stats = ElevationStats::from_points(&points(&[-3.5])).unwrap();
        assert_eq!(stats.min, -3.5);
        assert_eq!(stats.max, -3.5);
        assert_eq!(stats.avg, -3.5);
    }

    #[test]
    fn test_empty_is_error() {
        assert_eq!(
            elevation(&[], ElevationKind::Avg),
            Err(AnalysisError::EmptyInput)
        );
    }

    #[test]
    fn test_recorded_only_excludes_gap_fill() {
        let records = vec![
            RawTrackPoint::new(45.0, 12.0, Some(10.0)),
            RawTrackPoint::new(45.1, 12.0, Some(40.0)),
            RawTrackPoint::new(45.2, 12.0, None),
            RawTrackPoint::new(45.3, 12.0, Some(10.0)),
        ];
        let pts = extract_track_points(&records).unwrap();

        let filled = ElevationStats::from_points(&pts).unwrap();
        let recorded = ElevationStats::from_recorded(&pts).unwrap();
        assert_eq!(filled.avg, 25.0);
        assert_eq!(recorded.avg, 20.0);
        assert_eq!(filled.max, recorded.max);
    }

    #[test]
    fn test_recorded_only_without_readings() {
        let records = vec![RawTrackPoint::new(45.0, 12.0, None)];
        let pts = extract_track_points(&records).unwrap();
        assert_eq!(
            ElevationStats::from_recorded(&pts),
            Err(AnalysisError::EmptyInput)
        );
    }
}
