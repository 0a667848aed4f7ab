//! Conversion of raw parser records into normalized [`TrackPoint`]s.

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::errors::AnalysisError;
use crate::models::{ElevationSource, RawTrackPoint, TrackPoint};

/// A point record as exposed by a document parser.
pub trait RawPoint {
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;
    fn elevation(&self) -> Option<f64>;
    fn timestamp(&self) -> Option<OffsetDateTime>;
}

impl RawPoint for RawTrackPoint {
    fn latitude(&self) -> Option<f64> {
        self.lat
    }

    fn longitude(&self) -> Option<f64> {
        self.lon
    }

    fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    fn timestamp(&self) -> Option<OffsetDateTime> {
        self.timestamp
    }
}

impl RawPoint for gpx::Waypoint {
    fn latitude(&self) -> Option<f64> {
        Some(self.point().y())
    }

    fn longitude(&self) -> Option<f64> {
        Some(self.point().x())
    }

    fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    fn timestamp(&self) -> Option<OffsetDateTime> {
        // gpx::Time wraps time::OffsetDateTime and implements From
        self.time.map(OffsetDateTime::from)
    }
}

impl<T: RawPoint + ?Sized> RawPoint for &T {
    fn latitude(&self) -> Option<f64> {
        (**self).latitude()
    }

    fn longitude(&self) -> Option<f64> {
        (**self).longitude()
    }

    fn elevation(&self) -> Option<f64> {
        (**self).elevation()
    }

    fn timestamp(&self) -> Option<OffsetDateTime> {
        (**self).timestamp()
    }
}

/// Builds the track point sequence, one point per record and in order.
///
/// A record without latitude or longitude fails the whole extraction. A
/// record without elevation takes the elevation of the previously emitted
/// point, or 0.0 m when it is the first record.
pub fn extract_track_points<I>(records: I) -> Result<Vec<TrackPoint>, AnalysisError>
where
    I: IntoIterator,
    I::Item: RawPoint,
{
    let records = records.into_iter();
    let mut points: Vec<TrackPoint> = Vec::with_capacity(records.size_hint().0);
    let mut filled = 0usize;

    for (index, record) in records.enumerate() {
        let latitude = record.latitude().ok_or(AnalysisError::MalformedPoint {
            index,
            field: "latitude",
        })?;
        let longitude = record.longitude().ok_or(AnalysisError::MalformedPoint {
            index,
            field: "longitude",
        })?;

        let (elevation, elevation_source) = match (record.elevation(), points.last()) {
            (Some(elevation), _) => (elevation, ElevationSource::Recorded),
            (None, Some(prev)) => {
                filled += 1;
                (prev.elevation, ElevationSource::CarriedForward)
            }
            (None, None) => {
                warn!("First track point has no elevation, assuming 0.0 m");
                (0.0, ElevationSource::Defaulted)
            }
        };

        points.push(TrackPoint {
            latitude,
            longitude,
            elevation,
            timestamp: record.timestamp(),
            elevation_source,
        });
    }

    debug!(
        points = points.len(),
        gap_filled = filled,
        "Extracted track points"
    );

    Ok(points)
}
