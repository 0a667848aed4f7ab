//! Procedural track generation.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use trackstats::{RawTrackPoint, distance_km};

use crate::GeneratorError;
use crate::config::{BoundingBox, Region};
use crate::terrain::{ElevationGenerator, ElevationModel, add_elevation_jitter};

/// Meters per degree of latitude, close enough for placing points.
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Configuration for procedural track generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Target distance in meters.
    pub distance_meters: f64,
    /// Starting point (lat, lon). If None, random within bounds.
    pub start_point: Option<(f64, f64)>,
    /// Geographic bounds for the track.
    pub bounds: BoundingBox,
    /// Initial heading in degrees clockwise from north. If None, random.
    pub heading_deg: Option<f64>,
    /// Maximum heading change per point, in radians.
    pub heading_wander: f64,
    /// Approximate distance between track points in meters.
    pub point_spacing_m: f64,
    /// Constant moving speed in meters per second.
    pub speed_mps: f64,
    /// Timestamp of the first point.
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// GPS position jitter standard deviation in meters.
    pub gps_jitter_m: f64,
    /// Elevation jitter standard deviation in meters.
    pub elevation_jitter_m: f64,
    /// Probability that a point after the first has no elevation reading.
    pub elevation_dropout_probability: f64,
    /// Probability of a pause (a repeated position) after a point.
    pub pause_probability: f64,
    /// Duration range for pauses (min, max) in seconds.
    pub pause_duration_range: (f64, f64),
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            distance_meters: 5000.0,
            start_point: None,
            bounds: Region::PIAVE,
            heading_deg: None,
            heading_wander: 0.3,
            point_spacing_m: 30.0,
            speed_mps: 7.0,
            start_time: datetime!(2018-08-25 07:57:32 UTC),
            gps_jitter_m: 2.0,
            elevation_jitter_m: 1.5,
            elevation_dropout_probability: 0.0,
            pause_probability: 0.01,
            pause_duration_range: (30.0, 180.0),
        }
    }
}

impl TrackConfig {
    fn validate(&self) -> Result<(), GeneratorError> {
        let invalid = |msg: &str| Err(GeneratorError::InvalidConfig(msg.to_string()));

        if !(self.distance_meters >= 0.0) {
            return invalid("distance must be non-negative");
        }
        if !(self.point_spacing_m > 0.0) {
            return invalid("point spacing must be positive");
        }
        if !(self.speed_mps > 0.0) {
            return invalid("speed must be positive");
        }
        if !(self.gps_jitter_m >= 0.0) {
            return invalid("GPS jitter must be non-negative");
        }
        if !(self.elevation_jitter_m >= 0.0) {
            return invalid("elevation jitter must be non-negative");
        }
        if !(self.heading_wander >= 0.0) {
            return invalid("heading wander must be non-negative");
        }
        for p in [self.elevation_dropout_probability, self.pause_probability] {
            if !(0.0..=1.0).contains(&p) {
                return invalid("probabilities must be within 0..=1");
            }
        }
        let (min, max) = self.pause_duration_range;
        if !(min >= 0.0 && min <= max) {
            return invalid("pause duration range must satisfy 0 <= min <= max");
        }
        Ok(())
    }
}

/// Generates synthetic GPS tracks.
pub struct ProceduralGenerator {
    config: TrackConfig,
    elevation: ElevationModel,
}

impl ProceduralGenerator {
    /// Creates a generator over the Piave plain with terrain elevation.
    pub fn new(seed: u32) -> Self {
        Self {
            config: TrackConfig::default(),
            elevation: ElevationModel::Terrain(ElevationGenerator::piave(seed)),
        }
    }

    /// Creates a generator for a specific region.
    pub fn for_region(bounds: BoundingBox, seed: u32) -> Self {
        let terrain = if bounds == Region::DOLOMITES {
            ElevationGenerator::dolomites(seed)
        } else {
            ElevationGenerator::piave(seed)
        };

        Self {
            config: TrackConfig {
                bounds,
                ..Default::default()
            },
            elevation: ElevationModel::Terrain(terrain),
        }
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.config.distance_meters = meters;
        self
    }

    pub fn with_start(mut self, lat: f64, lon: f64) -> Self {
        self.config.start_point = Some((lat, lon));
        self
    }

    /// Fixes the heading; with no wander the track is a straight line.
    pub fn with_heading(mut self, degrees: f64, wander: f64) -> Self {
        self.config.heading_deg = Some(degrees);
        self.config.heading_wander = wander;
        self
    }

    pub fn with_point_spacing(mut self, meters: f64) -> Self {
        self.config.point_spacing_m = meters;
        self
    }

    pub fn with_speed(mut self, meters_per_second: f64) -> Self {
        self.config.speed_mps = meters_per_second;
        self
    }

    pub fn with_start_time(mut self, start_time: OffsetDateTime) -> Self {
        self.config.start_time = start_time;
        self
    }

    pub fn with_gps_jitter(mut self, meters: f64) -> Self {
        self.config.gps_jitter_m = meters;
        self
    }

    pub fn with_elevation_jitter(mut self, meters: f64) -> Self {
        self.config.elevation_jitter_m = meters;
        self
    }

    pub fn with_elevation(mut self, elevation: ElevationModel) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_elevation_dropouts(mut self, probability: f64) -> Self {
        self.config.elevation_dropout_probability = probability;
        self
    }

    pub fn with_pauses(mut self, probability: f64, min_sec: f64, max_sec: f64) -> Self {
        self.config.pause_probability = probability;
        self.config.pause_duration_range = (min_sec, max_sec);
        self
    }

    /// Generates a track of raw points with timestamps.
    ///
    /// The first point always carries an elevation reading.
    pub fn generate(&self, rng: &mut impl Rng) -> Result<Vec<RawTrackPoint>, GeneratorError> {
        self.config.validate()?;

        let start = self
            .config
            .start_point
            .unwrap_or_else(|| self.config.bounds.random_point(rng));

        let path = self.generate_path(start, rng);
        self.apply_readings(&path, rng)
    }

    /// Generates the clean path (coordinates only, no noise or timing).
    pub fn generate_path(&self, start: (f64, f64), rng: &mut impl Rng) -> Vec<(f64, f64)> {
        let mut path = vec![start];
        let mut current = start;
        let mut total_distance = 0.0;

        let mut heading = match self.config.heading_deg {
            Some(degrees) => degrees.to_radians(),
            None => rng.gen_range(0.0..TAU),
        };
        let wander = self.config.heading_wander;

        while total_distance < self.config.distance_meters {
            if wander > 0.0 {
                heading += rng.gen_range(-wander..wander);
            }

            let step = self.config.point_spacing_m;
            let lat_delta = (step * heading.cos()) / METERS_PER_DEGREE;
            let lon_delta =
                (step * heading.sin()) / (METERS_PER_DEGREE * current.0.to_radians().cos());

            let (next_lat, next_lon, bounced_heading) =
                self.apply_bounds(current.0 + lat_delta, current.1 + lon_delta, heading);
            heading = bounced_heading;

            current = (next_lat, next_lon);
            path.push(current);
            total_distance += step;
        }

        path
    }

    /// Reflects the heading off the bounding box edges.
    fn apply_bounds(&self, lat: f64, lon: f64, heading: f64) -> (f64, f64, f64) {
        let b = &self.config.bounds;
        let mut new_heading = heading;

        let lat = if lat < b.min_lat {
            new_heading = PI - heading;
            b.min_lat + (b.min_lat - lat).min(0.001)
        } else if lat > b.max_lat {
            new_heading = PI - heading;
            b.max_lat - (lat - b.max_lat).min(0.001)
        } else {
            lat
        };

        let lon = if lon < b.min_lon {
            new_heading = -new_heading;
            b.min_lon + (b.min_lon - lon).min(0.001)
        } else if lon > b.max_lon {
            new_heading = -new_heading;
            b.max_lon - (lon - b.max_lon).min(0.001)
        } else {
            lon
        };

        (lat, lon, new_heading)
    }

    /// Adds elevation, timestamps and sensor noise to a path.
    fn apply_readings(
        &self,
        path: &[(f64, f64)],
        rng: &mut impl Rng,
    ) -> Result<Vec<RawTrackPoint>, GeneratorError> {
        let jitter = Normal::new(0.0, self.config.gps_jitter_m / METERS_PER_DEGREE)?;
        let mut result = Vec::with_capacity(path.len());
        let mut timestamp = self.config.start_time;
        let mut travelled_km = 0.0;
        let mut prev: Option<(f64, f64)> = None;

        for (i, &(lat, lon)) in path.iter().enumerate() {
            if let Some((prev_lat, prev_lon)) = prev {
                let step_km = distance_km(prev_lat, prev_lon, lat, lon);
                travelled_km += step_km;
                timestamp += Duration::seconds_f64(step_km * 1000.0 / self.config.speed_mps);
            }
            prev = Some((lat, lon));

            let elevation = if i > 0 && rng.gen_bool(self.config.elevation_dropout_probability) {
                None
            } else {
                let elevation = self.elevation.elevation(lat, lon, travelled_km);
                Some(add_elevation_jitter(
                    elevation,
                    rng,
                    self.config.elevation_jitter_m,
                )?)
            };

            let point = RawTrackPoint::new(
                lat + jitter.sample(rng),
                lon + jitter.sample(rng),
                elevation,
            )
            .with_timestamp(timestamp);

            if rng.gen_bool(self.config.pause_probability) {
                let (min, max) = self.config.pause_duration_range;
                let pause = Duration::seconds_f64(rng.gen_range(min..=max));
                timestamp += pause;
                result.push(point.clone());
                result.push(RawTrackPoint {
                    timestamp: Some(timestamp),
                    ..point
                });
            } else {
                result.push(point);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_generate_track() {
        let track = ProceduralGenerator::new(42)
            .with_start(45.75, 12.35)
            .with_distance(1000.0)
            .generate(&mut rng())
            .unwrap();

        // 1 km at 30 m spacing, plus any pauses
        assert!(track.len() > 30);
        for point in &track {
            assert!(point.timestamp.is_some());
            assert!(point.elevation.is_some());
            assert!(Region::PIAVE.contains(point.lat.unwrap(), point.lon.unwrap()));
        }
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let track = ProceduralGenerator::new(42)
            .with_distance(2000.0)
            .with_pauses(0.1, 10.0, 60.0)
            .generate(&mut rng())
            .unwrap();

        for window in track.windows(2) {
            assert!(window[1].timestamp.unwrap() > window[0].timestamp.unwrap());
        }
    }

    #[test]
    fn test_pause_repeats_position() {
        let track = ProceduralGenerator::new(1)
            .with_start(45.7, 12.3)
            .with_distance(300.0)
            .with_pauses(1.0, 30.0, 30.0)
            .generate(&mut rng())
            .unwrap();

        assert_eq!(track[0].lat, track[1].lat);
        assert_eq!(track[0].lon, track[1].lon);
        assert_eq!(
            track[1].timestamp.unwrap() - track[0].timestamp.unwrap(),
            Duration::seconds(30)
        );
    }

    #[test]
    fn test_straight_line_spacing() {
        let track = ProceduralGenerator::new(1)
            .with_start(45.7, 12.3)
            .with_heading(0.0, 0.0)
            .with_gps_jitter(0.0)
            .with_pauses(0.0, 0.0, 0.0)
            .with_distance(900.0)
            .generate(&mut rng())
            .unwrap();

        assert_eq!(track.len(), 31);
        for window in track.windows(2) {
            let step = distance_km(
                window[0].lat.unwrap(),
                window[0].lon.unwrap(),
                window[1].lat.unwrap(),
                window[1].lon.unwrap(),
            );
            assert!((step - 0.03).abs() < 0.001);
        }
    }

    #[test]
    fn test_dropouts_skip_first_point() {
        let track = ProceduralGenerator::new(3)
            .with_distance(600.0)
            .with_elevation_dropouts(1.0)
            .generate(&mut rng())
            .unwrap();

        assert!(track[0].elevation.is_some());
        assert!(track[1..].iter().all(|p| p.elevation.is_none()));
    }

    #[test]
    fn test_invalid_config() {
        let result = ProceduralGenerator::new(1)
            .with_point_spacing(0.0)
            .generate(&mut rng());
        assert!(matches!(result, Err(GeneratorError::InvalidConfig(_))));

        let result = ProceduralGenerator::new(1)
            .with_elevation_dropouts(1.5)
            .generate(&mut rng());
        assert!(matches!(result, Err(GeneratorError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_jitter_is_rejected() {
        let result = ProceduralGenerator::new(1)
            .with_gps_jitter(-2.0)
            .generate(&mut rng());
        assert!(matches!(result, Err(GeneratorError::InvalidConfig(_))));

        let result = ProceduralGenerator::new(1)
            .with_elevation_jitter(-0.5)
            .generate(&mut rng());
        assert!(matches!(result, Err(GeneratorError::InvalidConfig(_))));
    }

    #[test]
    fn test_speed_and_start_time_drive_timestamps() {
        let start = datetime!(2024-05-01 06:30:00 UTC);
        let generator = ProceduralGenerator::new(1)
            .with_start(45.7, 12.3)
            .with_heading(90.0, 0.0)
            .with_gps_jitter(0.0)
            .with_pauses(0.0, 0.0, 0.0)
            .with_distance(300.0)
            .with_speed(10.0)
            .with_start_time(start);
        assert_eq!(generator.config().speed_mps, 10.0);
        assert_eq!(generator.config().start_time, start);

        let track = generator.generate(&mut rng()).unwrap();
        assert_eq!(track[0].timestamp, Some(start));

        let (a, b) = (&track[0], &track[1]);
        let step_km = distance_km(a.lat.unwrap(), a.lon.unwrap(), b.lat.unwrap(), b.lon.unwrap());
        let elapsed = b.timestamp.unwrap() - a.timestamp.unwrap();
        assert!((elapsed.as_seconds_f64() - step_km * 100.0).abs() < 1e-6);
    }
}
