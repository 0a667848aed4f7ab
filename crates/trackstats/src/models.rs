use geo::Point;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::distance::distance_km;

/// Where a track point's elevation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationSource {
    /// Read from the source record.
    Recorded,
    /// Copied from the previous point because the record had none.
    CarriedForward,
    /// The first record had no elevation, so 0.0 m was used.
    Defaulted,
}

/// A normalized track point. Elevation is always present after extraction,
/// see [`ElevationSource`] for whether it was measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    pub elevation_source: ElevationSource,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            timestamp: None,
            elevation_source: ElevationSource::Recorded,
        }
    }

    pub fn with_timestamp(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_to(&self, other: &TrackPoint) -> f64 {
        distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    pub fn has_recorded_elevation(&self) -> bool {
        self.elevation_source == ElevationSource::Recorded
    }
}

impl From<&TrackPoint> for Point<f64> {
    fn from(pt: &TrackPoint) -> Self {
        Point::new(pt.longitude, pt.latitude)
    }
}

/// A raw point record as handed over by a document parser.
///
/// Every field is optional here; the extractor decides which gaps are fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrackPoint {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub elevation: Option<f64>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub timestamp: Option<OffsetDateTime>,
}

impl RawTrackPoint {
    pub fn new(lat: f64, lon: f64, elevation: Option<f64>) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
            elevation,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Selects which elevation reduction to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationKind {
    Min,
    Max,
    Avg,
}

/// Minimum, maximum and mean elevation of a track, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// One point of the elevation profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Altimetry {
    pub elevation: f64,
    /// Distance from the start of the track when the elevation was recorded.
    pub cumulative_distance_km: f64,
}

/// Elevation profile plus the elevation extremes of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltimetrySummary {
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub avg_elevation: f64,
    pub samples: Vec<Altimetry>,
}

/// Strava activity types, keyed by the integer found in a track's `<type>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Ride,
    AlpineSki,
    BackcountrySki,
    Hike,
    IceSkate,
    InlineSkate,
    NordicSki,
    RollerSki,
    Run,
    Walk,
    Workout,
    Snowboard,
    Snowshoe,
    Kitesurf,
    Windsurf,
    Swim,
    VirtualRide,
    EBikeRide,
    Velomobile,
    Canoe,
    Kayaking,
    Rowing,
    StandUpPaddling,
    Surfing,
    Crossfit,
    Elliptical,
    RockClimb,
    StairStepper,
    WeightTraining,
    Yoga,
    Handcycle,
    Wheelchair,
    VirtualRun,
}

impl ActivityType {
    pub fn from_code(code: u32) -> Option<Self> {
        let activity_type = match code {
            1 => Self::Ride,
            2 => Self::AlpineSki,
            3 => Self::BackcountrySki,
            4 => Self::Hike,
            5 => Self::IceSkate,
            6 => Self::InlineSkate,
            7 => Self::NordicSki,
            8 => Self::RollerSki,
            9 => Self::Run,
            10 => Self::Walk,
            11 => Self::Workout,
            12 => Self::Snowboard,
            13 => Self::Snowshoe,
            14 => Self::Kitesurf,
            15 => Self::Windsurf,
            16 => Self::Swim,
            17 => Self::VirtualRide,
            18 => Self::EBikeRide,
            19 => Self::Velomobile,
            // 20 is unassigned
            21 => Self::Canoe,
            22 => Self::Kayaking,
            23 => Self::Rowing,
            24 => Self::StandUpPaddling,
            25 => Self::Surfing,
            26 => Self::Crossfit,
            27 => Self::Elliptical,
            28 => Self::RockClimb,
            29 => Self::StairStepper,
            30 => Self::WeightTraining,
            31 => Self::Yoga,
            51 => Self::Handcycle,
            52 => Self::Wheelchair,
            53 => Self::VirtualRun,
            _ => return None,
        };
        Some(activity_type)
    }

    /// Parses the text content of a GPX `<type>` element.
    pub fn from_gpx_type(value: Option<&str>) -> Option<Self> {
        value
            .and_then(|s| s.trim().parse::<u32>().ok())
            .and_then(Self::from_code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ride => "ride",
            Self::AlpineSki => "alpine_ski",
            Self::BackcountrySki => "backcountry_ski",
            Self::Hike => "hike",
            Self::IceSkate => "ice_skate",
            Self::InlineSkate => "inline_skate",
            Self::NordicSki => "nordic_ski",
            Self::RollerSki => "roller_ski",
            Self::Run => "run",
            Self::Walk => "walk",
            Self::Workout => "workout",
            Self::Snowboard => "snowboard",
            Self::Snowshoe => "snowshoe",
            Self::Kitesurf => "kitesurf",
            Self::Windsurf => "windsurf",
            Self::Swim => "swim",
            Self::VirtualRide => "virtual_ride",
            Self::EBikeRide => "e_bike_ride",
            Self::Velomobile => "velomobile",
            Self::Canoe => "canoe",
            Self::Kayaking => "kayaking",
            Self::Rowing => "rowing",
            Self::StandUpPaddling => "stand_up_paddling",
            Self::Surfing => "surfing",
            Self::Crossfit => "crossfit",
            Self::Elliptical => "elliptical",
            Self::RockClimb => "rock_climb",
            Self::StairStepper => "stair_stepper",
            Self::WeightTraining => "weight_training",
            Self::Yoga => "yoga",
            Self::Handcycle => "handcycle",
            Self::Wheelchair => "wheelchair",
            Self::VirtualRun => "virtual_run",
        }
    }
}

/// Report produced for a whole activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub name: Option<String>,
    pub activity_type: Option<ActivityType>,
    pub point_count: usize,
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub avg_elevation: f64,
    pub elevation_gain: f64,
    pub total_distance_km: f64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    pub duration_seconds: Option<i64>,
}
