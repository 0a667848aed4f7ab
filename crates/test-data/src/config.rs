//! Geographic configuration for synthetic tracks.

use serde::{Deserialize, Serialize};

/// Geographic bounding box defined by southwest and northeast corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum latitude (south)
    pub min_lat: f64,
    /// Minimum longitude (west)
    pub min_lon: f64,
    /// Maximum latitude (north)
    pub max_lat: f64,
    /// Maximum longitude (east)
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Returns a random point within the bounding box.
    pub fn random_point(&self, rng: &mut impl rand::Rng) -> (f64, f64) {
        let lat = rng.gen_range(self.min_lat..self.max_lat);
        let lon = rng.gen_range(self.min_lon..self.max_lon);
        (lat, lon)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Pre-defined regions for synthetic rides.
#[derive(Debug, Clone, Copy)]
pub struct Region;

impl Region {
    /// Piave river plain north of Treviso, almost flat.
    pub const PIAVE: BoundingBox = BoundingBox::new(45.60, 12.15, 45.90, 12.55);

    /// Dolomites around Cortina, long climbs.
    pub const DOLOMITES: BoundingBox = BoundingBox::new(46.40, 11.90, 46.65, 12.30);

    pub fn by_name(name: &str) -> Option<BoundingBox> {
        match name.to_ascii_lowercase().as_str() {
            "piave" => Some(Self::PIAVE),
            "dolomites" => Some(Self::DOLOMITES),
            _ => None,
        }
    }
}
