//! Elevation models for synthetic tracks.

use noise::{NoiseFn, Perlin};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::GeneratorError;

/// Perlin-noise terrain.
///
/// Several octaves are summed (fractal Brownian motion) so the surface has
/// both long climbs and small bumps.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    /// Base elevation in meters.
    base_elevation: f64,
    /// Amplitude of the variation around the base, in meters.
    height_scale: f64,
    /// Spatial frequency in cycles per degree.
    frequency: f64,
    octaves: u32,
}

impl ElevationGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 300.0,
            height_scale: 150.0,
            frequency: 20.0,
            octaves: 4,
        }
    }

    /// Gentle plain a few tens of meters above sea level.
    pub fn piave(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 60.0,
            height_scale: 40.0,
            frequency: 15.0,
            octaves: 3,
        }
    }

    /// High mountain terrain.
    pub fn dolomites(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1600.0,
            height_scale: 900.0,
            frequency: 25.0,
            octaves: 5,
        }
    }

    pub fn with_base_elevation(mut self, elevation: f64) -> Self {
        self.base_elevation = elevation;
        self
    }

    pub fn with_height_scale(mut self, scale: f64) -> Self {
        self.height_scale = scale;
        self
    }

    pub fn base_elevation(&self) -> f64 {
        self.base_elevation
    }

    pub fn height_scale(&self) -> f64 {
        self.height_scale
    }

    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += self.perlin.get([lat * frequency, lon * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        self.base_elevation + (total / max_amplitude).clamp(-1.0, 1.0) * self.height_scale
    }
}

/// How a generated track gets its elevation.
#[derive(Debug, Clone)]
pub enum ElevationModel {
    /// Same elevation everywhere.
    Flat(f64),
    /// Climbs (or descends) linearly with distance travelled.
    Ramp { start: f64, meters_per_km: f64 },
    /// Elevation sampled from terrain at each position.
    Terrain(ElevationGenerator),
}

impl ElevationModel {
    /// Elevation at a position reached after `distance_km` along the track.
    pub fn elevation(&self, lat: f64, lon: f64, distance_km: f64) -> f64 {
        match self {
            Self::Flat(elevation) => *elevation,
            Self::Ramp {
                start,
                meters_per_km,
            } => start + meters_per_km * distance_km,
            Self::Terrain(terrain) => terrain.elevation_at(lat, lon),
        }
    }
}

/// Adds Gaussian barometric/GPS noise to an elevation reading.
///
/// Real devices are off by 3-20 m depending on conditions.
pub fn add_elevation_jitter(
    elevation: f64,
    rng: &mut impl Rng,
    std_dev: f64,
) -> Result<f64, GeneratorError> {
    if !(std_dev >= 0.0) {
        return Err(GeneratorError::InvalidConfig(format!(
            "elevation jitter must be non-negative, got {std_dev}"
        )));
    }
    if std_dev == 0.0 {
        return Ok(elevation);
    }
    let normal = Normal::new(0.0, std_dev)?;
    Ok(elevation + normal.sample(rng))
}
