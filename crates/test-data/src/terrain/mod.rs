//! Elevation sources for generated tracks.

mod elevation;

pub use elevation::{ElevationGenerator, ElevationModel, add_elevation_jitter};
