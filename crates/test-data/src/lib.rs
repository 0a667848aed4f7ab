//! Synthetic GPS tracks for exercising trackstats.
//!
//! Generates raw points with terrain elevation, timestamps, sensor noise and
//! elevation dropouts, and writes them out as GPX.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rand::{SeedableRng, rngs::StdRng};
//! use test_data::prelude::*;
//!
//! let mut rng = StdRng::seed_from_u64(12345);
//! let points = ProceduralGenerator::for_region(Region::DOLOMITES, 7)
//!     .with_distance(20_000.0)
//!     .with_elevation_dropouts(0.05)
//!     .generate(&mut rng)?;
//! let bytes = generate_gpx(&points, "Passo Giau", Some(1));
//! ```

use thiserror::Error;

pub mod config;
pub mod gpx;
pub mod sources;
pub mod terrain;

pub use trackstats::RawTrackPoint;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Invalid track configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid noise distribution: {0}")]
    Distribution(#[from] rand_distr::NormalError),
}

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::GeneratorError;
    pub use crate::RawTrackPoint;
    pub use crate::config::{BoundingBox, Region};
    pub use crate::gpx::generate_gpx;
    pub use crate::sources::{ProceduralGenerator, TrackConfig};
    pub use crate::terrain::{ElevationGenerator, ElevationModel, add_elevation_jitter};
}
