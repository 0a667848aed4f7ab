//! Analysis settings.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::metrics::DEFAULT_GAIN_THRESHOLD_KM;

/// Environment variable overriding [`AnalysisConfig::gain_threshold_km`].
pub const GAIN_THRESHOLD_ENV: &str = "TRACKSTATS_GAIN_THRESHOLD_KM";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum anchor distance for the elevation-gain filter, in kilometers.
    /// The same value is the minimum credited rise in meters.
    pub gain_threshold_km: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            gain_threshold_km: DEFAULT_GAIN_THRESHOLD_KM,
        }
    }
}

impl AnalysisConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(GAIN_THRESHOLD_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => {
                    config.gain_threshold_km = value;
                }
                _ => warn!(
                    "Ignoring invalid {}={:?}, using {}",
                    GAIN_THRESHOLD_ENV, raw, config.gain_threshold_km
                ),
            }
        }

        config
    }
}
