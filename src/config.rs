//! Engine configuration.
//!
//! The configuration is designed to be easily serializable and loadable from
//! JSON or TOML while keeping complexity minimal. TTLs mirror how often the
//! underlying data changes: district geometry rarely (24 h), per-query
//! boundary lists and GeoJSON exports frequently enough that ten minutes is a
//! safe staleness bound.

use crate::error::{GeodispatchError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine configuration.
///
/// # Example
///
/// ```rust
/// use geodispatch::Config;
/// use std::time::Duration;
///
/// let config = Config::default()
///     .with_query_ttl(Duration::from_secs(300))
///     .with_max_assignment_radius_m(200_000.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// TTL for parsed district geometry, in seconds.
    #[serde(default = "Config::default_district_ttl_seconds")]
    pub district_ttl_seconds: u64,

    /// TTL for per-query boundary lists, in seconds.
    #[serde(default = "Config::default_query_ttl_seconds")]
    pub query_ttl_seconds: u64,

    /// TTL for derived GeoJSON feature collections, in seconds.
    #[serde(default = "Config::default_geojson_ttl_seconds")]
    pub geojson_ttl_seconds: u64,

    /// Douglas-Peucker tolerance (degrees) applied when a boundary query asks
    /// for simplification without supplying its own tolerance.
    #[serde(default = "Config::default_simplify_tolerance")]
    pub default_simplify_tolerance: f64,

    /// Optional sanity radius for nearest-neighbor assignment, in meters.
    ///
    /// `None` (the default) preserves the historical behavior of always
    /// returning the closest station no matter how far away it is.
    #[serde(default)]
    pub max_assignment_radius_m: Option<f64>,
}

impl Config {
    const fn default_district_ttl_seconds() -> u64 {
        24 * 60 * 60
    }

    const fn default_query_ttl_seconds() -> u64 {
        10 * 60
    }

    const fn default_geojson_ttl_seconds() -> u64 {
        10 * 60
    }

    const fn default_simplify_tolerance() -> f64 {
        0.0005
    }

    pub fn with_district_ttl(mut self, ttl: Duration) -> Self {
        self.district_ttl_seconds = ttl.as_secs();
        self
    }

    pub fn with_query_ttl(mut self, ttl: Duration) -> Self {
        self.query_ttl_seconds = ttl.as_secs();
        self
    }

    pub fn with_geojson_ttl(mut self, ttl: Duration) -> Self {
        self.geojson_ttl_seconds = ttl.as_secs();
        self
    }

    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.default_simplify_tolerance = tolerance;
        self
    }

    pub fn with_max_assignment_radius_m(mut self, radius_m: f64) -> Self {
        self.max_assignment_radius_m = Some(radius_m);
        self
    }

    pub fn district_ttl(&self) -> Duration {
        Duration::from_secs(self.district_ttl_seconds)
    }

    pub fn query_ttl(&self) -> Duration {
        Duration::from_secs(self.query_ttl_seconds)
    }

    pub fn geojson_ttl(&self) -> Duration {
        Duration::from_secs(self.geojson_ttl_seconds)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.district_ttl_seconds == 0 {
            return Err(GeodispatchError::InvalidConfig(
                "district TTL must be greater than zero".to_string(),
            ));
        }
        if self.query_ttl_seconds == 0 {
            return Err(GeodispatchError::InvalidConfig(
                "query TTL must be greater than zero".to_string(),
            ));
        }
        if self.geojson_ttl_seconds == 0 {
            return Err(GeodispatchError::InvalidConfig(
                "GeoJSON TTL must be greater than zero".to_string(),
            ));
        }
        if !self.default_simplify_tolerance.is_finite() || self.default_simplify_tolerance < 0.0 {
            return Err(GeodispatchError::InvalidConfig(
                "simplify tolerance must be finite and non-negative".to_string(),
            ));
        }
        if let Some(radius) = self.max_assignment_radius_m
            && (!radius.is_finite() || radius <= 0.0)
        {
            return Err(GeodispatchError::InvalidConfig(
                "max assignment radius must be finite and positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| GeodispatchError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GeodispatchError::Serialization(e.to_string()))
    }

    /// Load configuration from a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| GeodispatchError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GeodispatchError::Serialization(e.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            district_ttl_seconds: Self::default_district_ttl_seconds(),
            query_ttl_seconds: Self::default_query_ttl_seconds(),
            geojson_ttl_seconds: Self::default_geojson_ttl_seconds(),
            default_simplify_tolerance: Self::default_simplify_tolerance(),
            max_assignment_radius_m: None,
        }
    }
}
