//! Error types for the geodispatch engine.
//!
//! Validation failures are surfaced to the caller; a missing station or
//! district is never an error (results carry `found = false` instead), and
//! malformed boundary geometry is recovered locally by the searches that
//! encounter it.

use geodispatch_types::ParseAgencyError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeodispatchError>;

#[derive(Error, Debug)]
pub enum GeodispatchError {
    /// Latitude or longitude outside the valid WGS84 ranges.
    #[error("coordinate out of range: lat={lat}, lon={lon} (expected lat in [-90, 90], lon in [-180, 180])")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// A query parameter failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An agency label that is not one of fire/coastguard/police/hospital.
    #[error("unknown agency type: {0}")]
    UnknownAgency(String),

    /// A boundary payload that parses as neither supported coordinate shape.
    ///
    /// Searches recover from this locally (skip and log); it only propagates
    /// when a caller parses a single boundary directly.
    #[error("malformed boundary {boundary_id}: {reason}")]
    MalformedBoundary { boundary_id: i64, reason: String },

    /// Configuration rejected by [`Config::validate`](crate::Config::validate).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// GeoJSON assembly failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<ParseAgencyError> for GeodispatchError {
    fn from(err: ParseAgencyError) -> Self {
        GeodispatchError::UnknownAgency(err.label)
    }
}
