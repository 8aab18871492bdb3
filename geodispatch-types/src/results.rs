//! Result payloads returned by the engine to host controllers.
//!
//! "Not found" is a valid negative outcome, not an error: results carry a
//! `found` flag plus a human-readable message so the host can surface the
//! outcome without inspecting optional fields.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Outcome of a station assignment query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub found: bool,
    pub station_id: Option<i64>,
    pub station_name: Option<String>,
    pub region: Option<String>,
    pub message: String,
}

impl AssignmentResult {
    /// A positive assignment.
    pub fn assigned(
        station_id: i64,
        station_name: impl Into<String>,
        region: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            found: true,
            station_id: Some(station_id),
            station_name: Some(station_name.into()),
            region: Some(region.into()),
            message: message.into(),
        }
    }

    /// A valid negative outcome (no responsible station).
    pub fn unassigned(message: impl Into<String>) -> Self {
        Self {
            found: false,
            station_id: None,
            station_name: None,
            region: None,
            message: message.into(),
        }
    }
}

/// Outcome of a fire-district containment query.
///
/// Like [`AssignmentResult`] but carries the matched district's informational
/// area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictResult {
    pub found: bool,
    pub station_id: Option<i64>,
    pub station_name: Option<String>,
    pub region: Option<String>,
    pub area_km2: Option<f64>,
    pub message: String,
}

impl DistrictResult {
    pub fn matched(
        station_id: i64,
        station_name: impl Into<String>,
        region: impl Into<String>,
        area_km2: Option<f64>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            found: true,
            station_id: Some(station_id),
            station_name: Some(station_name.into()),
            region: Some(region.into()),
            area_km2,
            message: message.into(),
        }
    }

    pub fn unmatched(message: impl Into<String>) -> Self {
        Self {
            found: false,
            station_id: None,
            station_name: None,
            region: None,
            area_km2: None,
            message: message.into(),
        }
    }
}

/// A boundary prepared for client rendering.
///
/// Coordinates are always normalized to multi-ring shape: a list containing
/// the single outer ring, each vertex as a `[lng, lat]` pair. This matches
/// what the map renderer expects regardless of the shape the payload was
/// imported in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySummary {
    pub boundary_id: i64,
    pub station_id: i64,
    pub station_name: String,
    pub region: String,
    pub area_km2: Option<f64>,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

/// Diagnostic snapshot of a single cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Whether a live (unexpired) entry exists for the key.
    pub cached: bool,
    pub cache_key: String,
    /// When the entry was stored, if one exists.
    pub timestamp: Option<SystemTime>,
}
