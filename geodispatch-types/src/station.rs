//! Station and boundary records supplied to the engine by the host application.
//!
//! These are read-only snapshots: the engine never mutates them. Boundary
//! coordinate payloads are kept as raw JSON because the source data arrives in
//! two shapes (a flat pair list or a list of rings) and is normalized lazily
//! by the engine.

use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing agency labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAgencyError {
    /// The label that failed to parse.
    pub label: String,
}

impl fmt::Display for ParseAgencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown agency type: {}", self.label)
    }
}

impl std::error::Error for ParseAgencyError {}

/// The responder agency a station belongs to.
///
/// Fire stations carry district boundary polygons and are assigned by
/// containment; the remaining agencies only have point locations and are
/// assigned by nearest-neighbor search.
///
/// # Examples
///
/// ```
/// use geodispatch_types::AgencyKind;
///
/// let agency: AgencyKind = "coastguard".parse().unwrap();
/// assert_eq!(agency, AgencyKind::CoastGuard);
/// assert_eq!(agency.to_string(), "coastguard");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgencyKind {
    Fire,
    CoastGuard,
    Police,
    Hospital,
}

impl AgencyKind {
    /// All agency kinds, in dispatch priority order.
    pub const ALL: [AgencyKind; 4] = [
        AgencyKind::Fire,
        AgencyKind::CoastGuard,
        AgencyKind::Police,
        AgencyKind::Hospital,
    ];

    /// The canonical lowercase label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgencyKind::Fire => "fire",
            AgencyKind::CoastGuard => "coastguard",
            AgencyKind::Police => "police",
            AgencyKind::Hospital => "hospital",
        }
    }

    /// Whether stations of this agency carry district boundary polygons.
    pub fn has_boundaries(&self) -> bool {
        matches!(self, AgencyKind::Fire)
    }
}

impl fmt::Display for AgencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgencyKind {
    type Err = ParseAgencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fire" => Ok(AgencyKind::Fire),
            "coastguard" => Ok(AgencyKind::CoastGuard),
            "police" => Ok(AgencyKind::Police),
            "hospital" => Ok(AgencyKind::Hospital),
            other => Err(ParseAgencyError {
                label: other.to_string(),
            }),
        }
    }
}

/// A district boundary record owned by a station.
///
/// `coordinates` holds the raw polygon payload exactly as imported. Two shapes
/// are tolerated: a flat list of `[lng, lat]` pairs (single ring) or a list of
/// rings (the first ring is the outer boundary). Payloads that parse as
/// neither are skipped by the engine with a logged warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationBoundary {
    pub id: i64,
    pub station_id: i64,
    /// Informational area in square kilometers; not used for tie-breaking.
    #[serde(default)]
    pub area_km2: Option<f64>,
    /// Raw coordinate payload in either supported shape.
    pub coordinates: serde_json::Value,
}

impl StationBoundary {
    pub fn new(id: i64, station_id: i64, coordinates: serde_json::Value) -> Self {
        Self {
            id,
            station_id,
            area_km2: None,
            coordinates,
        }
    }

    pub fn with_area(mut self, area_km2: f64) -> Self {
        self.area_km2 = Some(area_km2);
        self
    }
}

/// A responder station snapshot.
///
/// The location point uses the `geo` convention: x = longitude, y = latitude,
/// both in degrees (WGS84).
///
/// # Examples
///
/// ```
/// use geodispatch_types::{AgencyKind, Station, StationBoundary};
/// use geo::Point;
/// use serde_json::json;
///
/// let station = Station::new(7, "Piraeus Port Authority", "Attica", AgencyKind::CoastGuard)
///     .with_location(Point::new(23.6443, 37.9420));
/// assert_eq!(station.boundary_count(), 0);
///
/// let district = Station::new(1, "Central", "Attica", AgencyKind::Fire)
///     .with_boundary(StationBoundary::new(
///         10,
///         1,
///         json!([[23.7, 37.9], [23.8, 37.9], [23.8, 38.0], [23.7, 38.0]]),
///     ));
/// assert_eq!(district.boundary_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    /// Region or area label, carried through to assignment results.
    pub region: String,
    pub agency: AgencyKind,
    pub location: Point<f64>,
    #[serde(default)]
    pub boundaries: Vec<StationBoundary>,
}

impl Station {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        region: impl Into<String>,
        agency: AgencyKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            region: region.into(),
            agency,
            location: Point::new(0.0, 0.0),
            boundaries: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: Point<f64>) -> Self {
        self.location = location;
        self
    }

    pub fn with_boundary(mut self, boundary: StationBoundary) -> Self {
        self.boundaries.push(boundary);
        self
    }

    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }
}
