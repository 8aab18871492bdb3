//! Embedded geographic station-assignment engine for multi-agency emergency
//! dispatch, with district containment, nearest-station search and TTL-cached
//! boundary processing.
//!
//! ```rust
//! use geodispatch::{AgencyKind, AssignmentEngine, Station, StationBoundary};
//! use geo::Point;
//! use serde_json::json;
//!
//! let stations = vec![
//!     Station::new(1, "Athens Central", "Attica", AgencyKind::Fire)
//!         .with_location(Point::new(23.73, 37.99))
//!         .with_boundary(StationBoundary::new(
//!             10,
//!             1,
//!             json!([[23.7, 37.9], [23.8, 37.9], [23.8, 38.0], [23.7, 38.0]]),
//!         )),
//! ];
//!
//! let engine = AssignmentEngine::new(stations);
//! let result = engine.assign_station(37.9838, 23.7275, AgencyKind::Fire)?;
//! assert!(result.found);
//! # Ok::<(), geodispatch::GeodispatchError>(())
//! ```

pub mod boundary;
pub mod builder;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod spatial;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use builder::EngineBuilder;
pub use config::Config;
pub use engine::{AssignmentEngine, BoundaryQuery};
pub use error::{GeodispatchError, Result};

pub use geo::{LineString, Point};

pub use boundary::DistrictGeometry;
pub use cache::{CachePriority, CacheStats, CachedValue, GeometryCache};
pub use geometry::{point_in_ring, simplify_ring};
pub use spatial::{find_nearest, haversine_distance};

pub use geodispatch_types::{
    AgencyKind, AssignmentResult, BoundarySummary, CacheStatistics, DistrictResult, Station,
    StationBoundary,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{AssignmentEngine, BoundaryQuery, EngineBuilder, GeodispatchError, Result};

    pub use crate::{Config, GeometryCache};

    pub use geodispatch_types::{AgencyKind, AssignmentResult, DistrictResult, Station, StationBoundary};

    pub use geo::{LineString, Point};

    pub use std::time::Duration;
}
