//! # geodispatch-types
//!
//! Station domain model and result types for the geodispatch engine.
//!
//! This crate provides the serializable types shared between the engine and
//! its host application:
//!
//! - **Station types**: `Station`, `StationBoundary`, `AgencyKind`
//! - **Result types**: `AssignmentResult`, `DistrictResult`, `BoundarySummary`,
//!   `CacheStatistics`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geodispatch_types::{AgencyKind, Station};
//! use geo::Point;
//!
//! let station = Station::new(1, "Central Fire Station", "Attica", AgencyKind::Fire)
//!     .with_location(Point::new(23.7275, 37.9838));
//! assert_eq!(station.agency, AgencyKind::Fire);
//! ```

pub mod results;
pub mod station;

pub use results::{AssignmentResult, BoundarySummary, CacheStatistics, DistrictResult};
pub use station::{AgencyKind, ParseAgencyError, Station, StationBoundary};
