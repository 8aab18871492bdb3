//! The station assignment facade.
//!
//! [`AssignmentEngine`] owns a read-only station snapshot, the engine
//! [`Config`], and a [`GeometryCache`]. It dispatches incident coordinates to
//! containment search (fire districts) or nearest-neighbor search (agencies
//! with point locations only), and serves boundary lists for map rendering.
//!
//! The engine is `Send + Sync`: geometry and distance functions are pure, and
//! the cache is internally synchronized, so concurrent request workers can
//! share one instance without external locking.

use crate::boundary::{self, DistrictGeometry};
use crate::builder::EngineBuilder;
use crate::cache::{CachePriority, CacheStats, CachedValue, GeometryCache};
use crate::config::Config;
use crate::error::{GeodispatchError, Result};
use crate::geometry::simplify_ring;
use crate::spatial::find_nearest;
use geo::{LineString, Point};
use geodispatch_types::{
    AgencyKind, AssignmentResult, BoundarySummary, CacheStatistics, DistrictResult, Station,
};

pub(crate) const DISTRICTS_CACHE_KEY: &str = "districts:fire";
#[cfg(feature = "geojson")]
pub(crate) const GEOJSON_CACHE_KEY: &str = "boundaries:geojson";

/// Parameters for a boundary-list query.
///
/// The cache key is derived from all three fields, so distinct parameter
/// combinations never collide.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryQuery {
    /// Cap on the number of boundaries returned.
    pub limit: Option<usize>,
    /// Whether to run Douglas-Peucker simplification on each ring.
    pub simplify: bool,
    /// Simplification tolerance in degrees; falls back to
    /// [`Config::default_simplify_tolerance`] when unset.
    pub tolerance: Option<f64>,
}

impl BoundaryQuery {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn simplified(mut self) -> Self {
        self.simplify = true;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify = true;
        self.tolerance = Some(tolerance);
        self
    }

    fn cache_key(&self) -> String {
        let limit = match self.limit {
            Some(limit) => limit.to_string(),
            None => "all".to_string(),
        };
        let tolerance = match self.tolerance {
            Some(tolerance) => tolerance.to_string(),
            None => "default".to_string(),
        };
        format!(
            "boundaries:limit={}:simplify={}:tolerance={}",
            limit, self.simplify, tolerance
        )
    }

    fn validate(&self) -> Result<()> {
        if let Some(tolerance) = self.tolerance
            && (!tolerance.is_finite() || tolerance < 0.0)
        {
            return Err(GeodispatchError::InvalidInput(format!(
                "tolerance must be finite and non-negative, got {tolerance}"
            )));
        }
        Ok(())
    }
}

/// Validate WGS84 ranges and build a query point (x = lon, y = lat).
fn validate_coordinate(lat: f64, lon: f64) -> Result<Point<f64>> {
    let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
    let lon_ok = lon.is_finite() && (-180.0..=180.0).contains(&lon);
    if !lat_ok || !lon_ok {
        return Err(GeodispatchError::InvalidCoordinate { lat, lon });
    }
    Ok(Point::new(lon, lat))
}

/// Geographic station-assignment engine.
///
/// # Examples
///
/// ```rust
/// use geodispatch::{AgencyKind, AssignmentEngine, Station, StationBoundary};
/// use geo::Point;
/// use serde_json::json;
///
/// let stations = vec![
///     Station::new(1, "Athens Central", "Attica", AgencyKind::Fire)
///         .with_location(Point::new(23.73, 37.99))
///         .with_boundary(StationBoundary::new(
///             10,
///             1,
///             json!([[23.7, 37.9], [23.8, 37.9], [23.8, 38.0], [23.7, 38.0]]),
///         )),
/// ];
///
/// let engine = AssignmentEngine::new(stations);
/// let result = engine.assign_station(37.9838, 23.7275, AgencyKind::Fire).unwrap();
/// assert!(result.found);
/// assert_eq!(result.station_id, Some(1));
/// ```
pub struct AssignmentEngine {
    stations: Vec<Station>,
    config: Config,
    cache: GeometryCache,
}

impl AssignmentEngine {
    /// Create an engine over a station snapshot with the default
    /// configuration.
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            config: Config::default(),
            cache: GeometryCache::new(),
        }
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(stations: Vec<Station>, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            stations,
            config,
            cache: GeometryCache::new(),
        })
    }

    pub(crate) fn from_parts(stations: Vec<Station>, config: Config, cache: GeometryCache) -> Self {
        Self {
            stations,
            config,
            cache,
        }
    }

    /// Create an [`EngineBuilder`] for advanced construction.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parsed fire districts, loaded through the 24-hour cache.
    fn districts(&self) -> Vec<DistrictGeometry> {
        if let Some(CachedValue::Districts(districts)) = self.cache.get(DISTRICTS_CACHE_KEY) {
            return districts;
        }

        let districts = boundary::load_districts(&self.stations);
        self.cache.set_with_priority(
            DISTRICTS_CACHE_KEY,
            CachedValue::Districts(districts.clone()),
            self.config.district_ttl(),
            CachePriority::High,
        );
        districts
    }

    fn nearest_by_agency(
        &self,
        point: &Point<f64>,
        agency: AgencyKind,
        prefix: &str,
    ) -> AssignmentResult {
        let candidates: Vec<(Point<f64>, &Station)> = self
            .stations
            .iter()
            .filter(|s| s.agency == agency)
            .map(|s| (s.location, s))
            .collect();

        let Some((index, distance)) = find_nearest(point, &candidates) else {
            return AssignmentResult::unassigned(format!(
                "{prefix}No {agency} stations available"
            ));
        };

        if let Some(radius) = self.config.max_assignment_radius_m
            && distance > radius
        {
            return AssignmentResult::unassigned(format!(
                "{prefix}Nearest {agency} station is {distance:.0} m away, beyond the {radius:.0} m assignment radius"
            ));
        }

        let station = candidates[index].1;
        AssignmentResult::assigned(
            station.id,
            &station.name,
            &station.region,
            format!(
                "{prefix}Nearest {agency} station is '{}' ({distance:.0} m)",
                station.name
            ),
        )
    }

    /// Assign the responsible station for an incident at the given
    /// coordinate.
    ///
    /// Fire incidents are matched by district containment first, falling back
    /// to the nearest fire station when no district contains the point. The
    /// other agencies only have point locations and are always matched by
    /// nearest-neighbor search.
    ///
    /// Out-of-range coordinates are rejected with an error; "no station
    /// found" is a normal result with `found = false`.
    pub fn assign_station(
        &self,
        lat: f64,
        lon: f64,
        agency: AgencyKind,
    ) -> Result<AssignmentResult> {
        let point = validate_coordinate(lat, lon)?;

        match agency {
            AgencyKind::Fire => {
                let districts = self.districts();
                if let Some(district) = boundary::find_containing(&point, &districts) {
                    return Ok(AssignmentResult::assigned(
                        district.station_id,
                        &district.station_name,
                        &district.region,
                        format!("Assigned to fire district '{}'", district.station_name),
                    ));
                }
                Ok(self.nearest_by_agency(&point, AgencyKind::Fire, "No containing fire district; "))
            }
            other => Ok(self.nearest_by_agency(&point, other, "")),
        }
    }

    /// Fire-specific entry point: which district contains the coordinate?
    ///
    /// Unlike [`assign_station`](Self::assign_station) there is no
    /// nearest-neighbor fallback, and the matched district's informational
    /// area is carried in the result.
    pub fn find_containing_district(&self, lat: f64, lon: f64) -> Result<DistrictResult> {
        let point = validate_coordinate(lat, lon)?;

        let districts = self.districts();
        match boundary::find_containing(&point, &districts) {
            Some(district) => Ok(DistrictResult::matched(
                district.station_id,
                &district.station_name,
                &district.region,
                district.area_km2,
                format!("Inside fire district '{}'", district.station_name),
            )),
            None => Ok(DistrictResult::unmatched(
                "No fire district contains the supplied coordinate",
            )),
        }
    }

    /// Boundary lists for map rendering, cached per query parameters.
    ///
    /// Output coordinates are always normalized to multi-ring shape (a list
    /// containing the single outer ring) regardless of the payload shape the
    /// boundary was imported in.
    pub fn boundaries(&self, query: &BoundaryQuery) -> Result<Vec<BoundarySummary>> {
        query.validate()?;

        let cache_key = query.cache_key();
        if let Some(CachedValue::BoundaryList(summaries)) = self.cache.get(&cache_key) {
            return Ok(summaries);
        }

        let tolerance = query
            .tolerance
            .unwrap_or(self.config.default_simplify_tolerance);

        let mut summaries = Vec::new();
        for station in &self.stations {
            for record in &station.boundaries {
                let ring = match boundary::parse_outer_ring(&record.coordinates) {
                    Ok(ring) => ring,
                    Err(reason) => {
                        log::warn!(
                            "skipping malformed boundary {} for station {}: {}",
                            record.id,
                            station.id,
                            reason
                        );
                        continue;
                    }
                };

                let ring = if query.simplify {
                    simplify_ring(&ring, tolerance)
                } else {
                    ring
                };

                summaries.push(BoundarySummary {
                    boundary_id: record.id,
                    station_id: station.id,
                    station_name: station.name.clone(),
                    region: station.region.clone(),
                    area_km2: record.area_km2,
                    coordinates: vec![ring_to_pairs(&ring)],
                });

                if let Some(limit) = query.limit
                    && summaries.len() >= limit
                {
                    break;
                }
            }
            if let Some(limit) = query.limit
                && summaries.len() >= limit
            {
                break;
            }
        }

        self.cache.set(
            cache_key,
            CachedValue::BoundaryList(summaries.clone()),
            self.config.query_ttl(),
        );
        Ok(summaries)
    }

    /// All boundaries as a GeoJSON feature collection, cached.
    ///
    /// Each feature's properties carry `stationId`, `stationName`, `region`
    /// and `area`.
    #[cfg(feature = "geojson")]
    pub fn boundaries_geojson(&self) -> Result<geojson::FeatureCollection> {
        if let Some(CachedValue::FeatureCollection(collection)) = self.cache.get(GEOJSON_CACHE_KEY)
        {
            return Ok(collection);
        }

        let summaries = self.boundaries(&BoundaryQuery::default())?;
        let collection = crate::geojson::feature_collection(&summaries)?;
        self.cache.set(
            GEOJSON_CACHE_KEY,
            CachedValue::FeatureCollection(collection.clone()),
            self.config.geojson_ttl(),
        );
        Ok(collection)
    }

    /// Drop every cached result. Used when the underlying station data
    /// changes or on a manual cache-clear request.
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }

    /// Diagnostic snapshot of the district-geometry cache entry.
    pub fn cache_statistics(&self) -> CacheStatistics {
        self.cache.entry_statistics(DISTRICTS_CACHE_KEY)
    }

    /// Aggregate cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop expired cache entries, returning how many were removed. Hosts can
    /// call this from a maintenance task; correctness does not depend on it.
    pub fn cleanup_expired(&self) -> usize {
        self.cache.cleanup_expired()
    }
}

fn ring_to_pairs(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}
