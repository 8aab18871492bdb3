//! Engine builder for flexible construction.
//!
//! Hosts typically construct one engine per station snapshot at process
//! start; tests construct a fresh one per case, optionally with a pre-seeded
//! cache.

use crate::cache::GeometryCache;
use crate::config::Config;
use crate::engine::AssignmentEngine;
use crate::error::Result;
use geodispatch_types::Station;

/// Builder for [`AssignmentEngine`] with custom configuration and cache.
#[derive(Default)]
pub struct EngineBuilder {
    stations: Vec<Station>,
    config: Config,
    cache: Option<GeometryCache>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single station to the snapshot.
    pub fn station(mut self, station: Station) -> Self {
        self.stations.push(station);
        self
    }

    /// Add many stations to the snapshot.
    pub fn stations(mut self, stations: impl IntoIterator<Item = Station>) -> Self {
        self.stations.extend(stations);
        self
    }

    /// Set the engine configuration (TTLs, tolerance, radius cutoff).
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Inject a cache instance. Lets tests pre-seed entries or share a cache
    /// across engine rebuilds when only configuration changed.
    pub fn cache(mut self, cache: GeometryCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the engine, validating the configuration.
    pub fn build(self) -> Result<AssignmentEngine> {
        self.config.validate()?;
        let cache = self.cache.unwrap_or_default();
        Ok(AssignmentEngine::from_parts(self.stations, self.config, cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedValue;
    use geodispatch_types::AgencyKind;
    use std::time::Duration;

    #[test]
    fn test_builder_default_is_empty() {
        let engine = EngineBuilder::new().build().unwrap();
        assert_eq!(engine.station_count(), 0);
    }

    #[test]
    fn test_builder_collects_stations() {
        let engine = EngineBuilder::new()
            .station(Station::new(1, "One", "Attica", AgencyKind::Fire))
            .stations(vec![
                Station::new(2, "Two", "Attica", AgencyKind::Police),
                Station::new(3, "Three", "Attica", AgencyKind::Hospital),
            ])
            .build()
            .unwrap();
        assert_eq!(engine.station_count(), 3);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = Config::default();
        config.query_ttl_seconds = 0;
        assert!(EngineBuilder::new().config(config).build().is_err());
    }

    #[test]
    fn test_builder_injected_cache_is_used() {
        let cache = GeometryCache::new();
        cache.set(
            "seeded",
            CachedValue::BoundaryList(vec![]),
            Duration::from_secs(60),
        );

        let engine = EngineBuilder::new().cache(cache).build().unwrap();
        assert_eq!(engine.cache_stats().entry_count, 1);
    }
}
