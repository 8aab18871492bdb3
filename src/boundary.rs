//! District boundary parsing and containment search.
//!
//! Boundary payloads arrive in two shapes, auto-detected at parse time:
//!
//! - a flat list of `[lng, lat]` pairs (single ring), or
//! - a list of rings, where the first ring is the outer boundary.
//!
//! Only the outer ring is kept; holes are not modeled because the source data
//! represents districts as single, non-holed areas. Payloads that parse as
//! neither shape are skipped with a logged warning; a single bad record must
//! never take down the overall lookup.

use crate::error::{GeodispatchError, Result};
use crate::geometry::point_in_ring;
use geo::{Coord, LineString, Point};
use geodispatch_types::{Station, StationBoundary};
use serde_json::Value;

/// A fire district prepared for containment queries: the parsed outer ring
/// plus the station fields carried into results.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictGeometry {
    pub boundary_id: i64,
    pub station_id: i64,
    pub station_name: String,
    pub region: String,
    pub area_km2: Option<f64>,
    pub ring: LineString<f64>,
}

fn coordinate_pair(value: &Value) -> std::result::Result<Coord<f64>, String> {
    let pair = value
        .as_array()
        .ok_or_else(|| "coordinate is not an array".to_string())?;
    if pair.len() < 2 {
        return Err("coordinate has fewer than 2 values".to_string());
    }
    let lng = pair[0]
        .as_f64()
        .ok_or_else(|| "longitude is not a number".to_string())?;
    let lat = pair[1]
        .as_f64()
        .ok_or_else(|| "latitude is not a number".to_string())?;
    Ok(Coord { x: lng, y: lat })
}

fn ring_from_pairs(pairs: &[Value]) -> std::result::Result<LineString<f64>, String> {
    let coords: std::result::Result<Vec<Coord<f64>>, String> =
        pairs.iter().map(coordinate_pair).collect();
    Ok(LineString::new(coords?))
}

/// Parse a raw boundary payload into its outer ring.
///
/// Accepts both supported shapes; multi-ring payloads are flattened to their
/// first ring. The shape is detected by the nesting depth of the first
/// element, then the whole payload is parsed strictly: a payload that is
/// neither shape is an error, not a guess.
pub fn parse_outer_ring(payload: &Value) -> std::result::Result<LineString<f64>, String> {
    let outer = payload
        .as_array()
        .ok_or_else(|| "payload is not an array".to_string())?;
    if outer.is_empty() {
        return Err("payload is empty".to_string());
    }

    let first = outer[0]
        .as_array()
        .ok_or_else(|| "payload elements are not arrays".to_string())?;
    if first.is_empty() {
        return Err("first element is empty".to_string());
    }

    if first[0].is_array() {
        // List of rings; the outer ring comes first.
        ring_from_pairs(first)
    } else {
        // Flat list of [lng, lat] pairs.
        ring_from_pairs(outer)
    }
}

/// Parse a single boundary record, attributing failures to its id.
pub fn boundary_ring(boundary: &StationBoundary) -> Result<LineString<f64>> {
    parse_outer_ring(&boundary.coordinates).map_err(|reason| {
        GeodispatchError::MalformedBoundary {
            boundary_id: boundary.id,
            reason,
        }
    })
}

/// Parse every fire-district boundary in the snapshot.
///
/// Malformed records are skipped with a warning; the surviving districts keep
/// the caller-supplied station order, which is also the containment
/// tie-break order.
pub fn load_districts(stations: &[Station]) -> Vec<DistrictGeometry> {
    let mut districts = Vec::new();
    for station in stations {
        if !station.agency.has_boundaries() {
            continue;
        }
        for boundary in &station.boundaries {
            match parse_outer_ring(&boundary.coordinates) {
                Ok(ring) => districts.push(DistrictGeometry {
                    boundary_id: boundary.id,
                    station_id: station.id,
                    station_name: station.name.clone(),
                    region: station.region.clone(),
                    area_km2: boundary.area_km2,
                    ring,
                }),
                Err(reason) => {
                    log::warn!(
                        "skipping malformed boundary {} for station {}: {}",
                        boundary.id,
                        station.id,
                        reason
                    );
                }
            }
        }
    }
    districts
}

/// Find the first district containing the point, in slice order.
///
/// When districts overlap (they should not in well-formed data) the first
/// match wins; no area- or centroid-based tie-break is attempted. `None`
/// means no district contains the point, a normal negative outcome.
pub fn find_containing<'a>(
    point: &Point<f64>,
    districts: &'a [DistrictGeometry],
) -> Option<&'a DistrictGeometry> {
    districts.iter().find(|d| point_in_ring(point, &d.ring))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodispatch_types::AgencyKind;
    use serde_json::json;

    fn fire_station(id: i64, name: &str, payload: Value) -> Station {
        Station::new(id, name, "Attica", AgencyKind::Fire)
            .with_location(Point::new(23.7, 37.9))
            .with_boundary(StationBoundary::new(id * 10, id, payload))
    }

    #[test]
    fn test_parse_flat_pair_list() {
        let payload = json!([[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]);
        let ring = parse_outer_ring(&payload).unwrap();
        assert_eq!(ring.0.len(), 4);
        assert_eq!(ring.0[2], Coord { x: 10.0, y: 10.0 });
    }

    #[test]
    fn test_parse_multi_ring_flattens_to_first() {
        let single = json!([[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]);
        let multi = json!([[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]]);

        let from_single = parse_outer_ring(&single).unwrap();
        let from_multi = parse_outer_ring(&multi).unwrap();
        assert_eq!(from_single, from_multi);
    }

    #[test]
    fn test_parse_multi_ring_ignores_extra_rings() {
        let multi = json!([
            [[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]],
            [[2.0, 2.0], [2.0, 3.0], [3.0, 3.0]]
        ]);
        let ring = parse_outer_ring(&multi).unwrap();
        assert_eq!(ring.0.len(), 4);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_outer_ring(&json!("not coordinates")).is_err());
        assert!(parse_outer_ring(&json!([])).is_err());
        assert!(parse_outer_ring(&json!([1, 2, 3])).is_err());
        assert!(parse_outer_ring(&json!([["a", "b"], ["c", "d"]])).is_err());
        assert!(parse_outer_ring(&json!([[1.0], [2.0]])).is_err());
    }

    #[test]
    fn test_boundary_ring_attributes_failure() {
        let boundary = StationBoundary::new(42, 1, json!({"shape": "wrong"}));
        let err = boundary_ring(&boundary).unwrap_err();
        assert!(matches!(
            err,
            GeodispatchError::MalformedBoundary { boundary_id: 42, .. }
        ));
    }

    #[test]
    fn test_load_districts_skips_non_fire_agencies() {
        let payload = json!([[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]);
        let stations = vec![
            fire_station(1, "Central", payload.clone()),
            Station::new(2, "Harbor Patrol", "Attica", AgencyKind::Police)
                .with_boundary(StationBoundary::new(99, 2, payload)),
        ];

        let districts = load_districts(&stations);
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].station_id, 1);
    }

    #[test]
    fn test_load_districts_skips_malformed_keeps_valid() {
        let stations = vec![
            fire_station(1, "Broken", json!("garbage")),
            fire_station(
                2,
                "Valid",
                json!([[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]),
            ),
        ];

        let districts = load_districts(&stations);
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].station_name, "Valid");
    }

    #[test]
    fn test_find_containing_first_match_wins() {
        // Two overlapping squares; station order decides.
        let stations = vec![
            fire_station(1, "First", json!([[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]])),
            fire_station(2, "Second", json!([[2.0, 2.0], [2.0, 12.0], [12.0, 12.0], [12.0, 2.0]])),
        ];
        let districts = load_districts(&stations);

        let overlap = Point::new(5.0, 5.0);
        let matched = find_containing(&overlap, &districts).unwrap();
        assert_eq!(matched.station_name, "First");

        // A point only the second square covers.
        let second_only = Point::new(11.0, 11.0);
        let matched = find_containing(&second_only, &districts).unwrap();
        assert_eq!(matched.station_name, "Second");
    }

    #[test]
    fn test_find_containing_none_when_outside() {
        let stations = vec![fire_station(
            1,
            "Central",
            json!([[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]),
        )];
        let districts = load_districts(&stations);
        assert!(find_containing(&Point::new(20.0, 20.0), &districts).is_none());
    }

    #[test]
    fn test_all_malformed_degrades_to_empty() {
        let stations = vec![
            fire_station(1, "Broken A", json!(null)),
            fire_station(2, "Broken B", json!([[], []])),
        ];
        let districts = load_districts(&stations);
        assert!(districts.is_empty());
        assert!(find_containing(&Point::new(5.0, 5.0), &districts).is_none());
    }
}
