//! GeoJSON feature-collection export for map renderers.

use crate::error::{GeodispatchError, Result};
use geodispatch_types::BoundarySummary;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

/// Build one polygon feature per boundary summary.
///
/// Feature properties carry `stationId`, `stationName`, `region` and `area`;
/// the feature id is the boundary id. Summaries are already normalized to
/// multi-ring shape, which maps directly onto GeoJSON polygon coordinates.
pub fn feature_collection(summaries: &[BoundarySummary]) -> Result<FeatureCollection> {
    let features: Vec<Feature> = summaries.iter().map(boundary_feature).collect::<Result<_>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

fn boundary_feature(summary: &BoundarySummary) -> Result<Feature> {
    let rings: Vec<Vec<Vec<f64>>> = summary
        .coordinates
        .iter()
        .map(|ring| ring.iter().map(|pair| vec![pair[0], pair[1]]).collect())
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("stationId".to_string(), summary.station_id.into());
    properties.insert(
        "stationName".to_string(),
        summary.station_name.clone().into(),
    );
    properties.insert("region".to_string(), summary.region.clone().into());
    properties.insert(
        "area".to_string(),
        serde_json::to_value(summary.area_km2)
            .map_err(|e| GeodispatchError::Serialization(e.to_string()))?,
    );

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(rings))),
        id: Some(geojson::feature::Id::Number(summary.boundary_id.into())),
        properties: Some(properties),
        foreign_members: None,
    })
}
