//! GeoJSON conversion
//!
//! Converts a Road Graph into a `FeatureCollection` of line strings for
//! visualization, and back. Roads are drawn as a chord between their
//! endpoints, or through their discriminator when asked to. The way back is
//! lossy for chord-only exports: the discriminator's position is unknown, so
//! it is dropped.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;

use crate::core::distance::haversine_distance;
use crate::core::error::{Error, Result};
use crate::core::graph::{Coordinates, NodeId, NodeTable, Road, RoadGraph};

/// An input document for the converter
#[derive(Debug, Clone)]
pub enum Document {
    RoadGraph(RoadGraph),
    Geo(FeatureCollection),
}

impl Document {
    /// Classify a decoded JSON document
    pub fn from_value(value: JsonValue) -> Result<Self> {
        if value.get("roads").is_some() && value.get("nodes").is_some() {
            return RoadGraph::from_value(value).map(Document::RoadGraph);
        }

        if value.get("type").and_then(JsonValue::as_str) == Some("FeatureCollection") {
            return match GeoJson::from_json_value(value) {
                Ok(GeoJson::FeatureCollection(collection)) => Ok(Document::Geo(collection)),
                Ok(_) => Err(Error::UnsupportedFormat(
                    "expected a GeoJSON FeatureCollection".to_string(),
                )),
                Err(e) => Err(Error::UnsupportedFormat(format!("invalid GeoJSON: {e}"))),
            };
        }

        Err(Error::UnsupportedFormat(
            "expected a road graph (\"roads\" and \"nodes\") or a GeoJSON FeatureCollection"
                .to_string(),
        ))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_value(serde_json::from_slice(&bytes)?)
    }
}

fn road_properties(road: &Road) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("p1".to_string(), json!(road.p1));
    properties.insert("p2".to_string(), json!(road.p2));
    properties.insert("directed".to_string(), json!(road.directed));
    properties.insert("sidewalks".to_string(), json!(road.sidewalks));
    properties.insert("distance".to_string(), json!(road.distance));
    if let Some(discriminator) = &road.discriminator {
        properties.insert("discriminator".to_string(), json!(discriminator));
    }
    properties
}

/// One line string per road
///
/// With `via_discriminator`, contracted roads are drawn as
/// `p1 -> discriminator -> p2`.
pub fn roads_to_geojson(graph: &RoadGraph, via_discriminator: bool) -> Result<FeatureCollection> {
    let nodes = graph.node_table();
    let position = |id: &NodeId| {
        nodes
            .get(id)
            .map(|&(lon, lat)| vec![lon, lat])
            .ok_or_else(|| Error::MissingNode(id.clone()))
    };

    let features = graph
        .roads
        .iter()
        .map(|road| {
            let mut line = vec![position(&road.p1)?];
            if let Some(discriminator) = road.discriminator.as_ref().filter(|_| via_discriminator) {
                line.push(position(discriminator)?);
            }
            line.push(position(&road.p2)?);

            Ok(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(line))),
                id: None,
                properties: Some(road_properties(road)),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

fn position(feature: usize, pos: &[f64]) -> Result<Coordinates> {
    match pos {
        [lon, lat, ..] => Ok((*lon, *lat)),
        _ => Err(Error::UnsupportedFormat(format!(
            "feature {feature}: position needs longitude and latitude"
        ))),
    }
}

/// A property that may be absent but, when present, must have the right type
fn property<T: DeserializeOwned>(feature: &Feature, index: usize, key: &str) -> Result<Option<T>> {
    match feature.property(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
            Error::UnsupportedFormat(format!("feature {index}: invalid '{key}': {e}"))
        }),
    }
}

/// Rebuild a Road Graph from features produced by [`roads_to_geojson`]
///
/// Endpoints come from the first and last positions of each line. A
/// discriminator keeps its place only when some line passes through it.
pub fn geojson_to_roads(collection: FeatureCollection) -> Result<RoadGraph> {
    let mut coords = NodeTable::new();
    let mut roads = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.iter().enumerate() {
        let line = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::LineString(line)) if line.len() >= 2 => line,
            _ => {
                return Err(Error::UnsupportedFormat(format!(
                    "feature {index}: expected a LineString with at least two positions"
                )))
            }
        };

        let missing = |key: &str| {
            Error::UnsupportedFormat(format!("feature {index}: missing '{key}' property"))
        };
        let p1: NodeId = property(feature, index, "p1")?.ok_or_else(|| missing("p1"))?;
        let p2: NodeId = property(feature, index, "p2")?.ok_or_else(|| missing("p2"))?;
        let discriminator: Option<NodeId> = property(feature, index, "discriminator")?;

        let positions = line
            .iter()
            .map(|pos| position(index, pos))
            .collect::<Result<Vec<_>>>()?;

        coords.insert(p1.clone(), positions[0]);
        coords.insert(p2.clone(), positions[positions.len() - 1]);
        if let (Some(d), 3) = (&discriminator, positions.len()) {
            coords.insert(d.clone(), positions[1]);
        }

        let distance: f64 = property(feature, index, "distance")?.unwrap_or_else(|| {
            positions
                .windows(2)
                .map(|w| haversine_distance(w[0], w[1]))
                .sum()
        });

        roads.push(Road {
            p1,
            p2,
            directed: property(feature, index, "directed")?.unwrap_or(false),
            sidewalks: property(feature, index, "sidewalks")?.unwrap_or((false, false)),
            distance,
            discriminator,
        });
    }

    let mut dropped = 0usize;
    for road in &mut roads {
        if road
            .discriminator
            .as_ref()
            .is_some_and(|d| !coords.contains_key(d))
        {
            road.discriminator = None;
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::warn!(
            "Dropped {dropped} discriminators without geometry (export was made without --viad)"
        );
    }

    RoadGraph::assemble(roads, &coords)
}
