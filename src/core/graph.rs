//! Road graph data model and the persisted Road Graph document
//!
//! The persisted layout is the contract with downstream tooling:
//!
//! ```json
//! {
//!   "roads": [{"p1": "1", "p2": "3", "directed": false,
//!              "sidewalks": [false, true], "distance": 250.0, "discriminator": "2"}],
//!   "nodes": [{"id": "1", "coordinates": [4.35, 50.85]}]
//! }
//! ```
//!
//! Node ids are written as strings and read back from strings or integers.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::error::{Error, Result};

/// Node identifier
///
/// Extraction produces integer OSM ids. A loaded graph may use any string:
/// text that is the canonical decimal form of an `i64` is held as
/// [`NodeId::Osm`], every other spelling (`"007"`, `"a"`, `" 12"`) is kept
/// verbatim as [`NodeId::Named`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Osm(i64),
    Named(Arc<str>),
}

impl NodeId {
    pub fn new(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) if n.to_string() == id => NodeId::Osm(n),
            _ => NodeId::Named(Arc::from(id)),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Osm(id) => write!(f, "{id}"),
            NodeId::Named(id) => f.write_str(id),
        }
    }
}

impl FromStr for NodeId {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(NodeId::new(s))
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        NodeId::Osm(id)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::new(id)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(i64),
            Str(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Int(id) => NodeId::Osm(id),
            Repr::Str(s) => NodeId::new(&s),
        })
    }
}

/// `(longitude, latitude)` in degrees
pub type Coordinates = (f64, f64);

/// Coordinates resolved during the second ingestion pass
pub type NodeTable = IndexMap<NodeId, Coordinates>;

/// A node of the road graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub coordinates: Coordinates,
}

/// A road (edge) of the graph
///
/// `directed` roads are traversable from `p1` to `p2` only. `sidewalks` holds
/// the left and right side as originally digitized. A contracted road carries
/// the absorbed midpoint as `discriminator`, which lets consumers draw
/// `p1 -> discriminator -> p2` instead of a straight chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub p1: NodeId,
    pub p2: NodeId,
    pub directed: bool,
    pub sidewalks: (bool, bool),
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<NodeId>,
}

impl Road {
    /// Atomic two-node segment, not yet annotated with a distance
    pub fn segment(p1: NodeId, p2: NodeId, directed: bool, sidewalks: (bool, bool)) -> Self {
        Self {
            p1,
            p2,
            directed,
            sidewalks,
            distance: 0.0,
            discriminator: None,
        }
    }

    /// Ordered endpoint pair used by the resolver
    pub fn key(&self) -> (NodeId, NodeId) {
        (self.p1.clone(), self.p2.clone())
    }

    /// Node ids this road needs in the node list
    pub fn referenced_nodes(&self) -> impl Iterator<Item = &NodeId> {
        [Some(&self.p1), Some(&self.p2), self.discriminator.as_ref()]
            .into_iter()
            .flatten()
    }
}

/// The persisted Road Graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadGraph {
    pub roads: Vec<Road>,
    pub nodes: Vec<Node>,
}

impl RoadGraph {
    /// Prune and assemble the final graph
    ///
    /// Keeps exactly the nodes referenced by a road as `p1`, `p2` or
    /// `discriminator`, each once, in order of first reference.
    pub fn assemble(roads: Vec<Road>, coords: &NodeTable) -> Result<Self> {
        let referenced: IndexSet<&NodeId> = roads.iter().flat_map(Road::referenced_nodes).collect();

        let nodes = referenced
            .into_iter()
            .map(|id| {
                coords
                    .get(id)
                    .map(|&coordinates| Node {
                        id: id.clone(),
                        coordinates,
                    })
                    .ok_or_else(|| Error::MissingNode(id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Pruned node table: kept {} of {} resolved nodes",
            nodes.len(),
            coords.len()
        );

        Ok(Self { roads, nodes })
    }

    /// Node id -> coordinates lookup
    pub fn node_table(&self) -> NodeTable {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.coordinates))
            .collect()
    }

    /// Parse a Road Graph document
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(classify_json_error)
    }

    /// Parse a Road Graph from an already decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(classify_json_error)
    }

    /// Load a Road Graph from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_slice(&bytes)
    }

    /// Write the graph as JSON
    ///
    /// The document is fully serialized before the file is created, so a
    /// failure never leaves a truncated output behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = serde_json::to_vec(self)?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}

/// Structural mismatches mean the document is not a Road Graph at all
fn classify_json_error(err: serde_json::Error) -> Error {
    match err.classify() {
        serde_json::error::Category::Data => {
            Error::UnsupportedFormat(format!("not a road graph: {err}"))
        }
        _ => Error::Json(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: i64) -> NodeId {
        NodeId::Osm(n)
    }

    fn coords() -> NodeTable {
        [(1, (4.0, 50.0)), (2, (4.001, 50.0)), (3, (4.002, 50.0)), (4, (4.003, 50.0))]
            .into_iter()
            .map(|(n, c)| (id(n), c))
            .collect()
    }

    #[test]
    fn test_node_id_serializes_as_string() {
        let json = serde_json::to_string(&id(123)).unwrap();
        assert_eq!(json, "\"123\"");
    }

    #[test]
    fn test_node_id_reads_string_or_integer() {
        let from_str: NodeId = serde_json::from_str("\"-7\"").unwrap();
        let from_int: NodeId = serde_json::from_str("99").unwrap();
        assert_eq!(from_str, id(-7));
        assert_eq!(from_int, id(99));
    }

    #[test]
    fn test_node_id_keeps_non_canonical_spellings() {
        for text in ["007", "a", " 12", "+5", "way/3", ""] {
            let parsed = NodeId::new(text);
            assert!(matches!(parsed, NodeId::Named(_)), "{text:?}");
            assert_eq!(parsed.to_string(), text);
        }
        assert_ne!(NodeId::new("007"), id(7));
        assert_eq!(NodeId::new("7"), id(7));
    }

    #[test]
    fn test_road_graph_ids_survive_load_and_save() {
        let doc = r#"{"roads":[{"p1":"007","p2":"a","directed":true,"sidewalks":[false,true],"distance":12.5,"discriminator":"b"}],"nodes":[{"id":"007","coordinates":[4.0,50.0]},{"id":"a","coordinates":[4.1,50.0]},{"id":"b","coordinates":[4.05,50.1]}]}"#;

        let graph = RoadGraph::from_slice(doc.as_bytes()).unwrap();
        assert_eq!(graph.roads[0].p1, NodeId::new("007"));
        assert_eq!(serde_json::to_string(&graph).unwrap(), doc);
    }

    #[test]
    fn test_road_layout() {
        let mut road = Road::segment(id(1), id(3), false, (false, true));
        road.distance = 250.0;
        road.discriminator = Some(id(2));

        let value = serde_json::to_value(&road).unwrap();
        assert_eq!(value["p1"], "1");
        assert_eq!(value["sidewalks"], serde_json::json!([false, true]));
        assert_eq!(value["discriminator"], "2");

        let plain = serde_json::to_value(Road::segment(id(1), id(2), true, (false, false))).unwrap();
        assert!(plain.get("discriminator").is_none());
    }

    #[test]
    fn test_assemble_keeps_only_referenced_nodes() {
        let mut road = Road::segment(id(1), id(3), false, (false, false));
        road.discriminator = Some(id(2));

        let graph = RoadGraph::assemble(vec![road], &coords()).unwrap();
        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec![id(1), id(3), id(2)]);
    }

    #[test]
    fn test_assemble_lists_shared_nodes_once() {
        let roads = vec![
            Road::segment(id(1), id(2), false, (false, false)),
            Road::segment(id(2), id(4), false, (false, false)),
            Road::segment(id(4), id(1), false, (false, false)),
        ];
        let graph = RoadGraph::assemble(roads, &coords()).unwrap();
        assert_eq!(graph.nodes.len(), 3);
    }

    #[test]
    fn test_assemble_fails_on_unresolved_node() {
        let roads = vec![Road::segment(id(1), id(9), false, (false, false))];
        let err = RoadGraph::assemble(roads, &coords()).unwrap_err();
        assert!(matches!(err, Error::MissingNode(NodeId::Osm(9))));
    }

    #[test]
    fn test_from_slice_rejects_foreign_documents() {
        let err = RoadGraph::from_slice(br#"{"type": "FeatureCollection", "features": []}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));

        let err = RoadGraph::from_slice(b"{ not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
