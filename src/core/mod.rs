//! Core library modules for butterfly-extract
//!
//! One module per pipeline stage, plus the persisted graph and its GeoJSON
//! rendering.

pub mod dilute;
pub mod distance;
pub mod error;
pub mod geojson;
pub mod graph;
pub mod ingest;
pub mod pipeline;
pub mod resolve;
pub mod simplify;
pub mod tags;

pub use error::{Error, Result};
pub use graph::{Coordinates, Node, NodeId, NodeTable, Road, RoadGraph};
pub use ingest::{MemorySource, OsmSource, PbfSource, RawNode, RawWay};
pub use pipeline::{collect_ways, extract, ExtractOptions, NodePass, WayPass};
