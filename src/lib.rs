//! # Butterfly-extract Library
//!
//! Turns OpenStreetMap road data into a compact road graph for routing and
//! coverage tools.
//!
//! ## Pipeline
//!
//! - **Filter & dilute**: keep ways whose `highway` class is a road, split
//!   them into two-node segments
//! - **Resolve**: merge segments digitized more than once
//! - **Annotate**: great-circle length of every segment
//! - **Simplify** (optional): contract chains of degree-2 nodes
//! - **Prune**: keep only the nodes the roads reference
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let graph = butterfly_extract::extract_file("monaco.osm.pbf", &Default::default())?;
//!     graph.save("monaco.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Sources
//!
//! ```rust
//! use butterfly_extract::{extract, ExtractOptions, MemorySource, RawWay};
//!
//! let mut source = MemorySource::default()
//!     .with_way(RawWay::new([1, 2, 3], [("highway", "residential")]))
//!     .with_node(1, 4.350, 50.850)
//!     .with_node(2, 4.351, 50.850)
//!     .with_node(3, 4.352, 50.850);
//!
//! let graph = extract(&mut source, &ExtractOptions::default()).unwrap();
//! assert_eq!(graph.roads.len(), 1);
//! ```

use std::path::Path;

pub mod core;

pub use crate::core::geojson::{geojson_to_roads, roads_to_geojson, Document};
pub use crate::core::{
    collect_ways, extract, Coordinates, Error, ExtractOptions, MemorySource, Node, NodeId,
    NodePass, NodeTable, OsmSource, PbfSource, RawNode, RawWay, Result, Road, RoadGraph, WayPass,
};

/// Extract the road graph of a `.osm.pbf` file
///
/// The file is read twice: once for ways, once for the coordinates of the
/// nodes those ways reference.
pub fn extract_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<RoadGraph> {
    let mut source = PbfSource::new(path)?;
    extract(&mut source, options)
}
