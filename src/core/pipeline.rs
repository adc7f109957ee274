//! Extraction pipeline
//!
//! The stages hand their tables to each other by value:
//!
//! ```text
//! collect_ways(source) -> WayPass                 (filter, dilute, resolve)
//! WayPass::resolve_nodes(source) -> NodePass      (coordinates of wanted nodes)
//! NodePass::build(options) -> RoadGraph           (distance, simplify, prune)
//! ```
//!
//! The way pass must complete before the node pass starts, since only then is
//! the set of wanted node ids known.

use indexmap::IndexSet;
use log::info;

use crate::core::dilute::{Diluter, DilutionStats};
use crate::core::distance::annotate;
use crate::core::error::Result;
use crate::core::graph::{NodeId, NodeTable, RoadGraph};
use crate::core::ingest::OsmSource;
use crate::core::resolve::EdgeTable;
use crate::core::simplify::simplify;

/// Extraction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Contract degree-2 chains before writing the graph
    pub simplify: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { simplify: true }
    }
}

/// Result of the way pass
#[derive(Debug)]
pub struct WayPass {
    pub edges: EdgeTable,
    pub wanted: IndexSet<NodeId>,
    pub stats: DilutionStats,
}

/// Result of the node pass
#[derive(Debug)]
pub struct NodePass {
    pub edges: EdgeTable,
    pub coords: NodeTable,
}

/// First pass: filter and dilute every way into the edge table
pub fn collect_ways<S: OsmSource + ?Sized>(source: &mut S) -> Result<WayPass> {
    let mut diluter = Diluter::new();
    source.ways(&mut |way| diluter.push(&way))?;

    let (edges, wanted, stats) = diluter.finish();
    info!(
        "Accepted {} of {} ways: {} segments, {} resolved roads ({} duplicates merged), {} nodes of interest",
        stats.ways_accepted,
        stats.ways_seen,
        stats.segments,
        edges.len(),
        edges.merged(),
        wanted.len()
    );

    Ok(WayPass {
        edges,
        wanted,
        stats,
    })
}

impl WayPass {
    /// Second pass: resolve coordinates of the nodes of interest
    pub fn resolve_nodes<S: OsmSource + ?Sized>(self, source: &mut S) -> Result<NodePass> {
        let mut coords = NodeTable::with_capacity(self.wanted.len());
        source.nodes(&self.wanted, &mut |node| {
            coords.insert(node.id, (node.lon, node.lat));
        })?;

        info!(
            "Resolved coordinates for {} of {} nodes of interest",
            coords.len(),
            self.wanted.len()
        );

        Ok(NodePass {
            edges: self.edges,
            coords,
        })
    }
}

impl NodePass {
    /// Annotate distances, optionally simplify, then prune unused nodes
    pub fn build(self, options: &ExtractOptions) -> Result<RoadGraph> {
        let roads = annotate(self.edges, &self.coords)?;

        let roads = if options.simplify {
            let (roads, stats) = simplify(roads);
            info!(
                "Simplified {} roads into {} ({} contractions in {} passes)",
                stats.roads_before, stats.roads_after, stats.contractions, stats.passes
            );
            roads
        } else {
            roads
        };

        let graph = RoadGraph::assemble(roads, &self.coords)?;
        info!(
            "Road graph: {} roads, {} nodes",
            graph.roads.len(),
            graph.nodes.len()
        );
        Ok(graph)
    }
}

/// Run the whole pipeline over `source`
pub fn extract<S: OsmSource + ?Sized>(source: &mut S, options: &ExtractOptions) -> Result<RoadGraph> {
    collect_ways(source)?.resolve_nodes(source)?.build(options)
}
