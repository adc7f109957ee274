//! Ingestion adapters
//!
//! The pipeline reads its input in two sequential passes: every way first,
//! then only the nodes the first pass asked for. [`OsmSource`] is that
//! boundary; [`PbfSource`] reads OSM PBF files and [`MemorySource`] serves
//! records held in memory.

use indexmap::IndexSet;
use osmpbf::{Element, ElementReader};
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::core::graph::NodeId;

/// A way as delivered by the adapter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWay {
    pub nodes: Vec<NodeId>,
    pub tags: Vec<(String, String)>,
}

impl RawWay {
    pub fn new<I, K, V>(nodes: impl IntoIterator<Item = i64>, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(NodeId::Osm).collect(),
            tags: tags.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of a tag by key
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A node as delivered by the adapter
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub id: NodeId,
    pub lon: f64,
    pub lat: f64,
}

/// Two-pass source of OSM records
pub trait OsmSource {
    /// Visit every way of the input
    fn ways(&mut self, visit: &mut dyn FnMut(RawWay)) -> Result<()>;

    /// Visit every node of the input whose id is in `wanted`
    fn nodes(&mut self, wanted: &IndexSet<NodeId>, visit: &mut dyn FnMut(RawNode)) -> Result<()>;
}

/// OSM PBF file source, reading the file once per pass
pub struct PbfSource {
    path: PathBuf,
}

impl PbfSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input file not found: {}", path.display()),
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn reader(&self) -> Result<ElementReader<std::io::BufReader<std::fs::File>>> {
        ElementReader::from_path(&self.path).map_err(|e| {
            Error::Ingestion(format!(
                "Failed to open PBF file {}: {e}",
                self.path.display()
            ))
        })
    }
}

impl OsmSource for PbfSource {
    fn ways(&mut self, visit: &mut dyn FnMut(RawWay)) -> Result<()> {
        self.reader()?
            .for_each(|element| {
                if let Element::Way(way) = element {
                    visit(RawWay {
                        nodes: way.refs().map(NodeId::Osm).collect(),
                        tags: way
                            .tags()
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                            .collect(),
                    });
                }
            })
            .map_err(|e| Error::Ingestion(format!("Failed to read ways: {e}")))
    }

    fn nodes(&mut self, wanted: &IndexSet<NodeId>, visit: &mut dyn FnMut(RawNode)) -> Result<()> {
        self.reader()?
            .for_each(|element| {
                let node = match element {
                    Element::Node(node) => RawNode {
                        id: NodeId::Osm(node.id()),
                        lon: node.lon(),
                        lat: node.lat(),
                    },
                    Element::DenseNode(node) => RawNode {
                        id: NodeId::Osm(node.id()),
                        lon: node.lon(),
                        lat: node.lat(),
                    },
                    _ => return,
                };
                if wanted.contains(&node.id) {
                    visit(node);
                }
            })
            .map_err(|e| Error::Ingestion(format!("Failed to read nodes: {e}")))
    }
}

/// In-memory source
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub ways: Vec<RawWay>,
    pub nodes: Vec<RawNode>,
}

impl MemorySource {
    /// Add a node from `(id, lon, lat)`
    pub fn with_node(mut self, id: i64, lon: f64, lat: f64) -> Self {
        self.nodes.push(RawNode {
            id: NodeId::Osm(id),
            lon,
            lat,
        });
        self
    }

    pub fn with_way(mut self, way: RawWay) -> Self {
        self.ways.push(way);
        self
    }
}

impl OsmSource for MemorySource {
    fn ways(&mut self, visit: &mut dyn FnMut(RawWay)) -> Result<()> {
        self.ways.iter().cloned().for_each(visit);
        Ok(())
    }

    fn nodes(&mut self, wanted: &IndexSet<NodeId>, visit: &mut dyn FnMut(RawNode)) -> Result<()> {
        self.nodes
            .iter()
            .filter(|n| wanted.contains(&n.id))
            .cloned()
            .for_each(visit);
        Ok(())
    }
}
