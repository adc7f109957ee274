//! Way filtering and dilution
//!
//! Accepted ways are split into atomic two-node segments that inherit the
//! way's one-way and sidewalk flags. Every node of an accepted way becomes a
//! node of interest whose coordinates the second ingestion pass resolves.

use indexmap::IndexSet;

use crate::core::graph::{NodeId, Road};
use crate::core::ingest::RawWay;
use crate::core::resolve::EdgeTable;
use crate::core::tags::{is_oneway_forward, is_road_class, parse_sidewalk};

/// Split an accepted way into candidate segments
///
/// Returns `None` when the way's `highway` class is outside the whitelist.
/// Segment keys follow the way's traversal order.
pub fn dilute(way: &RawWay) -> Option<Vec<Road>> {
    if !way.tag("highway").is_some_and(is_road_class) {
        return None;
    }

    let directed = is_oneway_forward(way.tag("oneway"));
    let sidewalks = parse_sidewalk(way.tag("sidewalk"));

    Some(
        way.nodes
            .windows(2)
            .map(|pair| Road::segment(pair[0].clone(), pair[1].clone(), directed, sidewalks))
            .collect(),
    )
}

/// Counters reported after the way pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DilutionStats {
    pub ways_seen: usize,
    pub ways_accepted: usize,
    pub segments: usize,
}

/// Accumulates the first ingestion pass
#[derive(Debug, Default)]
pub struct Diluter {
    edges: EdgeTable,
    wanted: IndexSet<NodeId>,
    stats: DilutionStats,
}

impl Diluter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one way and feed its segments to the resolver
    pub fn push(&mut self, way: &RawWay) {
        self.stats.ways_seen += 1;

        let Some(segments) = dilute(way) else {
            return;
        };

        self.stats.ways_accepted += 1;
        self.stats.segments += segments.len();
        self.wanted.extend(way.nodes.iter().cloned());
        for segment in segments {
            self.edges.insert(segment);
        }
    }

    pub fn finish(self) -> (EdgeTable, IndexSet<NodeId>, DilutionStats) {
        (self.edges, self.wanted, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_node_way_yields_two_segments() {
        let way = RawWay::new(
            [10, 11, 12],
            [("highway", "residential"), ("oneway", "yes"), ("sidewalk", "left")],
        );
        let segments = dilute(&way).unwrap();

        let keys: Vec<_> = segments.iter().map(Road::key).collect();
        assert_eq!(
            keys,
            vec![(NodeId::Osm(10), NodeId::Osm(11)), (NodeId::Osm(11), NodeId::Osm(12))]
        );
        for segment in &segments {
            assert!(segment.directed);
            assert_eq!(segment.sidewalks, (true, false));
            assert_eq!(segment.distance, 0.0);
            assert_eq!(segment.discriminator, None);
        }
    }

    #[test]
    fn test_rejected_way_is_discarded_entirely() {
        let mut diluter = Diluter::new();
        diluter.push(&RawWay::new([1, 2, 3], [("highway", "footway")]));
        diluter.push(&RawWay::new([4, 5], [("building", "yes")]));

        let (edges, wanted, stats) = diluter.finish();
        assert!(edges.is_empty());
        assert!(wanted.is_empty());
        assert_eq!(stats.ways_seen, 2);
        assert_eq!(stats.ways_accepted, 0);
    }

    #[test]
    fn test_overlapping_ways_are_resolved() {
        let mut diluter = Diluter::new();
        diluter.push(&RawWay::new([1, 2, 3], [("highway", "primary"), ("oneway", "yes")]));
        diluter.push(&RawWay::new([2, 3, 4], [("highway", "primary"), ("sidewalk", "right")]));

        let (edges, wanted, stats) = diluter.finish();
        assert_eq!(stats.segments, 4);
        assert_eq!(edges.len(), 3);
        assert_eq!(edges.merged(), 1);
        assert_eq!(wanted.len(), 4);

        let shared = edges.get(NodeId::Osm(2), NodeId::Osm(3)).unwrap();
        assert!(!shared.directed);
        assert_eq!(shared.sidewalks, (false, true));
    }

    #[test]
    fn test_single_node_way_marks_node_without_segments() {
        let mut diluter = Diluter::new();
        diluter.push(&RawWay::new([7], [("highway", "residential")]));

        let (edges, wanted, _) = diluter.finish();
        assert!(edges.is_empty());
        assert!(wanted.contains(&NodeId::Osm(7)));
    }
}
