//! Edge resolution
//!
//! Overlapping or re-digitized ways contribute the same segment more than
//! once. The table keeps one road per ordered endpoint pair and combines the
//! flags of every contribution.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::core::graph::{NodeId, Road};

/// Resolved segments keyed by ordered `(p1, p2)`
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    roads: IndexMap<(NodeId, NodeId), Road>,
    merged: usize,
}

impl EdgeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate segment, combining it with an existing one
    ///
    /// A road stays one-way only if every contribution is one-way; a sidewalk
    /// side is present if any contribution has it. Returns `true` when the
    /// candidate was merged into an existing road.
    pub fn insert(&mut self, candidate: Road) -> bool {
        match self.roads.entry(candidate.key()) {
            Entry::Occupied(mut slot) => {
                let road = slot.get_mut();
                road.directed &= candidate.directed;
                road.sidewalks.0 |= candidate.sidewalks.0;
                road.sidewalks.1 |= candidate.sidewalks.1;
                self.merged += 1;
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(candidate);
                false
            }
        }
    }

    pub fn get(&self, p1: NodeId, p2: NodeId) -> Option<&Road> {
        self.roads.get(&(p1, p2))
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    /// Number of candidates folded into an existing road
    pub fn merged(&self) -> usize {
        self.merged
    }

    /// Hand the resolved roads over, in first-insertion order
    pub fn into_roads(self) -> Vec<Road> {
        self.roads.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(directed: bool, sidewalks: (bool, bool)) -> Road {
        Road::segment(NodeId::Osm(1), NodeId::Osm(2), directed, sidewalks)
    }

    #[test]
    fn test_combines_flags() {
        let mut table = EdgeTable::new();
        assert!(!table.insert(candidate(true, (true, false))));
        assert!(table.insert(candidate(false, (false, true))));

        let road = table.get(NodeId::Osm(1), NodeId::Osm(2)).unwrap();
        assert!(!road.directed);
        assert_eq!(road.sidewalks, (true, true));
        assert_eq!(table.len(), 1);
        assert_eq!(table.merged(), 1);
    }

    #[test]
    fn test_combination_is_order_independent() {
        let mut forward = EdgeTable::new();
        forward.insert(candidate(true, (true, false)));
        forward.insert(candidate(false, (false, true)));

        let mut backward = EdgeTable::new();
        backward.insert(candidate(false, (false, true)));
        backward.insert(candidate(true, (true, false)));

        assert_eq!(forward.into_roads(), backward.into_roads());
    }

    #[test]
    fn test_one_way_survives_only_when_unanimous() {
        let mut table = EdgeTable::new();
        table.insert(candidate(true, (false, false)));
        table.insert(candidate(true, (false, false)));
        assert!(table.get(NodeId::Osm(1), NodeId::Osm(2)).unwrap().directed);
    }

    #[test]
    fn test_reverse_traversal_is_a_different_key() {
        let mut table = EdgeTable::new();
        table.insert(Road::segment(NodeId::Osm(1), NodeId::Osm(2), false, (false, false)));
        table.insert(Road::segment(NodeId::Osm(2), NodeId::Osm(1), false, (false, false)));

        assert_eq!(table.len(), 2);
        assert_eq!(table.merged(), 0);
    }
}
