//! Degree-2 chain contraction
//!
//! A node with exactly two incident roads is an interior point of a longer
//! road when both roads agree on direction and (at least partially) on
//! sidewalks. The two roads are replaced by one whose length is their sum and
//! whose `discriminator` is the absorbed node. Passes over all nodes repeat
//! until a pass contracts nothing, since a contraction can turn a neighbour
//! into a new candidate.
//!
//! Known limitations, kept on purpose for output compatibility:
//! - only the most recently absorbed node survives as discriminator, so
//!   chains of three or more segments cannot be fully reconstructed;
//! - self-loops and parallel roads between the same endpoints are not
//!   special-cased and may be combined like any other pair.

use indexmap::{IndexMap, IndexSet};

use crate::core::graph::{NodeId, Road};

/// Counters reported after simplification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyStats {
    /// Full passes over the node index, including the final idle one
    pub passes: usize,
    pub contractions: usize,
    pub roads_before: usize,
    pub roads_after: usize,
}

/// Whether two roads meeting at a node may be merged
///
/// Direction must match. Sidewalks may differ on one side but not on both.
pub fn is_eligible(e1: &Road, e2: &Road) -> bool {
    e1.directed == e2.directed
        && !(e1.sidewalks.0 != e2.sidewalks.0 && e1.sidewalks.1 != e2.sidewalks.1)
}

/// Merge `e1` and `e2` across their shared node `n`
///
/// The replacement runs between the two far ends and inherits `e1`'s
/// direction and sidewalks. Directed roads meeting head-to-head or
/// tail-to-tail never merge.
pub fn contract(e1: &Road, e2: &Road, n: &NodeId) -> Option<Road> {
    if !is_eligible(e1, e2) {
        return None;
    }

    let (p1, p2) = if &e1.p2 == n && &e2.p1 == n {
        (&e1.p1, &e2.p2)
    } else if &e2.p2 == n && &e1.p1 == n {
        (&e2.p1, &e1.p2)
    } else if &e1.p1 == n && &e2.p1 == n && !e1.directed {
        (&e1.p2, &e2.p2)
    } else if &e1.p2 == n && &e2.p2 == n && !e1.directed {
        (&e1.p1, &e2.p1)
    } else {
        return None;
    };

    Some(Road {
        p1: p1.clone(),
        p2: p2.clone(),
        directed: e1.directed,
        sidewalks: e1.sidewalks,
        distance: e1.distance + e2.distance,
        discriminator: Some(n.clone()),
    })
}

/// Contraction state: road slots plus the node -> incident slots index
///
/// Contracted roads leave an empty slot behind; replacements are appended.
pub struct Simplifier {
    slots: Vec<Option<Road>>,
    incidence: IndexMap<NodeId, IndexSet<usize>>,
    stats: SimplifyStats,
}

impl Simplifier {
    /// Take ownership of the annotated roads and index them
    pub fn new(roads: Vec<Road>) -> Self {
        let mut simplifier = Self {
            slots: Vec::with_capacity(roads.len()),
            incidence: IndexMap::new(),
            stats: SimplifyStats {
                roads_before: roads.len(),
                ..SimplifyStats::default()
            },
        };
        for road in roads {
            simplifier.push(road);
        }
        simplifier
    }

    fn push(&mut self, road: Road) -> usize {
        let slot = self.slots.len();
        self.incidence.entry(road.p1.clone()).or_default().insert(slot);
        self.incidence.entry(road.p2.clone()).or_default().insert(slot);
        self.slots.push(Some(road));
        slot
    }

    fn take(&mut self, slot: usize) -> Option<Road> {
        let road = self.slots.get_mut(slot)?.take()?;
        for end in [&road.p1, &road.p2] {
            if let Some(incident) = self.incidence.get_mut(end) {
                incident.shift_remove(&slot);
            }
        }
        Some(road)
    }

    /// Distinct roads incident to `n`, in index order
    #[cfg(test)]
    fn incident(&self, n: &NodeId) -> impl Iterator<Item = &Road> + '_ {
        self.incidence
            .get(n)
            .into_iter()
            .flatten()
            .filter_map(|&slot| self.slots[slot].as_ref())
    }

    /// Try to absorb `n`, returning whether a contraction happened
    fn contract_at(&mut self, n: &NodeId) -> bool {
        let (s1, s2) = match self.incidence.get(n) {
            Some(incident) if incident.len() == 2 => (incident[0], incident[1]),
            _ => return false,
        };

        let merged = match (&self.slots[s1], &self.slots[s2]) {
            (Some(e1), Some(e2)) => contract(e1, e2, n).inspect(|m| {
                log::trace!(
                    "Contracting {n}: {}-{} + {}-{} -> {}-{}",
                    e1.p1,
                    e1.p2,
                    e2.p1,
                    e2.p2,
                    m.p1,
                    m.p2
                );
            }),
            _ => None,
        };
        let Some(merged) = merged else {
            return false;
        };

        self.take(s1);
        self.take(s2);
        self.push(merged);
        true
    }

    /// One scan over every indexed node
    fn pass(&mut self) -> usize {
        let nodes: Vec<NodeId> = self.incidence.keys().cloned().collect();
        nodes.iter().filter(|n| self.contract_at(n)).count()
    }

    /// Contract until a full pass changes nothing
    ///
    /// Every contraction removes one road, so at most `roads` contractions
    /// can happen and the loop always terminates.
    pub fn run(mut self) -> (Vec<Road>, SimplifyStats) {
        loop {
            self.stats.passes += 1;
            let contracted = self.pass();
            log::debug!(
                "Simplification pass {}: {} contractions",
                self.stats.passes,
                contracted
            );
            self.stats.contractions += contracted;
            if contracted == 0 {
                break;
            }
        }

        let roads: Vec<Road> = self.slots.into_iter().flatten().collect();
        self.stats.roads_after = roads.len();
        (roads, self.stats)
    }
}

/// Contract degree-2 chains of `roads` to a fixed point
pub fn simplify(roads: Vec<Road>) -> (Vec<Road>, SimplifyStats) {
    Simplifier::new(roads).run()
}
