//! Great-circle distance annotation

use geo::{Distance, Haversine, Point};

use crate::core::error::{Error, Result};
use crate::core::graph::{Coordinates, NodeId, NodeTable, Road};
use crate::core::resolve::EdgeTable;

/// Haversine distance in metres between two `(lon, lat)` positions
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}

fn lookup(coords: &NodeTable, id: &NodeId) -> Result<Coordinates> {
    coords
        .get(id)
        .copied()
        .ok_or_else(|| Error::MissingNode(id.clone()))
}

/// Attach the endpoint-to-endpoint length to every resolved road
///
/// Must run before simplification: contraction only sums these lengths and
/// never looks at intermediate coordinates again.
pub fn annotate(edges: EdgeTable, coords: &NodeTable) -> Result<Vec<Road>> {
    edges
        .into_roads()
        .into_iter()
        .map(|mut road| {
            road.distance = haversine_distance(lookup(coords, &road.p1)?, lookup(coords, &road.p2)?);
            Ok(road)
        })
        .collect()
}
