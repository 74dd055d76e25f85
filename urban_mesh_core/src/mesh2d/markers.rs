//! Per-vertex and per-triangle classification against building footprints.

use serde::{Deserialize, Serialize};

use crate::city::City;
use crate::geom::{point_in_polygon, Point2, PointLocation};

/// A vertex's class relative to the city's buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexMarker {
    Domain,
    Ground,
    BuildingHalo,
    BuildingInterior,
}

/// Classifies a single point against every building footprint: strictly
/// inside one is `building-interior`, on an edge is `building-halo`,
/// otherwise `ground`. `Domain` is reserved for mesh boundary seeding and
/// is never produced here.
pub fn classify_vertex(city: &City, p: Point2) -> VertexMarker {
    for building in &city.buildings {
        match point_in_polygon(&building.footprint, p, 1e-9) {
            PointLocation::Inside => return VertexMarker::BuildingInterior,
            PointLocation::OnBoundary => return VertexMarker::BuildingHalo,
            PointLocation::Outside => continue,
        }
    }
    VertexMarker::Ground
}

/// The majority vertex class among a triangle's three vertices; ties favour
/// `BuildingInterior` > `BuildingHalo` > `Ground` > `Domain`, the order
/// most conservative for downstream trimming.
pub fn majority_marker(markers: [VertexMarker; 3]) -> VertexMarker {
    let rank = |m: VertexMarker| -> u8 {
        match m {
            VertexMarker::BuildingInterior => 3,
            VertexMarker::BuildingHalo => 2,
            VertexMarker::Ground => 1,
            VertexMarker::Domain => 0,
        }
    };

    let mut counts: Vec<(VertexMarker, usize)> = Vec::new();
    for m in markers {
        match counts.iter_mut().find(|(existing, _)| *existing == m) {
            Some((_, count)) => *count += 1,
            None => counts.push((m, 1)),
        }
    }

    counts
        .into_iter()
        .max_by_key(|(m, count)| (*count, rank(*m)))
        .map(|(m, _)| m)
        .unwrap_or(VertexMarker::Domain)
}
