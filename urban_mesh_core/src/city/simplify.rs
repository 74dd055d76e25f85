use geo::BooleanOps;
use log::{debug, info};
use partitions::PartitionVec;

use crate::errors::StageResult;
use crate::geom::{dist, Aabb2, Point2, Polygon2D};

use super::{Building, City};

fn clip_to_bounds(poly: &Polygon2D, bounds: Aabb2) -> Option<Polygon2D> {
    let bbox = Polygon2D::new(bounds.corners().to_vec(), vec![]).to_geo();
    let clipped = poly.to_geo().intersection(&bbox);
    let biggest = clipped
        .0
        .into_iter()
        .max_by(|a, b| Polygon2D::from_geo(a).area().total_cmp(&Polygon2D::from_geo(b).area()))?;
    let result = Polygon2D::from_geo(&biggest);
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

fn min_ring_distance(a: &Polygon2D, b: &Polygon2D) -> f64 {
    let mut best = f64::INFINITY;
    for (p0, p1) in a.edges() {
        for (q0, q1) in b.edges() {
            best = best.min(segment_distance(p0, p1, q0, q1));
        }
    }
    best
}

fn point_segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < 1e-20 {
        return dist(p, a);
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    dist(p, a + ab * t)
}

fn segment_distance(p0: Point2, p1: Point2, q0: Point2, q1: Point2) -> f64 {
    use crate::geom::segments_intersect;
    if segments_intersect(p0, p1, q0, q1) {
        return 0.0;
    }
    [
        point_segment_distance(p0, q0, q1),
        point_segment_distance(p1, q0, q1),
        point_segment_distance(q0, p0, p1),
        point_segment_distance(q1, p0, p1),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}

fn union_polygons(polys: &[Polygon2D]) -> Polygon2D {
    let mut acc = polys[0].to_geo();
    for poly in &polys[1..] {
        let merged = acc.union(&poly.to_geo());
        acc = merged
            .0
            .into_iter()
            .max_by(|a, b| Polygon2D::from_geo(a).area().total_cmp(&Polygon2D::from_geo(b).area()))
            .unwrap_or(acc);
    }
    Polygon2D::from_geo(&acc)
}

/// Merges buildings whose clipped footprints are closer than
/// `min_building_distance` into one building per connected component.
/// Components are found with a union-find over all-pairs distances, scanned
/// in input order for determinism.
fn merge_close_buildings(buildings: Vec<Building>, min_building_distance: f64) -> Vec<Building> {
    let n = buildings.len();
    if n == 0 {
        return buildings;
    }

    let mut uf: PartitionVec<()> = PartitionVec::with_capacity(n);
    for _ in 0..n {
        uf.push(());
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if min_ring_distance(&buildings[i].footprint, &buildings[j].footprint) < min_building_distance {
                uf.union(i, j);
            }
        }
    }

    let mut seen_roots = Vec::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = uf.set(i).next().map(|(idx, _)| idx).unwrap_or(i);
        let group_idx = seen_roots.iter().position(|&r| r == root).unwrap_or_else(|| {
            seen_roots.push(root);
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group_idx].push(i);
    }

    groups
        .into_iter()
        .map(|members| {
            if members.len() == 1 {
                buildings[members[0]].clone()
            } else {
                debug!("merging {} close buildings", members.len());
                let footprints: Vec<Polygon2D> = members.iter().map(|&i| buildings[i].footprint.clone()).collect();
                let merged_footprint = union_polygons(&footprints);

                let total_area: f64 = members.iter().map(|&i| buildings[i].footprint.area()).sum();
                let weighted = |f: &dyn Fn(&Building) -> f64| -> f64 {
                    if total_area <= 0.0 {
                        members.iter().map(|&i| f(&buildings[i])).sum::<f64>() / members.len() as f64
                    } else {
                        members
                            .iter()
                            .map(|&i| f(&buildings[i]) * buildings[i].footprint.area())
                            .sum::<f64>()
                            / total_area
                    }
                };

                let ids: Vec<&str> = members.iter().map(|&i| buildings[i].id.as_str()).collect();
                let mut merged = Building::new(ids.join("+"), merged_footprint);
                merged.height = weighted(&|b| b.height);
                merged.ground_level = weighted(&|b| b.ground_level);
                merged
            }
        })
        .collect()
}

fn snap_ring(ring: &[Point2], min_vertex_distance: f64) -> Vec<Point2> {
    if ring.len() < 3 {
        return ring.to_vec();
    }
    let mut out: Vec<Point2> = Vec::with_capacity(ring.len());
    let mut i = 0;
    while i < ring.len() {
        let cur = ring[i];
        let next = ring[(i + 1) % ring.len()];
        if (cur - next).norm() < min_vertex_distance && out.len() + 1 < ring.len() {
            let mid = nalgebra::center(&cur, &next);
            out.push(mid);
            i += 2;
        } else {
            out.push(cur);
            i += 1;
        }
    }
    out
}

fn snap_polygon(poly: &Polygon2D, min_vertex_distance: f64) -> Option<Polygon2D> {
    let outer = snap_ring(&poly.outer, min_vertex_distance);
    if outer.len() < 3 {
        return None;
    }
    let holes: Vec<Vec<Point2>> = poly
        .holes
        .iter()
        .map(|h| snap_ring(h, min_vertex_distance))
        .filter(|h| h.len() >= 3)
        .collect();
    Some(Polygon2D::new(outer, holes))
}

/// Runs the four-step city simplifier in order: clip, merge close
/// buildings, drop small buildings, snap close vertices.
pub fn simplify_city(city: &City, bounds: Aabb2, min_building_distance: f64, min_vertex_distance: f64, min_building_size: f64) -> StageResult<City> {
    let clipped: Vec<Building> = city
        .buildings
        .iter()
        .filter_map(|b| {
            clip_to_bounds(&b.footprint, bounds).map(|footprint| {
                let mut nb = b.clone();
                nb.footprint = footprint;
                nb
            })
        })
        .collect();

    info!("simplify_city: {} of {} buildings survive clipping", clipped.len(), city.buildings.len());

    let merged = merge_close_buildings(clipped, min_building_distance);

    let sized: Vec<Building> = merged.into_iter().filter(|b| b.footprint.area() >= min_building_size).collect();

    let snapped: Vec<Building> = sized
        .into_iter()
        .filter_map(|mut b| {
            snap_polygon(&b.footprint, min_vertex_distance).map(|footprint| {
                b.footprint = footprint;
                b
            })
        })
        .collect();

    let mut simplified = city.clone();
    simplified.buildings = snapped;
    simplified.bounds = bounds;
    StageResult::ok(simplified)
}
