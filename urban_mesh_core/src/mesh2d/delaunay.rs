use spade::{ConstrainedDelaunayTriangulation, Point2 as SpadePoint, Triangulation};

use crate::city::City;
use crate::errors::{MeshError, StageResult};
use crate::geom::{Aabb2, Point2};

use super::markers::classify_vertex;
use super::refine::refine;
use super::Mesh2D;

pub(super) type Cdt = ConstrainedDelaunayTriangulation<SpadePoint<f64>>;

fn to_spade(p: Point2) -> SpadePoint<f64> {
    SpadePoint::new(p.x, p.y)
}

fn from_spade(p: SpadePoint<f64>) -> Point2 {
    Point2::new(p.x, p.y)
}

/// Seeds the AABB boundary with vertices at spacing roughly `h`, corners
/// always included.
fn seed_boundary(bounds: Aabb2, h: f64) -> Vec<Point2> {
    let mut pts = Vec::new();
    let corners = bounds.corners();
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let len = (b - a).norm();
        let steps = (len / h).round().max(1.0) as usize;
        for s in 0..steps {
            let t = s as f64 / steps as f64;
            pts.push(a + (b - a) * t);
        }
    }
    pts
}

/// Builds the constrained Delaunay triangulation of `bounds`, with every
/// footprint ring of `city` inserted as constraint edges, then refines it
/// and classifies every vertex.
pub fn build_ground_mesh(city: &City, bounds: Aabb2, mesh_resolution: f64) -> StageResult<Mesh2D> {
    let mut cdt: Cdt = ConstrainedDelaunayTriangulation::new();
    let mut warnings = Vec::new();

    for p in seed_boundary(bounds, mesh_resolution) {
        let _ = cdt.insert(to_spade(p));
    }

    for building in &city.buildings {
        for ring in std::iter::once(&building.footprint.outer).chain(building.footprint.holes.iter()) {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            let handles: Vec<_> = ring
                .iter()
                .filter_map(|p| cdt.insert(to_spade(*p)).ok())
                .collect();
            if handles.len() != n {
                warnings.push(MeshError::NumericDegenerate(format!(
                    "building {} has a degenerate ring vertex skipped during insertion",
                    building.id
                )));
                continue;
            }
            for i in 0..n {
                if !cdt.add_constraint(handles[i], handles[(i + 1) % n]) {
                    // Edge already present as a constraint (shared wall between
                    // adjacent buildings); not an error.
                }
            }
        }
    }

    refine(&mut cdt, mesh_resolution, &mut warnings);

    let vertices: Vec<Point2> = cdt.vertices().map(|v| from_spade(*v.data())).collect();
    let index_of: std::collections::HashMap<_, _> = cdt
        .vertices()
        .enumerate()
        .map(|(i, v)| (v.fix(), i))
        .collect();

    let triangles: Vec<[usize; 3]> = cdt
        .inner_faces()
        .map(|face| {
            let verts = face.vertices();
            [
                index_of[&verts[0].fix()],
                index_of[&verts[1].fix()],
                index_of[&verts[2].fix()],
            ]
        })
        .collect();

    let markers = vertices.iter().map(|p| classify_vertex(city, *p)).collect();

    StageResult::with_warnings(Mesh2D::new(vertices, triangles, markers), warnings)
}

#[cfg(test)]
mod tests {
    use crate::geom::{Point2 as P2};

    use super::*;

    #[test]
    fn empty_city_triangulates_the_aabb_only() {
        let city = City::new(Vec::new(), Aabb2::new(0.0, 0.0, 40.0, 40.0), P2::new(0.0, 0.0));
        let out = build_ground_mesh(&city, city.bounds, 10.0);
        assert!(!out.value.triangles.is_empty());
        for tri in &out.value.triangles {
            for &vi in tri {
                assert!(out.value.vertices[vi].x >= -1e-6 && out.value.vertices[vi].x <= 40.0 + 1e-6);
            }
        }
    }

    #[test]
    fn footprint_edges_survive_as_constraints() {
        use crate::city::Building;
        use crate::geom::Polygon2D;

        let b = Building::new(
            "a",
            Polygon2D::new(
                vec![P2::new(10.0, 10.0), P2::new(20.0, 10.0), P2::new(20.0, 20.0), P2::new(10.0, 20.0)],
                vec![],
            ),
        );
        let city = City::new(vec![b], Aabb2::new(0.0, 0.0, 40.0, 40.0), P2::new(0.0, 0.0));
        let out = build_ground_mesh(&city, city.bounds, 10.0);

        let edges = out.value.edge_counts();
        let has_edge = |a: P2, b: P2| {
            let ai = out.value.vertices.iter().position(|v| (*v - a).norm() < 1e-6);
            let bi = out.value.vertices.iter().position(|v| (*v - b).norm() < 1e-6);
            match (ai, bi) {
                (Some(ai), Some(bi)) => {
                    let key = if ai < bi { (ai, bi) } else { (bi, ai) };
                    edges.contains_key(&key)
                }
                _ => false,
            }
        };
        assert!(has_edge(P2::new(10.0, 10.0), P2::new(20.0, 10.0)));
    }
}
