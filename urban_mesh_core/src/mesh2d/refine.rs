use spade::{Point2 as SpadePoint, Triangulation};

use crate::errors::MeshError;
use crate::geom::Point2;

use super::delaunay::Cdt;

/// Circumradius-to-shortest-edge quality bound a triangle must satisfy.
const QUALITY_RATIO: f64 = 1.4;
const MAX_REFINE_ITERATIONS: usize = 50;

fn circumcenter_and_radius(a: Point2, b: Point2, c: Point2) -> Option<(Point2, f64)> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let center = Point2::new(ux, uy);
    Some((center, (center - a).norm()))
}

fn shortest_edge(a: Point2, b: Point2, c: Point2) -> f64 {
    (b - a).norm().min((c - b).norm()).min((a - c).norm())
}

fn triangle_area(a: Point2, b: Point2, c: Point2) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
}

/// Inserts Steiner points at circumcenters of triangles violating the
/// quality bound or the `h^2` area bound, bounded by an iteration cap.
/// Skips a triangle whose circumcenter cannot be
/// computed (collinear vertices) with a `NumericDegenerate` warning rather
/// than failing the whole stage.
pub(super) fn refine(cdt: &mut Cdt, target_edge_length: f64, warnings: &mut Vec<MeshError>) {
    let max_area = target_edge_length * target_edge_length;

    for _ in 0..MAX_REFINE_ITERATIONS {
        let mut to_insert = Vec::new();

        for face in cdt.inner_faces() {
            let verts = face.vertices();
            let p: [Point2; 3] = [
                Point2::new(verts[0].position().x, verts[0].position().y),
                Point2::new(verts[1].position().x, verts[1].position().y),
                Point2::new(verts[2].position().x, verts[2].position().y),
            ];

            let area = triangle_area(p[0], p[1], p[2]);
            let shortest = shortest_edge(p[0], p[1], p[2]);

            match circumcenter_and_radius(p[0], p[1], p[2]) {
                Some((center, radius)) => {
                    let bad_ratio = shortest > 1e-9 && radius / shortest > QUALITY_RATIO;
                    let bad_area = area > max_area;
                    if bad_ratio || bad_area {
                        to_insert.push(center);
                    }
                }
                None => {
                    warnings.push(MeshError::NumericDegenerate(
                        "skipped refinement of a collinear triangle".into(),
                    ));
                }
            }
        }

        if to_insert.is_empty() {
            break;
        }

        for p in to_insert {
            let _ = cdt.insert(SpadePoint::new(p.x, p.y));
        }
    }
}
