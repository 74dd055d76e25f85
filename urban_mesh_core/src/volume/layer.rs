use serde::{Deserialize, Serialize};

use crate::errors::StageResult;
use crate::geom::Point3;
use crate::mesh2d::{Mesh2D, VertexMarker};

use super::VolumeMesh;

/// Per-vertex marker of a layered volume mesh: the horizontal class
/// inherited from the `Mesh2D` vertex it was extruded from, its layer
/// index, and whether it sits on the top boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeVertexMarker {
    pub horizontal: VertexMarker,
    pub layer: usize,
    pub is_top: bool,
}

/// Splits a prism between two triangle layers into 3 tetrahedra, keyed on
/// the *global* vertex index ordering of the base triangle so the diagonal
/// choice on any shared rectangular side face agrees between the two
/// prisms that border it, keeping the diagonal consistent across shared faces.
fn split_prism(base: [usize; 3], top: [usize; 3]) -> [[usize; 4]; 3] {
    let mut order = [0usize, 1, 2];
    order.sort_by_key(|&i| base[i]);
    let v = [base[order[0]], base[order[1]], base[order[2]]];
    let w = [top[order[0]], top[order[1]], top[order[2]]];

    [[v[0], v[1], v[2], w[2]], [v[0], v[1], w[2], w[1]], [v[0], w[1], w[0], w[2]]]
}

fn fix_orientation(mesh: &VolumeMesh, mut tet: [usize; 4]) -> [usize; 4] {
    if mesh.signed_volume(tet) < 0.0 {
        tet.swap(2, 3);
    }
    tet
}

/// Extrudes `mesh` into `L = max(1, round(domain_height / target_thickness))`
/// layers up to `domain_height`. Layer 0 inherits `mesh`'s
/// vertex markers; the last layer is marked `top`.
pub fn layer_mesh(mesh: &Mesh2D, domain_height: f64, target_thickness: f64) -> StageResult<VolumeMesh> {
    let layers = ((domain_height / target_thickness).round() as i64).max(1) as usize;
    let n = mesh.vertices.len();

    let mut vertices = Vec::with_capacity(n * (layers + 1));
    let mut markers = Vec::with_capacity(n * (layers + 1));

    for k in 0..=layers {
        let z = domain_height * (k as f64) / (layers as f64);
        for (i, p) in mesh.vertices.iter().enumerate() {
            vertices.push(Point3::new(p.x, p.y, z));
            markers.push(VolumeVertexMarker { horizontal: mesh.markers[i], layer: k, is_top: k == layers });
        }
    }

    let mut volume = VolumeMesh::new(vertices, Vec::new(), markers);
    let mut tetrahedra = Vec::with_capacity(mesh.triangles.len() * layers * 3);

    for k in 0..layers {
        let base_offset = k * n;
        let top_offset = (k + 1) * n;
        for tri in &mesh.triangles {
            let base = [tri[0] + base_offset, tri[1] + base_offset, tri[2] + base_offset];
            let top = [tri[0] + top_offset, tri[1] + top_offset, tri[2] + top_offset];
            for tet in split_prism(base, top) {
                tetrahedra.push(fix_orientation(&volume, tet));
            }
        }
    }

    volume.tetrahedra = tetrahedra;
    StageResult::ok(volume)
}

#[cfg(test)]
mod tests {
    use crate::geom::Point2;

    use super::*;

    fn single_triangle_mesh() -> Mesh2D {
        Mesh2D::new(
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
            vec![[0, 1, 2]],
            vec![VertexMarker::Ground; 3],
        )
    }

    #[test]
    fn layer_count_matches_rounding_rule() {
        let mesh = single_triangle_mesh();
        let out = layer_mesh(&mesh, 100.0, 10.0);
        assert_eq!(out.value.vertices.len(), 3 * 11);
    }

    #[test]
    fn every_tetrahedron_is_positively_oriented() {
        let mesh = single_triangle_mesh();
        let out = layer_mesh(&mesh, 30.0, 10.0);
        for &tet in &out.value.tetrahedra {
            assert!(out.value.signed_volume(tet) > 0.0);
        }
    }

    #[test]
    fn top_layer_is_marked_top() {
        let mesh = single_triangle_mesh();
        let out = layer_mesh(&mesh, 30.0, 10.0);
        let n = mesh.vertices.len();
        let layers = out.value.vertices.len() / n - 1;
        for marker in &out.value.markers[layers * n..] {
            assert!(marker.is_top);
        }
    }

    #[test]
    fn z_extent_spans_full_domain_height_per_column() {
        let mesh = single_triangle_mesh();
        let out = layer_mesh(&mesh, 25.0, 10.0);
        let zmax = out.value.vertices.iter().map(|p| p.z).fold(f64::MIN, f64::max);
        let zmin = out.value.vertices.iter().map(|p| p.z).fold(f64::MAX, f64::min);
        assert!((zmin - 0.0).abs() < 1e-9);
        assert!((zmax - 25.0).abs() < 1e-9);
    }
}
