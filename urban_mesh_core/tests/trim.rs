/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! A single 10x10x10 building in a 40x40x40 domain —
//! after trim, no tetrahedron has all four vertices strictly inside the
//! footprint below roof height.

use urban_mesh_core::city::{Building, City};
use urban_mesh_core::geom::{Aabb2, Point2, Polygon2D};
use urban_mesh_core::mesh2d::{Mesh2D, VertexMarker};
use urban_mesh_core::trim::trim;
use urban_mesh_core::volume::layer_mesh;

fn footprint_10x10_at(cx: f64, cy: f64) -> Polygon2D {
    let h = 5.0;
    Polygon2D::new(
        vec![Point2::new(cx - h, cy - h), Point2::new(cx + h, cy - h), Point2::new(cx + h, cy + h), Point2::new(cx - h, cy + h)],
        vec![],
    )
}

#[test]
fn trim_drops_every_tetrahedron_wholly_under_the_roof() {
    let mut building = Building::new("b", footprint_10x10_at(20.0, 20.0));
    building.ground_level = 0.0;
    building.height = 10.0;

    // A fine grid of vertices covering the footprint interior and a ring
    // just outside it, triangulated as a simple fan per cell.
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    let mut markers = Vec::new();
    let n = 8;
    let lo = 15.0;
    let hi = 25.0;
    let step = (hi - lo) / n as f64;
    for j in 0..=n {
        for i in 0..=n {
            let x = lo + i as f64 * step;
            let y = lo + j as f64 * step;
            vertices.push(Point2::new(x, y));
            let strictly_inside = x > 15.0 + 1e-9 && x < 25.0 - 1e-9 && y > 15.0 + 1e-9 && y < 25.0 - 1e-9;
            markers.push(if strictly_inside { VertexMarker::BuildingInterior } else { VertexMarker::BuildingHalo });
        }
    }
    let idx = |i: usize, j: usize| j * (n + 1) + i;
    for j in 0..n {
        for i in 0..n {
            triangles.push([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
            triangles.push([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        }
    }
    let mesh2d = Mesh2D::new(vertices, triangles, markers);

    let city = City::new(vec![building], Aabb2::new(0.0, 0.0, 40.0, 40.0), Point2::new(0.0, 0.0));
    let layered = layer_mesh(&mesh2d, 40.0, 5.0).value;
    assert!(!layered.tetrahedra.is_empty());

    let trimmed = trim(&layered, &city);
    assert!(trimmed.value.tetrahedra.len() < layered.tetrahedra.len());

    for &tet in &trimmed.value.tetrahedra {
        let verts: [urban_mesh_core::geom::Point3; 4] = [
            trimmed.value.vertices[tet[0]],
            trimmed.value.vertices[tet[1]],
            trimmed.value.vertices[tet[2]],
            trimmed.value.vertices[tet[3]],
        ];
        let roof_height = 10.0;
        let all_strictly_inside = verts.iter().all(|p| p.x > 15.0 + 1e-9 && p.x < 25.0 - 1e-9 && p.y > 15.0 + 1e-9 && p.y < 25.0 - 1e-9);
        let zmax = verts.iter().map(|p| p.z).fold(f64::MIN, f64::max);
        assert!(!(all_strictly_inside && zmax <= roof_height));
    }
}
