/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Trim & boundary extractor: drops tetrahedra fully inside a
//! building below its roof, renumbers vertices, and extracts the outer
//! triangular boundary with outward normals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::city::City;
use crate::errors::StageResult;
use crate::geom::{point_in_polygon, Point2, Point3, PointLocation};
use crate::mesh2d::VertexMarker;
use crate::volume::{VolumeMesh, VolumeVertexMarker};

/// A 3D triangulated boundary surface, per-triangle outward normals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[usize; 3]>,
    pub normals: Vec<Point3>,
    pub markers: Vec<VolumeVertexMarker>,
}

fn fully_inside_building_below_roof(mesh: &VolumeMesh, tet: [usize; 4], city: &City) -> bool {
    let verts: [Point3; 4] = [mesh.vertices[tet[0]], mesh.vertices[tet[1]], mesh.vertices[tet[2]], mesh.vertices[tet[3]]];

    for building in &city.buildings {
        let roof_height = building.ground_level + building.height;
        let all_strictly_inside = verts.iter().all(|p| {
            matches!(point_in_polygon(&building.footprint, Point2::new(p.x, p.y), 1e-9), PointLocation::Inside)
        });
        if !all_strictly_inside {
            continue;
        }
        let zmax = verts.iter().map(|p| p.z).fold(f64::MIN, f64::max);
        if zmax <= roof_height {
            return true;
        }
    }
    false
}

/// Removes tetrahedra wholly inside a building's footprint below its roof
/// height, then renumbers vertices to drop orphans left behind. Vertices
/// exactly on a footprint edge are never trimmed away,
/// since `point_in_polygon` classifies them as `OnBoundary`, not `Inside`.
pub fn trim(mesh: &VolumeMesh, city: &City) -> StageResult<VolumeMesh> {
    let kept_tets: Vec<[usize; 4]> = mesh
        .tetrahedra
        .iter()
        .copied()
        .filter(|&tet| !fully_inside_building_below_roof(mesh, tet, city))
        .collect();

    let mut used = vec![false; mesh.vertices.len()];
    for tet in &kept_tets {
        for &v in tet {
            used[v] = true;
        }
    }

    let mut remap = vec![usize::MAX; mesh.vertices.len()];
    let mut vertices = Vec::new();
    let mut markers = Vec::new();
    for (old, &is_used) in used.iter().enumerate() {
        if is_used {
            remap[old] = vertices.len();
            vertices.push(mesh.vertices[old]);
            markers.push(mesh.markers[old]);
        }
    }

    let tetrahedra: Vec<[usize; 4]> = kept_tets.iter().map(|tet| tet.map(|v| remap[v])).collect();

    StageResult::ok(VolumeMesh::new(vertices, tetrahedra, markers))
}

fn face_key(a: usize, b: usize, c: usize) -> (usize, usize, usize) {
    let mut v = [a, b, c];
    v.sort_unstable();
    (v[0], v[1], v[2])
}

/// The four faces of a tetrahedron, each paired with the index of the
/// tet's one vertex *not* on that face (needed to orient the normal
/// outward).
fn tet_faces(tet: [usize; 4]) -> [([usize; 3], usize); 4] {
    [
        ([tet[1], tet[2], tet[3]], tet[0]),
        ([tet[0], tet[2], tet[3]], tet[1]),
        ([tet[0], tet[1], tet[3]], tet[2]),
        ([tet[0], tet[1], tet[2]], tet[3]),
    ]
}

fn outward_normal(mesh: &VolumeMesh, face: [usize; 3], opposite: usize) -> Point3 {
    let a = mesh.vertices[face[0]];
    let b = mesh.vertices[face[1]];
    let c = mesh.vertices[face[2]];
    let n = (b - a).cross(&(c - a));
    let to_opposite = mesh.vertices[opposite] - a;
    let n = if n.dot(&to_opposite) > 0.0 { -n } else { n };
    let len = n.norm();
    if len < 1e-20 {
        Point3::new(0.0, 0.0, 0.0)
    } else {
        Point3::new(n.x / len, n.y / len, n.z / len)
    }
}

/// Computes the boundary surface: faces appearing in exactly one
/// tetrahedron, with outward normals.
pub fn boundary(mesh: &VolumeMesh) -> SurfaceMesh {
    let mut counts: HashMap<(usize, usize, usize), Vec<([usize; 3], usize)>> = HashMap::new();

    for &tet in &mesh.tetrahedra {
        for (face, opposite) in tet_faces(tet) {
            counts.entry(face_key(face[0], face[1], face[2])).or_default().push((face, opposite));
        }
    }

    let mut triangles = Vec::new();
    let mut normals = Vec::new();
    for occurrences in counts.values() {
        if occurrences.len() == 1 {
            let (face, opposite) = occurrences[0];
            triangles.push(face);
            normals.push(outward_normal(mesh, face, opposite));
        }
    }

    SurfaceMesh {
        vertices: mesh.vertices.clone(),
        triangles,
        normals,
        markers: mesh.markers.clone(),
    }
}

/// Keeps only faces whose three vertices are all `ground` or
/// `building-halo` — i.e. drops anything touching the `top` boundary.
pub fn open_surface(surface: &SurfaceMesh) -> SurfaceMesh {
    let mut triangles = Vec::new();
    let mut normals = Vec::new();

    for (tri, normal) in surface.triangles.iter().zip(surface.normals.iter()) {
        let all_ground_or_halo = tri.iter().all(|&v| {
            !surface.markers[v].is_top
                && matches!(surface.markers[v].horizontal, VertexMarker::Ground | VertexMarker::BuildingHalo)
        });
        if all_ground_or_halo {
            triangles.push(*tri);
            normals.push(*normal);
        }
    }

    SurfaceMesh {
        vertices: surface.vertices.clone(),
        triangles,
        normals,
        markers: surface.markers.clone(),
    }
}
