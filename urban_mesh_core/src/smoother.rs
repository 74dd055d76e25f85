//! Laplacian mesh smoother: lifts ground and, optionally,
//! building-roof nodes to their target heights by relaxing every other
//! vertex to the mean of its 1-ring neighbours.

use crate::city::City;
use crate::errors::{MeshError, StageResult};
use crate::geom::{point_in_polygon, Point2, PointLocation};
use crate::mesh2d::VertexMarker;
use crate::raster::GridField2D;
use crate::volume::VolumeMesh;

/// CSR adjacency over a `VolumeMesh`'s vertex graph, built once from its
/// tetrahedra — offsets + neighbours, no per-vertex `Vec`s.
pub struct AdjacencyGraph {
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
}

impl AdjacencyGraph {
    pub fn build(mesh: &VolumeMesh) -> Self {
        let n = mesh.vertices.len();
        let mut sets: Vec<std::collections::BTreeSet<usize>> = vec![std::collections::BTreeSet::new(); n];

        for tet in &mesh.tetrahedra {
            for i in 0..4 {
                for j in 0..4 {
                    if i != j {
                        sets[tet[i]].insert(tet[j]);
                    }
                }
            }
        }

        let mut offsets = Vec::with_capacity(n + 1);
        let mut neighbors = Vec::new();
        offsets.push(0);
        for set in sets {
            neighbors.extend(set);
            offsets.push(neighbors.len());
        }

        AdjacencyGraph { offsets, neighbors }
    }

    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[self.offsets[i]..self.offsets[i + 1]]
    }

    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Connected components as lists of vertex indices, via breadth-first
    /// search over the CSR graph.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut visited = vec![false; n];
        let mut components = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }
            let mut queue = std::collections::VecDeque::new();
            let mut component = Vec::new();
            queue.push_back(start);
            visited[start] = true;
            while let Some(v) = queue.pop_front() {
                component.push(v);
                for &w in self.neighbors(v) {
                    if !visited[w] {
                        visited[w] = true;
                        queue.push_back(w);
                    }
                }
            }
            components.push(component);
        }

        components
    }
}

/// Which nodes are pinned during a smoothing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirichletMode {
    GroundOnly,
    GroundAndBuildings,
}

fn roof_height_at(city: &City, p: Point2) -> Option<f64> {
    for building in &city.buildings {
        match point_in_polygon(&building.footprint, p, 1e-9) {
            PointLocation::Inside | PointLocation::OnBoundary => return Some(building.ground_level + building.height),
            PointLocation::Outside => continue,
        }
    }
    None
}

/// Dirichlet value per vertex, or `None` if the vertex is free.
fn dirichlet_values(mesh: &VolumeMesh, city: &City, terrain: &GridField2D, mode: DirichletMode, top_height: f64) -> Vec<Option<f64>> {
    mesh.vertices
        .iter()
        .zip(mesh.markers.iter())
        .map(|(p, marker)| {
            if marker.is_top {
                return Some(top_height);
            }
            if mode == DirichletMode::GroundAndBuildings
                && marker.layer == 0
                && matches!(marker.horizontal, VertexMarker::BuildingInterior | VertexMarker::BuildingHalo)
            {
                if let Some(z) = roof_height_at(city, Point2::new(p.x, p.y)) {
                    return Some(z);
                }
            }
            if marker.layer == 0 && marker.horizontal == VertexMarker::Ground {
                let (z, _warn) = terrain.eval(p.x, p.y);
                return Some(z);
            }
            None
        })
        .collect()
}

/// Relaxes `mesh`'s z-coordinates to the harmonic extension of its Dirichlet
/// boundary values via sequential Gauss–Seidel sweeps. Leaves
/// any connected component with no Dirichlet vertex unchanged and reports
/// `UnderConstrained` for it; reports `IterationLimit` if the cap is hit
/// before the relative residual drops below `tolerance`.
pub fn smooth(mut mesh: VolumeMesh, city: &City, terrain: &GridField2D, mode: DirichletMode, top_height: f64, max_iterations: usize, tolerance: f64) -> StageResult<VolumeMesh> {
    let graph = AdjacencyGraph::build(&mesh);
    let dirichlet = dirichlet_values(&mesh, city, terrain, mode, top_height);
    let components = graph.components();

    let mut warnings = Vec::new();
    let mut free = vec![true; mesh.vertices.len()];
    for (idx, component) in components.iter().enumerate() {
        let has_dirichlet = component.iter().any(|&v| dirichlet[v].is_some());
        if !has_dirichlet {
            warnings.push(MeshError::UnderConstrained { component: idx });
            for &v in component {
                free[v] = false;
            }
        }
    }

    for (i, value) in dirichlet.iter().enumerate() {
        if let Some(z) = value {
            mesh.vertices[i].z = *z;
            free[i] = false;
        }
    }

    let mut converged = false;
    for _ in 0..max_iterations {
        let mut max_delta = 0.0_f64;
        let mut max_value = 0.0_f64;

        for i in 0..mesh.vertices.len() {
            if !free[i] {
                continue;
            }
            let neighbors = graph.neighbors(i);
            if neighbors.is_empty() {
                continue;
            }
            let mean: f64 = neighbors.iter().map(|&j| mesh.vertices[j].z).sum::<f64>() / neighbors.len() as f64;
            let old = mesh.vertices[i].z;
            mesh.vertices[i].z = mean;
            max_delta = max_delta.max((mean - old).abs());
            max_value = max_value.max(mean.abs());
        }

        if max_value > 0.0 && max_delta / max_value < tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warnings.push(MeshError::IterationLimit { stage: "smoother", iterations: max_iterations });
    }

    StageResult::with_warnings(mesh, warnings)
}

#[cfg(test)]
mod tests {
    use crate::city::Building;
    use crate::geom::{Aabb2, Point3, Polygon2D};
    use crate::mesh2d::{Mesh2D, VertexMarker as VM};
    use crate::volume::layer_mesh;

    use super::*;

    fn empty_city() -> City {
        City::new(Vec::new(), Aabb2::new(0.0, 0.0, 10.0, 10.0), Point2::new(0.0, 0.0))
    }

    #[test]
    fn cube_mesh_converges_to_linear_interpolation() {
        let mesh2d = Mesh2D::new(
            vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(0.0, 10.0), Point2::new(10.0, 10.0)],
            vec![[0, 1, 2], [1, 3, 2]],
            vec![VM::Ground; 4],
        );
        let layered = layer_mesh(&mesh2d, 10.0, 2.5).value;
        let city = empty_city();
        let mut terrain = GridField2D::new(city.bounds, 1.0);
        for v in terrain.data.iter_mut() {
            *v = 0.0;
        }

        let out = smooth(layered, &city, &terrain, DirichletMode::GroundOnly, 10.0, 1000, 1e-6);
        assert!(out.warnings.iter().all(|w| !matches!(w, MeshError::IterationLimit { .. })));

        let layers = out.value.markers.iter().map(|m| m.layer).max().unwrap();
        for marker_idx in 0..out.value.vertices.len() {
            let layer = out.value.markers[marker_idx].layer;
            let expected = 10.0 * layer as f64 / layers as f64;
            assert!((out.value.vertices[marker_idx].z - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn disconnected_component_without_dirichlet_is_reported() {
        let mut mesh = VolumeMesh::new(
            vec![Point3::new(0.0, 0.0, 5.0), Point3::new(1.0, 0.0, 5.0), Point3::new(0.0, 1.0, 5.0), Point3::new(1.0, 1.0, 5.0)],
            vec![],
            vec![
                crate::volume::VolumeVertexMarker { horizontal: VM::Domain, layer: 3, is_top: false },
                crate::volume::VolumeVertexMarker { horizontal: VM::Domain, layer: 3, is_top: false },
                crate::volume::VolumeVertexMarker { horizontal: VM::Domain, layer: 3, is_top: false },
                crate::volume::VolumeVertexMarker { horizontal: VM::Domain, layer: 3, is_top: false },
            ],
        );
        mesh.tetrahedra = vec![[0, 1, 2, 3]];
        let city = empty_city();
        let terrain = GridField2D::new(city.bounds, 1.0);

        let out = smooth(mesh, &city, &terrain, DirichletMode::GroundOnly, 10.0, 10, 1e-6);
        assert!(out.warnings.iter().any(|w| matches!(w, MeshError::UnderConstrained { .. })));
        assert!((out.value.vertices[0].z - 5.0).abs() < 1e-9);
    }

    #[test]
    fn building_roof_pins_ground_plus_building_mode() {
        let mut b = Building::new(
            "a",
            Polygon2D::new(
                vec![Point2::new(2.0, 2.0), Point2::new(8.0, 2.0), Point2::new(8.0, 8.0), Point2::new(2.0, 8.0)],
                vec![],
            ),
        );
        b.ground_level = 0.0;
        b.height = 6.0;

        let mesh2d = Mesh2D::new(
            vec![Point2::new(5.0, 5.0), Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(0.0, 10.0)],
            vec![[0, 1, 2], [0, 2, 3], [0, 3, 1]],
            vec![VM::BuildingInterior, VM::Ground, VM::Ground, VM::Ground],
        );
        let city = City::new(vec![b], Aabb2::new(0.0, 0.0, 10.0, 10.0), Point2::new(0.0, 0.0));
        let mut terrain = GridField2D::new(city.bounds, 1.0);
        for v in terrain.data.iter_mut() {
            *v = 0.0;
        }
        let layered = layer_mesh(&mesh2d, 20.0, 5.0).value;

        let out = smooth(layered, &city, &terrain, DirichletMode::GroundAndBuildings, 20.0, 1000, 1e-6);
        assert!((out.value.vertices[0].z - 6.0).abs() < 1e-9);
    }
}
