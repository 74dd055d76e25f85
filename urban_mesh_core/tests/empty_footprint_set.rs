/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! A city with zero buildings triangulates just the
//! domain AABB, and layering it produces `L+1` vertex layers.

use urban_mesh_core::build_city;
use urban_mesh_core::geom::{Point2, Point3};
use urban_mesh_core::mesh2d::{build_ground_mesh, VertexMarker};
use urban_mesh_core::params::Parameters;
use urban_mesh_core::pointcloud::PointCloud;
use urban_mesh_core::volume::layer_mesh;

fn flat_ground_cloud() -> PointCloud {
    let mut points = Vec::new();
    for i in 0..30 {
        for j in 0..30 {
            points.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }
    PointCloud::new(points, vec![], Point2::new(0.0, 0.0)).unwrap()
}

#[test]
fn empty_footprint_set_meshes_the_domain_only() {
    let cloud = flat_ground_cloud();
    let params = Parameters { auto_domain: false, x_min: 0.0, y_min: 0.0, x_max: 29.0, y_max: 29.0, ..Parameters::default() };

    let city_result = build_city(cloud, vec![], &params).unwrap();
    let city = city_result.value;
    assert!(city.buildings.is_empty());

    let mesh_result = build_ground_mesh(&city, city.bounds, params.mesh_resolution);
    let mesh = mesh_result.value;
    assert!(!mesh.triangles.is_empty());
    assert!(mesh.markers.iter().all(|m| matches!(m, VertexMarker::Domain | VertexMarker::Ground)));

    let domain_height = 40.0;
    let target_thickness = 10.0;
    let expected_layers = (domain_height / target_thickness).round().max(1.0) as usize;
    let layered = layer_mesh(&mesh, domain_height, target_thickness).value;

    let distinct_z: std::collections::BTreeSet<i64> =
        layered.vertices.iter().map(|p| (p.z * 1e6).round() as i64).collect();
    assert_eq!(distinct_z.len(), expected_layers + 1);
}
