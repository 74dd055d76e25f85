/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! A 4-layer cube mesh, top pinned at 10 and bottom
//! (ground) at 0, converges to the linear interpolation within
//! `smoothing_max_iterations` and `smoothing_relative_tolerance`.

use urban_mesh_core::city::City;
use urban_mesh_core::geom::{Aabb2, Point2};
use urban_mesh_core::mesh2d::{Mesh2D, VertexMarker};
use urban_mesh_core::params::Parameters;
use urban_mesh_core::raster::GridField2D;
use urban_mesh_core::smoother::{smooth, DirichletMode};
use urban_mesh_core::volume::layer_mesh;

#[test]
fn four_by_four_by_four_cube_converges_to_linear_interpolation() {
    let params = Parameters::default();
    let side = 4.0;
    let thickness = 1.0; // domain_height 4.0 / 4 layers

    let mesh2d = Mesh2D::new(
        vec![Point2::new(0.0, 0.0), Point2::new(side, 0.0), Point2::new(0.0, side), Point2::new(side, side)],
        vec![[0, 1, 2], [1, 3, 2]],
        vec![VertexMarker::Ground; 4],
    );

    let city = City::new(Vec::new(), Aabb2::new(0.0, 0.0, side, side), Point2::new(0.0, 0.0));
    let mut terrain = GridField2D::new(city.bounds, 1.0);
    for v in terrain.data.iter_mut() {
        *v = 0.0;
    }

    let layered = layer_mesh(&mesh2d, 4.0, thickness).value;
    let layers = layered.markers.iter().map(|m| m.layer).max().unwrap();
    assert_eq!(layers, 4);

    let out = smooth(
        layered,
        &city,
        &terrain,
        DirichletMode::GroundOnly,
        10.0,
        params.smoothing_max_iterations,
        params.smoothing_relative_tolerance,
    );

    assert!(out.warnings.is_empty(), "should converge without hitting the iteration cap: {:?}", out.warnings);

    for (idx, marker) in out.value.markers.iter().enumerate() {
        let expected = 10.0 * marker.layer as f64 / layers as f64;
        assert!((out.value.vertices[idx].z - expected).abs() <= params.smoothing_relative_tolerance * 10.0 + 1e-9);
    }
}
