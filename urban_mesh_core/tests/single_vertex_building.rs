/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! A degenerate, near-zero-area footprint is dropped
//! by the simplifier and never reaches building-point assignment.

use urban_mesh_core::city::{simplify_city, Building, City};
use urban_mesh_core::geom::{Aabb2, Point2, Point3, Polygon2D};
use urban_mesh_core::params::Parameters;
use urban_mesh_core::pointcloud::PointCloud;

fn sliver_triangle() -> Polygon2D {
    // Area = 0.5 * base * height = 0.5 * 1.0 * 0.2 = 0.1 m^2
    Polygon2D::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.5, 0.2)], vec![])
}

#[test]
fn sliver_building_is_dropped_and_assignment_never_sees_it() {
    let building = Building::new("sliver", sliver_triangle());
    assert!((building.footprint.area() - 0.1).abs() < 1e-9);

    let city = City::new(vec![building], Aabb2::new(-5.0, -5.0, 5.0, 5.0), Point2::new(0.0, 0.0));
    let params = Parameters::default();
    assert_eq!(params.min_building_size, 15.0);

    let simplified = simplify_city(&city, city.bounds, params.min_building_distance, params.min_vertex_distance, params.min_building_size);
    assert!(simplified.value.buildings.is_empty());

    let points = vec![Point3::new(0.5, 0.1, 3.0), Point3::new(-3.0, -3.0, 0.0)];
    let cloud = PointCloud::new(points, vec![], Point2::new(0.0, 0.0)).unwrap();

    let assigned = urban_mesh_core::assignment::assign_building_points(
        &simplified.value,
        &cloud,
        urban_mesh_core::assignment::AssignmentParams {
            ground_margin: params.ground_margin,
            outlier_neighbors: params.outlier_neighbors,
            roof_outlier_margin: params.roof_outlier_margin,
            ransac_outlier_remover: params.ransac_outlier_remover,
            ransac_outlier_margin: params.ransac_outlier_margin,
            ransac_iterations: params.ransac_iterations,
        },
    );
    assert!(assigned.value.buildings.is_empty());
}
