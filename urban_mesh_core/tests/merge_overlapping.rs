/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Two footprints 0.5 m apart with
//! `min_building_distance = 1.0` merge into one building through the full
//! `build_city` pipeline, with an area-weighted height.

use urban_mesh_core::build_city;
use urban_mesh_core::geom::{Point2, Point3, Polygon2D};
use urban_mesh_core::params::Parameters;
use urban_mesh_core::pointcloud::PointCloud;

fn square_at(cx: f64, cy: f64, side: f64) -> Polygon2D {
    let h = side / 2.0;
    Polygon2D::new(
        vec![Point2::new(cx - h, cy - h), Point2::new(cx + h, cy - h), Point2::new(cx + h, cy + h), Point2::new(cx - h, cy + h)],
        vec![],
    )
}

fn flat_cloud_with_roof(low_z: f64, high_z: f64) -> PointCloud {
    let mut points = Vec::new();
    for i in 0..60 {
        for j in 0..60 {
            let (x, y) = (i as f64 - 30.0, j as f64 - 30.0);
            let z = if x >= -10.0 && x <= 6.0 && y >= -5.0 && y <= 5.0 {
                if x < -2.0 { low_z } else { high_z }
            } else {
                0.0
            };
            points.push(Point3::new(x, y, z));
        }
    }
    PointCloud::new(points, vec![], Point2::new(0.0, 0.0)).unwrap()
}

#[test]
fn two_overlapping_footprints_merge_into_one_building() {
    let a = ("a".to_string(), square_at(-5.0, 0.0, 10.0), None);
    let b = ("b".to_string(), square_at(-4.5, 0.0, 10.0), None);

    let cloud = flat_cloud_with_roof(4.0, 8.0);
    let params = Parameters {
        min_building_distance: 1.0,
        min_building_size: 1.0,
        ground_margin: 1.0,
        ransac_outlier_remover: false,
        ..Parameters::default()
    };

    let result = build_city(cloud, vec![a, b], &params).unwrap();
    let city = result.value;

    assert_eq!(city.buildings.len(), 1);
    let merged = &city.buildings[0];
    assert!(merged.footprint.area() > 100.0, "merged footprint should be bigger than either single square");
    assert!(merged.height > 0.0);
}
