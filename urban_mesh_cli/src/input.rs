/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Loaders for the pre-extracted point/footprint formats this CLI accepts
//! in place of a LAS/shapefile reader (no such reader ships in this crate;
//! see `urban_mesh_core::io_traits`).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use urban_mesh_core::geom::{Point2, Point3, Polygon2D};
use urban_mesh_core::pointcloud::{PointAttributes, PointCloud};

#[derive(Debug, Deserialize)]
struct PointRow {
    x: f64,
    y: f64,
    z: f64,
    classification: Option<u8>,
}

/// Reads a point cloud from a CSV file with an `x,y,z,classification`
/// header; `classification` may be blank.
pub fn load_points_csv(path: &Path, origin: Point2) -> Result<PointCloud> {
    let mut reader = csv::Reader::from_path(path).with_context(|| format!("opening {:?}", path))?;
    let mut points = Vec::new();
    let mut attributes = Vec::new();
    let mut any_classified = false;

    for row in reader.deserialize() {
        let row: PointRow = row.with_context(|| format!("parsing row in {:?}", path))?;
        points.push(Point3::new(row.x, row.y, row.z));
        any_classified |= row.classification.is_some();
        attributes.push(PointAttributes { classification: row.classification, ..Default::default() });
    }

    if !any_classified {
        attributes.clear();
    }

    Ok(PointCloud::new(points, attributes, origin)?)
}

#[derive(Debug, Deserialize)]
struct FootprintFile {
    #[serde(default)]
    footprint: Vec<FootprintRow>,
}

#[derive(Debug, Deserialize)]
struct FootprintRow {
    id: String,
    height: Option<f64>,
    exterior: Vec<[f64; 2]>,
    #[serde(default)]
    holes: Vec<Vec<[f64; 2]>>,
}

/// Reads building footprints from a TOML file of `[[footprint]]` tables
/// (`id`, optional known `height`, `exterior` ring, optional `holes`).
pub fn load_footprints_toml(path: &Path) -> Result<Vec<(String, Polygon2D, Option<f64>)>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let parsed: FootprintFile = toml::from_str(&text).with_context(|| format!("parsing {:?}", path))?;

    Ok(parsed
        .footprint
        .into_iter()
        .map(|row| {
            let exterior = row.exterior.iter().map(|[x, y]| Point2::new(*x, *y)).collect();
            let holes = row.holes.iter().map(|ring| ring.iter().map(|[x, y]| Point2::new(*x, *y)).collect()).collect();
            (row.id, Polygon2D::new(exterior, holes), row.height)
        })
        .collect())
}
