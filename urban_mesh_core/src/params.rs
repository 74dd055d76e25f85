/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Typed configuration record for every tunable in the pipeline, replacing
//! a flat untyped parameter dictionary with a validated struct.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{MeshError, MeshResult};
use crate::geom::Aabb2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Parameters {
    pub auto_domain: bool,
    pub domain_margin: f64,
    pub x0: f64,
    pub y0: f64,
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,

    pub elevation_model_resolution: f64,
    pub elevation_model_window_size: u32,

    pub outlier_margin: f64,
    pub outlier_neighbors: usize,
    pub roof_outlier_margin: f64,

    pub ransac_outlier_remover: bool,
    pub ransac_outlier_margin: f64,
    pub ransac_iterations: u32,

    pub naive_vegetation_filter: bool,

    pub ground_margin: f64,
    pub min_building_distance: f64,
    pub min_building_size: f64,
    pub min_building_height: f64,
    pub min_vertex_distance: f64,

    /// Ground-level percentile of ground samples used for `ground_level`;
    /// defaults to the median unless a caller overrides it.
    pub ground_percentile: f64,
    pub roof_percentile: f64,

    pub mesh_resolution: f64,
    pub domain_height: f64,

    pub smoothing_max_iterations: usize,
    pub smoothing_relative_tolerance: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            auto_domain: true,
            domain_margin: 10.0,
            x0: 0.0,
            y0: 0.0,
            x_min: 0.0,
            y_min: 0.0,
            x_max: 0.0,
            y_max: 0.0,

            elevation_model_resolution: 1.0,
            elevation_model_window_size: 3,

            outlier_margin: 2.0,
            outlier_neighbors: 5,
            roof_outlier_margin: 1.5,

            ransac_outlier_remover: true,
            ransac_outlier_margin: 3.0,
            ransac_iterations: 250,

            naive_vegetation_filter: true,

            ground_margin: 1.0,
            min_building_distance: 1.0,
            min_building_size: 15.0,
            min_building_height: 2.5,
            min_vertex_distance: 1.0,

            ground_percentile: 0.5,
            roof_percentile: 0.9,

            mesh_resolution: 10.0,
            domain_height: 100.0,

            smoothing_max_iterations: 1000,
            smoothing_relative_tolerance: 1e-3,
        }
    }
}

impl Parameters {
    /// Schema-validated loader for external config files.
    /// Unknown keys are rejected by `deny_unknown_fields` rather than
    /// silently ignored.
    pub fn load_toml(path: &Path) -> MeshResult<Parameters> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MeshError::InvalidInput(format!("reading {:?}: {e}", path)))?;
        toml::from_str(&text).map_err(|e| MeshError::InvalidInput(format!("parsing {:?}: {e}", path)))
    }

    /// Manual domain AABB from `x0,y0,x_min,y_min,x_max,y_max`, used when
    /// `auto_domain` is false.
    pub fn manual_bounds(&self) -> Aabb2 {
        Aabb2::new(
            self.x0 + self.x_min,
            self.y0 + self.y_min,
            self.x0 + self.x_max,
            self.y0 + self.y_max,
        )
    }

    /// Resolves the domain bounds automatically from the intersection of
    /// footprint bounds and point-cloud bounds, expanded by `domain_margin`.
    pub fn resolve_domain(&self, footprint_bounds: Aabb2, pointcloud_bounds: Aabb2) -> MeshResult<Aabb2> {
        if !self.auto_domain {
            return Ok(self.manual_bounds());
        }
        let expanded = footprint_bounds.expanded(self.domain_margin);
        expanded
            .intersect(&pointcloud_bounds)
            .ok_or_else(|| MeshError::InvalidInput("footprint and point-cloud bounds do not overlap".into()))
    }
}
