/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Flags mapping 1-1 onto `Parameters` fields, plus an optional `--config`
//! TOML file loaded first and overridden by any flag the caller passes.

use std::path::PathBuf;

use anyhow::Result;
use structopt::StructOpt;

use urban_mesh_core::Parameters;

#[derive(StructOpt)]
pub struct ParamsArgs {
    #[structopt(parse(from_os_str), long)]
    pub config: Option<PathBuf>,

    #[structopt(long)]
    pub auto_domain: Option<bool>,
    #[structopt(long)]
    pub domain_margin: Option<f64>,
    #[structopt(long)]
    pub x0: Option<f64>,
    #[structopt(long)]
    pub y0: Option<f64>,
    #[structopt(long)]
    pub x_min: Option<f64>,
    #[structopt(long)]
    pub y_min: Option<f64>,
    #[structopt(long)]
    pub x_max: Option<f64>,
    #[structopt(long)]
    pub y_max: Option<f64>,

    #[structopt(long)]
    pub elevation_model_resolution: Option<f64>,
    #[structopt(long)]
    pub elevation_model_window_size: Option<u32>,

    #[structopt(long)]
    pub outlier_margin: Option<f64>,
    #[structopt(long)]
    pub outlier_neighbors: Option<usize>,
    #[structopt(long)]
    pub roof_outlier_margin: Option<f64>,

    #[structopt(long)]
    pub ransac_outlier_remover: Option<bool>,
    #[structopt(long)]
    pub ransac_outlier_margin: Option<f64>,
    #[structopt(long)]
    pub ransac_iterations: Option<u32>,

    #[structopt(long)]
    pub naive_vegetation_filter: Option<bool>,

    #[structopt(long)]
    pub ground_margin: Option<f64>,
    #[structopt(long)]
    pub min_building_distance: Option<f64>,
    #[structopt(long)]
    pub min_building_size: Option<f64>,
    #[structopt(long)]
    pub min_building_height: Option<f64>,
    #[structopt(long)]
    pub min_vertex_distance: Option<f64>,

    #[structopt(long)]
    pub ground_percentile: Option<f64>,
    #[structopt(long)]
    pub roof_percentile: Option<f64>,

    #[structopt(long)]
    pub mesh_resolution: Option<f64>,
    #[structopt(long)]
    pub domain_height: Option<f64>,

    #[structopt(long)]
    pub smoothing_max_iterations: Option<usize>,
    #[structopt(long)]
    pub smoothing_relative_tolerance: Option<f64>,
}

impl ParamsArgs {
    /// Loads `--config` if given, else `Parameters::default()`, then
    /// applies every flag the caller actually passed on top.
    pub fn resolve(&self) -> Result<Parameters> {
        let mut p = match &self.config {
            Some(path) => Parameters::load_toml(path)?,
            None => Parameters::default(),
        };

        if let Some(v) = self.auto_domain { p.auto_domain = v; }
        if let Some(v) = self.domain_margin { p.domain_margin = v; }
        if let Some(v) = self.x0 { p.x0 = v; }
        if let Some(v) = self.y0 { p.y0 = v; }
        if let Some(v) = self.x_min { p.x_min = v; }
        if let Some(v) = self.y_min { p.y_min = v; }
        if let Some(v) = self.x_max { p.x_max = v; }
        if let Some(v) = self.y_max { p.y_max = v; }

        if let Some(v) = self.elevation_model_resolution { p.elevation_model_resolution = v; }
        if let Some(v) = self.elevation_model_window_size { p.elevation_model_window_size = v; }

        if let Some(v) = self.outlier_margin { p.outlier_margin = v; }
        if let Some(v) = self.outlier_neighbors { p.outlier_neighbors = v; }
        if let Some(v) = self.roof_outlier_margin { p.roof_outlier_margin = v; }

        if let Some(v) = self.ransac_outlier_remover { p.ransac_outlier_remover = v; }
        if let Some(v) = self.ransac_outlier_margin { p.ransac_outlier_margin = v; }
        if let Some(v) = self.ransac_iterations { p.ransac_iterations = v; }

        if let Some(v) = self.naive_vegetation_filter { p.naive_vegetation_filter = v; }

        if let Some(v) = self.ground_margin { p.ground_margin = v; }
        if let Some(v) = self.min_building_distance { p.min_building_distance = v; }
        if let Some(v) = self.min_building_size { p.min_building_size = v; }
        if let Some(v) = self.min_building_height { p.min_building_height = v; }
        if let Some(v) = self.min_vertex_distance { p.min_vertex_distance = v; }

        if let Some(v) = self.ground_percentile { p.ground_percentile = v; }
        if let Some(v) = self.roof_percentile { p.roof_percentile = v; }

        if let Some(v) = self.mesh_resolution { p.mesh_resolution = v; }
        if let Some(v) = self.domain_height { p.domain_height = v; }

        if let Some(v) = self.smoothing_max_iterations { p.smoothing_max_iterations = v; }
        if let Some(v) = self.smoothing_relative_tolerance { p.smoothing_relative_tolerance = v; }

        Ok(p)
    }
}
