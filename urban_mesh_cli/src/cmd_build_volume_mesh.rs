/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use log::{info, warn};
use structopt::StructOpt;

use urban_mesh_core::build_city;
use urban_mesh_core::geom::Point2;
use urban_mesh_core::mesh2d::build_ground_mesh;
use urban_mesh_core::smoother::{smooth, DirichletMode};
use urban_mesh_core::volume::layer_mesh;

use crate::input::{load_footprints_toml, load_points_csv};
use crate::params_args::ParamsArgs;

#[derive(StructOpt)]
pub struct BuildVolumeMeshArgs {
    #[structopt(parse(from_os_str), long)]
    pub points: PathBuf,

    #[structopt(parse(from_os_str), long)]
    pub footprints: PathBuf,

    #[structopt(parse(from_os_str), long)]
    pub output: PathBuf,

    #[structopt(flatten)]
    pub params: ParamsArgs,
}

/// `build-volume-mesh`: ground mesh, layered into tetrahedra, and smoothed
/// once against the terrain (ground-only Dirichlet), without trimming the
/// building interiors out (that happens in `build-all`).
pub fn run(args: &BuildVolumeMeshArgs) -> Result<()> {
    let params = args.params.resolve()?;
    let cloud = load_points_csv(&args.points, Point2::new(0.0, 0.0))?;
    let footprints = load_footprints_toml(&args.footprints)?;

    let city_result = build_city(cloud, footprints, &params)?;
    for w in &city_result.warnings {
        warn!("{w}");
    }
    let city = city_result.value;
    let terrain = city.terrain.clone().ok_or_else(|| anyhow!("city has no terrain"))?;

    let ground_mesh_result = build_ground_mesh(&city, city.bounds, params.mesh_resolution);
    for w in &ground_mesh_result.warnings {
        warn!("{w}");
    }

    let layered = layer_mesh(&ground_mesh_result.value, params.domain_height, params.mesh_resolution);
    for w in &layered.warnings {
        warn!("{w}");
    }

    let smoothed = smooth(
        layered.value,
        &city,
        &terrain,
        DirichletMode::GroundOnly,
        params.domain_height,
        params.smoothing_max_iterations,
        params.smoothing_relative_tolerance,
    );
    for w in &smoothed.warnings {
        warn!("{w}");
    }

    let json = serde_json::to_string_pretty(&smoothed.value)?;
    std::fs::write(&args.output, json)?;
    info!("wrote {} tetrahedra to {:?}", smoothed.value.tetrahedra.len(), args.output);
    Ok(())
}
