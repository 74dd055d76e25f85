/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};
use structopt::StructOpt;

use urban_mesh_core::build_city;
use urban_mesh_core::geom::Point2;

use crate::input::{load_footprints_toml, load_points_csv};
use crate::params_args::ParamsArgs;

#[derive(StructOpt)]
pub struct BuildCityArgs {
    #[structopt(parse(from_os_str), long)]
    pub points: PathBuf,

    #[structopt(parse(from_os_str), long)]
    pub footprints: PathBuf,

    #[structopt(parse(from_os_str), long)]
    pub output: PathBuf,

    #[structopt(flatten)]
    pub params: ParamsArgs,
}

pub fn run(args: &BuildCityArgs) -> Result<()> {
    let params = args.params.resolve()?;
    let cloud = load_points_csv(&args.points, Point2::new(0.0, 0.0))?;
    let footprints = load_footprints_toml(&args.footprints)?;

    info!("loaded {} points, {} footprints", cloud.len(), footprints.len());

    let result = build_city(cloud, footprints, &params)?;
    for w in &result.warnings {
        warn!("{w}");
    }

    let json = serde_json::to_string_pretty(&result.value)?;
    std::fs::write(&args.output, json)?;
    info!("wrote {} buildings to {:?}", result.value.buildings.len(), args.output);
    Ok(())
}
