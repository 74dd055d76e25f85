/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};
use structopt::StructOpt;

use urban_mesh_core::build_all;
use urban_mesh_core::geom::Point2;

use crate::input::{load_footprints_toml, load_points_csv};
use crate::params_args::ParamsArgs;

#[derive(StructOpt)]
pub struct BuildAllArgs {
    #[structopt(parse(from_os_str), long)]
    pub points: PathBuf,

    #[structopt(parse(from_os_str), long)]
    pub footprints: PathBuf,

    #[structopt(parse(from_os_str), long)]
    pub output_surface: PathBuf,

    #[structopt(parse(from_os_str), long)]
    pub output_open_surface: Option<PathBuf>,

    #[structopt(flatten)]
    pub params: ParamsArgs,
}

/// `build-all`: the full pipeline through boundary extraction.
pub fn run(args: &BuildAllArgs) -> Result<()> {
    let params = args.params.resolve()?;
    let cloud = load_points_csv(&args.points, Point2::new(0.0, 0.0))?;
    let footprints = load_footprints_toml(&args.footprints)?;

    let result = build_all(cloud, footprints, &params)?;
    for w in &result.warnings {
        warn!("{w}");
    }
    let out = result.value;

    let json = serde_json::to_string_pretty(&out.surface)?;
    std::fs::write(&args.output_surface, json)?;
    info!("wrote {} boundary triangles to {:?}", out.surface.triangles.len(), args.output_surface);

    if let Some(path) = &args.output_open_surface {
        let json = serde_json::to_string_pretty(&out.open_surface)?;
        std::fs::write(path, json)?;
        info!("wrote {} open-surface triangles to {:?}", out.open_surface.triangles.len(), path);
    }

    Ok(())
}
