/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T

The Urban Mesh Builder is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
mod cmd_build_all;
mod cmd_build_city;
mod cmd_build_mesh;
mod cmd_build_volume_mesh;
mod input;
mod params_args;

use anyhow::Result;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use structopt::StructOpt;

use urban_mesh_core::MeshError;

use crate::cmd_build_all::{run as build_all, BuildAllArgs};
use crate::cmd_build_city::{run as build_city, BuildCityArgs};
use crate::cmd_build_mesh::{run as build_mesh, BuildMeshArgs};
use crate::cmd_build_volume_mesh::{run as build_volume_mesh, BuildVolumeMeshArgs};

#[derive(StructOpt)]
struct Cli {
    #[structopt(long, default_value = "Info")]
    log_level: LevelFilter,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt)]
enum Command {
    #[structopt(help = "Conditions the point cloud and infers per-building heights")]
    BuildCity(BuildCityArgs),

    #[structopt(help = "Builds the 2D ground-and-buildings surface mesh")]
    BuildMesh(BuildMeshArgs),

    #[structopt(help = "Layers the ground mesh into a tetrahedral volume mesh and smooths it")]
    BuildVolumeMesh(BuildVolumeMeshArgs),

    #[structopt(help = "Runs the full pipeline through boundary extraction")]
    BuildAll(BuildAllArgs),
}

fn run() -> Result<()> {
    let args = Cli::from_args();
    SimpleLogger::new().with_level(args.log_level).init()?;

    match &args.cmd {
        Command::BuildCity(a) => build_city(a),
        Command::BuildMesh(a) => build_mesh(a),
        Command::BuildVolumeMesh(a) => build_volume_mesh(a),
        Command::BuildAll(a) => build_all(a),
    }
}

/// Exit codes: 0 success, 1 invalid input/CLI misuse, 2 any other
/// `MeshError` (numerical failure deep in the pipeline).
fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        let code = match err.downcast_ref::<MeshError>() {
            Some(e) if e.is_fatal() => 1,
            Some(_) => 2,
            None => 1,
        };
        std::process::exit(code);
    }
}
