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
//! Geometry-and-meshing core for building three-dimensional urban domain
//! meshes from 2D building footprints and an airborne LiDAR point cloud:
//! terrain elevation, per-building heights, a ground-and-buildings surface
//! mesh, and a boundary-conforming tetrahedral volume mesh.
//!
//! File I/O, CLI argument parsing, and configuration loading are
//! collaborators (see [`io_traits`]), not part of this crate.

pub mod assignment;
pub mod city;
pub mod errors;
pub mod geom;
pub mod height;
pub mod io_traits;
pub mod mesh2d;
pub mod params;
pub mod pipeline;
pub mod pointcloud;
pub mod raster;
pub mod smoother;
pub mod trim;
pub mod volume;

pub use errors::{MeshError, MeshResult, StageResult};
pub use params::Parameters;
pub use pipeline::{build_all, build_city, PipelineOutput};
