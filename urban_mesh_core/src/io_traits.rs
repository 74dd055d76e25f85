/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Collaborator contracts: the core never parses LAS/shapefile
//! input or writes VTK/STL/OBJ/glTF output itself. These traits are the
//! seam; no implementation ships in this crate.

use crate::errors::MeshError;
use crate::geom::{Aabb2, Polygon2D};
use crate::pointcloud::PointCloud;
use crate::trim::SurfaceMesh;
use crate::volume::VolumeMesh;

/// Yields a conditioned-or-not point cloud plus the bulk-filtering AABB of
/// its source. Implementers must classify
/// ground returns as class 2 and water as class 9 where the source format
/// carries classification, and leave the attribute array empty otherwise.
pub trait PointCloudSource {
    fn read(&self) -> Result<PointCloud, MeshError>;
    fn source_bounds(&self) -> Aabb2;
}

/// Yields building footprints with identifiers and an optional known height.
/// Rings may arrive in either winding;
/// `Polygon2D::new` canonicalizes them to outer-CCW/holes-CW on the way in.
pub trait FootprintSource {
    fn read(&self) -> Result<Vec<(String, Polygon2D, Option<f64>)>, MeshError>;
}

/// Writes the two mesh products to whatever format a collaborator speaks
/// (VTK, STL, OBJ, glTF). No writer ships in this crate.
///
/// The "y-up" question is deliberately left to each
/// writer: this trait carries no orientation flag, and an OBJ/glTF
/// implementation must make its own axis convention explicit rather than
/// rely on an implicit default. The in-memory convention used throughout
/// this crate is z-up.
pub trait MeshSink {
    fn write_surface(&self, mesh: &SurfaceMesh) -> Result<(), MeshError>;
    fn write_volume(&self, mesh: &VolumeMesh) -> Result<(), MeshError>;
}
