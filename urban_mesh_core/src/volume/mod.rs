/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Volume layerer: extrudes a `Mesh2D` vertically into a tetrahedral column
//! grid up to a domain height.

mod layer;

pub use layer::{layer_mesh, VolumeVertexMarker};

use serde::{Deserialize, Serialize};

use crate::geom::Point3;

/// A 3D tetrahedral mesh with positively-oriented tets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeMesh {
    pub vertices: Vec<Point3>,
    pub tetrahedra: Vec<[usize; 4]>,
    pub markers: Vec<VolumeVertexMarker>,
}

impl VolumeMesh {
    pub fn new(vertices: Vec<Point3>, tetrahedra: Vec<[usize; 4]>, markers: Vec<VolumeVertexMarker>) -> Self {
        VolumeMesh { vertices, tetrahedra, markers }
    }

    /// Signed volume of a tetrahedron (positive iff positively oriented).
    pub fn signed_volume(&self, tet: [usize; 4]) -> f64 {
        let a = self.vertices[tet[0]];
        let b = self.vertices[tet[1]];
        let c = self.vertices[tet[2]];
        let d = self.vertices[tet[3]];
        let ab = b - a;
        let ac = c - a;
        let ad = d - a;
        ab.cross(&ac).dot(&ad) / 6.0
    }
}
