/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Ground mesh builder: constrained 2D Delaunay triangulation of the domain
//! respecting footprint edges, quality refinement, and vertex/triangle
//! marking.

mod delaunay;
mod markers;
mod refine;

pub use delaunay::build_ground_mesh;
pub use markers::{majority_marker, VertexMarker};

use serde::{Deserialize, Serialize};

use crate::geom::Point2;

/// A triangulated 2D domain: CCW triangles, each edge shared by at most two
/// of them, with a per-vertex class tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh2D {
    pub vertices: Vec<Point2>,
    pub triangles: Vec<[usize; 3]>,
    pub markers: Vec<VertexMarker>,
}

impl Mesh2D {
    pub fn new(vertices: Vec<Point2>, triangles: Vec<[usize; 3]>, markers: Vec<VertexMarker>) -> Self {
        Mesh2D { vertices, triangles, markers }
    }

    /// Every undirected edge paired with the count of triangles it borders.
    pub fn edge_counts(&self) -> std::collections::HashMap<(usize, usize), usize> {
        let mut counts = std::collections::HashMap::new();
        for tri in &self.triangles {
            for i in 0..3 {
                let a = tri[i];
                let b = tri[(i + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Majority vertex class of a triangle's three vertices, queried on
    /// demand rather than stored redundantly.
    pub fn triangle_marker(&self, tri: [usize; 3]) -> VertexMarker {
        majority_marker([self.markers[tri[0]], self.markers[tri[1]], self.markers[tri[2]]])
    }
}
