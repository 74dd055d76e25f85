use serde::{Deserialize, Serialize};

use crate::geom::{Aabb2, Point2, Point3, Polygon2D};
use crate::raster::GridField2D;

/// A building: footprint, inferred height/ground level, and the point-cloud
/// points assigned to it. `height`/`ground_level` are mutated
/// exactly once by height inference; the point lists exactly once by
/// building-point assignment — both stages take a `City` by value and
/// return a new one rather than mutate it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub footprint: Polygon2D,
    pub height: f64,
    pub ground_level: f64,
    pub roof_points: Vec<Point3>,
    pub ground_points: Vec<Point3>,
}

impl Building {
    pub fn new(id: impl Into<String>, footprint: Polygon2D) -> Self {
        Building {
            id: id.into(),
            footprint,
            height: 0.0,
            ground_level: 0.0,
            roof_points: Vec::new(),
            ground_points: Vec::new(),
        }
    }

    pub fn centroid(&self) -> Point2 {
        self.footprint.centroid()
    }
}

/// A set of buildings plus the 2D domain bounding box and a georeferenced
/// origin; exposes a raster terrain once `terrain` has been built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub buildings: Vec<Building>,
    pub bounds: Aabb2,
    pub origin: Point2,
    pub terrain: Option<GridField2D>,
}

impl City {
    pub fn new(buildings: Vec<Building>, bounds: Aabb2, origin: Point2) -> Self {
        City { buildings, bounds, origin, terrain: None }
    }

    pub fn find(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }
}
