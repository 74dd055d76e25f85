use serde::{Deserialize, Serialize};

use super::{Point2, Point3};

/// Axis-aligned bounding box in the xy-plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Aabb2 {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        assert!(xmin <= xmax && ymin <= ymax, "inverted AABB");
        Aabb2 { xmin, ymin, xmax, ymax }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        self.contains_xy(p.x, p.y)
    }

    pub fn clamp_xy(&self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(self.xmin, self.xmax), y.clamp(self.ymin, self.ymax))
    }

    /// Expand the box on all sides by `margin`.
    pub fn expanded(&self, margin: f64) -> Aabb2 {
        Aabb2::new(
            self.xmin - margin,
            self.ymin - margin,
            self.xmax + margin,
            self.ymax + margin,
        )
    }

    /// Intersection of two boxes, or `None` if disjoint.
    pub fn intersect(&self, other: &Aabb2) -> Option<Aabb2> {
        let xmin = self.xmin.max(other.xmin);
        let ymin = self.ymin.max(other.ymin);
        let xmax = self.xmax.min(other.xmax);
        let ymax = self.ymax.min(other.ymax);
        if xmin <= xmax && ymin <= ymax {
            Some(Aabb2 { xmin, ymin, xmax, ymax })
        } else {
            None
        }
    }

    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.xmin, self.ymin),
            Point2::new(self.xmax, self.ymin),
            Point2::new(self.xmax, self.ymax),
            Point2::new(self.xmin, self.ymax),
        ]
    }
}

/// Axis-aligned bounding box in 3D, used for the volume mesh domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    pub min: (f64, f64, f64),
    pub max: (f64, f64, f64),
}

impl Aabb3 {
    pub fn from_2d(xy: Aabb2, zmin: f64, zmax: f64) -> Self {
        Aabb3 {
            min: (xy.xmin, xy.ymin, zmin),
            max: (xy.xmax, xy.ymax, zmax),
        }
    }

    pub fn contains_point(&self, p: Point3) -> bool {
        p.x >= self.min.0
            && p.x <= self.max.0
            && p.y >= self.min.1
            && p.y <= self.max.1
            && p.z >= self.min.2
            && p.z <= self.max.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_overlapping() {
        let a = Aabb2::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb2::new(5.0, 5.0, 20.0, 20.0);
        let i = a.intersect(&b).unwrap();
        assert_eq!(i, Aabb2::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = Aabb2::new(0.0, 0.0, 1.0, 1.0);
        let b = Aabb2::new(5.0, 5.0, 6.0, 6.0);
        assert!(a.intersect(&b).is_none());
    }
}
