use serde::{Deserialize, Serialize};

use crate::errors::{MeshError, MeshResult};
use crate::geom::{Aabb2, Point2, Point3};

/// Per-point LiDAR attributes. All optional: a reader without classification
/// or return metadata leaves the owning `PointCloud`'s attribute array
/// empty, rather than filling it with a sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointAttributes {
    pub classification: Option<u8>,
    pub return_number: Option<u8>,
    pub num_returns: Option<u8>,
}

pub const CLASS_GROUND: u8 = 2;
pub const CLASS_WATER: u8 = 9;

/// An ordered LiDAR point cloud plus a 2D origin offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloud {
    pub points: Vec<Point3>,
    pub attributes: Vec<PointAttributes>,
    pub origin: Point2,
}

impl PointCloud {
    /// Builds a cloud, enforcing the invariant that the attribute
    /// array is either empty or exactly as long as the point array.
    pub fn new(points: Vec<Point3>, attributes: Vec<PointAttributes>, origin: Point2) -> MeshResult<Self> {
        if !attributes.is_empty() && attributes.len() != points.len() {
            return Err(MeshError::InvalidInput(format!(
                "attribute array length {} does not match point array length {}",
                attributes.len(),
                points.len()
            )));
        }
        Ok(PointCloud { points, attributes, origin })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn has_classification(&self) -> bool {
        !self.attributes.is_empty() && self.attributes.iter().any(|a| a.classification.is_some())
    }

    /// Subset of `self` at the given indices, attributes carried along if present.
    pub fn subset(&self, indices: &[usize]) -> PointCloud {
        let points = indices.iter().map(|&i| self.points[i]).collect();
        let attributes = if self.attributes.is_empty() {
            Vec::new()
        } else {
            indices.iter().map(|&i| self.attributes[i]).collect()
        };
        PointCloud { points, attributes, origin: self.origin }
    }

    /// Points classified as ground (class 2) or water (class 9), or every
    /// point when classification is absent.
    pub fn ground_points(&self) -> Vec<Point3> {
        if !self.has_classification() {
            return self.points.clone();
        }
        self.points
            .iter()
            .zip(self.attributes.iter())
            .filter(|(_, a)| matches!(a.classification, Some(CLASS_GROUND) | Some(CLASS_WATER)))
            .map(|(p, _)| *p)
            .collect()
    }

    pub fn bounds_xy(&self) -> Aabb2 {
        let mut xmin = f64::INFINITY;
        let mut ymin = f64::INFINITY;
        let mut xmax = f64::NEG_INFINITY;
        let mut ymax = f64::NEG_INFINITY;
        for p in &self.points {
            xmin = xmin.min(p.x);
            ymin = ymin.min(p.y);
            xmax = xmax.max(p.x);
            ymax = ymax.max(p.y);
        }
        if self.points.is_empty() {
            return Aabb2::new(0.0, 0.0, 0.0, 0.0);
        }
        Aabb2::new(xmin, ymin, xmax, ymax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_attribute_length_is_invalid_input() {
        let pts = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)];
        let attrs = vec![PointAttributes::default()];
        let err = PointCloud::new(pts, attrs, Point2::new(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, MeshError::InvalidInput(_)));
    }

    #[test]
    fn ground_points_without_classification_is_all_points() {
        let pts = vec![Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 1.0, 2.0)];
        let cloud = PointCloud::new(pts.clone(), vec![], Point2::new(0.0, 0.0)).unwrap();
        assert_eq!(cloud.ground_points(), pts);
    }

    #[test]
    fn ground_points_filters_by_classification() {
        let pts = vec![
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 2.0),
            Point3::new(2.0, 2.0, 3.0),
        ];
        let attrs = vec![
            PointAttributes { classification: Some(2), ..Default::default() },
            PointAttributes { classification: Some(6), ..Default::default() },
            PointAttributes { classification: Some(9), ..Default::default() },
        ];
        let cloud = PointCloud::new(pts.clone(), attrs, Point2::new(0.0, 0.0)).unwrap();
        let ground = cloud.ground_points();
        assert_eq!(ground, vec![pts[0], pts[2]]);
    }
}
