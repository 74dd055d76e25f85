use nalgebra::{Point2 as NaPoint2, Point3 as NaPoint3};

/// A 2D point, kept as a thin alias over nalgebra so the rest of the crate
/// gets vector arithmetic (`-`, `+`, norms) for free.
pub type Point2 = NaPoint2<f64>;

/// A 3D point.
pub type Point3 = NaPoint3<f64>;

/// Euclidean distance between two 2D points.
pub fn dist(a: Point2, b: Point2) -> f64 {
    (a - b).norm()
}
