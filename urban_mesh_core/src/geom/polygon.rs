use geo_types::{LineString, Polygon as GeoPolygon};
use serde::{Deserialize, Serialize};

use super::{dist, Aabb2, Point2};

/// Orientation of three consecutive points, or of a ring as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Robust-enough orientation test via the signed area of the triangle `a, b, c`.
/// Positive area means counter-clockwise.
pub fn orientation(a: Point2, b: Point2, c: Point2) -> Orientation {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if cross > 1e-12 {
        Orientation::CounterClockwise
    } else if cross < -1e-12 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

fn signed_area(ring: &[Point2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        sum += p.x * q.y - q.x * p.y;
    }
    sum / 2.0
}

fn ring_orientation(ring: &[Point2]) -> Orientation {
    let area = signed_area(ring);
    if area > 1e-12 {
        Orientation::CounterClockwise
    } else if area < -1e-12 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

fn reverse(ring: &mut Vec<Point2>) {
    ring.reverse();
}

/// Result of a point-in-polygon test that also distinguishes the boundary,
/// needed to tag ground-mesh vertices as `building-halo` rather than
/// `building-interior`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Inside,
    OnBoundary,
    Outside,
}

/// A 2D polygon: one outer ring (CCW) and zero or more hole rings (CW).
/// Canonicalizes orientation on construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon2D {
    pub outer: Vec<Point2>,
    pub holes: Vec<Vec<Point2>>,
}

impl Polygon2D {
    /// Builds a polygon, re-orienting the outer ring CCW and each hole CW
    /// if the reader handed them in the other way, so downstream code never
    /// has to check winding itself.
    pub fn new(mut outer: Vec<Point2>, mut holes: Vec<Vec<Point2>>) -> Self {
        if ring_orientation(&outer) == Orientation::Clockwise {
            reverse(&mut outer);
        }
        for hole in holes.iter_mut() {
            if ring_orientation(hole) == Orientation::CounterClockwise {
                reverse(hole);
            }
        }
        Polygon2D { outer, holes }
    }

    pub fn area(&self) -> f64 {
        let mut a = signed_area(&self.outer).abs();
        for hole in &self.holes {
            a -= signed_area(hole).abs();
        }
        a.max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.outer.len() < 3
    }

    pub fn bounds(&self) -> Aabb2 {
        let mut xmin = f64::INFINITY;
        let mut ymin = f64::INFINITY;
        let mut xmax = f64::NEG_INFINITY;
        let mut ymax = f64::NEG_INFINITY;
        for p in &self.outer {
            xmin = xmin.min(p.x);
            ymin = ymin.min(p.y);
            xmax = xmax.max(p.x);
            ymax = ymax.max(p.y);
        }
        Aabb2::new(xmin, ymin, xmax, ymax)
    }

    pub fn centroid(&self) -> Point2 {
        // Polygon centroid of the outer ring (holes ignored: buildings with
        // holes are rare enough in this domain that the outer centroid is an
        // acceptable approximation for sampling the DEM at "the" footprint
        // center, which is all height inference needs it for).
        let n = self.outer.len();
        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut area2 = 0.0;
        for i in 0..n {
            let p = self.outer[i];
            let q = self.outer[(i + 1) % n];
            let cross = p.x * q.y - q.x * p.y;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
            area2 += cross;
        }
        if area2.abs() < 1e-12 {
            let sx: f64 = self.outer.iter().map(|p| p.x).sum();
            let sy: f64 = self.outer.iter().map(|p| p.y).sum();
            return Point2::new(sx / n as f64, sy / n as f64);
        }
        Point2::new(cx / (3.0 * area2), cy / (3.0 * area2))
    }

    /// Every edge of every ring, as `(start, end)` pairs.
    pub fn edges(&self) -> Vec<(Point2, Point2)> {
        let mut out = Vec::new();
        for ring in std::iter::once(&self.outer).chain(self.holes.iter()) {
            let n = ring.len();
            for i in 0..n {
                out.push((ring[i], ring[(i + 1) % n]));
            }
        }
        out
    }

    pub fn to_geo(&self) -> GeoPolygon<f64> {
        let ext: LineString<f64> = self.outer.iter().map(|p| (p.x, p.y)).collect();
        let ints: Vec<LineString<f64>> = self
            .holes
            .iter()
            .map(|h| h.iter().map(|p| (p.x, p.y)).collect())
            .collect();
        GeoPolygon::new(ext, ints)
    }

    pub fn from_geo(poly: &GeoPolygon<f64>) -> Self {
        let outer: Vec<Point2> = poly.exterior().points().map(|p| Point2::new(p.x(), p.y())).collect();
        let holes: Vec<Vec<Point2>> = poly
            .interiors()
            .iter()
            .map(|r| r.points().map(|p| Point2::new(p.x(), p.y())).collect())
            .collect();
        Polygon2D::new(outer, holes)
    }
}

/// Distance from point `p` to segment `a-b`.
fn point_segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < 1e-20 {
        return dist(p, a);
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    dist(p, a + ab * t)
}

fn on_ring_boundary(ring: &[Point2], p: Point2, eps: f64) -> bool {
    let n = ring.len();
    for i in 0..n {
        if point_segment_distance(p, ring[i], ring[(i + 1) % n]) <= eps {
            return true;
        }
    }
    false
}

fn ray_cast_inside(ring: &[Point2], p: Point2) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = ring[i];
        let pj = ring[j];
        if ((pi.y > p.y) != (pj.y > p.y))
            && (p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Point-in-polygon test with holes, classifying boundary hits separately
/// so vertex marking can distinguish `building-halo` from `building-interior`.
pub fn point_in_polygon(poly: &Polygon2D, p: Point2, eps: f64) -> PointLocation {
    if on_ring_boundary(&poly.outer, p, eps) {
        return PointLocation::OnBoundary;
    }
    if !ray_cast_inside(&poly.outer, p) {
        return PointLocation::Outside;
    }
    for hole in &poly.holes {
        if on_ring_boundary(hole, p, eps) {
            return PointLocation::OnBoundary;
        }
        if ray_cast_inside(hole, p) {
            return PointLocation::Outside;
        }
    }
    PointLocation::Inside
}

/// Whether segments `p1-p2` and `p3-p4` intersect (including touching at an
/// endpoint), via the standard orientation-based test.
pub fn segments_intersect(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> bool {
    fn on_segment(p: Point2, q: Point2, r: Point2) -> bool {
        q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
    }

    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, p3, p2))
        || (o2 == Orientation::Collinear && on_segment(p1, p4, p2))
        || (o3 == Orientation::Collinear && on_segment(p3, p1, p4))
        || (o4 == Orientation::Collinear && on_segment(p3, p2, p4))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(side, 0.0),
            Point2::new(side, side),
            Point2::new(0.0, side),
        ]
    }

    #[test]
    fn constructor_canonicalizes_orientation() {
        let mut cw = square(10.0);
        cw.reverse();
        let poly = Polygon2D::new(cw, vec![]);
        assert_eq!(ring_orientation(&poly.outer), Orientation::CounterClockwise);
    }

    #[test]
    fn point_inside_and_outside() {
        let poly = Polygon2D::new(square(10.0), vec![]);
        assert_eq!(point_in_polygon(&poly, Point2::new(5.0, 5.0), 1e-9), PointLocation::Inside);
        assert_eq!(point_in_polygon(&poly, Point2::new(20.0, 5.0), 1e-9), PointLocation::Outside);
        assert_eq!(point_in_polygon(&poly, Point2::new(0.0, 5.0), 1e-6), PointLocation::OnBoundary);
    }

    #[test]
    fn point_in_hole_is_outside() {
        let hole = vec![
            Point2::new(3.0, 3.0),
            Point2::new(3.0, 7.0),
            Point2::new(7.0, 7.0),
            Point2::new(7.0, 3.0),
        ];
        let poly = Polygon2D::new(square(10.0), vec![hole]);
        assert_eq!(point_in_polygon(&poly, Point2::new(5.0, 5.0), 1e-9), PointLocation::Outside);
        assert_eq!(point_in_polygon(&poly, Point2::new(1.0, 1.0), 1e-9), PointLocation::Inside);
    }

    #[test]
    fn segment_intersection() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 10.0);
        let c = Point2::new(0.0, 10.0);
        let d = Point2::new(10.0, 0.0);
        assert!(segments_intersect(a, b, c, d));
        let e = Point2::new(20.0, 20.0);
        let f = Point2::new(30.0, 30.0);
        assert!(!segments_intersect(a, b, e, f));
    }

    #[test]
    fn area_matches_square() {
        let poly = Polygon2D::new(square(10.0), vec![]);
        assert!((poly.area() - 100.0).abs() < 1e-9);
    }
}
