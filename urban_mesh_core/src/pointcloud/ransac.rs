use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

use crate::errors::{MeshError, StageResult};
use crate::geom::Point3;

/// Fits a plane through 3 points and returns `(normal, point_on_plane)`,
/// or `None` if the points are collinear (degenerate sample).
fn fit_plane(a: Point3, b: Point3, c: Point3) -> Option<(Vector3<f64>, Point3)> {
    let ab = b - a;
    let ac = c - a;
    let normal = ab.cross(&ac);
    let len = normal.norm();
    if len < 1e-9 {
        return None;
    }
    Some((normal / len, a))
}

fn perpendicular_distance(p: Point3, normal: Vector3<f64>, origin: Point3) -> f64 {
    (p - origin).dot(&normal).abs()
}

/// RANSAC plane outlier remover. Runs `iterations` trials, each
/// fitting a plane to 3 sampled points and scoring it by inlier count within
/// `margin` perpendicular distance; returns the inlier set of the best
/// plane. Fewer than 3 points is a documented skip, not an error.
pub fn ransac_plane_inliers(points: &[Point3], margin: f64, iterations: u32, seed: u64) -> StageResult<Vec<usize>> {
    if points.len() < 3 {
        let all: Vec<usize> = (0..points.len()).collect();
        let msg = format!("RANSAC skipped: only {} candidate point(s)", points.len());
        return StageResult::with_warnings(all, vec![MeshError::NumericDegenerate(msg)]);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut best_inliers: Vec<usize> = Vec::new();
    let mut degenerate_trials = 0u32;

    for _ in 0..iterations.max(1) {
        let idx = sample(&mut rng, points.len(), 3);
        let (i0, i1, i2) = (idx.index(0), idx.index(1), idx.index(2));
        let plane = match fit_plane(points[i0], points[i1], points[i2]) {
            Some(p) => p,
            None => {
                degenerate_trials += 1;
                continue;
            }
        };
        let (normal, origin) = plane;

        let inliers: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| perpendicular_distance(**p, normal, origin) <= margin)
            .map(|(i, _)| i)
            .collect();

        if inliers.len() > best_inliers.len() {
            best_inliers = inliers;
        }
    }

    let mut warnings = Vec::new();
    if best_inliers.is_empty() {
        warnings.push(MeshError::NumericDegenerate(format!(
            "RANSAC found no valid plane in {} trials ({} degenerate samples)",
            iterations, degenerate_trials
        )));
        best_inliers = (0..points.len()).collect();
    }

    StageResult::with_warnings(best_inliers, warnings)
}
