//! Building-point assignment: sorts conditioned point-cloud
//! points into each building's roof candidates and ground samples, filters
//! the roof candidates, and records the survivors on the building.

use rayon::prelude::*;
use rstar::{primitives::GeomWithData, RTree, RTreeObject, AABB};

use crate::city::{Building, City};
use crate::errors::StageResult;
use crate::geom::{dist, point_in_polygon, Aabb2, Point2, Point3, PointLocation};
use crate::pointcloud::{ransac_plane_inliers, PointCloud};

type Indexed3 = GeomWithData<[f64; 3], usize>;

struct IndexedXy {
    index: usize,
    xy: [f64; 2],
}

impl RTreeObject for IndexedXy {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xy)
    }
}

fn distance_to_footprint(b: &Building, x: f64, y: f64) -> f64 {
    let p = Point2::new(x, y);
    b.footprint
        .edges()
        .into_iter()
        .map(|(a, c)| point_segment_distance(p, a, c))
        .fold(f64::INFINITY, f64::min)
}

fn point_segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < 1e-20 {
        return dist(p, a);
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    dist(p, a + ab * t)
}

/// Mean distance, per candidate, to its `k` nearest neighbours in 3D;
/// candidates whose mean distance exceeds the set's own mean by
/// `margin` standard deviations are dropped; the
/// per-building analogue of `pointcloud::outliers::remove_global_outliers`.
fn statistical_outlier_filter(points: &[Point3], k: usize, margin: f64) -> Vec<usize> {
    if points.len() <= k {
        return (0..points.len()).collect();
    }

    let tree: RTree<Indexed3> = RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| Indexed3::new([p.x, p.y, p.z], i))
            .collect(),
    );

    let mean_knn_distance: Vec<f64> = points
        .iter()
        .map(|p| {
            let query = [p.x, p.y, p.z];
            let sum: f64 = tree
                .nearest_neighbor_iter(&query)
                .skip(1) // the point itself
                .take(k)
                .map(|n| {
                    let d = [n.geom()[0] - query[0], n.geom()[1] - query[1], n.geom()[2] - query[2]];
                    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
                })
                .sum();
            sum / k as f64
        })
        .collect();

    let n = mean_knn_distance.len() as f64;
    let mean = mean_knn_distance.iter().sum::<f64>() / n;
    let variance = mean_knn_distance.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let threshold = mean + margin * std_dev;

    if std_dev == 0.0 {
        return (0..points.len()).collect();
    }

    mean_knn_distance
        .iter()
        .enumerate()
        .filter(|(_, d)| **d <= threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Parameters governing roof-candidate filtering.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentParams {
    pub ground_margin: f64,
    pub outlier_neighbors: usize,
    pub roof_outlier_margin: f64,
    pub ransac_outlier_remover: bool,
    pub ransac_outlier_margin: f64,
    pub ransac_iterations: u32,
}

/// Assigns each point of `cloud` to the building whose footprint contains
/// its (x, y) as a roof candidate, or that lies within `ground_margin`
/// outside the footprint as a ground sample, filters
/// roof candidates with statistical outlier removal and, optionally,
/// a RANSAC plane fit, and records the survivors.
/// Runs per-building in parallel; buildings are disjoint after
/// simplification so writes never alias.
pub fn assign_building_points(city: &City, cloud: &PointCloud, params: AssignmentParams) -> StageResult<City> {
    let tree: RTree<IndexedXy> = RTree::bulk_load(
        cloud
            .points
            .iter()
            .enumerate()
            .map(|(index, p)| IndexedXy { index, xy: [p.x, p.y] })
            .collect(),
    );

    let results: Vec<(Building, Vec<crate::errors::MeshError>)> = city
        .buildings
        .par_iter()
        .map(|building| {
            let mut warnings = Vec::new();
            let mut roof_candidates = Vec::new();
            let mut ground_samples = Vec::new();

            let search = building.footprint.bounds().expanded(params.ground_margin);
            let envelope = AABB::from_corners([search.xmin, search.ymin], [search.xmax, search.ymax]);

            for candidate in tree.locate_in_envelope(&envelope) {
                let p: Point3 = cloud.points[candidate.index];
                let loc = point_in_polygon(&building.footprint, Point2::new(p.x, p.y), 1e-6);
                match loc {
                    PointLocation::Inside | PointLocation::OnBoundary => roof_candidates.push(p),
                    PointLocation::Outside => {
                        if distance_to_footprint(building, p.x, p.y) <= params.ground_margin {
                            ground_samples.push(p);
                        }
                    }
                }
            }

            let sor_keep = statistical_outlier_filter(&roof_candidates, params.outlier_neighbors, params.roof_outlier_margin);
            let sor_survivors: Vec<Point3> = sor_keep.iter().map(|&i| roof_candidates[i]).collect();

            let roof_points = if params.ransac_outlier_remover {
                let ransac = ransac_plane_inliers(&sor_survivors, params.ransac_outlier_margin, params.ransac_iterations, building_seed(&building.id));
                warnings.extend(ransac.warnings);
                ransac.value.into_iter().map(|i| sor_survivors[i]).collect()
            } else {
                sor_survivors
            };

            let mut out = building.clone();
            out.roof_points = roof_points;
            out.ground_points = ground_samples;
            (out, warnings)
        })
        .collect();

    let mut city = city.clone();
    let mut warnings = Vec::new();
    let mut buildings = Vec::with_capacity(results.len());
    for (building, w) in results {
        warnings.extend(w);
        buildings.push(building);
    }
    city.buildings = buildings;

    StageResult::with_warnings(city, warnings)
}

/// Deterministic per-building RANSAC seed derived from its identifier, so
/// results are reproducible without a caller-supplied global seed.
fn building_seed(id: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}
