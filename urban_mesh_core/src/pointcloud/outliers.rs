use log::warn;

use crate::errors::{MeshError, MeshResult, StageResult};

use super::PointCloud;

/// Global statistical outlier removal on z. Retains every point
/// whose z lies within `margin` standard deviations of the mean. A no-op
/// when the cloud has zero z-variance, not an
/// error: every point trivially satisfies the bound.
pub fn remove_global_outliers(cloud: &PointCloud, margin: f64) -> MeshResult<StageResult<PointCloud>> {
    if cloud.is_empty() {
        return Err(MeshError::InvalidInput("point cloud is empty".into()));
    }

    let n = cloud.len() as f64;
    let mean: f64 = cloud.points.iter().map(|p| p.z).sum::<f64>() / n;
    let variance: f64 = cloud.points.iter().map(|p| (p.z - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return Ok(StageResult::ok(cloud.clone()));
    }

    let lo = mean - margin * std_dev;
    let hi = mean + margin * std_dev;

    let indices: Vec<usize> = cloud
        .points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.z >= lo && p.z <= hi)
        .map(|(i, _)| i)
        .collect();

    Ok(StageResult::ok(cloud.subset(&indices)))
}

/// Naive vegetation filter: a point is vegetation iff it is not
/// the last of multiple returns. When return metadata is missing this is a
/// no-op and a warning is reported rather than silently dropping nothing.
pub fn remove_vegetation(cloud: &PointCloud) -> StageResult<PointCloud> {
    if cloud.attributes.is_empty() || cloud.attributes.iter().all(|a| a.num_returns.is_none()) {
        warn!("vegetation filter: return metadata missing, no-op");
        let msg = "vegetation filter skipped: no return-number/num-returns metadata".to_string();
        return StageResult::with_warnings(cloud.clone(), vec![MeshError::NumericDegenerate(msg)]);
    }

    let indices: Vec<usize> = cloud
        .attributes
        .iter()
        .enumerate()
        .filter(|(_, a)| {
            let is_vegetation = match (a.num_returns, a.return_number) {
                (Some(num_returns), Some(return_number)) => num_returns > 1 && return_number < num_returns,
                _ => false,
            };
            !is_vegetation
        })
        .map(|(i, _)| i)
        .collect();

    StageResult::ok(cloud.subset(&indices))
}

#[cfg(test)]
mod tests {
    use crate::geom::{Point2, Point3};
    use crate::pointcloud::PointAttributes;

    use super::*;

    fn make_cloud(zs: &[f64]) -> PointCloud {
        let pts = zs.iter().map(|&z| Point3::new(0.0, 0.0, z)).collect();
        PointCloud::new(pts, vec![], Point2::new(0.0, 0.0)).unwrap()
    }

    #[test]
    fn constant_z_is_fixed_point() {
        let cloud = make_cloud(&[5.0; 10]);
        let out = remove_global_outliers(&cloud, 1.0).unwrap();
        assert_eq!(out.value.len(), cloud.len());
    }

    #[test]
    fn drops_points_outside_margin() {
        let mut zs = vec![10.0; 99];
        zs.push(1000.0);
        let cloud = make_cloud(&zs);
        let out = remove_global_outliers(&cloud, 1.0).unwrap();
        assert!(out.value.len() < cloud.len());
        assert!(out.value.points.iter().all(|p| p.z == 10.0));
    }

    #[test]
    fn idempotent_once_margin_covers_all_z_scores() {
        let zs: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let cloud = make_cloud(&zs);
        let first = remove_global_outliers(&cloud, 10.0).unwrap().value;
        let second = remove_global_outliers(&first, 10.0).unwrap().value;
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn vegetation_filter_noop_without_metadata() {
        let cloud = make_cloud(&[1.0, 2.0, 3.0]);
        let out = remove_vegetation(&cloud);
        assert_eq!(out.value.len(), cloud.len());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn vegetation_filter_drops_non_last_returns() {
        let pts = vec![Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, 2.0), Point3::new(0.0, 0.0, 3.0)];
        let attrs = vec![
            PointAttributes { num_returns: Some(2), return_number: Some(1), ..Default::default() },
            PointAttributes { num_returns: Some(2), return_number: Some(2), ..Default::default() },
            PointAttributes { num_returns: Some(1), return_number: Some(1), ..Default::default() },
        ];
        let cloud = PointCloud::new(pts, attrs, Point2::new(0.0, 0.0)).unwrap();
        let out = remove_vegetation(&cloud);
        assert_eq!(out.value.len(), 2);
        assert!(out.warnings.is_empty());
    }
}
