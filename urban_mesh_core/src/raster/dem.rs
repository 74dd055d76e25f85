use rayon::prelude::*;

use crate::errors::{MeshError, MeshResult, StageResult};
use crate::geom::{Aabb2, Point3};

use super::GridField2D;

/// Per-cell accumulator: sum of z and count of contributing points.
#[derive(Clone)]
struct Accumulator {
    sum: Vec<f64>,
    count: Vec<u32>,
}

impl Accumulator {
    fn new(n: usize) -> Self {
        Accumulator { sum: vec![0.0; n], count: vec![0; n] }
    }

    fn merge(mut self, other: Accumulator) -> Accumulator {
        for i in 0..self.sum.len() {
            self.sum[i] += other.sum[i];
            self.count[i] += other.count[i];
        }
        self
    }
}

/// Builds a DEM from ground points via a moving-window average.
/// Accumulation is parallelized over points with per-thread partial grids
/// reduced by an associative sum, then holes are filled.
pub fn build_dem(ground_points: &[Point3], bounds: Aabb2, cell_size: f64, window_size: u32) -> MeshResult<StageResult<GridField2D>> {
    if ground_points.is_empty() {
        return Err(MeshError::InvalidInput("no ground points to build a DEM from".into()));
    }
    if cell_size <= 0.0 {
        return Err(MeshError::InvalidInput("DEM cell size must be positive".into()));
    }

    let grid = GridField2D::new(bounds, cell_size);
    let n = grid.width * grid.height;
    let half_window = (window_size.max(1) as f64) / 2.0;

    let accum = ground_points
        .par_iter()
        .fold(
            || Accumulator::new(n),
            |mut acc, p| {
                let (ci, cj) = grid.containing_cell(p.x, p.y);
                let radius = half_window.ceil() as i32;
                for dj in -radius..=radius {
                    for di in -radius..=radius {
                        // Chebyshev distance <= half_window
                        if (di.abs() as f64).max(dj.abs() as f64) > half_window {
                            continue;
                        }
                        let ni = ci as i32 + di;
                        let nj = cj as i32 + dj;
                        if ni < 0 || nj < 0 || ni as usize >= grid.width || nj as usize >= grid.height {
                            continue;
                        }
                        let idx = nj as usize * grid.width + ni as usize;
                        acc.sum[idx] += p.z;
                        acc.count[idx] += 1;
                    }
                }
                acc
            },
        )
        .reduce(|| Accumulator::new(n), Accumulator::merge);

    let mut dem = grid;
    for idx in 0..n {
        if accum.count[idx] > 0 {
            dem.data[idx] = accum.sum[idx] / accum.count[idx] as f64;
        }
    }

    let mut warnings = Vec::new();
    if let Err(e) = dem.fill_holes() {
        warnings.push(e);
    }

    Ok(StageResult::with_warnings(dem, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ground_produces_flat_dem() {
        let bounds = Aabb2::new(0.0, 0.0, 10.0, 10.0);
        let pts: Vec<Point3> = (0..10)
            .flat_map(|i| (0..10).map(move |j| Point3::new(i as f64 + 0.5, j as f64 + 0.5, 42.0)))
            .collect();
        let out = build_dem(&pts, bounds, 1.0, 3).unwrap();
        for &v in &out.value.data {
            assert!((v - 42.0).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_points_is_invalid_input() {
        let bounds = Aabb2::new(0.0, 0.0, 10.0, 10.0);
        let err = build_dem(&[], bounds, 1.0, 3).unwrap_err();
        assert!(matches!(err, MeshError::InvalidInput(_)));
    }

    #[test]
    fn sparse_ground_still_fills_all_cells() {
        let bounds = Aabb2::new(0.0, 0.0, 20.0, 20.0);
        let pts = vec![Point3::new(1.0, 1.0, 5.0), Point3::new(18.0, 18.0, 15.0)];
        let out = build_dem(&pts, bounds, 1.0, 3).unwrap();
        assert!(out.value.data.iter().all(|v| *v != super::super::NO_DATA));
    }
}
