use serde::{Deserialize, Serialize};

use crate::errors::MeshError;
use crate::geom::Aabb2;

/// Sentinel for "no data", matching the GDAL-backed raster-stats convention
/// of a `no_data_value: f64` that defaults to `f64::MIN` when a
/// dataset does not carry one.
pub const NO_DATA: f64 = f64::MIN;

/// A regular 2D grid of `f64` samples over an AABB, stored row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridField2D {
    pub bounds: Aabb2,
    pub dx: f64,
    pub dy: f64,
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
}

impl GridField2D {
    pub fn new(bounds: Aabb2, cell_size: f64) -> Self {
        let width = (bounds.width() / cell_size).ceil().max(1.0) as usize;
        let height = (bounds.height() / cell_size).ceil().max(1.0) as usize;
        GridField2D {
            bounds,
            dx: cell_size,
            dy: cell_size,
            width,
            height,
            data: vec![NO_DATA; width * height],
        }
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.width + i
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        let idx = self.index(i, j);
        self.data[idx] = v;
    }

    pub fn is_no_data(&self, v: f64) -> bool {
        v == NO_DATA
    }

    /// Cell-center coordinates for cell `(i, j)`.
    pub fn cell_center(&self, i: usize, j: usize) -> (f64, f64) {
        (
            self.bounds.xmin + (i as f64 + 0.5) * self.dx,
            self.bounds.ymin + (j as f64 + 0.5) * self.dy,
        )
    }

    /// The cell containing `(x, y)`, clamped to the grid.
    pub fn containing_cell(&self, x: f64, y: f64) -> (usize, usize) {
        let fx = ((x - self.bounds.xmin) / self.dx).floor();
        let fy = ((y - self.bounds.ymin) / self.dy).floor();
        let i = fx.clamp(0.0, (self.width - 1) as f64) as usize;
        let j = fy.clamp(0.0, (self.height - 1) as f64) as usize;
        (i, j)
    }

    /// Bilinear evaluation at `(x, y)`. Points outside the AABB
    /// are clamped to the boundary and the clamp is reported via the
    /// returned `MeshError::OutOfDomain`, a debug-level event rather than
    /// a hard failure.
    pub fn eval(&self, x: f64, y: f64) -> (f64, Option<MeshError>) {
        let out_of_domain = !self.bounds.contains_xy(x, y);
        let (cx, cy) = self.bounds.clamp_xy(x, y);

        // Work in cell-center space so sampling exactly at a node reproduces
        // the stored value.
        let fx = ((cx - self.bounds.xmin) / self.dx - 0.5).clamp(0.0, (self.width - 1) as f64);
        let fy = ((cy - self.bounds.ymin) / self.dy - 0.5).clamp(0.0, (self.height - 1) as f64);

        let i0 = fx.floor() as usize;
        let j0 = fy.floor() as usize;
        let i1 = (i0 + 1).min(self.width - 1);
        let j1 = (j0 + 1).min(self.height - 1);
        let tx = fx - i0 as f64;
        let ty = fy - j0 as f64;

        let v00 = self.get(i0, j0);
        let v10 = self.get(i1, j0);
        let v01 = self.get(i0, j1);
        let v11 = self.get(i1, j1);

        let top = v00 * (1.0 - tx) + v10 * tx;
        let bottom = v01 * (1.0 - tx) + v11 * tx;
        let value = top * (1.0 - ty) + bottom * ty;

        let warning = if out_of_domain { Some(MeshError::OutOfDomain { x, y }) } else { None };
        (value, warning)
    }

    pub fn mean(&self) -> f64 {
        let valid: Vec<f64> = self.data.iter().copied().filter(|v| *v != NO_DATA).collect();
        if valid.is_empty() {
            0.0
        } else {
            valid.iter().sum::<f64>() / valid.len() as f64
        }
    }

    /// Iteratively fills no-data cells from the mean of their valid
    /// 8-neighbours, bounded by `max(width, height)` iterations.
    pub fn fill_holes(&mut self) -> Result<(), MeshError> {
        let max_iterations = self.width.max(self.height).max(1);
        for _ in 0..max_iterations {
            let mut changed = false;
            let mut next = self.data.clone();

            for j in 0..self.height {
                for i in 0..self.width {
                    if !self.is_no_data(self.get(i, j)) {
                        continue;
                    }
                    let mut sum = 0.0;
                    let mut count = 0usize;
                    for dj in -1i32..=1 {
                        for di in -1i32..=1 {
                            if di == 0 && dj == 0 {
                                continue;
                            }
                            let ni = i as i32 + di;
                            let nj = j as i32 + dj;
                            if ni < 0 || nj < 0 || ni as usize >= self.width || nj as usize >= self.height {
                                continue;
                            }
                            let v = self.get(ni as usize, nj as usize);
                            if !self.is_no_data(v) {
                                sum += v;
                                count += 1;
                            }
                        }
                    }
                    if count > 0 {
                        next[self.index(i, j)] = sum / count as f64;
                        changed = true;
                    }
                }
            }

            self.data = next;
            if !changed || !self.data.iter().any(|v| *v == NO_DATA) {
                break;
            }
        }

        if self.data.iter().any(|v| *v == NO_DATA) {
            return Err(MeshError::IterationLimit { stage: "fill_holes", iterations: max_iterations });
        }
        Ok(())
    }
}
