/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Point-cloud conditioning: global outlier removal, vegetation filtering,
//! per-building RANSAC plane outlier removal.

mod cloud;
mod outliers;
mod ransac;

pub use cloud::{PointAttributes, PointCloud};
pub use outliers::{remove_global_outliers, remove_vegetation};
pub use ransac::ransac_plane_inliers;
