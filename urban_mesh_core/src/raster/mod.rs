/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! Regular 2D grid of scalars with bilinear sampling and hole filling,
//! and DEM construction from ground points.

mod dem;
mod gridfield;

pub use dem::build_dem;
pub use gridfield::{GridField2D, NO_DATA};
