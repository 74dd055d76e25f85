/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! City model (buildings + terrain) and the footprint simplifier that
//! clips, merges, and filters raw footprints into it.

mod model;
mod simplify;

pub use model::{Building, City};
pub use simplify::simplify_city;
