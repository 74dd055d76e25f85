/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T

The Urban Mesh Builder is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
//! Geometry kernel: 2D/3D primitives, bounding boxes, polygon predicates.

mod aabb;
mod point;
mod polygon;

pub use aabb::{Aabb2, Aabb3};
pub use point::{dist, Point2, Point3};
pub use polygon::{orientation, point_in_polygon, segments_intersect, Orientation, Polygon2D, PointLocation};
