//! Height inference: derives each building's `ground_level` and
//! `height` from the roof/ground points `assignment` gave it.

use crate::city::City;
use crate::errors::{MeshError, StageResult};
use crate::raster::GridField2D;

/// Linear-interpolated percentile of a sorted copy of `values`, clamped to
/// `[0, 1]`. Empty input has no defined percentile.
fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let p = p.clamp(0.0, 1.0);
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let t = rank - lo as f64;
        Some(sorted[lo] * (1.0 - t) + sorted[hi] * t)
    }
}

/// Infers `ground_level` and `height` for every building:
/// buildings with no roof points are floored at `min_building_height` and
/// take their `ground_level` straight from the terrain at the footprint
/// centroid; everything else takes `ground_level` from the median (or
/// `ground_percentile`) of ground samples, falling back to the terrain when
/// there are none, and `height` from `roof_percentile` of roof z minus
/// `ground_level`, floored at `min_building_height`. Consumes `city` by
/// value and returns a new one rather than mutate it in place.
pub fn infer_heights(city: City, terrain: &GridField2D, ground_percentile: f64, roof_percentile: f64, min_building_height: f64) -> StageResult<City> {
    let mut city = city;
    let mut warnings = Vec::new();

    for building in city.buildings.iter_mut() {
        let terrain_at_centroid = |warnings: &mut Vec<MeshError>| -> f64 {
            let centroid = building.centroid();
            let (z, warn) = terrain.eval(centroid.x, centroid.y);
            if let Some(w) = warn {
                warnings.push(w);
            }
            z
        };

        if building.roof_points.is_empty() {
            warnings.push(MeshError::NumericDegenerate(format!(
                "building {} has no roof points; falling back to the minimum building height",
                building.id
            )));
            building.ground_level = terrain_at_centroid(&mut warnings);
            building.height = min_building_height;
            continue;
        }

        let ground_zs: Vec<f64> = building.ground_points.iter().map(|p| p.z).collect();
        building.ground_level = percentile(&ground_zs, ground_percentile).unwrap_or_else(|| terrain_at_centroid(&mut warnings));

        let roof_zs: Vec<f64> = building.roof_points.iter().map(|p| p.z).collect();
        let roof_top = percentile(&roof_zs, roof_percentile).expect("checked non-empty above");
        building.height = (roof_top - building.ground_level).max(min_building_height);
    }

    StageResult::with_warnings(city, warnings)
}
