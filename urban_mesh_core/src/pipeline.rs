/*
This file is part of the Urban Mesh Builder
Copyright (C) 2024 Novel-T
Licensed under the GNU General Public License v3.0 or later.
*/
//! End-to-end orchestration of the pipeline's stages:
//! point cloud -> conditioner -> (DEM, per-building points) -> simplified
//! city -> ground mesh -> layered volume mesh -> smoothed (ground) ->
//! trimmed -> smoothed (ground+buildings) -> boundary surface.

use log::info;

use crate::assignment::{assign_building_points, AssignmentParams};
use crate::city::{simplify_city, City};
use crate::errors::{MeshError, MeshResult, StageResult};
use crate::geom::Polygon2D;
use crate::height::infer_heights;
use crate::mesh2d::{build_ground_mesh, Mesh2D};
use crate::params::Parameters;
use crate::pointcloud::{remove_global_outliers, remove_vegetation, PointCloud};
use crate::raster::build_dem;
use crate::smoother::{smooth, DirichletMode};
use crate::trim::{boundary, open_surface, trim as trim_mesh, SurfaceMesh};
use crate::volume::{layer_mesh, VolumeMesh};

/// Every intermediate and final product of a full pipeline run, so a
/// caller (or test) can inspect any stage without re-running earlier ones.
pub struct PipelineOutput {
    pub city: City,
    pub ground_mesh: Mesh2D,
    pub volume_mesh: VolumeMesh,
    pub surface: SurfaceMesh,
    pub open_surface: SurfaceMesh,
}

/// Builds a `City` from footprints plus the conditioned point cloud's DEM
/// and per-building height inference, without going on to meshing
/// (the `build-city` CLI subcommand stops here).
pub fn build_city(raw_cloud: PointCloud, footprints: Vec<(String, Polygon2D, Option<f64>)>, params: &Parameters) -> MeshResult<StageResult<City>> {
    let mut warnings = Vec::new();

    let deveg = remove_vegetation(&raw_cloud);
    warnings.extend(deveg.warnings);
    let sor = if params.naive_vegetation_filter {
        remove_global_outliers(&deveg.value, params.outlier_margin)?
    } else {
        remove_global_outliers(&raw_cloud, params.outlier_margin)?
    };
    warnings.extend(sor.warnings);
    let cloud = sor.value;

    let footprint_bounds = footprints
        .iter()
        .map(|(_, poly, _)| poly.bounds())
        .reduce(|a, b| a.intersect(&b).unwrap_or(a))
        .unwrap_or_else(|| cloud.bounds_xy());
    let domain = params.resolve_domain(footprint_bounds, cloud.bounds_xy())?;

    let buildings: Vec<crate::city::Building> = footprints
        .into_iter()
        .map(|(id, poly, height)| {
            let mut b = crate::city::Building::new(id, poly);
            if let Some(h) = height {
                b.height = h;
            }
            b
        })
        .collect();

    let raw_city = City::new(buildings, domain, cloud.origin);
    let simplified = simplify_city(&raw_city, domain, params.min_building_distance, params.min_vertex_distance, params.min_building_size);
    warnings.extend(simplified.warnings);
    info!("build_city: {} buildings after simplification", simplified.value.buildings.len());

    let ground_points = cloud.ground_points();
    let dem = build_dem(&ground_points, domain, params.elevation_model_resolution, params.elevation_model_window_size)?;
    warnings.extend(dem.warnings);

    let assignment_params = AssignmentParams {
        ground_margin: params.ground_margin,
        outlier_neighbors: params.outlier_neighbors,
        roof_outlier_margin: params.roof_outlier_margin,
        ransac_outlier_remover: params.ransac_outlier_remover,
        ransac_outlier_margin: params.ransac_outlier_margin,
        ransac_iterations: params.ransac_iterations,
    };
    let assigned = assign_building_points(&simplified.value, &cloud, assignment_params);
    warnings.extend(assigned.warnings);

    let mut city = assigned.value;
    city.terrain = Some(dem.value.clone());

    let heighted = infer_heights(city, &dem.value, params.ground_percentile, params.roof_percentile, params.min_building_height);
    warnings.extend(heighted.warnings);

    Ok(StageResult::with_warnings(heighted.value, warnings))
}

/// Runs `build_city` and then the full meshing pipeline end to end
/// (`build-all`).
pub fn build_all(raw_cloud: PointCloud, footprints: Vec<(String, Polygon2D, Option<f64>)>, params: &Parameters) -> MeshResult<StageResult<PipelineOutput>> {
    let mut warnings = Vec::new();

    let city_result = build_city(raw_cloud, footprints, params)?;
    warnings.extend(city_result.warnings);
    let city = city_result.value;

    let terrain = city.terrain.clone().ok_or_else(|| MeshError::InvalidInput("city has no terrain; build_city must run first".into()))?;

    let ground_mesh_result = build_ground_mesh(&city, city.bounds, params.mesh_resolution);
    warnings.extend(ground_mesh_result.warnings);
    let ground_mesh = ground_mesh_result.value;

    let layered = layer_mesh(&ground_mesh, params.domain_height, params.mesh_resolution);
    warnings.extend(layered.warnings);

    let ground_smoothed = smooth(
        layered.value,
        &city,
        &terrain,
        DirichletMode::GroundOnly,
        params.domain_height,
        params.smoothing_max_iterations,
        params.smoothing_relative_tolerance,
    );
    warnings.extend(ground_smoothed.warnings);

    let trimmed = trim_mesh(&ground_smoothed.value, &city);
    warnings.extend(trimmed.warnings);

    let building_smoothed = smooth(
        trimmed.value,
        &city,
        &terrain,
        DirichletMode::GroundAndBuildings,
        params.domain_height,
        params.smoothing_max_iterations,
        params.smoothing_relative_tolerance,
    );
    warnings.extend(building_smoothed.warnings);

    let volume_mesh = building_smoothed.value;
    let surface = boundary(&volume_mesh);
    let open = open_surface(&surface);

    Ok(StageResult::with_warnings(
        PipelineOutput { city, ground_mesh, volume_mesh, surface, open_surface: open },
        warnings,
    ))
}
