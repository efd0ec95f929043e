//! Rigid alignment of several meshes onto the first one.
//!
//! Each mesh is reduced to one point per occupied voxel (the centroid of the
//! vertices falling into it), then translated so its reduced centroid lands
//! on the reduced centroid of the first mesh.

use std::collections::HashMap;

use glam::DVec3;
use shared::{Geometry, MeshId, RegistrationResponse, RowMajor};

use super::positions;

fn voxel_of(p: DVec3, voxel_size: f64) -> (i64, i64, i64) {
    (
        (p.x / voxel_size).floor() as i64,
        (p.y / voxel_size).floor() as i64,
        (p.z / voxel_size).floor() as i64,
    )
}

/// One point per occupied voxel, ordered by voxel coordinate.
pub fn voxel_downsample(points: &[DVec3], voxel_size: f64) -> Vec<DVec3> {
    let mut cells: HashMap<(i64, i64, i64), (DVec3, usize)> = HashMap::new();
    for &p in points {
        let cell = cells.entry(voxel_of(p, voxel_size)).or_insert((DVec3::ZERO, 0));
        cell.0 += p;
        cell.1 += 1;
    }

    let mut cells: Vec<_> = cells.into_iter().collect();
    cells.sort_unstable_by_key(|(key, _)| *key);
    cells
        .into_iter()
        .map(|(_, (sum, n))| sum / n as f64)
        .collect()
}

pub fn centroid(points: &[DVec3]) -> Option<DVec3> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().copied().sum::<DVec3>() / points.len() as f64)
}

/// Row-major homogeneous translation.
pub fn translation(t: DVec3) -> RowMajor {
    [
        [1.0, 0.0, 0.0, t.x],
        [0.0, 1.0, 0.0, t.y],
        [0.0, 0.0, 1.0, t.z],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

fn reduced_centroid(geometry: &Geometry, voxel_size: f64) -> Option<DVec3> {
    centroid(&voxel_downsample(&positions(geometry), voxel_size))
}

/// Transform for every mesh, keyed by id. The first mesh is the reference
/// and always gets identity, as does any mesh without vertices.
pub fn register_meshes(meshes: &[(MeshId, Geometry)], voxel_size: f64) -> RegistrationResponse {
    let mut transformations = HashMap::with_capacity(meshes.len());
    let Some(((reference_id, reference), rest)) = meshes.split_first() else {
        return RegistrationResponse { transformations };
    };

    let target = reduced_centroid(reference, voxel_size);
    transformations.insert(reference_id.clone(), translation(DVec3::ZERO));

    for (id, geometry) in rest {
        let offset = match (target, reduced_centroid(geometry, voxel_size)) {
            (Some(target), Some(source)) => target - source,
            _ => DVec3::ZERO,
        };
        tracing::debug!("register `{id}` -> `{reference_id}`: offset {offset}");
        transformations.insert(id.clone(), translation(offset));
    }

    RegistrationResponse { transformations }
}
