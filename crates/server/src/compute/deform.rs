//! Smooth modal perturbation of a surface along its vertex normals.

use glam::DVec3;
use shared::Geometry;

use super::{bounds, positions, triangle_cross};

/// Area-weighted vertex normals. Vertices not touched by any face, or whose
/// adjacent faces cancel out, get a zero normal.
pub fn vertex_normals(geometry: &Geometry) -> Vec<DVec3> {
    let points = positions(geometry);
    let mut normals = vec![DVec3::ZERO; points.len()];
    for [a, b, c] in geometry.triangles() {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let n = triangle_cross(points[a], points[b], points[c]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

/// Displacement profile at normalized height `u` in `[0, 1]`.
fn modal_profile(u: f64, modes: u32) -> f64 {
    if modes == 0 {
        return 0.0;
    }
    let sum: f64 = (0..modes)
        .map(|k| ((k + 1) as f64 * std::f64::consts::PI * u).sin())
        .sum();
    sum / modes as f64
}

/// Displace every vertex by `ratio * diagonal * profile(u)` along its
/// normal, where `u` is the vertex's normalized coordinate along the
/// longest bounding-box axis. Faces are left untouched.
pub fn deform(geometry: &Geometry, ratio: f64, modes: u32) -> Geometry {
    let points = positions(geometry);
    let Some((lo, hi)) = bounds(&points) else {
        return geometry.clone();
    };
    let extent = hi - lo;
    let diagonal = extent.length();
    let axis = (0..3)
        .max_by(|&a, &b| extent[a].total_cmp(&extent[b]))
        .unwrap_or(0);
    let span = extent[axis];

    let normals = vertex_normals(geometry);
    let vertices = points
        .iter()
        .zip(&normals)
        .flat_map(|(p, n)| {
            let u = if span > 0.0 { (p[axis] - lo[axis]) / span } else { 0.0 };
            let q = *p + *n * (ratio * diagonal * modal_profile(u, modes));
            [q.x as f32, q.y as f32, q.z as f32]
        })
        .collect();

    Geometry::new(vertices, geometry.faces.clone())
}
