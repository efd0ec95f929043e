//! Mesh computations behind the HTTP endpoints.
//!
//! Everything here is synchronous and CPU-bound; handlers run it on the
//! blocking pool.

pub mod align;
pub mod clean;
pub mod deform;

use glam::DVec3;
use shared::Geometry;

/// Vertex positions widened to f64.
pub fn positions(geometry: &Geometry) -> Vec<DVec3> {
    geometry
        .vertices
        .chunks_exact(3)
        .map(|p| DVec3::new(p[0].into(), p[1].into(), p[2].into()))
        .collect()
}

/// Twice the area vector of triangle `abc` (cross product of its edges).
pub fn triangle_cross(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a)
}

/// Axis-aligned bounds, `None` for an empty point set.
pub fn bounds(points: &[DVec3]) -> Option<(DVec3, DVec3)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
    )
}
