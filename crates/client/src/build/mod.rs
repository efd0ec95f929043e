//! Merging of multi-part loads into one canonical indexed mesh.
//!
//! Loaders hand over one or more sub-geometries per mesh; parts without an
//! index buffer are treated as triangle soup. Merging concatenates vertex
//! buffers in input order and offsets each part's indices by the number of
//! vertices merged before it.

mod scene;

pub use scene::{collect_leaves, merge_source, SceneNode, SubMeshSource};

use shared::{Geometry, GeometryError, SubGeometry};

/// Give a face-less part a sequential index buffer `[0, 1, .., n - 1]`.
pub fn normalize(part: SubGeometry) -> Geometry {
    let SubGeometry { vertices, indices } = part;
    let faces = match indices {
        Some(faces) => faces,
        None => {
            let vertex_count = vertices.len() / 3;
            if vertex_count % 3 != 0 {
                tracing::warn!(
                    "triangle soup with {vertex_count} vertices is not a whole number of triangles"
                );
            }
            (0..vertex_count as u32).collect()
        }
    };
    Geometry { vertices, faces }
}

/// Merge sub-geometries in order.
///
/// Returns `None` for an empty input. A single part is returned as-is
/// (after normalization). Fails if an offset index leaves the `u32` range.
pub fn merge_geometries(parts: Vec<SubGeometry>) -> Result<Option<Geometry>, GeometryError> {
    let mut parts = parts.into_iter().map(normalize);
    let Some(first) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<Geometry> = parts.collect();
    if rest.is_empty() {
        return Ok(Some(first));
    }

    let total_vertices = first.vertices.len() + rest.iter().map(|g| g.vertices.len()).sum::<usize>();
    let total_faces = first.faces.len() + rest.iter().map(|g| g.faces.len()).sum::<usize>();

    let mut merged = Geometry {
        vertices: Vec::with_capacity(total_vertices),
        faces: Vec::with_capacity(total_faces),
    };

    let mut offset: u32 = 0;
    for (index, part) in std::iter::once(first).chain(rest).enumerate() {
        let overflow = GeometryError::IndexOverflow { part: index };
        for &i in &part.faces {
            merged.faces.push(i.checked_add(offset).ok_or(overflow.clone())?);
        }
        merged.vertices.extend_from_slice(&part.vertices);
        offset = u32::try_from(part.vertex_count())
            .ok()
            .and_then(|n| offset.checked_add(n))
            .ok_or(overflow)?;
    }

    tracing::debug!(
        "merged {} vertices, {} triangles",
        merged.vertex_count(),
        merged.face_count()
    );
    Ok(Some(merged))
}
