//! Mesh cleanup: degenerate faces, duplicate faces, unreferenced vertices.

use std::collections::HashSet;
use std::fmt;

use shared::Geometry;

use super::{positions, triangle_cross};

/// Faces with area below this are dropped.
pub const MIN_FACE_AREA: f64 = 1e-12;

/// What a cleanup pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub degenerate_faces: usize,
    pub duplicate_faces: usize,
    pub unreferenced_vertices: usize,
}

impl fmt::Display for CleanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "removed {} degenerate faces, {} duplicate faces, {} unreferenced vertices",
            self.degenerate_faces, self.duplicate_faces, self.unreferenced_vertices
        )
    }
}

/// Drop faces with a repeated index or an area below [`MIN_FACE_AREA`].
pub fn remove_degenerate_faces(geometry: &mut Geometry) -> usize {
    let points = positions(geometry);
    let before = geometry.face_count();
    let kept: Vec<u32> = geometry
        .triangles()
        .filter(|&[a, b, c]| {
            if a == b || b == c || a == c {
                return false;
            }
            let area = triangle_cross(points[a as usize], points[b as usize], points[c as usize])
                .length()
                * 0.5;
            area >= MIN_FACE_AREA
        })
        .flatten()
        .collect();
    geometry.faces = kept;
    before - geometry.face_count()
}

/// Drop faces using the same vertex set as an earlier face, in any order
/// or winding.
pub fn remove_duplicate_faces(geometry: &mut Geometry) -> usize {
    let before = geometry.face_count();
    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(before);
    let kept: Vec<u32> = geometry
        .triangles()
        .filter(|face| {
            let mut key = *face;
            key.sort_unstable();
            seen.insert(key)
        })
        .flatten()
        .collect();
    geometry.faces = kept;
    before - geometry.face_count()
}

/// Drop vertices no face references and remap indices, preserving the
/// order of the survivors.
pub fn remove_unreferenced_vertices(geometry: &mut Geometry) -> usize {
    let count = geometry.vertex_count();
    let mut referenced = vec![false; count];
    for &i in &geometry.faces {
        referenced[i as usize] = true;
    }

    let mut remap = vec![u32::MAX; count];
    let mut vertices = Vec::with_capacity(geometry.vertices.len());
    for (old, _) in referenced.iter().enumerate().filter(|(_, used)| **used) {
        remap[old] = (vertices.len() / 3) as u32;
        vertices.extend_from_slice(&geometry.vertices[old * 3..old * 3 + 3]);
    }

    for i in &mut geometry.faces {
        *i = remap[*i as usize];
    }
    geometry.vertices = vertices;
    count - geometry.vertex_count()
}

/// Run every cleanup step in order. Input must be a valid geometry.
pub fn clean(geometry: &Geometry) -> (Geometry, CleanReport) {
    let mut out = geometry.clone();
    let report = CleanReport {
        degenerate_faces: remove_degenerate_faces(&mut out),
        duplicate_faces: remove_duplicate_faces(&mut out),
        unreferenced_vertices: remove_unreferenced_vertices(&mut out),
    };
    (out, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Geometry {
        Geometry::new(
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
            vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
        )
    }

    #[test]
    fn test_clean_mesh_is_unchanged() {
        let g = tetrahedron();
        let (cleaned, report) = clean(&g);
        assert_eq!(cleaned, g);
        assert_eq!(report, CleanReport::default());
    }

    #[test]
    fn test_remove_degenerate() {
        let mut g = tetrahedron();
        g.vertices.extend_from_slice(&[2.0, 0.0, 0.0]);
        // repeated index, then collinear (0, 1, 4 all on the X axis)
        g.faces.extend_from_slice(&[0, 0, 1, 0, 1, 4]);
        assert_eq!(remove_degenerate_faces(&mut g), 2);
        assert_eq!(g.faces, tetrahedron().faces);
    }

    #[test]
    fn test_remove_duplicates_any_winding() {
        let mut g = tetrahedron();
        g.faces.extend_from_slice(&[1, 2, 0, 3, 2, 1]);
        assert_eq!(remove_duplicate_faces(&mut g), 2);
        assert_eq!(g.face_count(), 4);
    }

    #[test]
    fn test_remove_unreferenced_remaps() {
        let mut g = Geometry::new(
            vec![
                9.0, 9.0, 9.0, //
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            vec![1, 2, 3],
        );
        assert_eq!(remove_unreferenced_vertices(&mut g), 1);
        assert_eq!(g.faces, vec![0, 1, 2]);
        assert_eq!(g.position(0), [0.0, 0.0, 0.0]);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_clean_full_pass() {
        let mut g = tetrahedron();
        g.vertices.extend_from_slice(&[2.0, 0.0, 0.0, 5.0, 5.0, 5.0]);
        g.faces.extend_from_slice(&[0, 0, 1, 0, 1, 4, 0, 2, 1]);
        let (cleaned, report) = clean(&g);
        assert_eq!(
            report,
            CleanReport {
                degenerate_faces: 2,
                duplicate_faces: 1,
                unreferenced_vertices: 2,
            }
        );
        assert_eq!(cleaned, tetrahedron());
    }
}
