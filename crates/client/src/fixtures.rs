//! Factory functions for creating test geometry.
//!
//! Provides small canonical meshes used in tests and by the command
//! protocol examples.

use shared::{Geometry, SubGeometry};

use crate::build::SceneNode;

/// Single right triangle in the XY plane.
pub fn triangle() -> Geometry {
    Geometry::new(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        vec![0, 1, 2],
    )
}

/// Unit quad in the XY plane (4 vertices, 2 triangles).
pub fn quad() -> Geometry {
    Geometry::new(
        vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

/// Corner tetrahedron spanning the unit axes.
pub fn tetrahedron() -> Geometry {
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

/// Axis-aligned cube of edge `size` centered at the origin (8 vertices, 12 triangles).
pub fn cube(size: f32) -> Geometry {
    let h = size * 0.5;
    let vertices = vec![
        -h, -h, -h, //
        h, -h, -h, //
        h, h, -h, //
        -h, h, -h, //
        -h, -h, h, //
        h, -h, h, //
        h, h, h, //
        -h, h, h,
    ];
    let faces = vec![
        0, 2, 1, 0, 3, 2, // -Z
        4, 5, 6, 4, 6, 7, // +Z
        0, 1, 5, 0, 5, 4, // -Y
        3, 7, 6, 3, 6, 2, // +Y
        0, 4, 7, 0, 7, 3, // -X
        1, 2, 6, 1, 6, 5, // +X
    ];
    Geometry::new(vertices, faces)
}

/// Tetrahedron plus two degenerate triangles and one unreferenced vertex.
///
/// Faces 4 (repeated index) and 5 (collinear) are degenerate; vertices 4 and 5
/// are only used by degenerate faces or not at all.
pub fn with_degenerate_faces() -> Geometry {
    let mut g = tetrahedron();
    g.vertices.extend_from_slice(&[2.0, 0.0, 0.0, 5.0, 5.0, 5.0]);
    g.faces.extend_from_slice(&[0, 0, 1, 0, 1, 4]);
    g
}

/// Copy of `geometry` shifted by `offset`.
pub fn translated(geometry: &Geometry, offset: [f32; 3]) -> Geometry {
    let vertices = geometry
        .vertices
        .chunks_exact(3)
        .flat_map(|p| [p[0] + offset[0], p[1] + offset[1], p[2] + offset[2]])
        .collect();
    Geometry::new(vertices, geometry.faces.clone())
}

/// Two-level scene: a group holding an indexed quad and a soup triangle.
pub fn two_part_scene() -> SceneNode {
    SceneNode::group(
        "root",
        vec![
            SceneNode::group("body", vec![SceneNode::leaf(quad())]),
            SceneNode::leaf(SubGeometry::soup(translated(&triangle(), [0.0, 0.0, 1.0]).vertices)),
        ],
    )
}
