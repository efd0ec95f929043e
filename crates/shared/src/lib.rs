use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod ply;
pub mod transform;

pub use error::{FormatError, GeometryError};
pub use transform::{row_major_to_column_major, ColumnMajor, RowMajor, IDENTITY};

/// Уникальный идентификатор меша в сессии
pub type MeshId = String;

/// Шаг вокселя по умолчанию для выравнивания на сервере
pub const DEFAULT_VOXEL_SIZE: f64 = 0.05;

/// Снимок геометрии: плоский буфер вершин (x, y, z) и индексы треугольников
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub vertices: Vec<f32>,
    pub faces: Vec<u32>,
}

impl Geometry {
    pub fn new(vertices: Vec<f32>, faces: Vec<u32>) -> Self {
        Self { vertices, faces }
    }

    /// Number of vertices (3 floats each)
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles (3 indices each)
    pub fn face_count(&self) -> usize {
        self.faces.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Position of vertex `i`
    pub fn position(&self, i: usize) -> [f32; 3] {
        let base = i * 3;
        [
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        ]
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.faces.chunks_exact(3).map(|f| [f[0], f[1], f[2]])
    }

    /// Check buffer strides and index range.
    pub fn validate(&self) -> Result<(), GeometryError> {
        validate_buffers(&self.vertices, &self.faces)
    }
}

/// Check that `vertices` and `faces` form a well-formed indexed triangle mesh.
pub fn validate_buffers(vertices: &[f32], faces: &[u32]) -> Result<(), GeometryError> {
    if vertices.len() % 3 != 0 {
        return Err(GeometryError::VertexStride { len: vertices.len() });
    }
    if faces.len() % 3 != 0 {
        return Err(GeometryError::FaceStride { len: faces.len() });
    }
    let vertex_count = vertices.len() / 3;
    if let Some((position, &index)) = faces
        .iter()
        .enumerate()
        .find(|&(_, &i)| i as usize >= vertex_count)
    {
        return Err(GeometryError::IndexOutOfRange {
            position,
            index,
            vertex_count,
        });
    }
    Ok(())
}

/// Подгеометрия от загрузчика: индексы могут отсутствовать
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubGeometry {
    pub vertices: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
}

impl SubGeometry {
    pub fn indexed(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices: Some(indices),
        }
    }

    /// Triangle soup: every 3 consecutive vertices form one triangle
    pub fn soup(vertices: Vec<f32>) -> Self {
        Self {
            vertices,
            indices: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

impl From<Geometry> for SubGeometry {
    fn from(g: Geometry) -> Self {
        Self::indexed(g.vertices, g.faces)
    }
}

// ── Remote service wire types ──────────────────────────────────

/// Имя multipart-поля с закодированным мешем
pub const MESH_FIELD: &str = "mesh";
pub const VOXEL_SIZE_FIELD: &str = "voxel_size";
pub const DEFORMATION_RATIO_FIELD: &str = "deformation_ratio";
pub const NUMBER_OF_MODES_FIELD: &str = "number_of_modes";

/// Ответ сервиса выравнивания
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub transformations: HashMap<MeshId, RowMajor>,
}

/// Параметры деформации
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeformationParams {
    pub ratio: f64,
    pub modes: u32,
}

impl Default for DeformationParams {
    fn default() -> Self {
        Self {
            ratio: 0.1,
            modes: 4,
        }
    }
}

/// File name used for a mesh part: `<meshId>.ply`
pub fn mesh_file_name(id: &str) -> String {
    format!("{id}.ply")
}

/// Recover the mesh id from a part file name, stripping a trailing `.ply`.
pub fn mesh_id_from_file_name(name: &str) -> MeshId {
    name.strip_suffix(".ply").unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        let g = Geometry::new(vec![0.0; 9], vec![0, 1, 2]);
        assert!(g.validate().is_ok());
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.face_count(), 1);
    }

    #[test]
    fn test_validate_out_of_range() {
        let g = Geometry::new(vec![0.0; 9], vec![0, 1, 3]);
        match g.validate() {
            Err(GeometryError::IndexOutOfRange {
                position, index, ..
            }) => {
                assert_eq!(position, 2);
                assert_eq!(index, 3);
            }
            other => panic!("Expected IndexOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_strides() {
        assert!(matches!(
            validate_buffers(&[0.0; 4], &[]),
            Err(GeometryError::VertexStride { len: 4 })
        ));
        assert!(matches!(
            validate_buffers(&[0.0; 9], &[0, 1]),
            Err(GeometryError::FaceStride { len: 2 })
        ));
    }

    #[test]
    fn test_mesh_file_name_roundtrip() {
        assert_eq!(mesh_file_name("scan_a"), "scan_a.ply");
        assert_eq!(mesh_id_from_file_name("scan_a.ply"), "scan_a");
        assert_eq!(mesh_id_from_file_name("noext"), "noext");
    }

    #[test]
    fn test_registration_response_json() {
        let json = r#"{"transformations": {"a": [[1,0,0,5],[0,1,0,6],[0,0,1,7],[0,0,0,1]]}}"#;
        let resp: RegistrationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.transformations["a"][0][3], 5.0);
    }
}
