//! Mesh validation utilities.
//!
//! `MeshValidator` provides methods to check geometry integrity:
//! buffer strides, in-range indices, degenerate triangles, bounding box, etc.

use shared::Geometry;

/// Validator for `Geometry` integrity checks.
pub struct MeshValidator<'a> {
    geometry: &'a Geometry,
}

impl<'a> MeshValidator<'a> {
    /// Create a new validator for the given geometry.
    pub fn new(geometry: &'a Geometry) -> Self {
        Self { geometry }
    }

    /// Number of vertices (vertex buffer length / 3).
    pub fn vertex_count(&self) -> usize {
        self.geometry.vertices.len() / 3
    }

    /// Number of triangles (face buffer length / 3).
    pub fn triangle_count(&self) -> usize {
        self.geometry.faces.len() / 3
    }

    /// Check that the vertex buffer length is a multiple of 3.
    pub fn is_stride_valid(&self) -> bool {
        self.geometry.vertices.len() % 3 == 0
    }

    /// Check that the face buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.geometry.faces.len() % 3 == 0
    }

    /// Check that all indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.geometry.faces.iter().all(|&i| i < max_idx)
    }

    /// Indices of triangles with repeated vertices or area at most `area_epsilon`.
    pub fn degenerate_triangles(&self, area_epsilon: f32) -> Vec<usize> {
        if !self.are_indices_in_range() {
            return Vec::new();
        }
        self.geometry
            .triangles()
            .enumerate()
            .filter(|(_, [a, b, c])| {
                if a == b || b == c || a == c {
                    return true;
                }
                let p0 = glam::Vec3::from(self.geometry.position(*a as usize));
                let p1 = glam::Vec3::from(self.geometry.position(*b as usize));
                let p2 = glam::Vec3::from(self.geometry.position(*c as usize));
                (p1 - p0).cross(p2 - p0).length() * 0.5 <= area_epsilon
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Axis-aligned bounds `(min, max)`, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut points = self.geometry.vertices.chunks_exact(3);
        let first = points.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for p in points {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Some((min, max))
    }

    /// Compute the dimensions (width, height, depth) of the bounding box.
    pub fn dimensions(&self) -> [f32; 3] {
        match self.bounds() {
            Some((min, max)) => [max[0] - min[0], max[1] - min[1], max[2] - min[2]],
            None => [0.0; 3],
        }
    }

    /// Check that the bounding box dimensions are approximately equal to `expected`.
    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        (0..3).all(|i| (dims[i] - expected[i]).abs() < tolerance)
    }

    /// Run all checks and return a list of problems (empty means valid).
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.is_stride_valid() {
            errors.push(format!(
                "vertex buffer length {} is not a multiple of 3",
                self.geometry.vertices.len()
            ));
        }
        if !self.is_index_stride_valid() {
            errors.push(format!(
                "face buffer length {} is not a multiple of 3",
                self.geometry.faces.len()
            ));
        }
        if !self.are_indices_in_range() {
            errors.push(format!(
                "face indices out of range for {} vertices",
                self.vertex_count()
            ));
        }
        if self.geometry.vertices.iter().any(|v| !v.is_finite()) {
            errors.push("vertex buffer contains non-finite values".to_string());
        }
        let degenerate = self.degenerate_triangles(0.0);
        if !degenerate.is_empty() {
            errors.push(format!("{} degenerate triangles", degenerate.len()));
        }
        errors
    }
}
