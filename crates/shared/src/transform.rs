//! Conversion between the service's row-major 4x4 matrices and the
//! renderer's flat column-major arrays.

/// Row-major nested 4x4 matrix as returned by the alignment service.
pub type RowMajor = [[f64; 4]; 4];

/// Flat column-major 4x4 matrix (renderer convention).
pub type ColumnMajor = [f64; 16];

/// Column-major identity.
pub const IDENTITY: ColumnMajor = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Transpose-flatten: `out[4 * c + r] = m[r][c]`.
pub fn row_major_to_column_major(m: &RowMajor) -> ColumnMajor {
    let mut out = [0.0; 16];
    for (r, row) in m.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            out[4 * c + r] = *value;
        }
    }
    out
}

/// Inverse of [`row_major_to_column_major`].
pub fn column_major_to_row_major(m: &ColumnMajor) -> RowMajor {
    let mut out = [[0.0; 4]; 4];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = m[4 * c + r];
        }
    }
    out
}
