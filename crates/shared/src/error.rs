//! Error types for the mesh wire format and geometry buffers.

use thiserror::Error;

/// Malformed PLY wire payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The `end_header\n` marker was not found.
    #[error("PLY header terminator `end_header` not found")]
    MissingHeaderEnd,

    /// Header is not valid ASCII/UTF-8.
    #[error("PLY header is not valid text")]
    HeaderEncoding,

    /// A header line could not be interpreted.
    #[error("invalid PLY header line {line}: {message}")]
    InvalidHeader {
        /// 1-based header line number.
        line: usize,
        /// Description of what was invalid.
        message: String,
    },

    /// Only `binary_little_endian 1.0` payloads are decoded.
    #[error("unsupported PLY format: {0}")]
    UnsupportedFormat(String),

    /// A face declared a vertex count other than 3.
    #[error("face {face} has {arity} vertices, only triangles are supported")]
    NonTriangularFace {
        /// Zero-based face record index.
        face: usize,
        /// Declared number of vertices.
        arity: u64,
    },

    /// The payload ended before all declared records were read.
    #[error("unexpected end of PLY payload at byte {position} (needed {needed} more)")]
    UnexpectedEof {
        /// Payload offset where the read started.
        position: usize,
        /// Bytes the read required.
        needed: usize,
    },
}

impl FormatError {
    pub(crate) fn header(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            line,
            message: message.into(),
        }
    }
}

/// Violation of the vertex/face buffer invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("vertex buffer length {len} is not a multiple of 3")]
    VertexStride { len: usize },

    #[error("face buffer length {len} is not a multiple of 3")]
    FaceStride { len: usize },

    #[error("face index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    /// Merged index or vertex offset does not fit in `u32`.
    #[error("merging part {part} overflows the 32-bit index range")]
    IndexOverflow { part: usize },
}
