//! Client-side error type.

use shared::{FormatError, GeometryError, MeshId};
use thiserror::Error;

use crate::controls::Control;

/// Errors surfaced to the invoking layer. None of these are swallowed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed PLY payload (local file or service response).
    #[error("mesh format error: {0}")]
    Format(#[from] FormatError),

    /// Geometry that violates the buffer invariants.
    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// Non-success response from a compute service.
    #[error("service returned {status}: {body}")]
    Transport { status: u16, body: String },

    /// Connection or protocol failure below HTTP status level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The triggering control already has a request in flight.
    #[error("{control} request already in flight")]
    Busy { control: Control },

    #[error("unknown mesh `{0}`")]
    UnknownMesh(MeshId),

    /// Registration response did not include the mesh.
    #[error("no transformation returned for mesh `{0}`")]
    MissingTransform(MeshId),

    /// A load produced no geometry.
    #[error("nothing to load for mesh `{0}`")]
    EmptySource(MeshId),
}
