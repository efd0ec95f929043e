use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use shared::{
    mesh_id_from_file_name, ply, FormatError, Geometry, GeometryError, MeshId,
    RegistrationResponse, DEFAULT_VOXEL_SIZE, DEFORMATION_RATIO_FIELD, MESH_FIELD,
    NUMBER_OF_MODES_FIELD, VOXEL_SIZE_FIELD,
};

use crate::compute;

/// Upper bound on `number_of_modes`; each mode costs one `sin` per vertex.
pub const MAX_MODES: u32 = 256;

/// Error response: status plus plain-text message
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{}: {}", self.status, self.message);
        (self.status, self.message).into_response()
    }
}

impl From<FormatError> for ApiError {
    fn from(e: FormatError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<GeometryError> for ApiError {
    fn from(e: GeometryError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

/// Decoded multipart request: meshes in upload order plus text fields
struct Upload {
    meshes: Vec<(MeshId, Geometry)>,
    fields: HashMap<String, String>,
}

impl Upload {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut meshes = Vec::new();
        let mut fields = HashMap::new();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == MESH_FIELD {
                let id = field
                    .file_name()
                    .map(mesh_id_from_file_name)
                    .unwrap_or_else(|| format!("mesh{}", meshes.len()));
                let bytes = field.bytes().await?;
                let geometry = ply::decode(&bytes)?;
                geometry.validate()?;
                tracing::debug!(
                    "received `{id}`: {} vertices, {} faces",
                    geometry.vertex_count(),
                    geometry.face_count()
                );
                meshes.push((id, geometry));
            } else {
                let value = field.text().await?;
                fields.insert(name, value);
            }
        }

        Ok(Self { meshes, fields })
    }

    fn number<T: std::str::FromStr>(&self, name: &str, default: T) -> Result<T, ApiError> {
        match self.fields.get(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ApiError::bad_request(format!("invalid `{name}`: {raw}"))),
            None => Ok(default),
        }
    }

    fn single_mesh(mut self) -> Result<(MeshId, Geometry), ApiError> {
        match self.meshes.len() {
            1 => Ok(self.meshes.remove(0)),
            n => Err(ApiError::bad_request(format!(
                "expected exactly one `{MESH_FIELD}` part, got {n}"
            ))),
        }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("compute task failed: {e}")))
}

fn ply_response(geometry: &Geometry) -> Response {
    let bytes = ply::encode_geometry(geometry);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from(bytes),
    )
        .into_response()
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Align all uploaded meshes onto the first one
pub async fn register(multipart: Multipart) -> Result<Json<RegistrationResponse>, ApiError> {
    let upload = Upload::read(multipart).await?;
    let voxel_size = upload.number(VOXEL_SIZE_FIELD, DEFAULT_VOXEL_SIZE)?;
    if !(voxel_size.is_finite() && voxel_size > 0.0) {
        return Err(ApiError::bad_request(format!(
            "`{VOXEL_SIZE_FIELD}` must be positive, got {voxel_size}"
        )));
    }
    if upload.meshes.is_empty() {
        return Err(ApiError::bad_request("no meshes uploaded"));
    }

    tracing::info!(
        "register: {} meshes, voxel_size={voxel_size}",
        upload.meshes.len()
    );
    let meshes = upload.meshes;
    let response = run_blocking(move || compute::align::register_meshes(&meshes, voxel_size)).await?;
    Ok(Json(response))
}

/// Perturb vertex positions along their normals
pub async fn deform(multipart: Multipart) -> Result<Response, ApiError> {
    let upload = Upload::read(multipart).await?;
    let ratio: f64 = upload.number(DEFORMATION_RATIO_FIELD, 0.1)?;
    let modes: u32 = upload.number(NUMBER_OF_MODES_FIELD, 4)?;
    if !ratio.is_finite() {
        return Err(ApiError::bad_request(format!(
            "`{DEFORMATION_RATIO_FIELD}` must be finite"
        )));
    }
    if modes > MAX_MODES {
        return Err(ApiError::bad_request(format!(
            "`{NUMBER_OF_MODES_FIELD}` must be at most {MAX_MODES}, got {modes}"
        )));
    }
    let (id, geometry) = upload.single_mesh()?;

    tracing::info!("deform `{id}`: ratio={ratio}, modes={modes}");
    let deformed = run_blocking(move || compute::deform::deform(&geometry, ratio, modes)).await?;
    Ok(ply_response(&deformed))
}

/// Remove degenerate and duplicate faces and unreferenced vertices
pub async fn clean(multipart: Multipart) -> Result<Response, ApiError> {
    let (id, geometry) = Upload::read(multipart).await?.single_mesh()?;

    let (cleaned, report) = run_blocking(move || compute::clean::clean(&geometry)).await?;
    tracing::info!("clean `{id}`: {report}");
    Ok(ply_response(&cleaned))
}
