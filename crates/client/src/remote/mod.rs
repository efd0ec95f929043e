//! HTTP client for the alignment, deformation and cleaning services.
//!
//! All three services take multipart requests carrying PLY-encoded meshes.

use std::collections::HashMap;

use reqwest::multipart::{Form, Part};
use shared::{
    mesh_file_name, ply, row_major_to_column_major, ColumnMajor, DeformationParams, Geometry,
    MeshId, RegistrationResponse, DEFORMATION_RATIO_FIELD, MESH_FIELD, NUMBER_OF_MODES_FIELD,
    VOXEL_SIZE_FIELD,
};

use crate::error::ClientError;

const PLY_MIME: &str = "application/octet-stream";

/// Compute service client
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /api/health`
    pub async fn health(&self) -> Result<bool, ClientError> {
        let response = self.http.get(self.url("/api/health")).send().await?;
        Ok(response.status().is_success())
    }

    /// Align meshes; returns column-major transforms keyed by mesh id.
    pub async fn register(
        &self,
        meshes: &[(MeshId, &Geometry)],
        voxel_size: f64,
    ) -> Result<HashMap<MeshId, ColumnMajor>, ClientError> {
        let mut form = Form::new().text(VOXEL_SIZE_FIELD, voxel_size.to_string());
        for (id, geometry) in meshes {
            form = form.part(MESH_FIELD, mesh_part(id, geometry)?);
        }

        tracing::info!(
            "POST /api/register: {} meshes, voxel_size={voxel_size}",
            meshes.len()
        );
        let response = self
            .http
            .post(self.url("/api/register"))
            .multipart(form)
            .send()
            .await?;
        let body: RegistrationResponse = check_status(response).await?.json().await?;

        Ok(body
            .transformations
            .iter()
            .map(|(id, m)| (id.clone(), row_major_to_column_major(m)))
            .collect())
    }

    /// Deform one mesh; the response carries the displaced vertices.
    pub async fn deform(
        &self,
        id: &str,
        geometry: &Geometry,
        params: DeformationParams,
    ) -> Result<Geometry, ClientError> {
        let form = Form::new()
            .part(MESH_FIELD, mesh_part(id, geometry)?)
            .text(DEFORMATION_RATIO_FIELD, params.ratio.to_string())
            .text(NUMBER_OF_MODES_FIELD, params.modes.to_string());

        tracing::info!(
            "POST /api/deform `{id}`: ratio={}, modes={}",
            params.ratio,
            params.modes
        );
        self.post_mesh("/api/deform", form).await
    }

    /// Clean one mesh; vertex and face counts may change.
    pub async fn clean(&self, id: &str, geometry: &Geometry) -> Result<Geometry, ClientError> {
        let form = Form::new().part(MESH_FIELD, mesh_part(id, geometry)?);
        tracing::info!("POST /api/clean `{id}`");
        self.post_mesh("/api/clean", form).await
    }

    async fn post_mesh(&self, path: &str, form: Form) -> Result<Geometry, ClientError> {
        let response = self.http.post(self.url(path)).multipart(form).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        let geometry = ply::decode(&bytes).map_err(|e| {
            tracing::error!("{path}: undecodable response ({} bytes): {e}", bytes.len());
            e
        })?;
        tracing::info!(
            "{path}: received {} vertices, {} faces",
            geometry.vertex_count(),
            geometry.face_count()
        );
        Ok(geometry)
    }
}

fn mesh_part(id: &str, geometry: &Geometry) -> Result<Part, ClientError> {
    Ok(Part::bytes(ply::encode_geometry(geometry))
        .file_name(mesh_file_name(id))
        .mime_str(PLY_MIME)?)
}

/// Turn a non-success status into [`ClientError::Transport`] with the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::error!("service error {status}: {body}");
    Err(ClientError::Transport {
        status: status.as_u16(),
        body,
    })
}
