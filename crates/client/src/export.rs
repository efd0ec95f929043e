//! Writing registry snapshots to PLY files.

use std::path::{Path, PathBuf};

use shared::{mesh_file_name, ply};

use crate::error::ClientError;
use crate::state::SharedRegistry;

/// Write the current snapshot of `id` as binary PLY.
pub fn write_ply(registry: &SharedRegistry, id: &str, path: &Path) -> Result<(), ClientError> {
    let geometry = registry
        .get(id)
        .ok_or_else(|| ClientError::UnknownMesh(id.into()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, ply::encode_geometry(&geometry))?;
    tracing::info!(
        "Exported `{id}` to {} ({} vertices, {} faces)",
        path.display(),
        geometry.vertex_count(),
        geometry.face_count()
    );
    Ok(())
}

/// Write every registered mesh into `dir` as `<id>.ply`, sorted by id.
pub fn write_all(registry: &SharedRegistry, dir: &Path) -> Result<Vec<PathBuf>, ClientError> {
    let mut written = Vec::new();
    for id in registry.ids() {
        let path = dir.join(mesh_file_name(&id));
        write_ply(registry, &id, &path)?;
        written.push(path);
    }
    Ok(written)
}
