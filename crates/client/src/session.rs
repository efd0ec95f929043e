//! Session: the composition root tying the registry to the remote services.
//!
//! A `Session` is a cheap-to-clone handle. Each remote operation snapshots the
//! registry, releases the lock while the request is in flight, and applies the
//! result with a single registry call on completion. Results for meshes that
//! were removed in the meantime are dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use glam::{DMat4, DVec3};
use serde::Serialize;
use shared::{ply, validate_buffers, ColumnMajor, Geometry, MeshId, SubGeometry, IDENTITY};

use crate::build::{merge_geometries, merge_source, SubMeshSource};
use crate::controls::{Control, ControlGate};
use crate::error::ClientError;
use crate::remote::ServiceClient;
use crate::state::{AppSettings, SharedRegistry};
use crate::validation::MeshValidator;

/// Per-mesh overview for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    pub id: MeshId,
    pub vertex_count: usize,
    pub face_count: usize,
    pub version: u64,
    pub degenerate_faces: usize,
    pub dimensions: [f32; 3],
    pub transform: ColumnMajor,
}

/// Headless mesh session
#[derive(Clone)]
pub struct Session {
    registry: SharedRegistry,
    transforms: Arc<Mutex<HashMap<MeshId, ColumnMajor>>>,
    gate: ControlGate,
    client: ServiceClient,
    settings: AppSettings,
}

impl Session {
    /// Create a session talking to the server configured in `settings`.
    pub fn new(settings: AppSettings) -> Result<Self, ClientError> {
        let client = ServiceClient::new(settings.server.url.clone())?;
        Ok(Self::with_client(settings, client))
    }

    pub fn with_client(settings: AppSettings, client: ServiceClient) -> Self {
        Self {
            registry: SharedRegistry::new(),
            transforms: Arc::default(),
            gate: ControlGate::new(),
            client,
            settings,
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn gate(&self) -> &ControlGate {
        &self.gate
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    fn transforms(&self) -> std::sync::MutexGuard<'_, HashMap<MeshId, ColumnMajor>> {
        self.transforms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Loading ───────────────────────────────────────────────

    /// Register a validated geometry under `id`, resetting its transform.
    pub fn register(&self, id: &str, geometry: Geometry) -> Result<(), ClientError> {
        geometry.validate()?;
        self.transforms().remove(id);
        self.registry.register(id, geometry.vertices, geometry.faces);
        Ok(())
    }

    /// Merge the leaves of `source` and register the result under `id`.
    pub fn load_source<S: SubMeshSource + ?Sized>(
        &self,
        id: &str,
        source: &S,
    ) -> Result<(), ClientError> {
        let merged = merge_source(source)?.ok_or_else(|| ClientError::EmptySource(id.into()))?;
        self.register(id, merged)
    }

    /// Decode one or more PLY files, merge them and register under `id`.
    pub fn load_ply_files(&self, id: &str, paths: &[PathBuf]) -> Result<(), ClientError> {
        let mut parts = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = std::fs::read(path)?;
            let geometry = ply::decode(&bytes)?;
            tracing::info!(
                "Loaded {} ({} vertices, {} faces)",
                path.display(),
                geometry.vertex_count(),
                geometry.face_count()
            );
            parts.push(SubGeometry::from(geometry));
        }
        let merged = merge_geometries(parts)?.ok_or_else(|| ClientError::EmptySource(id.into()))?;
        self.register(id, merged)
    }

    /// Remove a mesh and its transform.
    pub fn remove(&self, id: &str) -> bool {
        self.transforms().remove(id);
        self.registry.evict(id)
    }

    pub fn clear(&self) {
        self.transforms().clear();
        self.registry.evict_all();
    }

    pub fn mesh_ids(&self) -> Vec<MeshId> {
        self.registry.ids()
    }

    /// Current alignment transform (column-major), identity if none.
    pub fn transform_of(&self, id: &str) -> ColumnMajor {
        self.transforms().get(id).copied().unwrap_or(IDENTITY)
    }

    pub fn inspect(&self) -> Vec<MeshSummary> {
        self.mesh_ids()
            .into_iter()
            .filter_map(|id| {
                let (geometry, version) = self.registry.get_versioned(&id)?;
                let validator = MeshValidator::new(&geometry);
                Some(MeshSummary {
                    vertex_count: geometry.vertex_count(),
                    face_count: geometry.face_count(),
                    version,
                    degenerate_faces: validator.degenerate_triangles(f32::EPSILON).len(),
                    dimensions: validator.dimensions(),
                    transform: self.transform_of(&id),
                    id,
                })
            })
            .collect()
    }

    // ── Remote operations ─────────────────────────────────────

    fn snapshot(&self, id: &str) -> Result<Arc<Geometry>, ClientError> {
        self.registry
            .get(id)
            .ok_or_else(|| ClientError::UnknownMesh(id.into()))
    }

    /// Align meshes on the server and store the returned transforms.
    ///
    /// With no ids, every registered mesh is sent.
    pub async fn align(&self, ids: &[MeshId]) -> Result<HashMap<MeshId, ColumnMajor>, ClientError> {
        let _in_flight = self.gate.try_begin(Control::Register)?;

        let ids = if ids.is_empty() {
            self.mesh_ids()
        } else {
            ids.to_vec()
        };
        let snapshots = ids
            .iter()
            .map(|id| Ok((id.clone(), self.snapshot(id)?)))
            .collect::<Result<Vec<_>, ClientError>>()?;
        let meshes: Vec<(MeshId, &Geometry)> = snapshots
            .iter()
            .map(|(id, g)| (id.clone(), g.as_ref()))
            .collect();

        let transforms = self
            .client
            .register(&meshes, self.settings.registration.voxel_size)
            .await?;

        if let Some(missing) = ids.iter().find(|id| !transforms.contains_key(*id)) {
            return Err(ClientError::MissingTransform(missing.clone()));
        }

        let applied: HashMap<MeshId, ColumnMajor> = transforms
            .into_iter()
            .filter(|(id, _)| {
                let alive = self.registry.contains(id);
                if !alive {
                    tracing::debug!("align: `{id}` was removed while in flight, dropping transform");
                }
                alive
            })
            .collect();
        self.transforms()
            .extend(applied.iter().map(|(id, m)| (id.clone(), *m)));
        tracing::info!("align: stored {} transforms", applied.len());
        Ok(applied)
    }

    /// Deform a mesh on the server. Returns whether the result was applied.
    pub async fn deform(&self, id: &str) -> Result<bool, ClientError> {
        let _in_flight = self.gate.try_begin(Control::Deform)?;
        let snapshot = self.snapshot(id)?;

        let deformed = self
            .client
            .deform(id, &snapshot, self.settings.deformation)
            .await?;

        self.registry.with(|registry| -> Result<bool, ClientError> {
            let Some(current) = registry.get(id) else {
                tracing::debug!("deform: `{id}` was removed while in flight");
                return Ok(false);
            };
            validate_buffers(&deformed.vertices, &current.faces)?;
            Ok(registry.update_vertices(id, deformed.vertices))
        })
    }

    /// Clean a mesh on the server. Returns whether the result was applied.
    ///
    /// If cleaning changed the vertex or face count, the mesh's alignment
    /// transform is reset to identity.
    pub async fn clean(&self, id: &str) -> Result<bool, ClientError> {
        let _in_flight = self.gate.try_begin(Control::Clean)?;
        let snapshot = self.snapshot(id)?;

        let cleaned = self.client.clean(id, &snapshot).await?;
        cleaned.validate()?;

        let counts_changed = cleaned.vertex_count() != snapshot.vertex_count()
            || cleaned.face_count() != snapshot.face_count();
        let applied = self
            .registry
            .update_full(id, cleaned.vertices, cleaned.faces);
        if applied && counts_changed && self.transforms().remove(id).is_some() {
            tracing::info!("clean: `{id}` topology changed, alignment transform reset");
        }
        Ok(applied)
    }

    /// Apply the stored alignment transform to the vertices and reset it.
    ///
    /// Returns false when the transform is already identity. The read of the
    /// current vertices and the write of the baked ones happen under one
    /// registry lock, so a concurrent update cannot be overwritten.
    pub fn bake_transform(&self, id: &str) -> Result<bool, ClientError> {
        let matrix = self.transform_of(id);
        let m = DMat4::from_cols_array(&matrix);

        let applied = self.registry.with(|registry| -> Result<bool, ClientError> {
            let snapshot = registry
                .get(id)
                .ok_or_else(|| ClientError::UnknownMesh(id.into()))?;
            if matrix == IDENTITY {
                return Ok(false);
            }
            let vertices: Vec<f32> = snapshot
                .vertices
                .chunks_exact(3)
                .flat_map(|p| {
                    let q = m.transform_point3(DVec3::new(p[0].into(), p[1].into(), p[2].into()));
                    [q.x as f32, q.y as f32, q.z as f32]
                })
                .collect();
            Ok(registry.update_vertices(id, vertices))
        })?;

        if applied {
            let mut transforms = self.transforms();
            // A newer alignment stored meanwhile is kept.
            if transforms.get(id) == Some(&matrix) {
                transforms.remove(id);
            }
        }
        Ok(applied)
    }

    /// Write the current snapshot of `id` to a PLY file.
    pub fn export_ply(&self, id: &str, path: &Path) -> Result<(), ClientError> {
        crate::export::write_ply(&self.registry, id, path)
    }
}
