//! Versioned geometry cache: the single source of truth for current mesh data.
//!
//! Every mesh id maps to an immutable snapshot plus a version counter. The
//! version is 0 right after registration and grows by exactly one per applied
//! update. Updates against unknown ids are silent no-ops so that responses
//! arriving after a mesh was removed are simply dropped.
//!
//! Listeners of a [`SharedRegistry`] run after its lock is released, so they
//! may read the registry (or mutate it) from inside the callback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{Geometry, MeshId};

/// What happened to a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Registered,
    VerticesUpdated,
    FullyUpdated,
    Evicted,
}

/// Handle returned by [`GeometryRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&str, ChangeKind, u64) + Send + Sync>;

/// Change recorded while notifications are deferred.
type Event = (MeshId, ChangeKind, u64);

struct Entry {
    snapshot: Arc<Geometry>,
    version: u64,
}

/// Versioned mesh cache
#[derive(Default)]
pub struct GeometryRegistry {
    entries: HashMap<MeshId, Entry>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    /// Queue events instead of calling listeners in place.
    deferred: bool,
    pending: Vec<Event>,
}

impl GeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the snapshot for `id`; the version restarts at 0.
    pub fn register(&mut self, id: impl Into<MeshId>, vertices: Vec<f32>, faces: Vec<u32>) {
        let id = id.into();
        tracing::info!(
            "registry: register `{id}` ({} vertices, {} faces)",
            vertices.len() / 3,
            faces.len() / 3
        );
        self.entries.insert(
            id.clone(),
            Entry {
                snapshot: Arc::new(Geometry::new(vertices, faces)),
                version: 0,
            },
        );
        self.notify(&id, ChangeKind::Registered, 0);
    }

    /// Current snapshot for `id`
    pub fn get(&self, id: &str) -> Option<Arc<Geometry>> {
        self.entries.get(id).map(|e| Arc::clone(&e.snapshot))
    }

    /// Snapshot and version read together.
    pub fn get_versioned(&self, id: &str) -> Option<(Arc<Geometry>, u64)> {
        self.entries
            .get(id)
            .map(|e| (Arc::clone(&e.snapshot), e.version))
    }

    /// Replace the vertex buffer, keeping faces. Returns false for unknown ids.
    pub fn update_vertices(&mut self, id: &str, vertices: Vec<f32>) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            tracing::debug!("registry: update_vertices on unknown `{id}` ignored");
            return false;
        };
        let faces = entry.snapshot.faces.clone();
        entry.snapshot = Arc::new(Geometry::new(vertices, faces));
        entry.version += 1;
        let version = entry.version;
        tracing::info!("registry: `{id}` vertices updated -> v{version}");
        self.notify(id, ChangeKind::VerticesUpdated, version);
        true
    }

    /// Replace both buffers. Returns false for unknown ids.
    pub fn update_full(&mut self, id: &str, vertices: Vec<f32>, faces: Vec<u32>) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            tracing::debug!("registry: update_full on unknown `{id}` ignored");
            return false;
        };
        entry.snapshot = Arc::new(Geometry::new(vertices, faces));
        entry.version += 1;
        let version = entry.version;
        tracing::info!(
            "registry: `{id}` replaced ({} vertices, {} faces) -> v{version}",
            entry.snapshot.vertex_count(),
            entry.snapshot.face_count()
        );
        self.notify(id, ChangeKind::FullyUpdated, version);
        true
    }

    /// Number of updates applied since registration; 0 for unknown ids.
    pub fn version(&self, id: &str) -> u64 {
        self.entries.get(id).map_or(0, |e| e.version)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Remove one entry. Returns whether it existed.
    pub fn evict(&mut self, id: &str) -> bool {
        if self.entries.remove(id).is_some() {
            tracing::info!("registry: evicted `{id}`");
            self.notify(id, ChangeKind::Evicted, 0);
            true
        } else {
            false
        }
    }

    /// Remove every entry.
    pub fn evict_all(&mut self) {
        let ids: Vec<MeshId> = self.entries.drain().map(|(id, _)| id).collect();
        tracing::info!("registry: evicted all ({} meshes)", ids.len());
        for id in &ids {
            self.notify(id, ChangeKind::Evicted, 0);
        }
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<MeshId> {
        let mut ids: Vec<MeshId> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a callback invoked synchronously after every change.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&str, ChangeKind, u64) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, id: &str, kind: ChangeKind, version: u64) {
        if self.listeners.is_empty() {
            return;
        }
        if self.deferred {
            self.pending.push((id.to_string(), kind, version));
            return;
        }
        for (_, listener) in &self.listeners {
            listener(id, kind, version);
        }
    }

    /// Drain queued events along with the listeners that should see them.
    fn take_pending(&mut self) -> Option<(Vec<Event>, Vec<Listener>)> {
        if self.pending.is_empty() {
            return None;
        }
        let listeners = self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
        Some((std::mem::take(&mut self.pending), listeners))
    }
}

/// Cloneable, lock-protected registry handle.
///
/// Reads and writes go through one mutex so a reader never sees a vertex
/// buffer paired with the wrong face buffer or version. Change callbacks are
/// dispatched once the mutex is released.
#[derive(Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<GeometryRegistry>>,
}

impl Default for SharedRegistry {
    fn default() -> Self {
        let registry = GeometryRegistry {
            deferred: true,
            ..GeometryRegistry::default()
        };
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, GeometryRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a compound operation under one lock, then notify listeners.
    pub fn with<R>(&self, f: impl FnOnce(&mut GeometryRegistry) -> R) -> R {
        let (result, pending) = {
            let mut registry = self.guard();
            let result = f(&mut registry);
            (result, registry.take_pending())
        };
        if let Some((events, listeners)) = pending {
            for (id, kind, version) in &events {
                for listener in &listeners {
                    listener(id, *kind, *version);
                }
            }
        }
        result
    }

    pub fn register(&self, id: impl Into<MeshId>, vertices: Vec<f32>, faces: Vec<u32>) {
        self.with(|r| r.register(id, vertices, faces))
    }

    pub fn get(&self, id: &str) -> Option<Arc<Geometry>> {
        self.guard().get(id)
    }

    pub fn get_versioned(&self, id: &str) -> Option<(Arc<Geometry>, u64)> {
        self.guard().get_versioned(id)
    }

    pub fn update_vertices(&self, id: &str, vertices: Vec<f32>) -> bool {
        self.with(|r| r.update_vertices(id, vertices))
    }

    pub fn update_full(&self, id: &str, vertices: Vec<f32>, faces: Vec<u32>) -> bool {
        self.with(|r| r.update_full(id, vertices, faces))
    }

    pub fn version(&self, id: &str) -> u64 {
        self.guard().version(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.guard().contains(id)
    }

    pub fn evict(&self, id: &str) -> bool {
        self.with(|r| r.evict(id))
    }

    pub fn evict_all(&self) {
        self.with(|r| r.evict_all())
    }

    pub fn ids(&self) -> Vec<MeshId> {
        self.guard().ids()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&str, ChangeKind, u64) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.guard().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.guard().unsubscribe(id)
    }
}
