//! Caches for decoded meshes.

use std::collections::HashMap;
use std::sync::Arc;

use bobj_decode::MeshBuffers;
use parking_lot::RwLock;

/// Storage for meshes that have already been decoded, keyed by location.
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<Arc<MeshBuffers>>;
    fn insert(&self, key: &str, mesh: Arc<MeshBuffers>);
}

/// A cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl Cache for NoCache {
    fn get(&self, _key: &str) -> Option<Arc<MeshBuffers>> {
        None
    }

    fn insert(&self, _key: &str, _mesh: Arc<MeshBuffers>) {}
}

/// An unbounded in-memory cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    meshes: RwLock<HashMap<String, Arc<MeshBuffers>>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.read().is_empty()
    }

    pub fn remove(&self, key: &str) -> Option<Arc<MeshBuffers>> {
        self.meshes.write().remove(key)
    }

    pub fn clear(&self) {
        self.meshes.write().clear();
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<Arc<MeshBuffers>> {
        self.meshes.read().get(key).cloned()
    }

    fn insert(&self, key: &str, mesh: Arc<MeshBuffers>) {
        self.meshes.write().insert(key.to_owned(), mesh);
    }
}
