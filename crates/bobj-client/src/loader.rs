//! Background mesh loading.
//!
//! Loads run as Tokio tasks and report back through an `async_channel`, so
//! the owner of the [`MeshLoader`] can either poll for finished meshes
//! without blocking or await them one by one. Every request produces exactly
//! one [`LoadedMesh`], including loads whose task is dropped before it
//! finishes.

use std::sync::Arc;

use bobj::{Cache, Client, MemoryCache, MeshBuffers};
use tokio::runtime::Handle;

/// A finished load, successful or not.
#[derive(Debug)]
pub struct LoadedMesh {
    /// Identifier the load was requested under.
    pub id: String,
    /// Where the mesh was loaded from.
    pub location: String,
    pub result: Result<Arc<MeshBuffers>, LoadError>,
}

/// Why a requested mesh did not load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Load(#[from] bobj::Error),
    /// The task was dropped first, e.g. when the runtime shut down.
    #[error("load was cancelled before it finished")]
    Cancelled,
}

/// Sends the outcome of one load. Reports [`LoadError::Cancelled`] if dropped
/// before [`Delivery::send`] is called.
struct Delivery {
    tx: async_channel::Sender<LoadedMesh>,
    id: String,
    location: String,
    sent: bool,
}

impl Delivery {
    fn send(mut self, result: Result<Arc<MeshBuffers>, LoadError>) {
        self.sent = true;
        self.deliver(result);
    }

    fn deliver(&self, result: Result<Arc<MeshBuffers>, LoadError>) {
        // Unbounded, so this only fails once the loader itself is gone.
        if self
            .tx
            .try_send(LoadedMesh {
                id: self.id.clone(),
                location: self.location.clone(),
                result,
            })
            .is_err()
        {
            tracing::debug!("Dropping result for mesh '{}': loader is gone", self.id);
        }
    }
}

impl Drop for Delivery {
    fn drop(&mut self) {
        if !self.sent {
            tracing::warn!("Load of mesh '{}' was cancelled", self.id);
            self.deliver(Err(LoadError::Cancelled));
        }
    }
}

/// Spawns mesh loads and collects their results.
pub struct MeshLoader<C: Cache + 'static = MemoryCache> {
    client: Arc<Client<C>>,
    runtime: Handle,
    tx: async_channel::Sender<LoadedMesh>,
    rx: async_channel::Receiver<LoadedMesh>,
    pending: usize,
}

impl<C: Cache + 'static> MeshLoader<C> {
    /// Create a loader that spawns its tasks on `runtime`.
    pub fn new(client: Arc<Client<C>>, runtime: Handle) -> Self {
        let (tx, rx) = async_channel::unbounded();
        Self {
            client,
            runtime,
            tx,
            rx,
            pending: 0,
        }
    }

    /// Number of loads that have not been collected yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start loading the mesh at `location`.
    pub fn request(&mut self, id: impl Into<String>, location: impl Into<String>) {
        let delivery = Delivery {
            tx: self.tx.clone(),
            id: id.into(),
            location: location.into(),
            sent: false,
        };
        let client = Arc::clone(&self.client);

        tracing::info!(
            "Started loading mesh '{}' from {}",
            delivery.id,
            delivery.location
        );

        // Built outside the task so that a task dropped before its first poll
        // still reports back.
        self.runtime.spawn(async move {
            let result = client.load(&delivery.location).await;
            if let Err(e) = &result {
                tracing::error!("Failed to load mesh '{}': {}", delivery.id, e);
            }
            delivery.send(result.map_err(LoadError::from));
        });
        self.pending += 1;
    }

    /// Take a finished load, if any, without waiting.
    pub fn poll(&mut self) -> Option<LoadedMesh> {
        let loaded = self.rx.try_recv().ok()?;
        self.pending -= 1;
        Some(loaded)
    }

    /// Wait for the next finished load. Returns `None` once nothing is
    /// pending.
    pub async fn recv(&mut self) -> Option<LoadedMesh> {
        if self.pending == 0 {
            return None;
        }
        let loaded = self.rx.recv().await.ok()?;
        self.pending -= 1;
        Some(loaded)
    }
}
