//! Registry of attached sampling endpoints.
//!
//! Zero or more MCP hosts may be attached at once. The registry keeps them
//! indexed by session id and tracks a single "current" endpoint that request
//! handlers dispatch to: the most recently attached one, or an arbitrary
//! survivor once that one goes away.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::ports::SamplingEndpoint;

#[derive(Default)]
struct RegistryState {
    endpoints: HashMap<String, Arc<dyn SamplingEndpoint>>,
    /// Always a key of `endpoints` when set.
    current: Option<String>,
}

/// Concurrency-safe store of attached endpoints.
///
/// Readers (`current`) share the lock; `attach`/`detach` take it exclusively.
/// Endpoints are handed out as cloned `Arc`s, so a sampling call in flight
/// never holds the lock.
#[derive(Default)]
pub struct EndpointRegistry {
    state: RwLock<RegistryState>,
}

impl EndpointRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint under its id and make it current.
    ///
    /// Re-attaching an id replaces the previous entry.
    pub async fn attach(&self, endpoint: Arc<dyn SamplingEndpoint>) {
        let id = endpoint.id().to_owned();
        let attached = {
            let mut state = self.state.write().await;
            state.endpoints.insert(id.clone(), endpoint);
            state.current = Some(id.clone());
            state.endpoints.len()
        };
        info!(endpoint_id = %id, attached, "Sampling endpoint attached");
    }

    /// Remove the endpoint with `id`, if present.
    ///
    /// When it was current, any remaining endpoint becomes current; which one
    /// is unspecified. Returns whether an entry was removed.
    pub async fn detach(&self, id: &str) -> bool {
        let (removed, attached) = {
            let mut state = self.state.write().await;
            let removed = state.endpoints.remove(id).is_some();
            if state.current.as_deref() == Some(id) {
                state.current = state.endpoints.keys().next().cloned();
            }
            (removed, state.endpoints.len())
        };

        if removed {
            info!(endpoint_id = %id, attached, "Sampling endpoint detached");
        } else {
            debug!(endpoint_id = %id, "Detach ignored: endpoint not attached");
        }
        removed
    }

    /// The endpoint requests should be dispatched to, if any.
    pub async fn current(&self) -> Option<Arc<dyn SamplingEndpoint>> {
        let state = self.state.read().await;
        state
            .current
            .as_ref()
            .and_then(|id| state.endpoints.get(id))
            .cloned()
    }

    /// Number of attached endpoints.
    pub async fn len(&self) -> usize {
        self.state.read().await.endpoints.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.endpoints.is_empty()
    }

    /// Ids of all attached endpoints, in no particular order.
    pub async fn ids(&self) -> Vec<String> {
        self.state.read().await.endpoints.keys().cloned().collect()
    }

    /// Detach `id` once `closed` resolves.
    ///
    /// The spawned task only holds a weak reference, so it does not keep the
    /// registry alive; if the registry is gone by then, nothing happens.
    pub fn spawn_close_observer<F>(self: &Arc<Self>, id: String, closed: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let registry: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            closed.await;
            match registry.upgrade() {
                Some(registry) => {
                    registry.detach(&id).await;
                }
                None => debug!(endpoint_id = %id, "Session closed after registry shutdown"),
            }
        })
    }
}

impl std::fmt::Debug for EndpointRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointRegistry").finish_non_exhaustive()
    }
}
