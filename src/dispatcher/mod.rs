//! Update Dispatcher - routes decoded envelopes into the graph store
//!
//! The store is attached explicitly. Until then, the most recent
//! `graph_update` is held in a single pending slot (newer arrivals replace
//! it) and applied once when the store attaches.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::channel::ChannelHandler;
use crate::error::{ProtocolError, SyncError};
use crate::store::GraphStore;
use crate::types::{Edge, Envelope, Node, UpdatePayload, UpsertSummary};

/// Consumer-facing callbacks
pub trait GraphListener: Send + Sync {
    fn on_connect(&self) {}

    fn on_disconnect(&self) {}

    /// Called after a batch has been applied to the store
    fn on_update(&self, _nodes: &[Node], _edges: &[Edge]) {}

    fn on_error(&self, _error: &SyncError) {}
}

/// Listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl GraphListener for NoopListener {}

/// What happened to one inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Connected,
    Applied(UpsertSummary),
    /// Held in the pending slot until a store attaches
    Queued,
    Pong,
    Dropped,
}

/// Per-kind counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub received: u64,
    pub applied: u64,
    pub queued: u64,
    /// Pending updates replaced by a newer one before attachment
    pub superseded: u64,
    pub pongs: u64,
    pub dropped: u64,
}

#[derive(Default)]
struct Inner {
    store: Option<Arc<GraphStore>>,
    pending: Option<UpdatePayload>,
    stats: DispatchStats,
}

/// Routes envelopes to the store and notifies listeners
#[derive(Default)]
pub struct UpdateDispatcher {
    inner: Mutex<Inner>,
    listeners: RwLock<Vec<Arc<dyn GraphListener>>>,
}

impl UpdateDispatcher {
    /// Create a dispatcher with no store attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher already attached to `store`
    pub fn with_store(store: Arc<GraphStore>) -> Self {
        let dispatcher = Self::new();
        dispatcher.attach(store);
        dispatcher
    }

    pub fn add_listener(&self, listener: Arc<dyn GraphListener>) {
        self.listeners.write().push(listener);
    }

    /// Attach the consuming store and flush the pending update, if any
    pub fn attach(&self, store: Arc<GraphStore>) -> Option<UpsertSummary> {
        let flushed = {
            let mut inner = self.inner.lock();
            let pending = inner.pending.take();
            let flushed = pending.map(|update| {
                let summary = store.upsert(update.nodes.clone(), update.edges.clone());
                inner.stats.applied += 1;
                (update, summary)
            });
            inner.store = Some(store);
            flushed
        };

        let (update, summary) = flushed?;
        debug!(
            nodes = update.nodes.len(),
            edges = update.edges.len(),
            "flushed pending update on attach"
        );
        self.notify_update(&update);
        Some(summary)
    }

    /// Detach the store; later updates go to the pending slot
    pub fn detach(&self) -> Option<Arc<GraphStore>> {
        self.inner.lock().store.take()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.lock().store.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.inner.lock().pending.is_some()
    }

    pub fn stats(&self) -> DispatchStats {
        self.inner.lock().stats
    }

    /// Decode and route one raw frame.
    ///
    /// Bad frames are logged, reported to listeners, and dropped.
    pub fn handle_envelope(&self, raw: &str) -> DispatchOutcome {
        self.inner.lock().stats.received += 1;

        match Envelope::decode(raw) {
            Ok(envelope) => self.dispatch(envelope),
            Err(err) => {
                self.drop_frame(raw, err);
                DispatchOutcome::Dropped
            }
        }
    }

    /// Route an already-decoded envelope
    pub fn dispatch(&self, envelope: Envelope) -> DispatchOutcome {
        match envelope {
            Envelope::Connected { message } => {
                info!(message = message.as_deref().unwrap_or(""), "server acknowledged connection");
                DispatchOutcome::Connected
            }
            Envelope::GraphUpdate { data } => self.apply_update(data),
            Envelope::Pong => {
                self.inner.lock().stats.pongs += 1;
                debug!("pong received");
                DispatchOutcome::Pong
            }
        }
    }

    fn apply_update(&self, update: UpdatePayload) -> DispatchOutcome {
        let summary = {
            let mut inner = self.inner.lock();
            match inner.store.clone() {
                Some(store) => {
                    inner.stats.applied += 1;
                    store.upsert(update.nodes.clone(), update.edges.clone())
                }
                None => {
                    inner.stats.queued += 1;
                    if inner.pending.replace(update).is_some() {
                        inner.stats.superseded += 1;
                        debug!("replaced pending update, store not attached");
                    } else {
                        debug!("queued pending update, store not attached");
                    }
                    return DispatchOutcome::Queued;
                }
            }
        };

        debug!(
            inserted = summary.nodes_inserted + summary.edges_inserted,
            updated = summary.nodes_updated + summary.edges_updated,
            "applied graph update"
        );
        self.notify_update(&update);
        DispatchOutcome::Applied(summary)
    }

    fn drop_frame(&self, raw: &str, err: ProtocolError) {
        self.inner.lock().stats.dropped += 1;
        let preview: String = raw.chars().take(80).collect();
        warn!(error = %err, frame = %preview, "dropping inbound frame");

        let err = SyncError::Protocol(err);
        for listener in self.listeners() {
            listener.on_error(&err);
        }
    }

    fn notify_update(&self, update: &UpdatePayload) {
        for listener in self.listeners() {
            listener.on_update(&update.nodes, &update.edges);
        }
    }

    fn listeners(&self) -> Vec<Arc<dyn GraphListener>> {
        self.listeners.read().clone()
    }
}

impl ChannelHandler for UpdateDispatcher {
    fn on_connect(&self) {
        for listener in self.listeners() {
            listener.on_connect();
        }
    }

    fn on_disconnect(&self) {
        for listener in self.listeners() {
            listener.on_disconnect();
        }
    }

    fn on_message(&self, raw: &str) {
        self.handle_envelope(raw);
    }

    fn on_error(&self, error: &SyncError) {
        for listener in self.listeners() {
            listener.on_error(error);
        }
    }
}
