//! Graph sync client
//!
//! Wires the store, dispatcher, connection manager, and context selector
//! together from one [`SyncConfig`]. Every collaborator is passed in
//! explicitly; nothing is looked up from global state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::channel::{ConnectionManager, ConnectionState};
use crate::config::SyncConfig;
use crate::context::{self, ContextSelection, ContextSelector, SelectionRequest};
use crate::dispatcher::{GraphListener, UpdateDispatcher};
use crate::error::{ConfigError, SyncResult};
use crate::store::GraphStore;
use crate::types::{SelectionMode, UpsertSummary};

pub struct GraphSyncClient {
    store: Arc<GraphStore>,
    dispatcher: Arc<UpdateDispatcher>,
    manager: ConnectionManager,
    selector: ContextSelector,
}

impl GraphSyncClient {
    /// Client whose store is attached immediately
    pub fn new(config: SyncConfig, listener: Arc<dyn GraphListener>) -> Result<Self, ConfigError> {
        let client = Self::deferred(config, listener)?;
        client.dispatcher.attach(client.store.clone());
        Ok(client)
    }

    /// Client whose store only receives updates after [`attach`](Self::attach).
    ///
    /// Until then the latest `graph_update` is held back.
    pub fn deferred(
        config: SyncConfig,
        listener: Arc<dyn GraphListener>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let store = Arc::new(GraphStore::new());
        let dispatcher = Arc::new(UpdateDispatcher::new());
        dispatcher.add_listener(listener);
        let manager = ConnectionManager::new(config.channel(), dispatcher.clone())?;

        Ok(Self {
            store,
            dispatcher,
            manager,
            selector: ContextSelector::new(config.context()),
        })
    }

    /// Attach the store, applying the pending update if one arrived
    pub fn attach(&self) -> Option<UpsertSummary> {
        self.dispatcher.attach(self.store.clone())
    }

    pub fn connect(&self) {
        self.manager.connect();
    }

    pub async fn disconnect(&self) {
        self.manager.disconnect().await;
    }

    pub fn send_text(&self, text: impl Into<String>) -> SyncResult<()> {
        self.manager.send_text(text)
    }

    pub fn state(&self) -> ConnectionState {
        self.manager.state()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.manager.subscribe_state()
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    pub fn dispatcher(&self) -> &Arc<UpdateDispatcher> {
        &self.dispatcher
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.manager
    }

    /// Build a context document from the current graph
    pub fn context(
        &self,
        mode: SelectionMode,
        request: &SelectionRequest,
    ) -> Option<ContextSelection> {
        self.selector.select(&self.store, mode, request)
    }

    /// Context rendered as prompt text
    pub fn context_text(&self, mode: SelectionMode, request: &SelectionRequest) -> Option<String> {
        self.context(mode, request)
            .map(|selection| context::to_text(&selection.document))
    }

    /// Drop all graph state for a fresh session
    pub fn reset(&self) {
        self.store.reset();
    }
}
