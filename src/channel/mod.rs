//! Live update channel
//!
//! One logical WebSocket connection per [`ConnectionManager`], driven by a
//! dedicated task that owns the socket, the keepalive timer, and the
//! reconnect timer.
//!
//! ## Features
//! - Exponential reconnect backoff (1s doubling, 30s cap, 10 attempts)
//! - Raw `ping` heartbeat every 30s while connected
//! - Observable [`ConnectionState`]
//! - Cancellation of pending timers on `disconnect()`

pub mod backoff;
pub mod manager;

use std::fmt;
use std::time::Duration;

pub use backoff::Backoff;
pub use manager::ConnectionManager;

use crate::error::SyncError;

/// Lifecycle callbacks from the connection task
///
/// Called from the connection task, one at a time, in frame order.
pub trait ChannelHandler: Send + Sync {
    fn on_connect(&self) {}

    fn on_disconnect(&self) {}

    /// One inbound text frame
    fn on_message(&self, raw: &str);

    /// Only terminal errors reach this callback
    fn on_error(&self, _error: &SyncError) {}

    fn on_reconnect_scheduled(&self, _attempt: u32, _delay: Duration) {}
}

/// Connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    /// Peer closed the socket
    Closed,
    /// Transport error, or the connect attempt failed
    Errored,
    ReconnectPending,
    /// Terminal: explicit disconnect, auto-reconnect off, or attempts exhausted
    Disconnected,
}

impl ConnectionState {
    /// Connecting or connected
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Closed => "closed",
            ConnectionState::Errored => "errored",
            ConnectionState::ReconnectPending => "reconnect_pending",
            ConnectionState::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}
