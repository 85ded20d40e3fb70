//! Connection manager for the live update channel

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Backoff, ChannelHandler, ConnectionState};
use crate::config::ChannelConfig;
use crate::error::{ConfigError, ProtocolError, SyncError, SyncResult};
use crate::types::PING_TOKEN;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// State shared between the manager and its connection task
struct Shared {
    config: ChannelConfig,
    handler: Arc<dyn ChannelHandler>,
    state: watch::Sender<ConnectionState>,
    attempts: AtomicU32,
}

impl Shared {
    fn set_state(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }
}

/// Running connection task
struct Worker {
    cancel: CancellationToken,
    outbound: mpsc::UnboundedSender<String>,
    handle: JoinHandle<()>,
}

/// Owns one logical connection to the live update channel
pub struct ConnectionManager {
    shared: Arc<Shared>,
    worker: Mutex<Option<Worker>>,
}

impl ConnectionManager {
    /// Create a manager; nothing is opened until [`connect`](Self::connect).
    ///
    /// Fails if `config` has zero keepalive or backoff intervals or a
    /// non-WebSocket URL.
    pub fn new(
        config: ChannelConfig,
        handler: Arc<dyn ChannelHandler>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (state, _) = watch::channel(ConnectionState::Idle);
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                handler,
                state,
                attempts: AtomicU32::new(0),
            }),
            worker: Mutex::new(None),
        })
    }

    /// Start the connection task unless one is already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect(&self) {
        let mut worker = self.worker.lock();
        if let Some(running) = worker.as_ref() {
            if !running.handle.is_finished() {
                debug!(state = %self.state(), "connect ignored, connection already active");
                return;
            }
        }

        self.shared.attempts.store(0, Ordering::SeqCst);
        self.shared.set_state(ConnectionState::Connecting);

        let cancel = CancellationToken::new();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_connection(
            self.shared.clone(),
            cancel.clone(),
            outbound_rx,
        ));

        *worker = Some(Worker {
            cancel,
            outbound,
            handle,
        });
    }

    /// Close the connection and cancel pending reconnect/keepalive timers.
    ///
    /// Idempotent; a no-op when nothing is running.
    pub async fn disconnect(&self) {
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            worker.cancel.cancel();
            if let Err(e) = worker.handle.await {
                warn!(error = %e, "connection task ended abnormally");
            }
        }
        if self.state() != ConnectionState::Idle {
            self.shared.set_state(ConnectionState::Disconnected);
        }
    }

    /// Send a raw text frame on the open connection
    pub fn send_text(&self, text: impl Into<String>) -> SyncResult<()> {
        if self.state() != ConnectionState::Connected {
            return Err(SyncError::connection("channel is not connected"));
        }
        let worker = self.worker.lock();
        let worker = worker
            .as_ref()
            .ok_or_else(|| SyncError::connection("channel is not connected"))?;
        worker
            .outbound
            .send(text.into())
            .map_err(|_| SyncError::connection("connection task has stopped"))
    }

    pub fn state(&self) -> ConnectionState {
        *self.shared.state.borrow()
    }

    /// Watch state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }

    /// Reconnect attempts since the last successful connection
    pub fn attempts(&self) -> u32 {
        self.shared.attempts.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.shared.config
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            worker.cancel.cancel();
        }
    }
}

/// How a connected session ended
enum SessionEnd {
    Cancelled,
    Closed(String),
    Errored(String),
}

/// Connect, pump, and reconnect until cancelled or out of attempts
async fn run_connection(
    shared: Arc<Shared>,
    cancel: CancellationToken,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let config = &shared.config;
    let mut backoff = Backoff::from_config(config);

    loop {
        shared.set_state(ConnectionState::Connecting);
        let connected = tokio::select! {
            _ = cancel.cancelled() => break,
            result = connect_async(config.url.as_str()) => result,
        };

        let reason = match connected {
            Ok((ws, _)) => {
                backoff.reset();
                shared.attempts.store(0, Ordering::SeqCst);
                shared.set_state(ConnectionState::Connected);
                info!(url = %config.url, "channel connected");
                shared.handler.on_connect();

                let end = pump(&shared, ws, &cancel, &mut outbound).await;
                shared.handler.on_disconnect();

                match end {
                    SessionEnd::Cancelled => {
                        info!(url = %config.url, "channel closed by client");
                        break;
                    }
                    SessionEnd::Closed(reason) => {
                        shared.set_state(ConnectionState::Closed);
                        reason
                    }
                    SessionEnd::Errored(reason) => {
                        shared.set_state(ConnectionState::Errored);
                        reason
                    }
                }
            }
            Err(e) => {
                shared.set_state(ConnectionState::Errored);
                e.to_string()
            }
        };

        if !config.auto_reconnect {
            info!(url = %config.url, %reason, "channel lost, auto-reconnect disabled");
            break;
        }

        let Some(delay) = backoff.next_delay() else {
            let attempts = backoff.attempts();
            info!(url = %config.url, attempts, %reason, "reconnect attempts exhausted");
            shared
                .handler
                .on_error(&SyncError::ConnectionExhausted { attempts });
            break;
        };

        let attempt = backoff.attempts();
        shared.attempts.store(attempt, Ordering::SeqCst);
        shared.set_state(ConnectionState::ReconnectPending);
        warn!(
            url = %config.url,
            attempt,
            delay_ms = delay.as_millis() as u64,
            %reason,
            "channel lost, reconnect scheduled"
        );
        shared.handler.on_reconnect_scheduled(attempt, delay);

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    shared.set_state(ConnectionState::Disconnected);
}

/// Move frames between the socket and the handler while connected
async fn pump(
    shared: &Shared,
    ws: WsStream,
    cancel: &CancellationToken,
    outbound: &mut mpsc::UnboundedReceiver<String>,
) -> SessionEnd {
    let (mut sink, mut stream) = ws.split();
    let period = shared.config.keepalive_interval;
    let mut keepalive = interval_at(Instant::now() + period, period);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                return SessionEnd::Cancelled;
            }

            _ = keepalive.tick() => {
                debug!("sending heartbeat");
                if let Err(e) = sink.send(Message::Text(PING_TOKEN.to_string().into())).await {
                    return SessionEnd::Errored(e.to_string());
                }
            }

            Some(text) = outbound.recv() => {
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    return SessionEnd::Errored(e.to_string());
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => shared.handler.on_message(text.as_str()),
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => shared.handler.on_message(text),
                        Err(_) => warn!(error = %ProtocolError::NonText, "dropping binary frame"),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame
                            .map(|f| format!("closed by peer ({}): {}", u16::from(f.code), f.reason.as_str()))
                            .unwrap_or_else(|| "closed by peer".to_string());
                        return SessionEnd::Closed(reason);
                    }
                    // Ping/Pong control frames are answered by tungstenite
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return SessionEnd::Errored(e.to_string()),
                    None => return SessionEnd::Closed("stream ended".to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Silent;

    impl ChannelHandler for Silent {
        fn on_message(&self, _raw: &str) {}
    }

    fn unreachable_config(auto_reconnect: bool) -> ChannelConfig {
        // Port 9 (discard) is not expected to accept WebSocket connections
        ChannelConfig {
            url: "ws://127.0.0.1:9/ws".to_string(),
            auto_reconnect,
            max_reconnect_attempts: 2,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(20),
            keepalive_interval: Duration::from_millis(50),
        }
    }

    async fn wait_for(
        rx: &mut watch::Receiver<ConnectionState>,
        target: ConnectionState,
    ) -> bool {
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| *s == target))
            .await
            .map(|r| r.is_ok())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let manager = ConnectionManager::new(unreachable_config(true), Arc::new(Silent)).unwrap();
        assert_eq!(manager.state(), ConnectionState::Idle);
        assert_eq!(manager.attempts(), 0);
    }

    #[tokio::test]
    async fn test_failed_connect_without_reconnect_disconnects() {
        let manager = ConnectionManager::new(unreachable_config(false), Arc::new(Silent)).unwrap();
        let mut rx = manager.subscribe_state();
        manager.connect();

        assert!(wait_for(&mut rx, ConnectionState::Disconnected).await);
        assert_eq!(manager.attempts(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let manager = ConnectionManager::new(unreachable_config(true), Arc::new(Silent)).unwrap();
        manager.disconnect().await;
        assert_eq!(manager.state(), ConnectionState::Idle);

        manager.connect();
        manager.disconnect().await;
        manager.disconnect().await;
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_rejects_unusable_intervals() {
        let config = ChannelConfig {
            keepalive_interval: Duration::ZERO,
            ..unreachable_config(true)
        };
        assert!(ConnectionManager::new(config, Arc::new(Silent)).is_err());

        let config = ChannelConfig {
            initial_backoff: Duration::ZERO,
            ..unreachable_config(true)
        };
        assert!(ConnectionManager::new(config, Arc::new(Silent)).is_err());

        let config = ChannelConfig {
            url: "http://127.0.0.1:9/ws".to_string(),
            ..unreachable_config(true)
        };
        assert!(ConnectionManager::new(config, Arc::new(Silent)).is_err());
    }

    #[tokio::test]
    async fn test_send_requires_connection() {
        let manager = ConnectionManager::new(unreachable_config(true), Arc::new(Silent)).unwrap();
        assert!(manager.send_text("hello").is_err());
    }
}
