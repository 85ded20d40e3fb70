//! Configuration surface
//!
//! A single flat [`SyncConfig`] (camelCase keys on the wire) that splits into
//! [`ChannelConfig`] for the connection manager and [`ContextOptions`] for the
//! context selector.

mod loader;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use loader::{apply_env_overrides, deep_merge, load_config, load_config_from_path};

pub const DEFAULT_CHANNEL_URL: &str = "ws://localhost:8000/ws";
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;
pub const DEFAULT_KEEPALIVE_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_MAX_NODES_IN_CONTEXT: usize = 50;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// All recognized options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    pub channel_url: String,
    pub auto_reconnect: bool,
    pub max_reconnect_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub keepalive_interval_ms: u64,
    pub max_nodes_in_context: usize,
    pub auto_include_neighbors: bool,
    pub include_properties: bool,
    pub include_relationships: bool,
    pub log_level: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            channel_url: DEFAULT_CHANNEL_URL.to_string(),
            auto_reconnect: true,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            keepalive_interval_ms: DEFAULT_KEEPALIVE_INTERVAL_MS,
            max_nodes_in_context: DEFAULT_MAX_NODES_IN_CONTEXT,
            auto_include_neighbors: false,
            include_properties: true,
            include_relationships: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl SyncConfig {
    /// Defaults with a specific channel URL
    pub fn with_url(channel_url: impl Into<String>) -> Self {
        Self {
            channel_url: channel_url.into(),
            ..Self::default()
        }
    }

    /// Reject values the connection manager or selector cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.channel().validate()?;
        if self.max_nodes_in_context == 0 {
            return Err(ConfigError::InvalidValue(
                "maxNodesInContext must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn channel(&self) -> ChannelConfig {
        ChannelConfig {
            url: self.channel_url.clone(),
            auto_reconnect: self.auto_reconnect,
            max_reconnect_attempts: self.max_reconnect_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            keepalive_interval: Duration::from_millis(self.keepalive_interval_ms),
        }
    }

    pub fn context(&self) -> ContextOptions {
        ContextOptions {
            max_nodes_in_context: self.max_nodes_in_context,
            auto_include_neighbors: self.auto_include_neighbors,
            include_properties: self.include_properties,
            include_relationships: self.include_relationships,
        }
    }
}

/// Connection manager settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub url: String,
    pub auto_reconnect: bool,
    pub max_reconnect_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub keepalive_interval: Duration,
}

impl ChannelConfig {
    pub fn new(url: impl Into<String>) -> Self {
        SyncConfig::with_url(url).channel()
    }

    /// Reject settings the connection task cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue("channelUrl is empty".to_string()));
        }
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::InvalidValue(format!(
                "channelUrl must use ws:// or wss://, got {}",
                url
            )));
        }
        if self.initial_backoff.is_zero() {
            return Err(ConfigError::InvalidValue(
                "initialBackoffMs must be positive".to_string(),
            ));
        }
        if self.max_backoff < self.initial_backoff {
            return Err(ConfigError::InvalidValue(format!(
                "maxBackoffMs ({}) is below initialBackoffMs ({})",
                self.max_backoff.as_millis(),
                self.initial_backoff.as_millis()
            )));
        }
        if self.keepalive_interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "keepaliveIntervalMs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Context selector settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    pub max_nodes_in_context: usize,
    pub auto_include_neighbors: bool,
    pub include_properties: bool,
    pub include_relationships: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        SyncConfig::default().context()
    }
}
