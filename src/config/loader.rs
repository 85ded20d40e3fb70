//! Config loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SyncConfig::default()`]
//! 2. If a config file exists, deep-merge its values over the defaults
//! 3. Apply `GRAPH_SYNC_*` environment variable overrides

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::SyncConfig;
use crate::error::ConfigError;

/// Load config from an optional file path, then env overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<SyncConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config_from_path(path)?,
        None => SyncConfig::default(),
    };
    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Load config from a JSON file over the defaults.
///
/// A missing file yields the defaults; invalid JSON is an error.
pub fn load_config_from_path(path: &Path) -> Result<SyncConfig, ConfigError> {
    let defaults = serde_json::to_value(SyncConfig::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading config from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "config file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive merge of two JSON values.
///
/// Objects merge per key, everything else is replaced by `source`, and null
/// values in `source` are skipped.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = match target_map.remove(&key) {
                    Some(target_val) => deep_merge(target_val, source_val),
                    None => source_val,
                };
                target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `GRAPH_SYNC_*` overrides. Unparseable values are ignored.
pub fn apply_env_overrides(config: &mut SyncConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

fn apply_overrides_from(config: &mut SyncConfig, get: impl Fn(&str) -> Option<String>) {
    let string = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let boolean = |key: &str| string(key).and_then(|v| parse_bool(&v));
    let number = |key: &str| string(key).and_then(|v| v.parse::<u64>().ok());

    if let Some(v) = string("GRAPH_SYNC_URL") {
        config.channel_url = v;
    }
    if let Some(v) = boolean("GRAPH_SYNC_AUTO_RECONNECT") {
        config.auto_reconnect = v;
    }
    if let Some(v) = number("GRAPH_SYNC_MAX_RECONNECT_ATTEMPTS").and_then(|v| u32::try_from(v).ok())
    {
        config.max_reconnect_attempts = v;
    }
    if let Some(v) = number("GRAPH_SYNC_INITIAL_BACKOFF_MS") {
        config.initial_backoff_ms = v;
    }
    if let Some(v) = number("GRAPH_SYNC_MAX_BACKOFF_MS") {
        config.max_backoff_ms = v;
    }
    if let Some(v) = number("GRAPH_SYNC_KEEPALIVE_MS") {
        config.keepalive_interval_ms = v;
    }
    if let Some(v) = number("GRAPH_SYNC_MAX_NODES").and_then(|v| usize::try_from(v).ok()) {
        config.max_nodes_in_context = v;
    }
    if let Some(v) = boolean("GRAPH_SYNC_INCLUDE_NEIGHBORS") {
        config.auto_include_neighbors = v;
    }
    if let Some(v) = string("GRAPH_SYNC_LOG_LEVEL") {
        config.log_level = v;
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
