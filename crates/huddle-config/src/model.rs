// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Huddle chat core.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Huddle configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HuddleConfig {
    /// Gateway bind address and logging settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Connection heartbeat settings.
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,

    /// Client reconnect backoff settings.
    #[serde(default)]
    pub reconnect: ReconnectConfig,

    /// Tag extraction and autocomplete settings.
    #[serde(default)]
    pub tags: TagsConfig,

    /// External REST endpoint settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Gateway HTTP/WebSocket server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Outbound frame buffer per connection; frames beyond this are
    /// dropped (delivery is at-most-once by contract).
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

/// Heartbeat configuration shared by server sweeper and client pings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeartbeatConfig {
    /// Interval between client pings and between server sweep passes.
    #[serde(default = "default_heartbeat_interval")]
    pub interval_secs: u64,

    /// Silence window after which the server closes a stale handle.
    /// Must be greater than `interval_secs`.
    #[serde(default = "default_heartbeat_timeout")]
    pub timeout_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_heartbeat_interval(),
            timeout_secs: default_heartbeat_timeout(),
        }
    }
}

/// Exponential backoff settings for the reconnecting client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReconnectConfig {
    /// First retry delay in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound on the retry delay in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Multiplier applied per failed attempt.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// Tag autocomplete configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TagsConfig {
    /// Debounce delay before a suggestion query fires, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum number of suggestions returned per query.
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            suggest_limit: default_suggest_limit(),
        }
    }
}

/// Base URLs for the external collaborators the core calls over REST.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Session verification service.
    #[serde(default = "default_upstream_url")]
    pub auth_url: String,

    /// Membership directory service.
    #[serde(default = "default_upstream_url")]
    pub directory_url: String,

    /// Persisted message history service.
    #[serde(default = "default_upstream_url")]
    pub history_url: String,

    /// Archive item storage service.
    #[serde(default = "default_upstream_url")]
    pub archive_url: String,

    /// Archive tag index service.
    #[serde(default = "default_upstream_url")]
    pub tags_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            auth_url: default_upstream_url(),
            directory_url: default_upstream_url(),
            history_url: default_upstream_url(),
            archive_url: default_upstream_url(),
            tags_url: default_upstream_url(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8700
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_outbound_buffer() -> usize {
    64
}

fn default_heartbeat_interval() -> u64 {
    15
}

fn default_heartbeat_timeout() -> u64 {
    45
}

fn default_base_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_suggest_limit() -> usize {
    10
}

fn default_upstream_url() -> String {
    "http://127.0.0.1:9700".to_string()
}
