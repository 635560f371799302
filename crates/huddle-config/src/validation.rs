// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as heartbeat windows and non-empty upstream URLs.

use crate::diagnostic::ConfigError;
use crate::model::HuddleConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HuddleConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must not be 0".to_string(),
        });
    }

    if config.gateway.outbound_buffer == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.outbound_buffer must be at least 1".to_string(),
        });
    }

    if config.heartbeat.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "heartbeat.interval_secs must be at least 1".to_string(),
        });
    }

    // A timeout at or below the ping interval would disconnect healthy clients.
    if config.heartbeat.timeout_secs <= config.heartbeat.interval_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "heartbeat.timeout_secs ({}) must be greater than heartbeat.interval_secs ({})",
                config.heartbeat.timeout_secs, config.heartbeat.interval_secs
            ),
        });
    }

    if config.reconnect.base_delay_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "reconnect.base_delay_ms must be at least 1".to_string(),
        });
    }

    if config.reconnect.max_delay_ms < config.reconnect.base_delay_ms {
        errors.push(ConfigError::Validation {
            message: format!(
                "reconnect.max_delay_ms ({}) must be >= reconnect.base_delay_ms ({})",
                config.reconnect.max_delay_ms, config.reconnect.base_delay_ms
            ),
        });
    }

    if config.reconnect.multiplier < 1.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "reconnect.multiplier must be at least 1.0, got {}",
                config.reconnect.multiplier
            ),
        });
    }

    if config.tags.suggest_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "tags.suggest_limit must be at least 1".to_string(),
        });
    }

    for (key, url) in [
        ("upstream.auth_url", &config.upstream.auth_url),
        ("upstream.directory_url", &config.upstream.directory_url),
        ("upstream.history_url", &config.upstream.history_url),
        ("upstream.archive_url", &config.upstream.archive_url),
        ("upstream.tags_url", &config.upstream.tags_url),
    ] {
        if url.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be an http(s) URL, got `{url}`"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&HuddleConfig::default()).is_ok());
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = HuddleConfig::default();
        config.gateway.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("gateway.port")));
    }

    #[test]
    fn timeout_must_exceed_interval() {
        let mut config = HuddleConfig::default();
        config.heartbeat.interval_secs = 30;
        config.heartbeat.timeout_secs = 30;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("heartbeat.timeout_secs")));
    }

    #[test]
    fn non_http_upstream_url_is_rejected() {
        let mut config = HuddleConfig::default();
        config.upstream.history_url = "ftp://history.internal".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = HuddleConfig::default();
        config.gateway.port = 0;
        config.tags.suggest_limit = 0;
        config.reconnect.multiplier = 0.5;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
