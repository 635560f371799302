// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error diagnostics.
//!
//! Wraps Figment parse errors and semantic validation failures in miette
//! diagnostics so startup failures render with codes and help text.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error suitable for terminal rendering via miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The TOML/env input could not be deserialized into the config model.
    #[error("configuration parse error: {message}")]
    #[diagnostic(
        code(huddle::config::parse),
        help("check huddle.toml and HUDDLE_* environment variables against the documented keys")
    )]
    Parse {
        /// Figment's rendered description of the failure.
        message: String,
    },

    /// A semantic constraint on an otherwise well-formed value failed.
    #[error("configuration validation error: {message}")]
    #[diagnostic(code(huddle::config::validation))]
    Validation {
        /// Which key failed and why.
        message: String,
    },
}

/// Convert a Figment extraction error into one `ConfigError` per failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

/// Render collected config errors for stderr, one diagnostic per line group.
pub fn render_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("{e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figment_errors_map_to_parse_variants() {
        let result = crate::loader::load_config_from_str("[gateway]\nport = \"not-a-port\"\n");
        let errors = figment_to_config_errors(result.unwrap_err());
        assert!(!errors.is_empty());
        assert!(matches!(errors[0], ConfigError::Parse { .. }));
    }

    #[test]
    fn render_joins_messages() {
        let errors = vec![
            ConfigError::Validation {
                message: "gateway.port must not be 0".into(),
            },
            ConfigError::Validation {
                message: "tags.suggest_limit must be at least 1".into(),
            },
        ];
        let rendered = render_errors(&errors);
        assert!(rendered.contains("gateway.port"));
        assert!(rendered.contains("tags.suggest_limit"));
    }
}
