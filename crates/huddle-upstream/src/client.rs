// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared HTTP plumbing and a bundle of all five upstream clients.

use std::time::Duration;

use huddle_config::model::UpstreamConfig;
use huddle_core::HuddleError;

use crate::{ArchiveClient, AuthClient, DirectoryClient, HistoryClient, TagSearchClient};

/// Request timeout applied to every upstream call. The dispatch path
/// awaits archive creation, so this bounds how long one room's worker can
/// stall on a sick store.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the shared connection-pooled reqwest client.
pub(crate) fn build_http() -> Result<reqwest::Client, HuddleError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| HuddleError::Upstream {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Maps a transport-level reqwest failure into an upstream error.
pub(crate) fn transport_err(context: &str, e: reqwest::Error) -> HuddleError {
    HuddleError::Upstream {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Rejects non-2xx responses with the status in the message.
pub(crate) fn check_status(
    context: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, HuddleError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(HuddleError::upstream(format!("{context}: HTTP {status}")))
    }
}

/// Joins a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// All upstream clients, sharing one HTTP connection pool.
pub struct UpstreamClients {
    pub auth: AuthClient,
    pub directory: DirectoryClient,
    pub history: HistoryClient,
    pub archive: ArchiveClient,
    pub tags: TagSearchClient,
}

impl UpstreamClients {
    /// Builds every client from the configured base URLs.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, HuddleError> {
        let http = build_http()?;
        Ok(Self {
            auth: AuthClient::with_http(http.clone(), config.auth_url.clone()),
            directory: DirectoryClient::with_http(http.clone(), config.directory_url.clone()),
            history: HistoryClient::with_http(http.clone(), config.history_url.clone()),
            archive: ArchiveClient::with_http(http.clone(), config.archive_url.clone()),
            tags: TagSearchClient::with_http(http, config.tags_url.clone()),
        })
    }
}
