// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the external archive tag index.

use async_trait::async_trait;

use huddle_core::{HuddleError, TagIndex, TagName};

use crate::client::{build_http, check_status, join_url, transport_err};

/// Ranked prefix search via `GET /archive/tags/search?prefix=...`.
pub struct TagSearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl TagSearchClient {
    pub fn new(base_url: String) -> Result<Self, HuddleError> {
        Ok(Self::with_http(build_http()?, base_url))
    }

    pub(crate) fn with_http(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl TagIndex for TagSearchClient {
    async fn search_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<TagName>, HuddleError> {
        let url = join_url(&self.base_url, "archive/tags/search");
        let response = self
            .http
            .get(&url)
            .query(&[("prefix", prefix), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(|e| transport_err("tag search", e))?;

        let mut ranked: Vec<TagName> = check_status("tag search", response)?
            .json()
            .await
            .map_err(|e| transport_err("tag search body", e))?;
        // The index ranks; the core only enforces the cap.
        ranked.truncate(limit);
        Ok(ranked)
    }
}
