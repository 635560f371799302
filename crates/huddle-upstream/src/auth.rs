// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the external session verification service.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use huddle_core::{AuthVerifier, HuddleError, UserId};

use crate::client::{build_http, check_status, join_url, transport_err};

/// Verifies bearer tokens against `GET /auth/verify`.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    user_id: String,
}

impl AuthClient {
    pub fn new(base_url: String) -> Result<Self, HuddleError> {
        Ok(Self::with_http(build_http()?, base_url))
    }

    pub(crate) fn with_http(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl AuthVerifier for AuthClient {
    async fn verify(&self, token: &str) -> Result<UserId, HuddleError> {
        let url = join_url(&self.base_url, "auth/verify");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_err("auth verify", e))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(HuddleError::Auth("token rejected by session service".into()));
        }

        let body: VerifyResponse = check_status("auth verify", response)?
            .json()
            .await
            .map_err(|e| transport_err("auth verify body", e))?;

        debug!(user = %body.user_id, "token verified");
        Ok(UserId(body.user_id))
    }
}
