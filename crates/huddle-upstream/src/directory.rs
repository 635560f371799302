// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the external membership directory.

use async_trait::async_trait;

use huddle_core::{HuddleError, MembershipDirectory, RoomId, RoomInfo};

use crate::client::{build_http, check_status, join_url, transport_err};

/// Reads room metadata and member sets from `GET /rooms/{roomId}`.
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(base_url: String) -> Result<Self, HuddleError> {
        Ok(Self::with_http(build_http()?, base_url))
    }

    pub(crate) fn with_http(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl MembershipDirectory for DirectoryClient {
    async fn room_info(&self, room_id: &RoomId) -> Result<Option<RoomInfo>, HuddleError> {
        let url = join_url(&self.base_url, &format!("rooms/{room_id}"));
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_err("directory lookup", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let info: RoomInfo = check_status("directory lookup", response)?
            .json()
            .await
            .map_err(|e| transport_err("directory body", e))?;
        Ok(Some(info))
    }
}
