// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the external archive item store.

use async_trait::async_trait;
use reqwest::multipart::Form;
use tracing::debug;

use huddle_core::{ArchiveItem, ArchiveStore, HuddleError, NewArchiveItem};

use crate::client::{build_http, check_status, join_url, transport_err};

/// Creates archive items via a multipart `POST /archive/items`.
///
/// The blob itself is uploaded by the client application out of band; this
/// call registers the item's metadata and receives the stored-file
/// reference back.
pub struct ArchiveClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArchiveClient {
    pub fn new(base_url: String) -> Result<Self, HuddleError> {
        Ok(Self::with_http(build_http()?, base_url))
    }

    pub(crate) fn with_http(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl ArchiveStore for ArchiveClient {
    async fn create_item(&self, item: NewArchiveItem) -> Result<ArchiveItem, HuddleError> {
        let url = join_url(&self.base_url, "archive/items");

        let tags_json = serde_json::to_string(&item.tags)
            .map_err(|e| HuddleError::Internal(format!("tag serialization failed: {e}")))?;
        let form = Form::new()
            .text("roomId", item.room_id.0.clone())
            .text("uploader", item.uploader.0.clone())
            .text("fileName", item.file_name.clone())
            .text("tags", tags_json);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_err("archive create", e))?;

        let created: ArchiveItem = check_status("archive create", response)?
            .json()
            .await
            .map_err(|e| transport_err("archive create body", e))?;

        debug!(item = %created.id, file = %created.file_name, "archive item stored");
        Ok(created)
    }
}
