// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the external message history store.

use async_trait::async_trait;

use huddle_core::{HistoryStore, HuddleError, MessageFrame, RoomId};

use crate::client::{build_http, check_status, join_url, transport_err};

/// Reads persisted room history from `GET /rooms/{roomId}/messages`.
///
/// The store returns messages ascending by time; the core passes that
/// order through untouched (it seeds room-open backfill).
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HistoryClient {
    pub fn new(base_url: String) -> Result<Self, HuddleError> {
        Ok(Self::with_http(build_http()?, base_url))
    }

    pub(crate) fn with_http(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl HistoryStore for HistoryClient {
    async fn room_messages(&self, room_id: &RoomId) -> Result<Vec<MessageFrame>, HuddleError> {
        let url = join_url(&self.base_url, &format!("rooms/{room_id}/messages"));
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_err("history fetch", e))?;

        check_status("history fetch", response)?
            .json()
            .await
            .map_err(|e| transport_err("history body", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn history_preserves_ascending_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rooms/dept-7/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "roomId": "dept-7",
                    "senderId": "alice",
                    "content": "first",
                    "format": "TEXT",
                    "chatType": "GROUP",
                    "createdAt": "2026-03-02T12:00:00Z"
                },
                {
                    "roomId": "dept-7",
                    "senderId": "bob",
                    "content": "second",
                    "format": "TEXT",
                    "chatType": "GROUP",
                    "createdAt": "2026-03-02T12:00:05Z"
                }
            ])))
            .mount(&server)
            .await;

        let client = HistoryClient::new(server.uri()).unwrap();
        let messages = client.room_messages(&RoomId("dept-7".into())).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rooms/dept-7/messages"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = HistoryClient::new(server.uri()).unwrap();
        let err = client.room_messages(&RoomId("dept-7".into())).await.unwrap_err();
        assert_eq!(err.code(), "upstream");
    }
}
