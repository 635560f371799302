// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Websocket endpoint.
//!
//! Each accepted socket gets a registry entry, an outbound frame queue,
//! and a per-connection room cache. Frames received from the client are
//! admitted through the dispatcher; frames addressed to the user are
//! pushed onto the outbound queue by the dispatcher's fan-out.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use huddle_core::{MessageFrame, RoomId, ServerFrame, UserId};

use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

/// Everything a client may send over the socket. Room-open requests
/// carry only a room id; anything else is a message frame.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Inbound {
    Open {
        #[serde(rename = "openRoom")]
        open_room: RoomId,
    },
    Frame(MessageFrame),
}

/// Upgrades `GET /ws` after verifying the caller's token.
///
/// The token comes from the `Authorization: Bearer` header or, for
/// browser clients that cannot set headers on websocket handshakes,
/// a `token` query parameter.
pub async fn ws_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Query(query): Query<WsQuery>,
    upgrade: WebSocketUpgrade,
) -> Response {
    let token = bearer_token(&headers).or(query.token);
    let Some(token) = token else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let user = match state.auth.verify(&token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(error = %e, "websocket handshake rejected");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    upgrade.on_upgrade(move |socket| handle_socket(state, socket, user))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

/// Drives one client connection until the peer hangs up, a newer
/// connection for the same user supersedes it, or the heartbeat
/// sweeper closes it.
async fn handle_socket(state: GatewayState, socket: WebSocket, user: UserId) {
    let (tx, mut rx) = mpsc::channel::<ServerFrame>(state.outbound_buffer);
    let closer = CancellationToken::new();
    let conn_id = state.registry.register(&user, tx.clone(), closer.clone());
    state.summaries.set_presence(&user, true);

    tracing::info!(user = %user, %conn_id, "websocket connected");

    let cache = huddle_rooms::SessionCache::new();
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Forward queued server frames to the wire. Serialization failures
    // never happen for our own frame types; a send failure means the
    // socket is gone and the read loop will observe it too.
    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&frame) else {
                continue;
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    loop {
        tokio::select! {
            _ = closer.cancelled() => {
                tracing::debug!(user = %user, %conn_id, "connection closed by registry");
                break;
            }
            incoming = ws_receiver.next() => {
                let Some(Ok(message)) = incoming else {
                    break;
                };
                state.registry.touch(&user, conn_id);
                match message {
                    Message::Text(text) => {
                        handle_text(&state, &cache, &user, &tx, text.as_str()).await;
                    }
                    Message::Ping(_) | Message::Pong(_) => {}
                    Message::Close(_) => break,
                    Message::Binary(_) => {
                        send_error(&tx, "validation", "binary frames are not supported").await;
                    }
                }
            }
        }
    }

    // Only clear presence if this connection still owns the registry
    // slot; a superseding connection keeps the user online.
    if state.registry.unregister(&user, conn_id) {
        state.summaries.set_presence(&user, false);
    }
    drop(tx);
    let _ = writer.await;

    tracing::info!(user = %user, %conn_id, "websocket disconnected");
}

async fn handle_text(
    state: &GatewayState,
    cache: &huddle_rooms::SessionCache,
    user: &UserId,
    tx: &mpsc::Sender<ServerFrame>,
    text: &str,
) {
    let inbound: Inbound = match serde_json::from_str(text) {
        Ok(inbound) => inbound,
        Err(e) => {
            send_error(tx, "validation", &format!("malformed frame: {e}")).await;
            return;
        }
    };

    match inbound {
        Inbound::Open { open_room } => {
            if let Err(e) = handle_open(state, cache, user, tx, &open_room).await {
                send_error(tx, e.code(), &e.to_string()).await;
            }
        }
        Inbound::Frame(frame) => {
            if frame.sender_id != *user {
                send_error(tx, "validation", "senderId does not match this session").await;
                return;
            }
            match state.dispatcher.dispatch(cache, frame).await {
                Ok(result) => {
                    tracing::debug!(user = %user, delivered = result.delivered, "frame dispatched");
                }
                Err(e) => {
                    tracing::debug!(user = %user, error = %e, "frame rejected");
                    send_error(tx, e.code(), &e.to_string()).await;
                }
            }
        }
    }
}

/// Seeds a freshly opened room with its persisted history, oldest
/// first, so a reconnecting client recovers messages it missed.
async fn handle_open(
    state: &GatewayState,
    cache: &huddle_rooms::SessionCache,
    user: &UserId,
    tx: &mpsc::Sender<ServerFrame>,
    room_id: &RoomId,
) -> Result<(), huddle_core::HuddleError> {
    state.resolver.member_room(cache, user, room_id).await?;
    let messages = state.history.room_messages(room_id).await?;
    let backlog = ServerFrame::Backlog {
        room_id: room_id.clone(),
        messages,
    };
    if tx.send(backlog).await.is_err() {
        tracing::debug!(user = %user, "backlog dropped, connection gone");
    }
    Ok(())
}

async fn send_error(tx: &mpsc::Sender<ServerFrame>, code: &str, reason: &str) {
    let frame = ServerFrame::Error {
        code: code.to_owned(),
        reason: reason.to_owned(),
    };
    if tx.send(frame).await.is_err() {
        tracing::debug!("error frame dropped, connection gone");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use huddle_core::{ChatKind, MessageFormat};

    #[test]
    fn inbound_open_parses_before_frame() {
        let parsed: Inbound = serde_json::from_str(r#"{"openRoom":"room-7"}"#).unwrap();
        match parsed {
            Inbound::Open { open_room } => assert_eq!(open_room.0, "room-7"),
            Inbound::Frame(_) => panic!("expected open request"),
        }
    }

    #[test]
    fn inbound_message_frame_parses() {
        let frame = MessageFrame {
            room_id: RoomId("room-7".into()),
            sender_id: UserId("alice".into()),
            receiver_id: None,
            content: "hello".into(),
            format: MessageFormat::Text,
            chat_type: ChatKind::Group,
            created_at: Utc::now(),
            tag_names: None,
        };
        let text = serde_json::to_string(&frame).unwrap();
        let parsed: Inbound = serde_json::from_str(&text).unwrap();
        match parsed {
            Inbound::Frame(inner) => assert_eq!(inner.content, "hello"),
            Inbound::Open { .. } => panic!("expected message frame"),
        }
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer tok-1".parse().unwrap());
        assert_eq!(bearer_token(&headers).as_deref(), Some("tok-1"));

        let empty = HeaderMap::new();
        assert!(bearer_token(&empty).is_none());
    }
}
