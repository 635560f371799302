// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconnecting websocket client for the Huddle gateway.
//!
//! Maintains one long-lived connection, transparently redialing with
//! jittered exponential backoff when the link drops. Server frames are
//! surfaced on an event channel; the caller sends messages and room
//! opens through the [`HuddleClient`] handle. After a reconnect the
//! caller re-opens its rooms to receive backlog frames covering the gap.

pub mod backoff;

use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use huddle_config::model::ReconnectConfig;
use huddle_core::{HuddleError, MessageFrame, RoomId, ServerFrame};

use crate::backoff::Backoff;

const EVENT_QUEUE_DEPTH: usize = 256;
const COMMAND_QUEUE_DEPTH: usize = 64;

/// Connection lifecycle and traffic, as seen by the caller.
#[derive(Debug)]
pub enum ClientEvent {
    /// The socket is up. Rooms should be (re-)opened after this.
    Connected,
    /// The socket dropped; the client is redialing in the background.
    Disconnected,
    /// A frame pushed by the gateway.
    Frame(ServerFrame),
}

enum Command {
    Open(RoomId),
    Send(MessageFrame),
}

#[derive(Serialize)]
struct OpenRequest<'a> {
    #[serde(rename = "openRoom")]
    open_room: &'a RoomId,
}

/// Handle to a running client task.
pub struct HuddleClient {
    commands: mpsc::Sender<Command>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl HuddleClient {
    /// Spawns the client task dialing `url` with the given bearer token.
    ///
    /// `ping_interval` is how often the client pings the gateway to
    /// keep its connection out of the heartbeat sweeper's reach.
    pub fn connect(
        url: String,
        token: String,
        reconnect: ReconnectConfig,
        ping_interval: std::time::Duration,
    ) -> (Self, mpsc::Receiver<ClientEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(run(
            url,
            token,
            reconnect,
            ping_interval,
            command_rx,
            event_tx,
            shutdown.clone(),
        ));

        let client = Self {
            commands: command_tx,
            shutdown,
            task,
        };
        (client, event_rx)
    }

    /// Queues a message frame for the gateway.
    pub async fn send(&self, frame: MessageFrame) -> Result<(), HuddleError> {
        self.commands
            .send(Command::Send(frame))
            .await
            .map_err(|_| HuddleError::Transport("client task has stopped".into()))
    }

    /// Requests the room's backlog. The gateway answers with a
    /// `backlog` frame on the event channel.
    pub async fn open_room(&self, room_id: RoomId) -> Result<(), HuddleError> {
        self.commands
            .send(Command::Open(room_id))
            .await
            .map_err(|_| HuddleError::Transport("client task has stopped".into()))
    }

    /// Closes the connection and waits for the client task to finish.
    pub async fn close(self) {
        self.shutdown.cancel();
        let _ = self.task.await;
    }
}

async fn run(
    url: String,
    token: String,
    reconnect: ReconnectConfig,
    ping_interval: std::time::Duration,
    mut commands: mpsc::Receiver<Command>,
    events: mpsc::Sender<ClientEvent>,
    shutdown: CancellationToken,
) {
    let mut backoff = Backoff::new(&reconnect);

    loop {
        match dial(&url, &token).await {
            Ok(socket) => {
                tracing::info!(url = %url, "connected to gateway");
                backoff.reset();
                if events.send(ClientEvent::Connected).await.is_err() {
                    return;
                }

                let done = session(socket, ping_interval, &mut commands, &events, &shutdown).await;
                if done || events.send(ClientEvent::Disconnected).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "gateway dial failed");
            }
        }

        let delay = backoff.next_delay();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "redialing after delay");
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

async fn dial(
    url: &str,
    token: &str,
) -> Result<
    tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    HuddleError,
> {
    let mut request = url
        .into_client_request()
        .map_err(|e| HuddleError::Transport(format!("bad gateway url {url}: {e}")))?;
    let header = format!("Bearer {token}")
        .parse()
        .map_err(|_| HuddleError::Transport("token is not a valid header value".into()))?;
    request.headers_mut().insert("Authorization", header);

    let (socket, _response) = tokio_tungstenite::connect_async(request)
        .await
        .map_err(|e| HuddleError::Transport(format!("websocket handshake failed: {e}")))?;
    Ok(socket)
}

/// Drives one live connection. Returns true when the client should
/// stop for good rather than redial.
async fn session(
    socket: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    ping_interval: std::time::Duration,
    commands: &mut mpsc::Receiver<Command>,
    events: &mpsc::Sender<ClientEvent>,
    shutdown: &CancellationToken,
) -> bool {
    let (mut sink, mut stream) = socket.split();
    let mut ping = tokio::time::interval(ping_interval);
    ping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ping.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                return true;
            }
            _ = ping.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    return false;
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    let _ = sink.send(Message::Close(None)).await;
                    return true;
                };
                let text = match &command {
                    Command::Open(room_id) => {
                        serde_json::to_string(&OpenRequest { open_room: room_id })
                    }
                    Command::Send(frame) => serde_json::to_string(frame),
                };
                let Ok(text) = text else { continue };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    return false;
                }
            }
            incoming = stream.next() => {
                let Some(Ok(message)) = incoming else {
                    return false;
                };
                match message {
                    Message::Text(text) => {
                        match serde_json::from_str::<ServerFrame>(text.as_str()) {
                            Ok(frame) => {
                                if events.send(ClientEvent::Frame(frame)).await.is_err() {
                                    return true;
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "dropping unreadable server frame");
                            }
                        }
                    }
                    Message::Close(_) => return false,
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_request_wire_shape() {
        let room = RoomId("room-7".into());
        let text = serde_json::to_string(&OpenRequest { open_room: &room }).unwrap();
        assert_eq!(text, r#"{"openRoom":"room-7"}"#);
    }

    #[tokio::test]
    async fn close_stops_the_client_task() {
        let (client, mut events) = HuddleClient::connect(
            "ws://127.0.0.1:1/ws".into(),
            "tok".into(),
            ReconnectConfig {
                base_delay_ms: 10,
                max_delay_ms: 20,
                multiplier: 2.0,
            },
            std::time::Duration::from_secs(30),
        );
        client.close().await;
        // The task is gone, so the event channel closes too.
        while events.recv().await.is_some() {}
    }
}
