// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection table with explicit single-owner semantics.
//!
//! One live handle per user, keyed by user id. A new successful connect
//! supersedes and closes any prior handle (last-writer-wins presence); the
//! superseded socket task observes its cancellation token and shuts down.
//! Outbound delivery is at-most-once: pushes to absent or saturated
//! handles are dropped, never queued.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use huddle_core::{FrameSink, ServerFrame, UserId};

/// One user's live connection handle.
struct ConnectionHandle {
    conn_id: Uuid,
    outbound: mpsc::Sender<ServerFrame>,
    closer: CancellationToken,
    last_seen: Instant,
}

/// Registry of live connections, the only owner of connection handles.
#[derive(Default)]
pub struct ConnectionRegistry {
    conns: DashMap<UserId, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection for `user`, superseding any prior one.
    ///
    /// The prior handle's cancellation token is triggered so its socket
    /// task closes. Returns the new connection's id; the socket task must
    /// present it on `touch` and `unregister` so a superseded task cannot
    /// disturb its successor's handle.
    pub fn register(
        &self,
        user: &UserId,
        outbound: mpsc::Sender<ServerFrame>,
        closer: CancellationToken,
    ) -> Uuid {
        let conn_id = Uuid::new_v4();
        let handle = ConnectionHandle {
            conn_id,
            outbound,
            closer,
            last_seen: Instant::now(),
        };
        if let Some(prior) = self.conns.insert(user.clone(), handle) {
            info!(user = %user, "connection superseded by newer connect");
            prior.closer.cancel();
        }
        conn_id
    }

    /// Removes the connection if `conn_id` still owns the user's slot.
    ///
    /// Returns `true` when the slot was freed; `false` means a newer
    /// connection took ownership and must be left alone.
    pub fn unregister(&self, user: &UserId, conn_id: Uuid) -> bool {
        self.conns
            .remove_if(user, |_, handle| handle.conn_id == conn_id)
            .is_some()
    }

    /// Records liveness for the heartbeat sweeper. Any inbound frame or
    /// ping counts.
    pub fn touch(&self, user: &UserId, conn_id: Uuid) {
        if let Some(mut handle) = self.conns.get_mut(user) {
            if handle.conn_id == conn_id {
                handle.last_seen = Instant::now();
            }
        }
    }

    /// Closes and frees every handle silent for longer than `timeout`.
    ///
    /// Returns the affected users so the caller can flip presence flags.
    pub fn sweep(&self, timeout: Duration) -> Vec<UserId> {
        let now = Instant::now();
        let stale: Vec<(UserId, Uuid)> = self
            .conns
            .iter()
            .filter(|entry| now.duration_since(entry.last_seen) > timeout)
            .map(|entry| (entry.key().clone(), entry.conn_id))
            .collect();

        let mut closed = Vec::new();
        for (user, conn_id) in stale {
            if let Some((_, handle)) =
                self.conns.remove_if(&user, |_, h| h.conn_id == conn_id)
            {
                handle.closer.cancel();
                debug!(user = %user, "stale connection closed by heartbeat sweep");
                closed.push(user);
            }
        }
        closed
    }

    /// Number of live handles, for observability.
    pub fn connection_count(&self) -> usize {
        self.conns.len()
    }
}

impl FrameSink for ConnectionRegistry {
    fn push_frame(&self, user: &UserId, frame: &ServerFrame) -> bool {
        match self.conns.get(user) {
            // try_send keeps the dispatch path non-blocking; a saturated
            // buffer drops the frame, same as an absent handle.
            Some(handle) => handle.outbound.try_send(frame.clone()).is_ok(),
            None => false,
        }
    }

    fn is_connected(&self, user: &UserId) -> bool {
        self.conns.contains_key(user)
    }
}
