// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Room Summary Aggregator.
//!
//! Maintains, per (room, viewing-user) pair, the latest preview and unread
//! count used to render room lists, plus an informational presence flag per
//! user. Summary rows are created lazily on first message and never
//! deleted.
//!
//! Summary updates are not best-effort like socket delivery: `on_dispatch`
//! runs for every member, offline ones included, inside the room's
//! serialized dispatch step. That serialization is also what makes each
//! room's summaries single-writer; this store adds no locking of its own
//! beyond the shard maps.

use std::collections::HashMap;

use dashmap::DashMap;
use tracing::debug;

use huddle_core::{MessageFrame, Preview, RoomId, RoomSummary, UserId};

/// Per-user room summary and presence store.
#[derive(Default)]
pub struct SummaryStore {
    /// user -> (room -> summary). Outer map sharded; inner map owned by
    /// one user and only touched by dispatch steps of rooms they are in.
    by_user: DashMap<UserId, HashMap<RoomId, RoomSummary>>,
    /// Informational presence flags, flipped by connect/disconnect.
    presence: DashMap<UserId, bool>,
}

impl SummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one dispatched message to every member's summary row.
    ///
    /// The preview carries the message content (the file name, for ARCHIVE
    /// frames) and format; `sent_at` is the frame's creation timestamp.
    /// Every member except the sender gains one unread; the sender's unread
    /// resets to zero, since a sender has always read their own message.
    pub fn on_dispatch(&self, room_id: &RoomId, frame: &MessageFrame, members: &[UserId]) {
        let preview = Preview {
            content: frame.content.clone(),
            format: frame.format,
        };

        for member in members {
            let mut rooms = self.by_user.entry(member.clone()).or_default();
            let summary = rooms.entry(room_id.clone()).or_insert_with(|| RoomSummary {
                room_id: room_id.clone(),
                preview: preview.clone(),
                sent_at: frame.created_at,
                unread_count: 0,
            });

            summary.preview = preview.clone();
            summary.sent_at = frame.created_at;
            if *member == frame.sender_id {
                summary.unread_count = 0;
            } else {
                summary.unread_count += 1;
            }
        }

        debug!(room = %room_id, members = members.len(), "room summaries updated");
    }

    /// Returns the user's summaries ordered by most recent `sent_at` first.
    pub fn summaries(&self, user: &UserId) -> Vec<RoomSummary> {
        let mut result: Vec<RoomSummary> = self
            .by_user
            .get(user)
            .map(|rooms| rooms.values().cloned().collect())
            .unwrap_or_default();
        result.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        result
    }

    /// Zeroes the unread count for one (user, room) pair.
    ///
    /// Called when the viewing user acknowledges the room. The preview is
    /// left untouched. Acknowledging a room with no summary row is a no-op.
    pub fn acknowledge(&self, user: &UserId, room_id: &RoomId) {
        if let Some(mut rooms) = self.by_user.get_mut(user) {
            if let Some(summary) = rooms.get_mut(room_id) {
                summary.unread_count = 0;
            }
        }
    }

    /// Flips the informational presence flag for a user.
    pub fn set_presence(&self, user: &UserId, online: bool) {
        self.presence.insert(user.clone(), online);
    }

    /// Whether the user currently has a live connection, as last reported.
    pub fn is_present(&self, user: &UserId) -> bool {
        self.presence.get(user).map(|flag| *flag).unwrap_or(false)
    }
}
