// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Huddle chat core.
//!
//! Wire-facing structs serialize to the camelCase JSON the suite's clients
//! already speak; ids are newtypes so room/user/message identifiers cannot
//! be swapped for each other silently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a room (conversation scope).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// A tag name in the archive tag index. Stored case-sensitively; no
/// canonicalization is applied anywhere in the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagName(pub String);

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of a room's membership model.
///
/// A closed set: every resolver and dispatcher boundary matches this
/// exhaustively. ARCHIVE is not a scope; it is a property of the message
/// format and of paired sub-rooms (see [`RoomInfo::archive_room_id`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomScope {
    /// One-to-one conversation between exactly two users.
    Direct,
    /// Department-wide group conversation.
    Department,
    /// Project group conversation.
    Project,
}

/// Message payload kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageFormat {
    /// Plain text chat message.
    Text,
    /// File-sharing message; always backed by an [`ArchiveItem`].
    Archive,
}

/// Frame-level chat classification carried on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatKind {
    /// Direct message; requires `receiverId` on the frame.
    Direct,
    /// Department or project group message.
    Group,
}

/// A chat message as carried over the socket.
///
/// Immutable once dispatched: the core forwards frames and records side
/// effects, it never rewrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFrame {
    pub room_id: RoomId,
    pub sender_id: UserId,
    /// Required for DIRECT frames; absent on GROUP frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<UserId>,
    /// Message text, or the original file name for ARCHIVE frames.
    pub content: String,
    pub format: MessageFormat,
    pub chat_type: ChatKind,
    pub created_at: DateTime<Utc>,
    /// User-confirmed tags for ARCHIVE frames; merged with auto-extracted
    /// tags before the archive item is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<TagName>>,
}

/// Request payload for creating an archive item in the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArchiveItem {
    pub room_id: RoomId,
    pub uploader: UserId,
    pub file_name: String,
    pub tags: Vec<TagName>,
}

/// A successfully stored archive item.
///
/// Created exactly once per upload; tags are fixed at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveItem {
    pub id: String,
    pub room_id: RoomId,
    pub uploader_nickname: String,
    pub file_name: String,
    pub file_url: String,
    pub tags: Vec<TagName>,
    pub created_at: DateTime<Utc>,
}

/// Last-message preview shown in room lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub content: String,
    pub format: MessageFormat,
}

/// Per (room, viewing-user) denormalized state for list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub preview: Preview,
    pub sent_at: DateTime<Utc>,
    pub unread_count: u64,
}

/// Room metadata as resolved from the external membership directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub scope: RoomScope,
    pub members: Vec<UserId>,
    /// Paired archive sub-room, if the room has one. Shares this room's
    /// membership; archive uploads are redirected to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_room_id: Option<RoomId>,
}

/// Server-to-client socket frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// A dispatched chat message fanned out to room members.
    Message {
        #[serde(flatten)]
        frame: MessageFrame,
    },
    /// History backfill sent when a client opens a room, ascending by time.
    Backlog {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        messages: Vec<MessageFrame>,
    },
    /// A rejected send, returned on the sender's own connection.
    Error { code: String, reason: String },
}
