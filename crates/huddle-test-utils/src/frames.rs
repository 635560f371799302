// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame builders with fixed timestamps for deterministic assertions.

use chrono::{TimeZone, Utc};

use huddle_core::{ChatKind, MessageFormat, MessageFrame, RoomId, TagName, UserId};

/// A TEXT group frame sent at a fixed base timestamp plus `offset_secs`.
pub fn text_frame(room: &str, sender: &str, content: &str, offset_secs: i64) -> MessageFrame {
    MessageFrame {
        room_id: RoomId(room.to_string()),
        sender_id: UserId(sender.to_string()),
        receiver_id: None,
        content: content.to_string(),
        format: MessageFormat::Text,
        chat_type: ChatKind::Group,
        created_at: base_time(offset_secs),
        tag_names: None,
    }
}

/// A TEXT direct frame with an explicit receiver.
pub fn direct_frame(room: &str, sender: &str, receiver: &str, content: &str) -> MessageFrame {
    MessageFrame {
        room_id: RoomId(room.to_string()),
        sender_id: UserId(sender.to_string()),
        receiver_id: Some(UserId(receiver.to_string())),
        content: content.to_string(),
        format: MessageFormat::Text,
        chat_type: ChatKind::Direct,
        created_at: base_time(0),
        tag_names: None,
    }
}

/// An ARCHIVE group frame whose content is the uploaded file name.
pub fn archive_frame(room: &str, sender: &str, file_name: &str, tags: &[&str]) -> MessageFrame {
    MessageFrame {
        room_id: RoomId(room.to_string()),
        sender_id: UserId(sender.to_string()),
        receiver_id: None,
        content: file_name.to_string(),
        format: MessageFormat::Archive,
        chat_type: ChatKind::Group,
        created_at: base_time(0),
        tag_names: if tags.is_empty() {
            None
        } else {
            Some(tags.iter().map(|t| TagName(t.to_string())).collect())
        },
    }
}

fn base_time(offset_secs: i64) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap() + chrono::Duration::seconds(offset_secs)
}
