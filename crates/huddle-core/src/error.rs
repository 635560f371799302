// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Huddle chat core.

use thiserror::Error;

use crate::types::{RoomId, UserId};

/// The primary error type used across the chat core.
///
/// Dispatch-time variants (`UnknownRoom`, `NotMember`, `Validation`,
/// `Upstream`) are returned synchronously to the sender and never retried
/// by the core; the client decides whether to resubmit.
#[derive(Debug, Error)]
pub enum HuddleError {
    /// Bad or missing token at connect time. Terminates the handshake.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The target room id does not resolve to any known room.
    #[error("unknown room: {0}")]
    UnknownRoom(RoomId),

    /// The sender is not part of the resolved room's member set.
    #[error("user {user} is not a member of room {room}")]
    NotMember { user: UserId, room: RoomId },

    /// Malformed frame, e.g. a DIRECT message without a receiver.
    #[error("invalid frame: {0}")]
    Validation(String),

    /// Archive store, tag index, or history endpoint unreachable or failing.
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Socket-level failure (bind, accept, frame encode/decode).
    #[error("transport error: {0}")]
    Transport(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HuddleError {
    /// Stable machine-readable code carried on error frames.
    pub fn code(&self) -> &'static str {
        match self {
            HuddleError::Auth(_) => "auth",
            HuddleError::UnknownRoom(_) => "unknown_room",
            HuddleError::NotMember { .. } => "not_member",
            HuddleError::Validation(_) => "validation",
            HuddleError::Upstream { .. } => "upstream",
            HuddleError::Transport(_) => "transport",
            HuddleError::Internal(_) => "internal",
        }
    }

    /// Convenience constructor for upstream failures without a source.
    pub fn upstream(message: impl Into<String>) -> Self {
        HuddleError::Upstream {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        let room = RoomId("r-1".into());
        let user = UserId("u-1".into());

        assert_eq!(HuddleError::Auth("bad token".into()).code(), "auth");
        assert_eq!(HuddleError::UnknownRoom(room.clone()).code(), "unknown_room");
        assert_eq!(HuddleError::NotMember { user, room }.code(), "not_member");
        assert_eq!(
            HuddleError::Validation("missing receiverId".into()).code(),
            "validation"
        );
        assert_eq!(HuddleError::upstream("archive store down").code(), "upstream");
        assert_eq!(HuddleError::Transport("bind failed".into()).code(), "transport");
        assert_eq!(HuddleError::Internal("oops".into()).code(), "internal");
    }

    #[test]
    fn not_member_display_names_both_ids() {
        let err = HuddleError::NotMember {
            user: UserId("alice".into()),
            room: RoomId("dept-7".into()),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("dept-7"));
    }

    #[test]
    fn upstream_preserves_source() {
        let err = HuddleError::Upstream {
            message: "tag index unreachable".into(),
            source: Some(Box::new(std::io::Error::other("connection refused"))),
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
