// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Membership directory seam.

use async_trait::async_trait;

use crate::error::HuddleError;
use crate::types::{RoomId, RoomInfo};

/// Read-only access to department/project membership and room metadata.
///
/// Membership is owned externally; the core never writes through this seam.
/// Results may be cached per active connection for the session's lifetime,
/// never longer.
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// Looks up room metadata and its member set.
    ///
    /// Returns `Ok(None)` when the room id does not exist.
    async fn room_info(&self, room_id: &RoomId) -> Result<Option<RoomInfo>, HuddleError>;
}
