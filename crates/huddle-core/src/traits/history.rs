// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message history seam.

use async_trait::async_trait;

use crate::error::HuddleError;
use crate::types::{MessageFrame, RoomId};

/// Read-only access to the external persisted message history.
///
/// Durability lives here, not in the socket path: the core calls this only
/// to seed initial state when a client opens a room, and never writes
/// through it.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Returns the room's persisted messages in ascending time order.
    async fn room_messages(&self, room_id: &RoomId) -> Result<Vec<MessageFrame>, HuddleError>;
}
