// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live-delivery seam between the dispatcher and the connection table.

use crate::types::{ServerFrame, UserId};

/// Best-effort, at-most-once push to a user's live connection.
///
/// Implemented by the gateway's connection registry. If the user has no
/// open handle the frame is dropped, not queued: durability is the history
/// store's job. Implementations must not block.
pub trait FrameSink: Send + Sync {
    /// Pushes a frame to the user's live connection, if any.
    ///
    /// Returns `true` only when a live handle accepted the frame. `false`
    /// never implies message loss for correctness purposes.
    fn push_frame(&self, user: &UserId, frame: &ServerFrame) -> bool;

    /// Whether the user currently holds an open connection handle.
    fn is_connected(&self, user: &UserId) -> bool;
}
