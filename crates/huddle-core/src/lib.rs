// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Huddle chat core.
//!
//! This crate provides the shared wire/domain types, the error taxonomy,
//! and the trait seams through which the core consumes its external
//! collaborators (auth, membership, history, archive storage, tag index).
//! Everything else in the workspace depends on this crate and nothing here
//! depends on anything else in the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HuddleError;
pub use types::{
    ArchiveItem, ChatKind, MessageFormat, MessageFrame, MessageId, NewArchiveItem, Preview,
    RoomId, RoomInfo, RoomScope, RoomSummary, ServerFrame, TagName, UserId,
};

// Re-export all seams at crate root.
pub use traits::{
    ArchiveStore, AuthVerifier, FrameSink, HistoryStore, MembershipDirectory, TagIndex,
};
