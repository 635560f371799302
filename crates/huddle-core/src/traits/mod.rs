// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams for the chat core's external collaborators.
//!
//! Authentication, membership data, message history, blob/metadata storage
//! for uploads, and the tag index are all owned by other services; the core
//! consumes them through these traits only. `#[async_trait]` everywhere for
//! dynamic dispatch compatibility.

pub mod archive;
pub mod auth;
pub mod directory;
pub mod history;
pub mod sink;
pub mod tags;

// Re-export all traits at the traits module level for convenience.
pub use archive::ArchiveStore;
pub use auth::AuthVerifier;
pub use directory::MembershipDirectory;
pub use history::HistoryStore;
pub use sink::FrameSink;
pub use tags::TagIndex;
