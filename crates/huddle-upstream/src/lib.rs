// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST clients for the chat core's external collaborators.
//!
//! One small typed client per seam: session verification, membership
//! directory, message history, archive item storage, and the tag index.
//! All errors surface as [`HuddleError::Upstream`] except auth rejections,
//! which map to [`HuddleError::Auth`].

pub mod archive;
pub mod auth;
pub mod client;
pub mod directory;
pub mod history;
pub mod tags;

pub use archive::ArchiveClient;
pub use auth::AuthClient;
pub use client::UpstreamClients;
pub use directory::DirectoryClient;
pub use history::HistoryClient;
pub use tags::TagSearchClient;
