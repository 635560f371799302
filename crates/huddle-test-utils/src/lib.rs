// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic mock collaborators for Huddle tests.
//!
//! Every external seam of the chat core has a mock here: membership
//! directory, archive store (optionally failing), tag index (query
//! counting), history store, auth verifier, and a frame-capturing sink
//! standing in for the live connection table.

pub mod frames;
pub mod mocks;

pub use frames::{archive_frame, direct_frame, text_frame};
pub use mocks::{
    CaptureSink, MockArchiveStore, MockDirectory, MockHistory, MockTagIndex, StaticAuth,
};
