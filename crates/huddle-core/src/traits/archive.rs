// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Archive store seam.

use async_trait::async_trait;

use crate::error::HuddleError;
use crate::types::{ArchiveItem, NewArchiveItem};

/// External storage for uploaded archive items.
///
/// `create_item` is called inside the per-room dispatch step for every
/// ARCHIVE-format message, before the message is admitted: a failure here
/// aborts the whole dispatch so no message ever references a missing item.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Creates the archive item backing an ARCHIVE message. At most one
    /// item is created per successful upload; tags are fixed at creation.
    async fn create_item(&self, item: NewArchiveItem) -> Result<ArchiveItem, HuddleError>;
}
