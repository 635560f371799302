// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tag index seam.

use async_trait::async_trait;

use crate::error::HuddleError;
use crate::types::TagName;

/// External ranked prefix search over stored tag names.
///
/// Matching is byte-wise case-sensitive; the core applies no case folding
/// on either side of this seam.
#[async_trait]
pub trait TagIndex: Send + Sync {
    /// Returns up to `limit` tag names starting with `prefix`, best first.
    async fn search_prefix(&self, prefix: &str, limit: usize)
        -> Result<Vec<TagName>, HuddleError>;
}
