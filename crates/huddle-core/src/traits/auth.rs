// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session verification seam.

use async_trait::async_trait;

use crate::error::HuddleError;
use crate::types::UserId;

/// Verifies bearer tokens issued by the external session service.
///
/// Called once per connect attempt and once per authenticated REST request.
/// A failed verification terminates the handshake before any socket opens.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    /// Resolves a bearer token to the user it was issued to.
    async fn verify(&self, token: &str) -> Result<UserId, HuddleError>;
}
