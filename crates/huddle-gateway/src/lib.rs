// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Websocket and REST gateway for the Huddle chat core.
//!
//! Owns the client-facing surface: connection lifecycle and the
//! last-writer-wins registry, the websocket frame protocol, summary
//! and acknowledgement routes, and the heartbeat sweeper that retires
//! silent connections.

pub mod auth;
pub mod handlers;
pub mod heartbeat;
pub mod registry;
pub mod server;
pub mod suggest;
pub mod ws;

pub use registry::ConnectionRegistry;
pub use server::{build_router, start_server, GatewayState};
