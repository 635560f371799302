// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heartbeat sweeper.
//!
//! Connections that have not produced any inbound traffic within the
//! configured timeout are closed and their users marked offline. The
//! registry records liveness on every inbound frame, so a chatty
//! client never needs explicit pings.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use huddle_config::model::HeartbeatConfig;
use huddle_summary::SummaryStore;

use crate::registry::ConnectionRegistry;

/// Spawns the background sweep loop. Runs until `shutdown` is cancelled.
pub fn spawn_sweeper(
    registry: Arc<ConnectionRegistry>,
    summaries: Arc<SummaryStore>,
    config: &HeartbeatConfig,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(config.interval_secs);
    let timeout = Duration::from_secs(config.timeout_secs);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("heartbeat sweeper stopping");
                    return;
                }
                _ = ticker.tick() => {
                    let closed = registry.sweep(timeout);
                    if !closed.is_empty() {
                        tracing::info!(count = closed.len(), "closed silent connections");
                    }
                    for user in closed {
                        summaries.set_presence(&user, false);
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::UserId;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn sweeper_marks_swept_users_offline() {
        let registry = Arc::new(ConnectionRegistry::new());
        let summaries = Arc::new(SummaryStore::new());
        let user = UserId("alice".into());

        let (tx, _rx) = mpsc::channel(4);
        registry.register(&user, tx, CancellationToken::new());
        summaries.set_presence(&user, true);

        let config = HeartbeatConfig {
            interval_secs: 1,
            timeout_secs: 1,
        };
        let shutdown = CancellationToken::new();
        let handle = spawn_sweeper(registry.clone(), summaries.clone(), &config, shutdown.clone());

        // The connection never sends anything, so it goes stale.
        std::thread::sleep(Duration::from_millis(1100));
        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert_eq!(registry.connection_count(), 0);
        assert!(!summaries.is_present(&user));

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn sweeper_stops_on_shutdown() {
        let registry = Arc::new(ConnectionRegistry::new());
        let summaries = Arc::new(SummaryStore::new());
        let config = HeartbeatConfig {
            interval_secs: 60,
            timeout_secs: 120,
        };
        let shutdown = CancellationToken::new();
        let handle = spawn_sweeper(registry, summaries, &config, shutdown.clone());

        shutdown.cancel();
        handle.await.unwrap();
    }
}
