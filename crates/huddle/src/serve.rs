// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `huddle serve` command implementation.
//!
//! Wires the upstream REST clients, scope resolver, summary store,
//! connection registry, dispatcher, and heartbeat sweeper together and
//! runs the gateway until SIGTERM or SIGINT.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use huddle_config::model::HuddleConfig;
use huddle_core::HuddleError;
use huddle_dispatch::Dispatcher;
use huddle_gateway::{heartbeat, start_server, ConnectionRegistry, GatewayState};
use huddle_gateway::suggest::TagSuggesters;
use huddle_rooms::ScopeResolver;
use huddle_summary::SummaryStore;
use huddle_upstream::UpstreamClients;

/// Runs the `huddle serve` command. Returns once the gateway has shut
/// down gracefully.
pub async fn run_serve(config: HuddleConfig) -> Result<(), HuddleError> {
    init_tracing(&config.gateway.log_level);

    info!("starting huddle serve");

    let clients = UpstreamClients::from_config(&config.upstream)?;

    let registry = Arc::new(ConnectionRegistry::new());
    let summaries = Arc::new(SummaryStore::new());
    let resolver = Arc::new(ScopeResolver::new(Arc::new(clients.directory)));
    let dispatcher = Arc::new(Dispatcher::new(
        resolver.clone(),
        Arc::new(clients.archive),
        summaries.clone(),
        registry.clone(),
    ));
    let suggesters = Arc::new(TagSuggesters::new(
        Arc::new(clients.tags),
        Duration::from_millis(config.tags.debounce_ms),
        config.tags.suggest_limit,
    ));

    let shutdown = install_signal_handler();

    let sweeper = heartbeat::spawn_sweeper(
        registry.clone(),
        summaries.clone(),
        &config.heartbeat,
        shutdown.clone(),
    );

    let state = GatewayState {
        registry,
        dispatcher,
        resolver,
        summaries,
        history: Arc::new(clients.history),
        auth: Arc::new(clients.auth),
        suggesters,
        outbound_buffer: config.gateway.outbound_buffer,
        start_time: std::time::Instant::now(),
    };

    let result = start_server(&config.gateway, state, shutdown.clone()).await;

    shutdown.cancel();
    let _ = sweeper.await;

    info!("huddle serve stopped");
    result
}

/// Installs handlers for SIGTERM and SIGINT. Returns a token that is
/// cancelled when either signal arrives.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
                let _ = ctrl_c.await;
                info!("received SIGINT (Ctrl+C), initiating shutdown");
                token_clone.cancel();
                return;
            };

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
    });

    token
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("huddle={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
