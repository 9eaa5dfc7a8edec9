// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use coffee_shop_api::{
    api::router,
    auth::AuthGate,
    config::AppConfig,
    logging::init_logging,
    state::AppState,
    store::InMemoryStore,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_format);

    let store = if config.seed_demo_drink {
        InMemoryStore::with_demo_drink()
    } else {
        InMemoryStore::new()
    };

    tracing::info!(
        domain = %config.auth.domain,
        audience = %config.auth.audience,
        jwks_url = %config.auth.jwks_url,
        "Auth0 verification configured"
    );
    let gate = AuthGate::new(config.auth)?;
    let app = router(AppState::new(store, gate));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        "Coffee shop API listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
