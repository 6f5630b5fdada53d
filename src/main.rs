//! Seva Chat server
//!
//! Loads the scheme knowledge base and serves dialogue sessions over HTTP.

use seva_chat::api::{create_router, AppState};
use seva_chat::catalog::{source_from_location, SchemeCatalog};
use seva_chat::{ChatConfig, ResponseResolver, SessionManager};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seva_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ChatConfig::from_env();
    tracing::info!(?config, "Configuration loaded");

    // Knowledge base; a failed load leaves the catalog empty and the service up
    let catalog = SchemeCatalog::new(config.catalog_order);
    let source = source_from_location(&config.schemes_source);
    if catalog.load(source.as_ref()).await.is_err() {
        tracing::warn!("Scheme lookups will report no matches until the catalog is reloaded");
    }

    let sessions = Arc::new(SessionManager::new(
        ResponseResolver::new(catalog),
        config.thinking_delay(),
    ));
    let _reaper = sessions.spawn_reaper(config.session_sweep, config.session_idle);
    let state = AppState::new(Arc::clone(&sessions), config.schemes_source.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Seva chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sessions.close_all().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
