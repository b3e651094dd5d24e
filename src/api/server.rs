use std::net::SocketAddr;

use axum::{Router, routing::get, routing::post, routing::put};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::{services, state::AppState};
use crate::config::Config;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Routes for both rosters plus health, with CORS open to any origin
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/members",
            post(services::create_members).get(services::list_members),
        )
        .route(
            "/api/members/{id}",
            put(services::update_member).delete(services::delete_member),
        )
        .route(
            "/api/registrations",
            post(services::create_registration).get(services::list_registrations),
        )
        .route(
            "/api/registrations/{id}",
            put(services::update_registration).delete(services::delete_registration),
        )
        .route("/health", get(services::health))
        .with_state(state)
        // Automatically decompress gzip request bodies
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve until Ctrl+C or SIGTERM. `address` overrides `server.bind_addr`.
pub async fn run(config: Config, address: Option<SocketAddr>) -> Result<(), AnyError> {
    let address = address.unwrap_or(config.server.bind_addr);
    info!(backend = ?config.database.backend, "Initialising store");
    let state = AppState::connect(config).await;

    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Rosterbox API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
