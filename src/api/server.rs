//! HTTP server setup and routing

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::library::{MusicLibrary, IMAGE_ROUTE};
use crate::player::{spawn_monitor, MusicPlayer};

/// Shared context passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub player: Arc<MusicPlayer>,
    pub library: Arc<MusicLibrary>,
}

/// Build the router. With `public_dir`, unknown paths fall through to
/// static files from that directory.
pub fn create_router(state: AppState, public_dir: Option<&Path>) -> Router {
    // Cover art referenced by `/api/musicas` entries
    let images = ServeDir::new(state.library.root());

    let router = Router::new()
        .route("/health", get(super::handlers::health))
        // Playback control
        .route("/api/tocar", post(super::handlers::play))
        .route("/api/pausar", post(super::handlers::pause))
        .route("/api/retomar", post(super::handlers::resume))
        .route("/api/parar", post(super::handlers::stop))
        .route("/api/volume", post(super::handlers::set_volume))
        .route("/api/status", get(super::handlers::status))
        // Library
        .route("/api/musicas", get(super::handlers::list_library))
        .nest_service(IMAGE_ROUTE, images)
        .with_state(state);

    let router = match public_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving static frontend");
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the HTTP API until Ctrl+C / SIGTERM.
///
/// Starts the end-of-track monitor alongside the server and stops
/// playback on the way out.
pub async fn run(config: ServerConfig, player: Arc<MusicPlayer>) -> Result<()> {
    let _monitor = spawn_monitor(player.clone(), config.poll_interval);

    let state = AppState {
        player: player.clone(),
        library: Arc::new(MusicLibrary::new(&config.music_dir)),
    };
    info!(music_dir = %state.library.root().display(), "Music library");

    let app = create_router(state, config.public_dir.as_deref());

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;

    info!("Servidor a correr em http://{}:{}", config.host, config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    player.stop();
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
