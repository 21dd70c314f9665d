//! HTTP request handlers
//!
//! Thin glue between JSON requests and `MusicPlayer`. Failures never
//! escape as rejections: every playback endpoint answers with a
//! `sucesso` flag.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::server::AppState;
use crate::error::PlayerError;
use crate::library::LibraryEntry;
use crate::player::{volume_percent, DEFAULT_VOLUME};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    #[serde(default)]
    ficheiro: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayResponse {
    sucesso: bool,
    mensagem: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    sucesso: bool,
}

#[derive(Debug, Deserialize)]
pub struct VolumeRequest {
    #[serde(default = "default_volume")]
    volume: f32,
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

#[derive(Debug, Serialize)]
pub struct VolumeResponse {
    sucesso: bool,
    volume: u8,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    tocando: bool,
    pausado: bool,
    ficheiro_atual: Option<String>,
    volume: u8,
    mixer_ocupado: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    modulo: String,
    versao: String,
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        modulo: env!("CARGO_PKG_NAME").to_string(),
        versao: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Playback Endpoints
// ============================================================================

/// POST /api/tocar
///
/// A missing or unparsable body counts as a missing `ficheiro`.
pub async fn play(
    State(ctx): State<AppState>,
    body: Option<Json<PlayRequest>>,
) -> (StatusCode, Json<PlayResponse>) {
    let requested = body
        .and_then(|Json(req)| req.ficheiro)
        .filter(|f| !f.trim().is_empty());

    let Some(requested) = requested else {
        return (
            StatusCode::BAD_REQUEST,
            Json(PlayResponse {
                sucesso: false,
                mensagem: "Ficheiro não especificado".to_string(),
            }),
        );
    };

    let path = ctx.library.resolve(&requested);
    info!(ficheiro = %requested, "Play requested");

    // Decoding touches the disk; keep it off the async workers
    let player = ctx.player.clone();
    let target = path.clone();
    let result = tokio::task::spawn_blocking(move || player.play(&target))
        .await
        .unwrap_or_else(|e| {
            error!("Play task failed: {}", e);
            Err(PlayerError::Engine(format!("play task failed: {}", e)))
        });

    match result {
        Ok(()) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(requested);
            (
                StatusCode::OK,
                Json(PlayResponse {
                    sucesso: true,
                    mensagem: format!("A tocar: {}", name),
                }),
            )
        }
        Err(PlayerError::FileNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(PlayResponse {
                sucesso: false,
                mensagem: format!("Ficheiro não encontrado: {}", requested),
            }),
        ),
        Err(PlayerError::Engine(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(PlayResponse {
                sucesso: false,
                mensagem: format!("Erro ao tocar música: {}", e),
            }),
        ),
    }
}

/// POST /api/pausar
pub async fn pause(State(ctx): State<AppState>) -> Json<SuccessResponse> {
    Json(SuccessResponse {
        sucesso: ctx.player.pause(),
    })
}

/// POST /api/retomar
pub async fn resume(State(ctx): State<AppState>) -> Json<SuccessResponse> {
    Json(SuccessResponse {
        sucesso: ctx.player.resume(),
    })
}

/// POST /api/parar
pub async fn stop(State(ctx): State<AppState>) -> Json<SuccessResponse> {
    Json(SuccessResponse {
        sucesso: ctx.player.stop(),
    })
}

/// POST /api/volume
///
/// Without a usable body the volume goes back to the default.
pub async fn set_volume(
    State(ctx): State<AppState>,
    body: Option<Json<VolumeRequest>>,
) -> Json<VolumeResponse> {
    let requested = body.map(|Json(req)| req.volume).unwrap_or(DEFAULT_VOLUME);
    let stored = ctx.player.set_volume(requested);

    Json(VolumeResponse {
        sucesso: true,
        volume: volume_percent(stored),
    })
}

/// GET /api/status
pub async fn status(State(ctx): State<AppState>) -> Json<StatusResponse> {
    let status = ctx.player.status();

    Json(StatusResponse {
        tocando: status.playing,
        pausado: status.paused,
        ficheiro_atual: status.current_file,
        volume: status.volume_percent,
        mixer_ocupado: status.engine_busy,
    })
}

// ============================================================================
// Library Endpoint
// ============================================================================

/// GET /api/musicas
pub async fn list_library(State(ctx): State<AppState>) -> Json<Vec<LibraryEntry>> {
    let library = ctx.library.clone();
    // Directory walks can be slow on large collections
    let entries = tokio::task::spawn_blocking(move || library.scan())
        .await
        .unwrap_or_else(|e| {
            error!("Library scan task failed: {}", e);
            Vec::new()
        });

    Json(entries)
}
