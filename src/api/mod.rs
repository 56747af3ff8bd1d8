//! HTTP API module - REST endpoints
//!
//! The browser client is the only consumer; responses are JSON and CORS
//! is permissive.

mod auth;
mod campaigns;
mod characters;
mod rooms;

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::campaign::CampaignStore;
use crate::characters::CharacterStore;
use crate::db::Database;
use crate::rooms::{RoomManager, RoomStore};
use crate::tabletop::CONDITIONS;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub campaigns: Arc<CampaignStore>,
    pub characters: Arc<CharacterStore>,
    pub room_store: Arc<RoomStore>,
    pub rooms: Arc<RoomManager>,
}

/// Build the API router
pub fn router(db: Arc<Database>) -> Router {
    let campaigns = Arc::new(CampaignStore::new(db.pool().clone()));
    let characters = Arc::new(CharacterStore::new(db.pool().clone()));
    let room_store = Arc::new(RoomStore::new(db.pool().clone()));
    let rooms = RoomManager::shared();

    let state = AppState {
        db,
        campaigns,
        characters,
        room_store,
        rooms,
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .route("/conditions", get(list_conditions))
        .merge(auth::router())
        .merge(campaigns::router())
        .merge(characters::router())
        .merge(rooms::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error response shared across endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "vttd",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "ok",
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                database: "error",
            }),
        ),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

/// GET /conditions
/// The static condition catalog, for client rendering
async fn list_conditions() -> impl IntoResponse {
    Json(CONDITIONS)
}
