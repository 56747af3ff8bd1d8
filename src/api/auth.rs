//! Authentication API endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{AppState, ErrorResponse};
use crate::auth::accounts::{AccountService, AuthError};

/// Build auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/validate", get(validate))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Authentication response (for register and login)
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub account_id: String,
    pub username: String,
    pub access_level: String,
}

/// Register a new account
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let service = AccountService::new(state.db.pool().clone());

    match service.create_account(&req.username, &req.password).await {
        Ok((account, token)) => (
            StatusCode::CREATED,
            Json(AuthResponse {
                token,
                account_id: account.id,
                username: account.username,
                access_level: account.access_level,
            }),
        )
            .into_response(),
        Err(AuthError::UsernameExists) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("username already exists")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login with username and password
async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> impl IntoResponse {
    let service = AccountService::new(state.db.pool().clone());

    match service.login(&req.username, &req.password).await {
        Ok((account, token)) => (
            StatusCode::OK,
            Json(AuthResponse {
                token,
                account_id: account.id,
                username: account.username,
                access_level: account.access_level,
            }),
        )
            .into_response(),
        Err(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("invalid credentials")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// Logout request
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// Logout by invalidating the token
async fn logout(State(state): State<AppState>, Json(req): Json<LogoutRequest>) -> impl IntoResponse {
    let service = AccountService::new(state.db.pool().clone());

    match service.logout(&req.token).await {
        Ok(logged_out) => (StatusCode::OK, Json(LogoutResponse { logged_out })).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// Token validation query
#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub token: String,
}

/// Validation response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub account_id: String,
    pub username: String,
    pub access_level: String,
}

/// Validate a session token
async fn validate(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
) -> impl IntoResponse {
    let service = AccountService::new(state.db.pool().clone());

    match service.validate_token(&query.token).await {
        Ok(Some(account)) => (
            StatusCode::OK,
            Json(ValidateResponse {
                account_id: account.id,
                username: account.username,
                access_level: account.access_level,
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("invalid token")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}
