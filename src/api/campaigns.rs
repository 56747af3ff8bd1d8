//! Campaign API - create campaigns and manage membership

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{AppState, ErrorResponse};
use crate::campaign::CampaignError;

/// Build the campaign router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campaign/list", get(list_campaigns))
        .route("/campaign/create", post(create_campaign))
        .route("/campaign/{id}", get(get_campaign))
        .route("/campaign/{id}/join", post(join_campaign))
        .route("/campaign/{id}/leave", post(leave_campaign))
}

/// Campaign creation request
#[derive(Debug, Deserialize)]
struct CampaignCreateRequest {
    /// Campaign id (slug, 3-64 chars, lowercase alphanumeric and hyphens)
    id: String,
    name: String,
    owner_id: String,
}

/// Campaign summary
#[derive(Debug, Serialize)]
struct CampaignItem {
    id: String,
    name: String,
    owner_id: String,
}

/// Campaign detail including members
#[derive(Debug, Serialize)]
struct CampaignDetail {
    id: String,
    name: String,
    owner_id: String,
    members: Vec<MemberItem>,
}

#[derive(Debug, Serialize)]
struct MemberItem {
    account_id: String,
    role: String,
}

/// Membership change request
#[derive(Debug, Deserialize)]
struct JoinRequest {
    account_id: String,
    /// "gm" or "player"; defaults to player
    #[serde(default = "default_role")]
    role: String,
}

fn default_role() -> String {
    "player".to_string()
}

#[derive(Debug, Deserialize)]
struct LeaveRequest {
    account_id: String,
}

fn error_status(e: &CampaignError) -> StatusCode {
    match e {
        CampaignError::InvalidId(_) => StatusCode::BAD_REQUEST,
        CampaignError::AlreadyExists => StatusCode::CONFLICT,
        CampaignError::NotFound => StatusCode::NOT_FOUND,
        CampaignError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /campaign/list
async fn list_campaigns(State(state): State<AppState>) -> impl IntoResponse {
    match state.campaigns.list().await {
        Ok(campaigns) => {
            let items: Vec<CampaignItem> = campaigns
                .into_iter()
                .map(|c| CampaignItem {
                    id: c.id,
                    name: c.name,
                    owner_id: c.owner_id,
                })
                .collect();
            Json(items).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Failed to list campaigns: {}", e))),
        )
            .into_response(),
    }
}

/// POST /campaign/create
async fn create_campaign(
    State(state): State<AppState>,
    Json(req): Json<CampaignCreateRequest>,
) -> impl IntoResponse {
    match state
        .campaigns
        .create(&req.id, &req.name, &req.owner_id)
        .await
    {
        Ok(campaign) => (
            StatusCode::CREATED,
            Json(CampaignItem {
                id: campaign.id,
                name: campaign.name,
                owner_id: campaign.owner_id,
            }),
        )
            .into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

/// GET /campaign/{id}
async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let campaign = match state.campaigns.get(&id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("Campaign not found: {}", id))),
            )
                .into_response();
        }
        Err(e) => {
            return (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response();
        }
    };

    match state.campaigns.members(&id).await {
        Ok(members) => Json(CampaignDetail {
            id: campaign.id,
            name: campaign.name,
            owner_id: campaign.owner_id,
            members: members
                .into_iter()
                .map(|m| MemberItem {
                    account_id: m.account_id,
                    role: m.role,
                })
                .collect(),
        })
        .into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

/// POST /campaign/{id}/join
async fn join_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<JoinRequest>,
) -> impl IntoResponse {
    match state.campaigns.join(&id, &req.account_id, &req.role).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

/// POST /campaign/{id}/leave
async fn leave_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LeaveRequest>,
) -> impl IntoResponse {
    match state.campaigns.leave(&id, &req.account_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("not a member")),
        )
            .into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}
