//! Character API - PC/NPC records and generation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::{AppState, ErrorResponse};
use crate::characters::gen::{generate_abilities, max_hp_for, GenMethod};
use crate::characters::{Abilities, Character, CharacterError};

/// Build the character router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/character/create", post(create_character))
        .route("/character/{id}", get(get_character))
        .route("/character/{id}/update", post(update_character))
        .route("/character/{id}/hp", post(set_character_hp))
        .route("/character/{id}/delete", post(delete_character))
        .route("/campaign/{id}/characters", get(list_campaign_characters))
}

/// Character creation request. Abilities may be supplied directly or
/// generated by the chosen method.
#[derive(Debug, Deserialize)]
struct CharacterCreateRequest {
    owner_id: String,
    name: String,
    #[serde(default = "default_character_type")]
    character_type: String,
    #[serde(default)]
    campaign_id: Option<String>,
    #[serde(default = "default_level")]
    level: i32,
    /// Hit die size used for max HP derivation
    #[serde(default = "default_hit_die")]
    hit_die: i32,
    #[serde(default)]
    gen_method: GenMethod,
    #[serde(default)]
    abilities: Option<Abilities>,
    #[serde(default)]
    armor_class: Option<i32>,
    #[serde(default)]
    notes: Option<String>,
}

fn default_character_type() -> String {
    "pc".to_string()
}

fn default_level() -> i32 {
    1
}

fn default_hit_die() -> i32 {
    8
}

/// Partial character update; absent fields are left alone
#[derive(Debug, Deserialize)]
struct CharacterUpdateRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    campaign_id: Option<String>,
    #[serde(default)]
    level: Option<i32>,
    #[serde(default)]
    abilities: Option<Abilities>,
    #[serde(default)]
    max_hp: Option<i32>,
    #[serde(default)]
    current_hp: Option<i32>,
    #[serde(default)]
    armor_class: Option<i32>,
    #[serde(default)]
    notes: Option<String>,
}

/// Direct HP write
#[derive(Debug, Deserialize)]
struct HpRequest {
    current_hp: i32,
}

fn error_status(e: &CharacterError) -> StatusCode {
    match e {
        CharacterError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /character/create
async fn create_character(
    State(state): State<AppState>,
    Json(req): Json<CharacterCreateRequest>,
) -> impl IntoResponse {
    let abilities = req
        .abilities
        .unwrap_or_else(|| generate_abilities(req.gen_method));

    let level = req.level.max(1);
    let max_hp = max_hp_for(level, req.hit_die, abilities.constitution);

    let mut character = Character::new(&req.owner_id, &req.name, &req.character_type);
    character.campaign_id = req.campaign_id;
    character.level = level;
    character.abilities = abilities;
    character.max_hp = max_hp;
    character.current_hp = max_hp;
    if let Some(ac) = req.armor_class {
        character.armor_class = ac;
    }
    character.notes = req.notes;

    match state.characters.create(&character).await {
        Ok(()) => (StatusCode::CREATED, Json(character)).into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

/// GET /character/{id}
async fn get_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.characters.get(&id).await {
        Ok(Some(character)) => Json(character).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Character not found: {}", id))),
        )
            .into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

/// POST /character/{id}/update
async fn update_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CharacterUpdateRequest>,
) -> impl IntoResponse {
    let mut character = match state.characters.get(&id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("Character not found: {}", id))),
            )
                .into_response();
        }
        Err(e) => {
            return (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response();
        }
    };

    if let Some(name) = req.name {
        character.name = name;
    }
    if let Some(campaign_id) = req.campaign_id {
        character.campaign_id = Some(campaign_id);
    }
    if let Some(level) = req.level {
        character.level = level.max(1);
    }
    if let Some(abilities) = req.abilities {
        character.abilities = abilities;
    }
    if let Some(max_hp) = req.max_hp {
        character.max_hp = max_hp.max(0);
    }
    if let Some(current_hp) = req.current_hp {
        character.current_hp = current_hp.clamp(0, character.max_hp);
    }
    if let Some(ac) = req.armor_class {
        character.armor_class = ac;
    }
    if let Some(notes) = req.notes {
        character.notes = Some(notes);
    }

    match state.characters.update(&character).await {
        Ok(()) => Json(character).into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

/// POST /character/{id}/hp
/// Direct current-HP write, clamped to [0, max]
async fn set_character_hp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<HpRequest>,
) -> impl IntoResponse {
    let character = match state.characters.get(&id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("Character not found: {}", id))),
            )
                .into_response();
        }
        Err(e) => {
            return (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response();
        }
    };

    let clamped = req.current_hp.clamp(0, character.max_hp);
    match state.characters.set_current_hp(&id, clamped).await {
        Ok(()) => match state.characters.get(&id).await {
            Ok(Some(updated)) => Json(updated).into_response(),
            Ok(None) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("Character not found: {}", id))),
            )
                .into_response(),
            Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
        },
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

/// POST /character/{id}/delete
async fn delete_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.characters.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Character not found: {}", id))),
        )
            .into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

/// GET /campaign/{id}/characters
async fn list_campaign_characters(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.characters.list_by_campaign(&id).await {
        Ok(characters) => Json(characters).into_response(),
        Err(e) => (error_status(&e), Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}
