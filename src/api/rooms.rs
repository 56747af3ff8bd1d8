//! Room API - live tabletop sessions
//!
//! Rooms are created and saved through the room store; everything else
//! operates on the live in-memory scene. HP changes on a token linked to
//! a character are mirrored to the character record in the same request;
//! the response reports `character_synced` so a failed mirror is visible
//! instead of silently swallowed. The token-local change is never rolled
//! back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{AppState, ErrorResponse};
use crate::rooms::chat::{ChatMessage, MessageKind};
use crate::rooms::RoomError;
use crate::tabletop::{
    is_known_condition, parse_dice, roll_initiative, DamageOutcome, Scene, Token,
};

/// Build the room router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/room/create", post(create_room))
        .route("/campaign/{id}/rooms", get(list_campaign_rooms))
        .route("/room/{id}/open", post(open_room))
        .route("/room/{id}/close", post(close_room))
        .route("/room/{id}/state", get(room_state))
        .route("/room/{id}/save", post(save_room))
        .route("/room/{id}/token/add", post(add_token))
        .route("/room/{id}/token/{token_id}/move", post(move_token))
        .route("/room/{id}/token/{token_id}/remove", post(remove_token))
        .route("/room/{id}/token/{token_id}/damage", post(damage_token))
        .route("/room/{id}/token/{token_id}/heal", post(heal_token))
        .route("/room/{id}/token/{token_id}/adjust", post(adjust_token_hp))
        .route("/room/{id}/token/{token_id}/temp_hp", post(set_temp_hp))
        .route("/room/{id}/token/{token_id}/max_hp", post(set_max_hp))
        .route("/room/{id}/token/{token_id}/condition", post(toggle_condition))
        .route("/room/{id}/token/{token_id}/initiative", post(set_initiative))
        .route("/room/{id}/next_turn", post(next_turn))
        .route("/room/{id}/clear_initiative", post(clear_initiative))
        .route("/room/{id}/chat", get(chat_log).post(post_chat))
        .route("/room/{id}/roll", post(roll_in_chat))
}

fn room_error(e: RoomError) -> axum::response::Response {
    let status = match e {
        RoomError::InvalidId(_) => StatusCode::BAD_REQUEST,
        RoomError::AlreadyExists => StatusCode::CONFLICT,
        RoomError::NotFound | RoomError::CampaignNotFound => StatusCode::NOT_FOUND,
        RoomError::NotOpen => StatusCode::CONFLICT,
        RoomError::Database(_) | RoomError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(e.to_string()))).into_response()
}

fn token_not_found(token_id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("Token not found: {}", token_id))),
    )
        .into_response()
}

/// Mirror a linked token's current HP to its character record.
/// Returns None for unlinked tokens, Some(synced) for linked ones.
async fn mirror_to_character(state: &AppState, token: &Token) -> Option<bool> {
    let character_id = token.character_id.as_deref()?;
    let hp = token.current_hp?;

    match state.characters.set_current_hp(character_id, hp).await {
        Ok(()) => Some(true),
        Err(e) => {
            warn!(
                "Failed to mirror HP to character {}: {}",
                character_id, e
            );
            Some(false)
        }
    }
}

/// Max HP supplied by a linked character, if the token has one.
/// Lookup failures are treated as "no max known" - they never block the
/// token-local edit.
async fn linked_max_hp(state: &AppState, token: &Token) -> Option<i32> {
    let character_id = token.character_id.as_deref()?;
    match state.characters.get(character_id).await {
        Ok(Some(character)) => Some(character.max_hp),
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to fetch character {}: {}", character_id, e);
            None
        }
    }
}

/// Room creation request
#[derive(Debug, Deserialize)]
struct RoomCreateRequest {
    /// Room id (slug, 3-64 chars, lowercase alphanumeric and hyphens)
    id: String,
    campaign_id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct RoomItem {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct RoomStateResponse {
    room_id: String,
    scene: Scene,
}

/// Token creation request
#[derive(Debug, Deserialize)]
struct TokenAddRequest {
    name: String,
    x: f64,
    y: f64,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default)]
    character_id: Option<String>,
    #[serde(default)]
    current_hp: Option<i32>,
    #[serde(default)]
    max_hp: Option<i32>,
}

fn default_color() -> String {
    "#2563eb".to_string()
}

#[derive(Debug, Deserialize)]
struct MoveRequest {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct AmountRequest {
    amount: u32,
}

#[derive(Debug, Deserialize)]
struct DeltaRequest {
    delta: i32,
}

#[derive(Debug, Deserialize)]
struct ValueRequest {
    value: i32,
}

#[derive(Debug, Deserialize)]
struct ConditionRequest {
    condition_id: String,
}

/// Initiative request: a manual value, a clear, or (neither) a roll
#[derive(Debug, Deserialize)]
struct InitiativeRequest {
    #[serde(default)]
    value: Option<i32>,
    #[serde(default)]
    clear: bool,
}

/// Response for token HP mutations
#[derive(Debug, Serialize)]
struct TokenHpResponse {
    token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<DamageOutcome>,
    /// Present only for linked tokens: whether the character record
    /// accepted the mirrored HP write
    #[serde(skip_serializing_if = "Option::is_none")]
    character_synced: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ConditionToggleResponse {
    token: Token,
    /// Whether the condition is active after the toggle
    active: bool,
}

#[derive(Debug, Serialize)]
struct NextTurnResponse {
    /// None when no tokens carry initiative (no active encounter)
    token_id: Option<String>,
    round_complete: bool,
    round: u32,
}

/// POST /room/create
async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<RoomCreateRequest>,
) -> impl IntoResponse {
    match state
        .room_store
        .create(&req.id, &req.campaign_id, &req.name)
        .await
    {
        Ok(room) => (
            StatusCode::CREATED,
            Json(RoomItem {
                id: room.id,
                name: room.name,
            }),
        )
            .into_response(),
        Err(e) => room_error(e),
    }
}

/// GET /campaign/{id}/rooms
async fn list_campaign_rooms(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.room_store.list_by_campaign(&id).await {
        Ok(rooms) => {
            let items: Vec<RoomItem> = rooms
                .into_iter()
                .map(|(id, name)| RoomItem { id, name })
                .collect();
            Json(items).into_response()
        }
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/open
/// Load the saved scene into the live registry. Idempotent: an already
/// open room keeps its live state.
async fn open_room(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let record = match state.room_store.get(&id).await {
        Ok(Some(r)) => r,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("Room not found: {}", id))),
            )
                .into_response();
        }
        Err(e) => return room_error(e),
    };

    state.rooms.open(&id, record.scene).await;
    match state.rooms.scene(&id).await {
        Ok(scene) => Json(RoomStateResponse { room_id: id, scene }).into_response(),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/close
/// Drop the live state. Unsaved changes are lost.
async fn close_room(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    if state.rooms.close(&id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Room not open: {}", id))),
        )
            .into_response()
    }
}

/// GET /room/{id}/state
async fn room_state(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.rooms.scene(&id).await {
        Ok(scene) => Json(RoomStateResponse { room_id: id, scene }).into_response(),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/save
/// Persist the live scene wholesale
async fn save_room(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let scene = match state.rooms.scene(&id).await {
        Ok(s) => s,
        Err(e) => return room_error(e),
    };

    match state.room_store.save_scene(&id, &scene).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/add
async fn add_token(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TokenAddRequest>,
) -> impl IntoResponse {
    let mut token = Token::new(&req.name, req.x, req.y, &req.color);

    if let Some(character_id) = &req.character_id {
        // Linked tokens start from the character record; the character
        // remains the source of max HP
        let character = match state.characters.get(character_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse::new(format!(
                        "Character not found: {}",
                        character_id
                    ))),
                )
                    .into_response();
            }
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(e.to_string())),
                )
                    .into_response();
            }
        };
        token.character_id = Some(character.id.clone());
        token.current_hp = Some(character.current_hp);
    } else {
        token.current_hp = req.current_hp;
        token.max_hp = req.max_hp;
    }

    let result = state
        .rooms
        .with_scene(&id, |scene| {
            scene.add_token(token.clone());
        })
        .await;

    match result {
        Ok(()) => (StatusCode::CREATED, Json(token)).into_response(),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/{token_id}/move
async fn move_token(
    State(state): State<AppState>,
    Path((id, token_id)): Path<(String, String)>,
    Json(req): Json<MoveRequest>,
) -> impl IntoResponse {
    let result = state
        .rooms
        .with_scene(&id, |scene| {
            scene.token_mut(&token_id).map(|t| {
                t.move_to(req.x, req.y);
                t.clone()
            })
        })
        .await;

    match result {
        Ok(Some(token)) => Json(token).into_response(),
        Ok(None) => token_not_found(&token_id),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/{token_id}/remove
async fn remove_token(
    State(state): State<AppState>,
    Path((id, token_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let result = state
        .rooms
        .with_scene(&id, |scene| scene.remove_token(&token_id))
        .await;

    match result {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => token_not_found(&token_id),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/{token_id}/damage
/// Temporary HP absorbs first; the remainder reduces current HP floored
/// at zero
async fn damage_token(
    State(state): State<AppState>,
    Path((id, token_id)): Path<(String, String)>,
    Json(req): Json<AmountRequest>,
) -> impl IntoResponse {
    let result = state
        .rooms
        .with_scene(&id, |scene| {
            scene.token_mut(&token_id).map(|t| {
                let outcome = t.apply_damage(req.amount);
                (t.clone(), outcome)
            })
        })
        .await;

    match result {
        Ok(Some((token, outcome))) => {
            let character_synced = mirror_to_character(&state, &token).await;
            Json(TokenHpResponse {
                token,
                outcome: Some(outcome),
                character_synced,
            })
            .into_response()
        }
        Ok(None) => token_not_found(&token_id),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/{token_id}/heal
/// Capped at max HP; a linked character supplies the cap
async fn heal_token(
    State(state): State<AppState>,
    Path((id, token_id)): Path<(String, String)>,
    Json(req): Json<AmountRequest>,
) -> impl IntoResponse {
    let snapshot = match state.rooms.scene(&id).await {
        Ok(scene) => scene.token(&token_id).cloned(),
        Err(e) => return room_error(e),
    };
    let Some(snapshot) = snapshot else {
        return token_not_found(&token_id);
    };

    let max_override = linked_max_hp(&state, &snapshot).await;

    let result = state
        .rooms
        .with_scene(&id, |scene| {
            scene.token_mut(&token_id).map(|t| {
                t.heal(req.amount, max_override);
                t.clone()
            })
        })
        .await;

    match result {
        Ok(Some(token)) => {
            let character_synced = mirror_to_character(&state, &token).await;
            Json(TokenHpResponse {
                token,
                outcome: None,
                character_synced,
            })
            .into_response()
        }
        Ok(None) => token_not_found(&token_id),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/{token_id}/adjust
/// Quick +-N on current HP, clamped to [0, max], bypassing temp HP
async fn adjust_token_hp(
    State(state): State<AppState>,
    Path((id, token_id)): Path<(String, String)>,
    Json(req): Json<DeltaRequest>,
) -> impl IntoResponse {
    let snapshot = match state.rooms.scene(&id).await {
        Ok(scene) => scene.token(&token_id).cloned(),
        Err(e) => return room_error(e),
    };
    let Some(snapshot) = snapshot else {
        return token_not_found(&token_id);
    };

    let max_override = linked_max_hp(&state, &snapshot).await;

    let result = state
        .rooms
        .with_scene(&id, |scene| {
            scene.token_mut(&token_id).map(|t| {
                t.quick_adjust(req.delta, max_override);
                t.clone()
            })
        })
        .await;

    match result {
        Ok(Some(token)) => {
            let character_synced = mirror_to_character(&state, &token).await;
            Json(TokenHpResponse {
                token,
                outcome: None,
                character_synced,
            })
            .into_response()
        }
        Ok(None) => token_not_found(&token_id),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/{token_id}/temp_hp
/// Direct set (not additive), clamped >= 0. Token-local; never mirrored.
async fn set_temp_hp(
    State(state): State<AppState>,
    Path((id, token_id)): Path<(String, String)>,
    Json(req): Json<ValueRequest>,
) -> impl IntoResponse {
    let result = state
        .rooms
        .with_scene(&id, |scene| {
            scene.token_mut(&token_id).map(|t| {
                t.set_temp_hp(req.value);
                t.clone()
            })
        })
        .await;

    match result {
        Ok(Some(token)) => Json(token).into_response(),
        Ok(None) => token_not_found(&token_id),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/{token_id}/max_hp
/// Only for unlinked tokens; linked characters supply their own max
async fn set_max_hp(
    State(state): State<AppState>,
    Path((id, token_id)): Path<(String, String)>,
    Json(req): Json<ValueRequest>,
) -> impl IntoResponse {
    let result = state
        .rooms
        .with_scene(&id, |scene| {
            scene.token_mut(&token_id).map(|t| {
                if t.character_id.is_some() {
                    Err(())
                } else {
                    t.set_max_hp(req.value);
                    Ok(t.clone())
                }
            })
        })
        .await;

    match result {
        Ok(Some(Ok(token))) => Json(token).into_response(),
        Ok(Some(Err(()))) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "linked characters supply their own max HP",
            )),
        )
            .into_response(),
        Ok(None) => token_not_found(&token_id),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/{token_id}/condition
/// Toggle: added if absent, removed if present
async fn toggle_condition(
    State(state): State<AppState>,
    Path((id, token_id)): Path<(String, String)>,
    Json(req): Json<ConditionRequest>,
) -> impl IntoResponse {
    if !is_known_condition(&req.condition_id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "Unknown condition: {}",
                req.condition_id
            ))),
        )
            .into_response();
    }

    let result = state
        .rooms
        .with_scene(&id, |scene| {
            scene.token_mut(&token_id).map(|t| {
                let active = t.toggle_condition(&req.condition_id);
                (t.clone(), active)
            })
        })
        .await;

    match result {
        Ok(Some((token, active))) => Json(ConditionToggleResponse { token, active }).into_response(),
        Ok(None) => token_not_found(&token_id),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/token/{token_id}/initiative
/// With a value: manual override. With clear: unset. Otherwise roll
/// 1d20 plus the linked character's dexterity modifier.
async fn set_initiative(
    State(state): State<AppState>,
    Path((id, token_id)): Path<(String, String)>,
    Json(req): Json<InitiativeRequest>,
) -> impl IntoResponse {
    let initiative = if req.clear {
        None
    } else if let Some(value) = req.value {
        Some(value)
    } else {
        let snapshot = match state.rooms.scene(&id).await {
            Ok(scene) => scene.token(&token_id).cloned(),
            Err(e) => return room_error(e),
        };
        let Some(snapshot) = snapshot else {
            return token_not_found(&token_id);
        };

        let dexterity = match snapshot.character_id.as_deref() {
            Some(character_id) => match state.characters.get(character_id).await {
                Ok(Some(c)) => c.abilities.dexterity,
                Ok(None) | Err(_) => 10,
            },
            None => 10,
        };
        Some(roll_initiative(dexterity))
    };

    let result = state
        .rooms
        .with_scene(&id, |scene| {
            if scene.set_initiative(&token_id, initiative) {
                scene.token(&token_id).cloned()
            } else {
                None
            }
        })
        .await;

    match result {
        Ok(Some(token)) => Json(token).into_response(),
        Ok(None) => token_not_found(&token_id),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/next_turn
async fn next_turn(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let result = state
        .rooms
        .with_scene(&id, |scene| {
            let advance = scene.next_turn();
            (advance, scene.round)
        })
        .await;

    match result {
        Ok((advance, round)) => Json(NextTurnResponse {
            token_id: advance.as_ref().map(|a| a.token_id.clone()),
            round_complete: advance.map(|a| a.round_complete).unwrap_or(false),
            round,
        })
        .into_response(),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/clear_initiative
/// End the encounter: unset all initiatives, reset round and pointer
async fn clear_initiative(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let result = state
        .rooms
        .with_scene(&id, |scene| {
            scene.clear_initiatives();
            scene.clone()
        })
        .await;

    match result {
        Ok(scene) => Json(RoomStateResponse { room_id: id, scene }).into_response(),
        Err(e) => room_error(e),
    }
}

/// Chat post request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    author: String,
    body: String,
}

/// Dice roll chat request
#[derive(Debug, Deserialize)]
struct RollRequest {
    author: String,
    /// Dice notation, e.g. "2d6+3"
    notation: String,
}

#[derive(Debug, Serialize)]
struct RollResponse {
    message: ChatMessage,
    rolls: Vec<u32>,
    total: i32,
}

/// GET /room/{id}/chat
async fn chat_log(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.rooms.chat_messages(&id).await {
        Ok(messages) => Json(messages).into_response(),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/chat
async fn post_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let message = ChatMessage::new(&req.author, MessageKind::Say, &req.body);

    match state.rooms.push_chat(&id, message.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => room_error(e),
    }
}

/// POST /room/{id}/roll
/// Parse dice notation, roll it, and append the result to chat
async fn roll_in_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RollRequest>,
) -> impl IntoResponse {
    let dice = match parse_dice(&req.notation) {
        Ok(d) => d,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e))).into_response();
        }
    };

    let (rolls, total) = dice.roll_detailed();
    let body = format!("{} = {} {:?}", dice, total, rolls);
    let message = ChatMessage::new(&req.author, MessageKind::Roll, &body);

    match state.rooms.push_chat(&id, message.clone()).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(RollResponse {
                message,
                rolls,
                total,
            }),
        )
            .into_response(),
        Err(e) => room_error(e),
    }
}
