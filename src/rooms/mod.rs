//! Rooms
//!
//! A room is one table of a campaign. Its saved form is a row in SQLite
//! holding the scene wholesale as JSON; its live form is in-memory state
//! in the RoomManager, mutated by the tabletop endpoints and lost on
//! server restart unless saved. The caller decides when to save.

pub mod chat;

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::campaign::{validate_slug, ValidationError};
use crate::tabletop::Scene;
use chat::{ChatLog, ChatMessage};

/// Room service errors
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("invalid room id: {0}")]
    InvalidId(#[from] ValidationError),

    #[error("room already exists")]
    AlreadyExists,

    #[error("room not found")]
    NotFound,

    #[error("campaign not found")]
    CampaignNotFound,

    #[error("room is not open")]
    NotOpen,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("scene serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A saved room row
#[derive(Debug, Clone)]
pub struct RoomRecord {
    pub id: String,
    pub campaign_id: String,
    pub name: String,
    pub scene: Scene,
    pub updated_at: String,
}

/// Room persistence with database backing
pub struct RoomStore {
    pool: SqlitePool,
}

impl RoomStore {
    /// Create a new room store with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a room in a campaign with an empty scene
    pub async fn create(
        &self,
        id: &str,
        campaign_id: &str,
        name: &str,
    ) -> Result<RoomRecord, RoomError> {
        let id = validate_slug(id)?;

        let campaign: Option<(String,)> = sqlx::query_as("SELECT id FROM campaigns WHERE id = ?")
            .bind(campaign_id)
            .fetch_optional(&self.pool)
            .await?;
        if campaign.is_none() {
            return Err(RoomError::CampaignNotFound);
        }

        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM rooms WHERE id = ?")
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(RoomError::AlreadyExists);
        }

        let scene = Scene::new();
        let scene_json = serde_json::to_string(&scene)?;
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO rooms (id, campaign_id, name, scene, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(campaign_id)
        .bind(name)
        .bind(&scene_json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(RoomRecord {
            id,
            campaign_id: campaign_id.to_string(),
            name: name.to_string(),
            scene,
            updated_at: now,
        })
    }

    /// Get a saved room by id
    pub async fn get(&self, id: &str) -> Result<Option<RoomRecord>, RoomError> {
        let row: Option<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, campaign_id, name, scene, updated_at FROM rooms WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((id, campaign_id, name, scene_json, updated_at)) => {
                let scene: Scene = serde_json::from_str(&scene_json)?;
                Ok(Some(RoomRecord {
                    id,
                    campaign_id,
                    name,
                    scene,
                    updated_at,
                }))
            }
            None => Ok(None),
        }
    }

    /// Persist a scene wholesale into a saved room
    pub async fn save_scene(&self, id: &str, scene: &Scene) -> Result<(), RoomError> {
        let scene_json = serde_json::to_string(scene)?;
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query("UPDATE rooms SET scene = ?, updated_at = ? WHERE id = ?")
            .bind(&scene_json)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RoomError::NotFound);
        }
        Ok(())
    }

    /// List a campaign's rooms (id, name pairs)
    pub async fn list_by_campaign(
        &self,
        campaign_id: &str,
    ) -> Result<Vec<(String, String)>, RoomError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, name FROM rooms WHERE campaign_id = ? ORDER BY id")
                .bind(campaign_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }
}

/// Live state of one open room
#[derive(Debug, Default)]
pub struct LiveRoom {
    pub scene: Scene,
    pub chat: ChatLog,
}

/// Registry of open rooms. Volatile by design: everything here is lost
/// on restart unless the client saves the scene.
#[derive(Debug, Default)]
pub struct RoomManager {
    rooms: RwLock<HashMap<String, LiveRoom>>,
}

impl RoomManager {
    /// Create a new room manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared instance
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Open a room with the given scene. Opening an already-open room
    /// leaves its live state untouched.
    pub async fn open(&self, room_id: &str, scene: Scene) -> bool {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(room_id) {
            return false;
        }
        rooms.insert(
            room_id.to_string(),
            LiveRoom {
                scene,
                chat: ChatLog::new(),
            },
        );
        true
    }

    /// Whether a room is open
    pub async fn is_open(&self, room_id: &str) -> bool {
        self.rooms.read().await.contains_key(room_id)
    }

    /// Close a room, dropping its live state
    pub async fn close(&self, room_id: &str) -> bool {
        self.rooms.write().await.remove(room_id).is_some()
    }

    /// Run a closure against a room's scene under the write lock
    pub async fn with_scene<R>(
        &self,
        room_id: &str,
        f: impl FnOnce(&mut Scene) -> R,
    ) -> Result<R, RoomError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(room_id).ok_or(RoomError::NotOpen)?;
        Ok(f(&mut room.scene))
    }

    /// Snapshot a room's scene
    pub async fn scene(&self, room_id: &str) -> Result<Scene, RoomError> {
        let rooms = self.rooms.read().await;
        let room = rooms.get(room_id).ok_or(RoomError::NotOpen)?;
        Ok(room.scene.clone())
    }

    /// Append a chat message to a room
    pub async fn push_chat(&self, room_id: &str, message: ChatMessage) -> Result<(), RoomError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(room_id).ok_or(RoomError::NotOpen)?;
        room.chat.push(message);
        Ok(())
    }

    /// Snapshot a room's chat log
    pub async fn chat_messages(&self, room_id: &str) -> Result<Vec<ChatMessage>, RoomError> {
        let rooms = self.rooms.read().await;
        let room = rooms.get(room_id).ok_or(RoomError::NotOpen)?;
        Ok(room.chat.messages().to_vec())
    }
}
