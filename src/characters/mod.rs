//! Character records
//!
//! Persisted PC/NPC records. A character is the record of truth for a
//! linked token's max HP; HP changes made on the tabletop are mirrored
//! back here by the room endpoints.

pub mod gen;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::tabletop::ability_modifier;

/// The six ability scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for Abilities {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

/// A player or non-player character record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub campaign_id: Option<String>,
    pub owner_id: String,
    pub name: String,
    /// "pc" or "npc"
    pub character_type: String,
    pub level: i32,
    pub abilities: Abilities,
    pub max_hp: i32,
    pub current_hp: i32,
    pub armor_class: i32,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Character {
    /// Create a new character draft with defaults
    pub fn new(owner_id: &str, name: &str, character_type: &str) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            campaign_id: None,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            character_type: character_type.to_string(),
            level: 1,
            abilities: Abilities::default(),
            max_hp: 1,
            current_hp: 1,
            armor_class: 10,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Dexterity-derived initiative modifier
    pub fn initiative_modifier(&self) -> i32 {
        ability_modifier(self.abilities.dexterity)
    }
}

/// Character service errors
#[derive(Debug, Error)]
pub enum CharacterError {
    #[error("character not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Character persistence and CRUD operations
pub struct CharacterStore {
    pool: SqlitePool,
}

impl CharacterStore {
    /// Create a new character store with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new character
    pub async fn create(&self, character: &Character) -> Result<(), CharacterError> {
        let abilities = serde_json::to_string(&character.abilities)?;

        sqlx::query(
            r#"
            INSERT INTO characters
            (id, campaign_id, owner_id, name, character_type, level, abilities,
             max_hp, current_hp, armor_class, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&character.id)
        .bind(&character.campaign_id)
        .bind(&character.owner_id)
        .bind(&character.name)
        .bind(&character.character_type)
        .bind(character.level)
        .bind(&abilities)
        .bind(character.max_hp)
        .bind(character.current_hp)
        .bind(character.armor_class)
        .bind(&character.notes)
        .bind(&character.created_at)
        .bind(&character.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a character by ID
    pub async fn get(&self, id: &str) -> Result<Option<Character>, CharacterError> {
        let row: Option<CharacterRow> = sqlx::query_as(
            r#"
            SELECT id, campaign_id, owner_id, name, character_type, level, abilities,
                   max_hp, current_hp, armor_class, notes, created_at, updated_at
            FROM characters WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.into_character()?)),
            None => Ok(None),
        }
    }

    /// Update an existing character
    pub async fn update(&self, character: &Character) -> Result<(), CharacterError> {
        let abilities = serde_json::to_string(&character.abilities)?;
        let updated_at = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE characters
            SET campaign_id = ?, name = ?, character_type = ?, level = ?, abilities = ?,
                max_hp = ?, current_hp = ?, armor_class = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&character.campaign_id)
        .bind(&character.name)
        .bind(&character.character_type)
        .bind(character.level)
        .bind(&abilities)
        .bind(character.max_hp)
        .bind(character.current_hp)
        .bind(character.armor_class)
        .bind(&character.notes)
        .bind(&updated_at)
        .bind(&character.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CharacterError::NotFound);
        }
        Ok(())
    }

    /// Write current HP directly (the mirroring path for linked tokens)
    pub async fn set_current_hp(&self, id: &str, current_hp: i32) -> Result<(), CharacterError> {
        let updated_at = chrono::Utc::now().to_rfc3339();

        let result =
            sqlx::query("UPDATE characters SET current_hp = ?, updated_at = ? WHERE id = ?")
                .bind(current_hp)
                .bind(&updated_at)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(CharacterError::NotFound);
        }
        Ok(())
    }

    /// Delete a character
    pub async fn delete(&self, id: &str) -> Result<bool, CharacterError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List characters in a campaign
    pub async fn list_by_campaign(
        &self,
        campaign_id: &str,
    ) -> Result<Vec<Character>, CharacterError> {
        let rows: Vec<CharacterRow> = sqlx::query_as(
            r#"
            SELECT id, campaign_id, owner_id, name, character_type, level, abilities,
                   max_hp, current_hp, armor_class, notes, created_at, updated_at
            FROM characters WHERE campaign_id = ? ORDER BY created_at
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_character()).collect()
    }

    /// List characters owned by an account
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Character>, CharacterError> {
        let rows: Vec<CharacterRow> = sqlx::query_as(
            r#"
            SELECT id, campaign_id, owner_id, name, character_type, level, abilities,
                   max_hp, current_hp, armor_class, notes, created_at, updated_at
            FROM characters WHERE owner_id = ? ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_character()).collect()
    }
}

/// Row type for SQLite queries
#[derive(sqlx::FromRow)]
struct CharacterRow {
    id: String,
    campaign_id: Option<String>,
    owner_id: String,
    name: String,
    character_type: String,
    level: i32,
    abilities: String,
    max_hp: i32,
    current_hp: i32,
    armor_class: i32,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl CharacterRow {
    fn into_character(self) -> Result<Character, CharacterError> {
        let abilities: Abilities = serde_json::from_str(&self.abilities)?;
        Ok(Character {
            id: self.id,
            campaign_id: self.campaign_id,
            owner_id: self.owner_id,
            name: self.name,
            character_type: self.character_type,
            level: self.level,
            abilities,
            max_hp: self.max_hp,
            current_hp: self.current_hp,
            armor_class: self.armor_class,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
