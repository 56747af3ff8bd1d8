//! Campaigns and membership
//!
//! Campaign and room ids follow DNS subdomain-style naming:
//! - 3-64 characters
//! - Lowercase alphanumeric and hyphens
//! - Must start and end with alphanumeric
//! - No consecutive hyphens

use regex::Regex;
use sqlx::SqlitePool;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Validation errors for campaign/room ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// ID is too short (< 3 chars) or too long (> 64 chars)
    Length,
    /// ID contains invalid characters or format
    InvalidFormat,
    /// ID contains consecutive hyphens (--)
    ConsecutiveHyphens,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Length => {
                write!(f, "ID must be 3-64 characters")
            }
            ValidationError::InvalidFormat => {
                write!(
                    f,
                    "ID must be lowercase alphanumeric, may contain hyphens, and must start/end with alphanumeric"
                )
            }
            ValidationError::ConsecutiveHyphens => {
                write!(f, "ID cannot contain consecutive hyphens (--)")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// DNS subdomain-style pattern
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").unwrap());

/// Validate and normalize a campaign or room id.
///
/// # Examples
/// ```
/// use vttd::campaign::validate_slug;
///
/// assert!(validate_slug("curse-of-strahd").is_ok());
/// assert!(validate_slug("table7").is_ok());
/// assert_eq!(validate_slug("Curse-Of-Strahd").unwrap(), "curse-of-strahd");
///
/// assert!(validate_slug("ab").is_err());           // Too short
/// assert!(validate_slug("-invalid").is_err());     // Starts with hyphen
/// assert!(validate_slug("bad--slug").is_err());    // Consecutive hyphens
/// ```
pub fn validate_slug(id: &str) -> Result<String, ValidationError> {
    let normalized = id.to_lowercase();

    if normalized.len() < 3 || normalized.len() > 64 {
        return Err(ValidationError::Length);
    }

    if !SLUG_REGEX.is_match(&normalized) {
        return Err(ValidationError::InvalidFormat);
    }

    if normalized.contains("--") {
        return Err(ValidationError::ConsecutiveHyphens);
    }

    Ok(normalized)
}

/// Campaign data
#[derive(Debug, Clone)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: String,
}

/// One member of a campaign
#[derive(Debug, Clone)]
pub struct Member {
    pub account_id: String,
    pub role: String,
    pub joined_at: String,
}

/// Campaign service errors
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("invalid campaign id: {0}")]
    InvalidId(#[from] ValidationError),

    #[error("campaign already exists")]
    AlreadyExists,

    #[error("campaign not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Campaign storage with database backing
pub struct CampaignStore {
    pool: SqlitePool,
}

impl CampaignStore {
    /// Create a new campaign store with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a campaign. The owner joins as gm.
    pub async fn create(
        &self,
        id: &str,
        name: &str,
        owner_id: &str,
    ) -> Result<Campaign, CampaignError> {
        let id = validate_slug(id)?;

        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM campaigns WHERE id = ?")
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(CampaignError::AlreadyExists);
        }

        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO campaigns (id, name, owner_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(owner_id)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "INSERT INTO campaign_members (campaign_id, account_id, role, joined_at)
             VALUES (?, ?, 'gm', ?)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Campaign {
            id,
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            created_at: now,
        })
    }

    /// Get a campaign by id
    pub async fn get(&self, id: &str) -> Result<Option<Campaign>, CampaignError> {
        let row: Option<(String, String, String, String)> =
            sqlx::query_as("SELECT id, name, owner_id, created_at FROM campaigns WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id, name, owner_id, created_at)| Campaign {
            id,
            name,
            owner_id,
            created_at,
        }))
    }

    /// List all campaigns
    pub async fn list(&self) -> Result<Vec<Campaign>, CampaignError> {
        let rows: Vec<(String, String, String, String)> = sqlx::query_as(
            "SELECT id, name, owner_id, created_at FROM campaigns ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, owner_id, created_at)| Campaign {
                id,
                name,
                owner_id,
                created_at,
            })
            .collect())
    }

    /// Join a campaign. Re-joining updates the role.
    pub async fn join(
        &self,
        campaign_id: &str,
        account_id: &str,
        role: &str,
    ) -> Result<(), CampaignError> {
        if self.get(campaign_id).await?.is_none() {
            return Err(CampaignError::NotFound);
        }

        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO campaign_members (campaign_id, account_id, role, joined_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(campaign_id, account_id) DO UPDATE SET role = excluded.role",
        )
        .bind(campaign_id)
        .bind(account_id)
        .bind(role)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Leave a campaign. Returns false if not a member.
    pub async fn leave(&self, campaign_id: &str, account_id: &str) -> Result<bool, CampaignError> {
        let result =
            sqlx::query("DELETE FROM campaign_members WHERE campaign_id = ? AND account_id = ?")
                .bind(campaign_id)
                .bind(account_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List a campaign's members
    pub async fn members(&self, campaign_id: &str) -> Result<Vec<Member>, CampaignError> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT account_id, role, joined_at FROM campaign_members
             WHERE campaign_id = ? ORDER BY joined_at",
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(account_id, role, joined_at)| Member {
                account_id,
                role,
                joined_at,
            })
            .collect())
    }
}
