use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row as stored in `players`. Counters are nullable for legacy rows.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub address: String,
    pub total_xp: Option<i64>,
    pub fish_count: Option<i64>,
    pub tournaments_won: Option<i64>,
    pub reputation: Option<i64>,
    pub offspring_created: Option<i64>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub address: String,
    pub total_xp: i64,
    pub fish_count: i64,
    pub tournaments_won: i64,
    pub reputation: i64,
    pub offspring_created: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Self {
            address: row.address,
            total_xp: row.total_xp.unwrap_or(0),
            fish_count: row.fish_count.unwrap_or(0),
            tournaments_won: row.tournaments_won.unwrap_or(0),
            reputation: row.reputation.unwrap_or(0),
            offspring_created: row.offspring_created.unwrap_or(0),
            avatar_url: row.avatar_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Body for routes that act on behalf of a wallet address.
#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub address: String,
}
