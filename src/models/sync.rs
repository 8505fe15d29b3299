use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Player,
    Fish,
    Tank,
    Decoration,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Player => "player",
            EntityType::Fish => "fish",
            EntityType::Tank => "tank",
            EntityType::Decoration => "decoration",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(EntityType::Player),
            "fish" => Ok(EntityType::Fish),
            "tank" => Ok(EntityType::Tank),
            "decoration" => Ok(EntityType::Decoration),
            _ => Err(AppError::validation(format!("Invalid entity type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Confirmed,
    Failed,
}

impl SyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Confirmed => "confirmed",
            SyncStatus::Failed => "failed",
        }
    }

    /// pending -> confirmed | failed, failed -> pending (retry). Confirmed is terminal.
    pub fn can_transition_to(self, next: SyncStatus) -> bool {
        matches!(
            (self, next),
            (SyncStatus::Pending, SyncStatus::Confirmed)
                | (SyncStatus::Pending, SyncStatus::Failed)
                | (SyncStatus::Failed, SyncStatus::Pending)
        )
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SyncStatus::Pending),
            "confirmed" => Ok(SyncStatus::Confirmed),
            "failed" => Ok(SyncStatus::Failed),
            _ => Err(AppError::validation(format!("Invalid sync status: {}", s))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SyncQueueRow {
    pub id: i64,
    pub tx_hash: String,
    pub entity_type: String,
    pub entity_id: String,
    pub status: String,
    pub retry_count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncQueueItem {
    pub id: i64,
    pub tx_hash: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub status: SyncStatus,
    pub retry_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SyncQueueRow> for SyncQueueItem {
    type Error = AppError;

    fn try_from(row: SyncQueueRow) -> Result<Self, Self::Error> {
        let entity_type = row.entity_type.parse::<EntityType>().map_err(|_| {
            AppError::internal(format!(
                "Sync item {} has unrecognized entity type '{}'",
                row.id, row.entity_type
            ))
        })?;
        let status = row.status.parse::<SyncStatus>().map_err(|_| {
            AppError::internal(format!(
                "Sync item {} has unrecognized status '{}'",
                row.id, row.status
            ))
        })?;
        Ok(Self {
            id: row.id,
            tx_hash: row.tx_hash,
            entity_type,
            entity_id: row.entity_id,
            status,
            retry_count: row.retry_count.unwrap_or(0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insert payload; the store assigns id, status and timestamps.
#[derive(Debug, Clone)]
pub struct NewSyncItem {
    pub tx_hash: String,
    pub entity_type: EntityType,
    pub entity_id: String,
}

/// Conditional status change: applies only while the row is still in `expected`.
#[derive(Debug, Clone)]
pub struct SyncItemUpdate {
    pub id: i64,
    pub expected: SyncStatus,
    pub status: SyncStatus,
    pub retry_count: i32,
}

/// Returned by every route that submits an on-chain transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnChainReceipt {
    pub tx_hash: String,
    pub entity_type: EntityType,
    pub entity_ids: Vec<String>,
    pub sync_status: SyncStatus,
}
