use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct FishRow {
    pub id: i64,
    pub owner: String,
    pub tank_id: Option<i64>,
    pub species: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    pub id: i64,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tank_id: Option<i64>,
    pub species: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FishRow> for Fish {
    fn from(row: FishRow) -> Self {
        Self {
            id: row.id,
            owner: row.owner,
            tank_id: row.tank_id,
            species: row.species.unwrap_or_else(|| "unknown".to_string()),
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Off-chain subset listed inside a tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishSummary {
    pub id: i64,
    pub species: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<Fish> for FishSummary {
    fn from(fish: Fish) -> Self {
        Self {
            id: fish.id,
            species: fish.species,
            image_url: fish.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishFamilyMember {
    pub id: i64,
    pub parent1_id: Option<i64>,
    pub parent2_id: Option<i64>,
    pub generation: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishFamilyTree {
    pub fish_id: i64,
    pub ancestors: Vec<FishFamilyMember>,
    pub generation_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct FeedFishRequest {
    pub fish_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BreedFishRequest {
    pub fish1_id: i64,
    pub fish2_id: i64,
}
