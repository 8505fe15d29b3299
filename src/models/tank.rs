use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::fish::FishSummary;
use crate::constants::MAX_TANK_CAPACITY;

#[derive(Debug, Clone, FromRow)]
pub struct TankRow {
    pub id: i64,
    pub owner: String,
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub id: i64,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TankRow> for Tank {
    fn from(row: TankRow) -> Self {
        Self {
            id: row.id,
            owner: row.owner,
            name: row.name,
            capacity: row.capacity.unwrap_or(MAX_TANK_CAPACITY),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `GET /api/tank/{id}`: the tank plus an off-chain summary of its fish.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankDetails {
    #[serde(flatten)]
    pub tank: Tank,
    pub fish: Vec<FishSummary>,
}

/// `GET /api/player/{address}/tanks`: derived occupancy fields, computed per read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankOverview {
    #[serde(flatten)]
    pub tank: Tank,
    pub fish_count: i64,
    pub capacity_usage: f64,
}

impl TankOverview {
    pub fn new(tank: Tank, fish_count: i64) -> Self {
        let capacity_usage = capacity_usage(fish_count, tank.capacity);
        Self {
            tank,
            fish_count,
            capacity_usage,
        }
    }
}

/// Percentage of `capacity` occupied, rounded to two decimals.
pub fn capacity_usage(fish_count: i64, capacity: i32) -> f64 {
    if capacity <= 0 {
        return 0.0;
    }
    let pct = fish_count as f64 / capacity as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}
