use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationKind {
    Plant,
    Statue,
    Background,
    Ornament,
}

impl DecorationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DecorationKind::Plant => "plant",
            DecorationKind::Statue => "statue",
            DecorationKind::Background => "background",
            DecorationKind::Ornament => "ornament",
        }
    }
}

impl fmt::Display for DecorationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecorationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plant" => Ok(DecorationKind::Plant),
            "statue" => Ok(DecorationKind::Statue),
            "background" => Ok(DecorationKind::Background),
            "ornament" => Ok(DecorationKind::Ornament),
            _ => Err(AppError::validation(format!("Invalid decoration kind: {}", s))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DecorationRow {
    pub id: i64,
    pub owner: String,
    pub kind: String,
    pub is_active: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub id: i64,
    pub owner: String,
    pub kind: DecorationKind,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DecorationRow> for Decoration {
    type Error = AppError;

    // A bad kind in storage is our fault, not the caller's.
    fn try_from(row: DecorationRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse::<DecorationKind>().map_err(|_| {
            AppError::internal(format!(
                "Decoration {} has unrecognized kind '{}'",
                row.id, row.kind
            ))
        })?;
        Ok(Self {
            id: row.id,
            owner: row.owner,
            kind,
            is_active: row.is_active.unwrap_or(false),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MintDecorationRequest {
    pub address: String,
    pub kind: String,
}
