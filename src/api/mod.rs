// src/api/mod.rs

pub mod decoration;
pub mod fish;
pub mod health;
pub mod player;
pub mod sync;
pub mod tank;

use axum::{
    extract::{FromRequest, FromRequestParts},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::constants::{API_NAME, API_VERSION, MAX_TANK_CAPACITY, XP_MULTIPLIER};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::responses::ApiResponse;
use crate::services::{
    ChainClient, DecorationService, FishService, PlayerService, SyncService, TankService,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub chain: Arc<dyn ChainClient>,
    pub config: Config,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, chain: Arc<dyn ChainClient>, config: Config) -> Self {
        Self {
            store,
            chain,
            config,
            started_at: Instant::now(),
        }
    }

    pub fn players(&self) -> PlayerService {
        PlayerService::new(self.store.clone(), self.chain.clone())
    }

    pub fn tanks(&self) -> TankService {
        TankService::new(self.store.clone(), self.chain.clone())
    }

    pub fn fish(&self) -> FishService {
        FishService::new(self.store.clone(), self.chain.clone())
    }

    pub fn decorations(&self) -> DecorationService {
        DecorationService::new(self.store.clone(), self.chain.clone())
    }

    pub fn sync(&self) -> SyncService {
        SyncService::new(self.store.clone())
    }
}

/// JSON body whose rejections answer with a `ValidationError` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections answer with a `ValidationError` envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Parses a numeric path id. `label` is lowercase, e.g. "Invalid tank ID format".
pub fn parse_id(raw: &str, label: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::validation(format!("Invalid {} ID format", label)))
}

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub max_tank_capacity: i32,
    pub xp_multiplier: f64,
}

/// GET /api
pub async fn api_info() -> Json<ApiResponse<ApiInfo>> {
    Json(ApiResponse::success(ApiInfo {
        name: API_NAME,
        version: API_VERSION,
        max_tank_capacity: MAX_TANK_CAPACITY,
        xp_multiplier: XP_MULTIPLIER,
    }))
}

/// Router fallback for unmatched paths.
pub async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::not_found(format!("Route {} not found", uri.path()))
}

/// Known path, unsupported method.
pub async fn method_not_allowed(method: axum::http::Method, uri: axum::http::Uri) -> AppError {
    AppError::not_found(format!("Route {} {} not found", method, uri.path()))
}
