//! In-memory [`Store`] for service and router tests. Counts every call so tests
//! can assert that validation rejects input before the store is touched.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{DecorationStore, FishStore, PlayerStore, Store, SyncQueueStore, TankStore};
use crate::error::{AppError, Result};
use crate::models::{
    DecorationRow, FishRow, NewSyncItem, PlayerRow, SyncItemUpdate, SyncQueueRow, SyncStatus,
    TankRow,
};

#[derive(Default)]
pub struct InMemoryStore {
    players: Mutex<Vec<PlayerRow>>,
    tanks: Mutex<Vec<TankRow>>,
    fish: Mutex<Vec<FishRow>>,
    decorations: Mutex<Vec<DecorationRow>>,
    sync_items: Mutex<Vec<SyncQueueRow>>,
    calls: AtomicUsize,
    fail_with: Mutex<Option<String>>,
    fail_on_call: Mutex<Option<usize>>,
    interleaved_status: Mutex<Option<SyncStatus>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every subsequent call fails with a database error carrying `message`.
    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    /// Only the `n`th call (1-based) fails.
    pub fn fail_on_call(&self, n: usize) {
        *self.fail_on_call.lock().unwrap() = Some(n);
    }

    /// Another writer moves every sync item to `status` right before the next
    /// batch of status updates lands.
    pub fn interleave_status_change(&self, status: SyncStatus) {
        *self.interleaved_status.lock().unwrap() = Some(status);
    }

    pub fn insert_player(&self, address: &str) -> PlayerRow {
        let now = Utc::now();
        let row = PlayerRow {
            address: address.to_string(),
            total_xp: Some(120),
            fish_count: None,
            tournaments_won: Some(1),
            reputation: None,
            offspring_created: Some(2),
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        self.players.lock().unwrap().push(row.clone());
        row
    }

    pub fn insert_tank(&self, id: i64, owner: &str, capacity: i32) -> TankRow {
        let now = Utc::now();
        let row = TankRow {
            id,
            owner: owner.to_string(),
            name: Some(format!("Tank {id}")),
            capacity: Some(capacity),
            created_at: now,
            updated_at: now,
        };
        self.tanks.lock().unwrap().push(row.clone());
        row
    }

    pub fn insert_fish(&self, id: i64, owner: &str, tank_id: Option<i64>) -> FishRow {
        let now = Utc::now();
        let row = FishRow {
            id,
            owner: owner.to_string(),
            tank_id,
            species: Some("clownfish".to_string()),
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        self.fish.lock().unwrap().push(row.clone());
        row
    }

    pub fn insert_decoration(&self, id: i64, owner: &str, kind: &str, active: bool) -> DecorationRow {
        let now = Utc::now();
        let row = DecorationRow {
            id,
            owner: owner.to_string(),
            kind: kind.to_string(),
            is_active: Some(active),
            created_at: now,
            updated_at: now,
        };
        self.decorations.lock().unwrap().push(row.clone());
        row
    }

    pub fn sync_items(&self) -> Vec<SyncQueueRow> {
        self.sync_items.lock().unwrap().clone()
    }

    fn enter(&self) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_on_call.lock().unwrap() == Some(call) {
            return Err(AppError::Database(sqlx::Error::Protocol(format!(
                "store call {call} failed"
            ))));
        }
        match self.fail_with.lock().unwrap().as_ref() {
            Some(message) => Err(AppError::Database(sqlx::Error::Protocol(message.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> bool {
        self.enter().is_ok()
    }
}

#[async_trait]
impl PlayerStore for InMemoryStore {
    async fn find_player(&self, address: &str) -> Result<Option<PlayerRow>> {
        self.enter()?;
        let players = self.players.lock().unwrap();
        Ok(players.iter().find(|p| p.address == address).cloned())
    }
}

#[async_trait]
impl TankStore for InMemoryStore {
    async fn find_tank(&self, id: i64) -> Result<Option<TankRow>> {
        self.enter()?;
        let tanks = self.tanks.lock().unwrap();
        Ok(tanks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tanks_by_owner(&self, owner: &str) -> Result<Vec<TankRow>> {
        self.enter()?;
        let tanks = self.tanks.lock().unwrap();
        Ok(tanks.iter().filter(|t| t.owner == owner).cloned().collect())
    }

    async fn count_fish_per_tank(&self, tank_ids: &[i64]) -> Result<Vec<(i64, i64)>> {
        self.enter()?;
        let fish = self.fish.lock().unwrap();
        let mut counts: HashMap<i64, i64> = HashMap::new();
        for tank_id in fish.iter().filter_map(|f| f.tank_id) {
            if tank_ids.contains(&tank_id) {
                *counts.entry(tank_id).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait]
impl FishStore for InMemoryStore {
    async fn find_fish(&self, id: i64) -> Result<Option<FishRow>> {
        self.enter()?;
        let fish = self.fish.lock().unwrap();
        Ok(fish.iter().find(|f| f.id == id).cloned())
    }

    async fn list_fish_by_owner(&self, owner: &str) -> Result<Vec<FishRow>> {
        self.enter()?;
        let fish = self.fish.lock().unwrap();
        Ok(fish.iter().filter(|f| f.owner == owner).cloned().collect())
    }
}

#[async_trait]
impl DecorationStore for InMemoryStore {
    async fn find_decoration(&self, id: i64) -> Result<Option<DecorationRow>> {
        self.enter()?;
        let decorations = self.decorations.lock().unwrap();
        Ok(decorations.iter().find(|d| d.id == id).cloned())
    }

    async fn list_decorations_by_owner(&self, owner: &str) -> Result<Vec<DecorationRow>> {
        self.enter()?;
        let decorations = self.decorations.lock().unwrap();
        Ok(decorations
            .iter()
            .filter(|d| d.owner == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SyncQueueStore for InMemoryStore {
    async fn insert_sync_items(&self, new_items: &[NewSyncItem]) -> Result<Vec<SyncQueueRow>> {
        self.enter()?;
        let mut items = self.sync_items.lock().unwrap();
        let now = Utc::now();
        let rows: Vec<SyncQueueRow> = new_items
            .iter()
            .enumerate()
            .map(|(offset, item)| SyncQueueRow {
                id: (items.len() + offset) as i64 + 1,
                tx_hash: item.tx_hash.clone(),
                entity_type: item.entity_type.as_str().to_string(),
                entity_id: item.entity_id.clone(),
                status: SyncStatus::Pending.as_str().to_string(),
                retry_count: Some(0),
                created_at: now,
                updated_at: now,
            })
            .collect();
        items.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn list_sync_items_by_tx_hash(&self, tx_hash: &str) -> Result<Vec<SyncQueueRow>> {
        self.enter()?;
        let items = self.sync_items.lock().unwrap();
        Ok(items.iter().filter(|i| i.tx_hash == tx_hash).cloned().collect())
    }

    async fn list_sync_items_by_status(&self, status: SyncStatus) -> Result<Vec<SyncQueueRow>> {
        self.enter()?;
        let items = self.sync_items.lock().unwrap();
        Ok(items
            .iter()
            .filter(|i| i.status == status.as_str())
            .cloned()
            .collect())
    }

    async fn update_sync_items(
        &self,
        updates: &[SyncItemUpdate],
    ) -> Result<Option<Vec<SyncQueueRow>>> {
        self.enter()?;
        let mut items = self.sync_items.lock().unwrap();
        if let Some(status) = self.interleaved_status.lock().unwrap().take() {
            for item in items.iter_mut() {
                item.status = status.as_str().to_string();
            }
        }

        let applicable = updates.iter().all(|update| {
            items
                .iter()
                .any(|i| i.id == update.id && i.status == update.expected.as_str())
        });
        if !applicable {
            return Ok(None);
        }

        let now = Utc::now();
        let mut rows = Vec::with_capacity(updates.len());
        for update in updates {
            if let Some(item) = items.iter_mut().find(|i| i.id == update.id) {
                item.status = update.status.as_str().to_string();
                item.retry_count = Some(update.retry_count);
                item.updated_at = now;
                rows.push(item.clone());
            }
        }
        Ok(Some(rows))
    }
}
