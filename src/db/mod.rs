use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    config::Config,
    error::Result,
    models::{
        DecorationRow, FishRow, NewSyncItem, PlayerRow, SyncItemUpdate, SyncQueueRow, SyncStatus,
        TankRow,
    },
};

#[cfg(test)]
pub mod memory;

// Absent rows come back as `Ok(None)`; every other failure is an `AppError::Database`.

#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn find_player(&self, address: &str) -> Result<Option<PlayerRow>>;
}

#[async_trait]
pub trait TankStore: Send + Sync {
    async fn find_tank(&self, id: i64) -> Result<Option<TankRow>>;
    async fn list_tanks_by_owner(&self, owner: &str) -> Result<Vec<TankRow>>;
    /// `(tank_id, fish_count)` for every listed tank holding at least one fish.
    async fn count_fish_per_tank(&self, tank_ids: &[i64]) -> Result<Vec<(i64, i64)>>;
}

#[async_trait]
pub trait FishStore: Send + Sync {
    async fn find_fish(&self, id: i64) -> Result<Option<FishRow>>;
    async fn list_fish_by_owner(&self, owner: &str) -> Result<Vec<FishRow>>;
}

#[async_trait]
pub trait DecorationStore: Send + Sync {
    async fn find_decoration(&self, id: i64) -> Result<Option<DecorationRow>>;
    async fn list_decorations_by_owner(&self, owner: &str) -> Result<Vec<DecorationRow>>;
}

#[async_trait]
pub trait SyncQueueStore: Send + Sync {
    /// Inserts all items or none of them.
    async fn insert_sync_items(&self, items: &[NewSyncItem]) -> Result<Vec<SyncQueueRow>>;
    async fn list_sync_items_by_tx_hash(&self, tx_hash: &str) -> Result<Vec<SyncQueueRow>>;
    async fn list_sync_items_by_status(&self, status: SyncStatus) -> Result<Vec<SyncQueueRow>>;
    /// Applies every update or none. `Ok(None)` when some row is missing or no longer
    /// in its expected status.
    async fn update_sync_items(
        &self,
        updates: &[SyncItemUpdate],
    ) -> Result<Option<Vec<SyncQueueRow>>>;
}

/// Everything the services need from persistence.
#[async_trait]
pub trait Store: PlayerStore + TankStore + FishStore + DecorationStore + SyncQueueStore {
    async fn ping(&self) -> bool;
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for Database {
    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// ==================== PLAYER QUERIES ====================
#[async_trait]
impl PlayerStore for Database {
    async fn find_player(&self, address: &str) -> Result<Option<PlayerRow>> {
        let row = sqlx::query_as::<_, PlayerRow>(
            "SELECT address, total_xp, fish_count, tournaments_won, reputation,
                    offspring_created, avatar_url, created_at, updated_at
             FROM players WHERE address = $1",
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

// ==================== TANK QUERIES ====================
#[async_trait]
impl TankStore for Database {
    async fn find_tank(&self, id: i64) -> Result<Option<TankRow>> {
        let row = sqlx::query_as::<_, TankRow>(
            "SELECT id, owner, name, capacity, created_at, updated_at
             FROM tanks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_tanks_by_owner(&self, owner: &str) -> Result<Vec<TankRow>> {
        let rows = sqlx::query_as::<_, TankRow>(
            "SELECT id, owner, name, capacity, created_at, updated_at
             FROM tanks WHERE owner = $1 ORDER BY id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_fish_per_tank(&self, tank_ids: &[i64]) -> Result<Vec<(i64, i64)>> {
        if tank_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, (i64, i64)>(
            "SELECT tank_id, COUNT(*) AS fish_count
             FROM fish WHERE tank_id = ANY($1)
             GROUP BY tank_id",
        )
        .bind(tank_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// ==================== FISH QUERIES ====================
#[async_trait]
impl FishStore for Database {
    async fn find_fish(&self, id: i64) -> Result<Option<FishRow>> {
        let row = sqlx::query_as::<_, FishRow>(
            "SELECT id, owner, tank_id, species, image_url, created_at, updated_at
             FROM fish WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_fish_by_owner(&self, owner: &str) -> Result<Vec<FishRow>> {
        let rows = sqlx::query_as::<_, FishRow>(
            "SELECT id, owner, tank_id, species, image_url, created_at, updated_at
             FROM fish WHERE owner = $1 ORDER BY id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// ==================== DECORATION QUERIES ====================
#[async_trait]
impl DecorationStore for Database {
    async fn find_decoration(&self, id: i64) -> Result<Option<DecorationRow>> {
        let row = sqlx::query_as::<_, DecorationRow>(
            "SELECT id, owner, kind, is_active, created_at, updated_at
             FROM decorations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_decorations_by_owner(&self, owner: &str) -> Result<Vec<DecorationRow>> {
        let rows = sqlx::query_as::<_, DecorationRow>(
            "SELECT id, owner, kind, is_active, created_at, updated_at
             FROM decorations WHERE owner = $1 ORDER BY id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// ==================== SYNC QUEUE QUERIES ====================
#[async_trait]
impl SyncQueueStore for Database {
    async fn insert_sync_items(&self, items: &[NewSyncItem]) -> Result<Vec<SyncQueueRow>> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, SyncQueueRow>(
                "INSERT INTO sync_queue (tx_hash, entity_type, entity_id, status, retry_count)
                 VALUES ($1, $2, $3, 'pending', 0)
                 RETURNING id, tx_hash, entity_type, entity_id, status, retry_count,
                           created_at, updated_at",
            )
            .bind(&item.tx_hash)
            .bind(item.entity_type.as_str())
            .bind(&item.entity_id)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(row);
        }
        tx.commit().await?;
        Ok(rows)
    }

    async fn list_sync_items_by_tx_hash(&self, tx_hash: &str) -> Result<Vec<SyncQueueRow>> {
        let rows = sqlx::query_as::<_, SyncQueueRow>(
            "SELECT id, tx_hash, entity_type, entity_id, status, retry_count,
                    created_at, updated_at
             FROM sync_queue WHERE tx_hash = $1 ORDER BY id",
        )
        .bind(tx_hash)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_sync_items_by_status(&self, status: SyncStatus) -> Result<Vec<SyncQueueRow>> {
        let rows = sqlx::query_as::<_, SyncQueueRow>(
            "SELECT id, tx_hash, entity_type, entity_id, status, retry_count,
                    created_at, updated_at
             FROM sync_queue WHERE status = $1 ORDER BY created_at, id",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_sync_items(
        &self,
        updates: &[SyncItemUpdate],
    ) -> Result<Option<Vec<SyncQueueRow>>> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(updates.len());
        for update in updates {
            let row = sqlx::query_as::<_, SyncQueueRow>(
                "UPDATE sync_queue
                 SET status = $2, retry_count = $3, updated_at = NOW()
                 WHERE id = $1 AND status = $4
                 RETURNING id, tx_hash, entity_type, entity_id, status, retry_count,
                           created_at, updated_at",
            )
            .bind(update.id)
            .bind(update.status.as_str())
            .bind(update.retry_count)
            .bind(update.expected.as_str())
            .fetch_optional(&mut *tx)
            .await?;
            match row {
                Some(row) => rows.push(row),
                // Dropping `tx` rolls back the updates already applied.
                None => return Ok(None),
            }
        }
        tx.commit().await?;
        Ok(Some(rows))
    }
}
