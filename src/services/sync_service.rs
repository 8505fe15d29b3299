//! Sync queue: bridge records between an on-chain transaction and its off-chain
//! confirmation. No reconciliation loop runs here yet; `update_status` is the
//! entry point for one.

use std::sync::Arc;

use crate::{
    db::Store,
    error::{AppError, Result},
    models::{
        EntityType, NewSyncItem, OnChainReceipt, SyncItemUpdate, SyncQueueItem, SyncStatus,
    },
    services::validation::validate_tx_hash,
};

pub struct SyncService {
    store: Arc<dyn Store>,
}

impl SyncService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn add_to_queue(
        &self,
        tx_hash: &str,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<SyncQueueItem> {
        let mut items = self.enqueue(tx_hash, entity_type, &[entity_id]).await?;
        items
            .pop()
            .ok_or_else(|| AppError::internal("Sync queue insert returned no row"))
    }

    /// Queues one item per affected entity of a submitted transaction, all in one write.
    pub async fn record_transaction(
        &self,
        tx_hash: &str,
        entity_type: EntityType,
        entity_ids: Vec<String>,
    ) -> Result<OnChainReceipt> {
        let ids: Vec<&str> = entity_ids.iter().map(String::as_str).collect();
        self.enqueue(tx_hash, entity_type, &ids).await?;
        Ok(OnChainReceipt {
            tx_hash: tx_hash.to_string(),
            entity_type,
            entity_ids,
            sync_status: SyncStatus::Pending,
        })
    }

    /// Moves every item of `tx_hash` to `status`. Moving to `failed` bumps `retry_count`.
    pub async fn update_status(&self, tx_hash: &str, status: SyncStatus) -> Result<Vec<SyncQueueItem>> {
        let items = self.get_by_tx_hash(tx_hash).await?;

        if let Some(blocked) = items.iter().find(|i| !i.status.can_transition_to(status)) {
            return Err(AppError::validation(format!(
                "Cannot move sync item {} from {} to {}",
                blocked.id, blocked.status, status
            )));
        }

        let updates: Vec<SyncItemUpdate> = items
            .iter()
            .map(|item| SyncItemUpdate {
                id: item.id,
                expected: item.status,
                status,
                retry_count: if status == SyncStatus::Failed {
                    item.retry_count + 1
                } else {
                    item.retry_count
                },
            })
            .collect();

        let rows = self.store.update_sync_items(&updates).await?.ok_or_else(|| {
            AppError::validation(format!(
                "Sync items for transaction {} changed concurrently; nothing was updated",
                tx_hash.trim()
            ))
        })?;
        let updated = rows
            .into_iter()
            .map(SyncQueueItem::try_from)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Sync items for tx {} moved to {}", tx_hash.trim(), status);
        Ok(updated)
    }

    async fn enqueue(
        &self,
        tx_hash: &str,
        entity_type: EntityType,
        entity_ids: &[&str],
    ) -> Result<Vec<SyncQueueItem>> {
        let tx_hash = validate_tx_hash(tx_hash)?;
        let mut new_items = Vec::with_capacity(entity_ids.len());
        for entity_id in entity_ids {
            let entity_id = entity_id.trim();
            if entity_id.is_empty() {
                return Err(AppError::validation("Entity ID is required"));
            }
            new_items.push(NewSyncItem {
                tx_hash: tx_hash.clone(),
                entity_type,
                entity_id: entity_id.to_string(),
            });
        }

        let items = self
            .store
            .insert_sync_items(&new_items)
            .await?
            .into_iter()
            .map(SyncQueueItem::try_from)
            .collect::<Result<Vec<_>>>()?;

        for item in &items {
            tracing::info!(
                "Queued sync item {}: {} {} tx={}",
                item.id,
                item.entity_type,
                item.entity_id,
                item.tx_hash
            );
        }
        Ok(items)
    }

    pub async fn get_pending(&self) -> Result<Vec<SyncQueueItem>> {
        self.store
            .list_sync_items_by_status(SyncStatus::Pending)
            .await?
            .into_iter()
            .map(SyncQueueItem::try_from)
            .collect()
    }

    pub async fn get_by_tx_hash(&self, tx_hash: &str) -> Result<Vec<SyncQueueItem>> {
        let tx_hash = validate_tx_hash(tx_hash)?;
        let rows = self.store.list_sync_items_by_tx_hash(&tx_hash).await?;
        if rows.is_empty() {
            return Err(AppError::not_found(format!(
                "No sync queue entries for transaction {}",
                tx_hash
            )));
        }
        rows.into_iter().map(SyncQueueItem::try_from).collect()
    }
}
