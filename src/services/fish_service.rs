use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    constants::MAX_FEED_BATCH,
    db::Store,
    error::{AppError, Result},
    models::{EntityType, Fish, FishFamilyTree, OnChainReceipt},
    services::{
        dojo::ChainClient,
        player_service::player_not_found,
        sync_service::SyncService,
        validation::{validate_address, validate_id},
    },
};

pub struct FishService {
    store: Arc<dyn Store>,
    chain: Arc<dyn ChainClient>,
}

impl FishService {
    pub fn new(store: Arc<dyn Store>, chain: Arc<dyn ChainClient>) -> Self {
        Self { store, chain }
    }

    pub async fn get_fish_by_id(&self, id: i64) -> Result<Fish> {
        let id = validate_id(id, "Fish")?;
        self.store
            .find_fish(id)
            .await?
            .map(Fish::from)
            .ok_or_else(|| fish_not_found(id))
    }

    pub async fn get_fish_by_owner(&self, address: &str) -> Result<Vec<Fish>> {
        let owner = validate_address(address)?;
        Ok(self
            .store
            .list_fish_by_owner(&owner)
            .await?
            .into_iter()
            .map(Fish::from)
            .collect())
    }

    /// Lineage comes from the chain; the fish must still be known off-chain.
    pub async fn get_family_tree(&self, id: i64) -> Result<FishFamilyTree> {
        let fish = self.get_fish_by_id(id).await?;
        self.chain.get_fish_family_tree(fish.id).await
    }

    pub async fn mint_fish(&self, address: &str) -> Result<OnChainReceipt> {
        let owner = validate_address(address)?;
        if self.store.find_player(&owner).await?.is_none() {
            return Err(player_not_found(&owner));
        }

        let tx_hash = self.chain.mint_fish(&owner).await?;
        SyncService::new(self.store.clone())
            .record_transaction(&tx_hash, EntityType::Fish, vec![owner])
            .await
    }

    pub async fn feed_fish_batch(&self, fish_ids: &[i64]) -> Result<OnChainReceipt> {
        if fish_ids.is_empty() {
            return Err(AppError::validation("At least one fish ID is required"));
        }
        if fish_ids.len() > MAX_FEED_BATCH {
            return Err(AppError::validation(format!(
                "Cannot feed more than {} fish at once",
                MAX_FEED_BATCH
            )));
        }
        for &id in fish_ids {
            validate_id(id, "Fish")?;
        }

        let mut seen = HashSet::with_capacity(fish_ids.len());
        let unique: Vec<i64> = fish_ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        for &id in &unique {
            if self.store.find_fish(id).await?.is_none() {
                return Err(fish_not_found(id));
            }
        }

        let tx_hash = self.chain.feed_fish_batch(&unique).await?;
        SyncService::new(self.store.clone())
            .record_transaction(
                &tx_hash,
                EntityType::Fish,
                unique.iter().map(i64::to_string).collect(),
            )
            .await
    }

    pub async fn breed_fish(&self, fish1_id: i64, fish2_id: i64) -> Result<OnChainReceipt> {
        validate_id(fish1_id, "Fish")?;
        validate_id(fish2_id, "Fish")?;
        if fish1_id == fish2_id {
            return Err(AppError::validation("A fish cannot breed with itself"));
        }

        let parent1 = self.get_fish_by_id(fish1_id).await?;
        let parent2 = self.get_fish_by_id(fish2_id).await?;

        let tx_hash = self.chain.breed_fish(parent1.id, parent2.id).await?;
        SyncService::new(self.store.clone())
            .record_transaction(
                &tx_hash,
                EntityType::Fish,
                vec![parent1.id.to_string(), parent2.id.to_string()],
            )
            .await
    }
}

fn fish_not_found(id: i64) -> AppError {
    AppError::not_found(format!("Fish with ID {} not found", id))
}
