use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    db::Store,
    error::{AppError, Result},
    models::{EntityType, Fish, FishSummary, OnChainReceipt, Tank, TankDetails, TankOverview},
    services::{
        dojo::ChainClient,
        player_service::player_not_found,
        sync_service::SyncService,
        validation::{validate_address, validate_id},
    },
};

pub struct TankService {
    store: Arc<dyn Store>,
    chain: Arc<dyn ChainClient>,
}

impl TankService {
    pub fn new(store: Arc<dyn Store>, chain: Arc<dyn ChainClient>) -> Self {
        Self { store, chain }
    }

    /// The tank plus a summary of every fish its owner holds (off-chain data only).
    /// `fish` is empty, never absent, when the owner has no fish.
    pub async fn get_tank_by_id(&self, id: i64) -> Result<TankDetails> {
        let tank = self.find_tank(id).await?;

        let fish = self
            .store
            .list_fish_by_owner(&tank.owner)
            .await?
            .into_iter()
            .map(|row| FishSummary::from(Fish::from(row)))
            .collect();

        Ok(TankDetails { tank, fish })
    }

    pub async fn get_tanks_by_owner(&self, address: &str) -> Result<Vec<TankOverview>> {
        let owner = validate_address(address)?;

        let tanks: Vec<Tank> = self
            .store
            .list_tanks_by_owner(&owner)
            .await?
            .into_iter()
            .map(Tank::from)
            .collect();
        if tanks.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = tanks.iter().map(|t| t.id).collect();
        let counts: HashMap<i64, i64> = self
            .store
            .count_fish_per_tank(&ids)
            .await?
            .into_iter()
            .collect();

        Ok(tanks
            .into_iter()
            .map(|tank| {
                let fish_count = counts.get(&tank.id).copied().unwrap_or(0);
                TankOverview::new(tank, fish_count)
            })
            .collect())
    }

    pub async fn get_xp_multiplier(&self, id: i64) -> Result<f64> {
        let tank = self.find_tank(id).await?;
        self.chain.get_xp_multiplier(tank.id).await
    }

    pub async fn mint_tank(&self, address: &str) -> Result<OnChainReceipt> {
        let owner = validate_address(address)?;
        if self.store.find_player(&owner).await?.is_none() {
            return Err(player_not_found(&owner));
        }

        let tx_hash = self.chain.mint_tank(&owner).await?;
        SyncService::new(self.store.clone())
            .record_transaction(&tx_hash, EntityType::Tank, vec![owner])
            .await
    }

    async fn find_tank(&self, id: i64) -> Result<Tank> {
        let id = validate_id(id, "Tank")?;
        self.store
            .find_tank(id)
            .await?
            .map(Tank::from)
            .ok_or_else(|| AppError::not_found(format!("Tank with ID {} not found", id)))
    }
}
