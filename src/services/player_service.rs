use std::sync::Arc;

use crate::{
    db::Store,
    error::{AppError, Result},
    models::{EntityType, OnChainReceipt, Player},
    services::{dojo::ChainClient, sync_service::SyncService, validation::validate_address},
};

pub struct PlayerService {
    store: Arc<dyn Store>,
    chain: Arc<dyn ChainClient>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn Store>, chain: Arc<dyn ChainClient>) -> Self {
        Self { store, chain }
    }

    /// Looks up a player by Starknet address.
    ///
    /// Fails with `Validation` for an empty or malformed address (before touching
    /// the store) and `NotFound` when no player row exists.
    pub async fn get_player_by_address(&self, address: &str) -> Result<Player> {
        let normalized = validate_address(address)?;

        let row = self
            .store
            .find_player(&normalized)
            .await?
            .ok_or_else(|| player_not_found(address))?;

        Ok(Player::from(row))
    }

    /// Submits the on-chain registration and queues it for confirmation. The player
    /// row appears once the registration is confirmed.
    pub async fn register_player(&self, address: &str) -> Result<OnChainReceipt> {
        let normalized = validate_address(address)?;

        if self.store.find_player(&normalized).await?.is_some() {
            return Err(AppError::validation(format!(
                "Player with address {} is already registered",
                normalized
            )));
        }

        let tx_hash = self.chain.register_player(&normalized).await?;
        SyncService::new(self.store.clone())
            .record_transaction(&tx_hash, EntityType::Player, vec![normalized])
            .await
    }
}

pub(crate) fn player_not_found(address: &str) -> AppError {
    AppError::not_found(format!("Player with address {} not found", address))
}
