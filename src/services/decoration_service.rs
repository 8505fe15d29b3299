use std::sync::Arc;

use crate::{
    db::Store,
    error::{AppError, Result},
    models::{Decoration, DecorationKind, EntityType, OnChainReceipt},
    services::{
        dojo::ChainClient,
        player_service::player_not_found,
        sync_service::SyncService,
        validation::{validate_address, validate_id},
    },
};

pub struct DecorationService {
    store: Arc<dyn Store>,
    chain: Arc<dyn ChainClient>,
}

impl DecorationService {
    pub fn new(store: Arc<dyn Store>, chain: Arc<dyn ChainClient>) -> Self {
        Self { store, chain }
    }

    pub async fn get_decoration_by_id(&self, id: i64) -> Result<Decoration> {
        let id = validate_id(id, "Decoration")?;
        let row = self
            .store
            .find_decoration(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Decoration with ID {} not found", id)))?;
        Decoration::try_from(row)
    }

    pub async fn get_decorations_by_owner(&self, address: &str) -> Result<Vec<Decoration>> {
        let owner = validate_address(address)?;
        self.store
            .list_decorations_by_owner(&owner)
            .await?
            .into_iter()
            .map(Decoration::try_from)
            .collect()
    }

    pub async fn mint_decoration(&self, address: &str, kind: &str) -> Result<OnChainReceipt> {
        let owner = validate_address(address)?;
        let kind: DecorationKind = kind.parse()?;
        if self.store.find_player(&owner).await?.is_none() {
            return Err(player_not_found(&owner));
        }

        let tx_hash = self.chain.mint_decoration(&owner, kind).await?;
        SyncService::new(self.store.clone())
            .record_transaction(&tx_hash, EntityType::Decoration, vec![owner])
            .await
    }

    pub async fn activate_decoration(&self, id: i64) -> Result<OnChainReceipt> {
        self.set_active(id, true).await
    }

    pub async fn deactivate_decoration(&self, id: i64) -> Result<OnChainReceipt> {
        self.set_active(id, false).await
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<OnChainReceipt> {
        let decoration = self.get_decoration_by_id(id).await?;
        if decoration.is_active == active {
            let state = if active { "active" } else { "inactive" };
            return Err(AppError::validation(format!(
                "Decoration {} is already {}",
                decoration.id, state
            )));
        }

        let tx_hash = if active {
            self.chain.activate_decoration(decoration.id).await?
        } else {
            self.chain.deactivate_decoration(decoration.id).await?
        };
        SyncService::new(self.store.clone())
            .record_transaction(
                &tx_hash,
                EntityType::Decoration,
                vec![decoration.id.to_string()],
            )
            .await
    }
}
