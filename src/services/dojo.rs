//! Dojo contract client.
//!
//! Every call is a stub until the contracts are deployed: invokes return a random
//! Starknet-shaped transaction hash, reads return fixed mock payloads, and nothing
//! touches the network. A real client must map chain failures to
//! [`AppError::OnChain`](crate::error::AppError::OnChain).

use async_trait::async_trait;
use rand::RngCore;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    config::Config,
    constants::{STUB_FAMILY_TREE_GENERATIONS, STUB_XP_MULTIPLIER},
    error::Result,
    models::{DecorationKind, FishFamilyMember, FishFamilyTree},
};

#[async_trait]
pub trait ChainClient: Send + Sync {
    // Player
    async fn register_player(&self, address: &str) -> Result<String>;
    async fn gain_player_xp(&self, address: &str, amount: u64) -> Result<String>;

    // Fish
    async fn mint_fish(&self, address: &str) -> Result<String>;
    async fn feed_fish_batch(&self, fish_ids: &[i64]) -> Result<String>;
    async fn gain_fish_xp(&self, fish_id: i64, amount: u64) -> Result<String>;
    async fn breed_fish(&self, fish1_id: i64, fish2_id: i64) -> Result<String>;
    async fn get_fish_family_tree(&self, fish_id: i64) -> Result<FishFamilyTree>;

    // Tank
    async fn mint_tank(&self, address: &str) -> Result<String>;
    async fn get_xp_multiplier(&self, tank_id: i64) -> Result<f64>;

    // Decoration
    async fn mint_decoration(&self, address: &str, kind: DecorationKind) -> Result<String>;
    async fn activate_decoration(&self, id: i64) -> Result<String>;
    async fn deactivate_decoration(&self, id: i64) -> Result<String>;
}

pub struct DojoClient {
    account_configured: bool,
    initialized: AtomicBool,
}

impl DojoClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            account_configured: config.has_dojo_account(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Idempotent. Always succeeds in stub mode.
    pub fn initialize(&self) -> bool {
        if self.initialized.swap(true, Ordering::SeqCst) {
            tracing::debug!("Dojo client already initialized");
            return true;
        }

        if !self.account_configured {
            tracing::warn!("Dojo client not configured - DOJO_ACCOUNT_ADDRESS or DOJO_PRIVATE_KEY missing");
            tracing::warn!("Running in stub mode - all contract calls will return mock data");
            return true;
        }

        tracing::info!("Dojo client initialized (stub mode)");
        true
    }

    pub fn is_ready(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
}

/// `0x` followed by 64 lowercase hex digits.
pub fn generate_mock_tx_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Two generations: the fish itself and its two parents, which have no recorded parents.
pub fn mock_family_tree(fish_id: i64) -> FishFamilyTree {
    let parent1 = fish_id.saturating_add(100);
    let parent2 = fish_id.saturating_add(101);
    FishFamilyTree {
        fish_id,
        ancestors: vec![
            FishFamilyMember {
                id: fish_id,
                parent1_id: Some(parent1),
                parent2_id: Some(parent2),
                generation: 0,
            },
            FishFamilyMember {
                id: parent1,
                parent1_id: None,
                parent2_id: None,
                generation: 1,
            },
            FishFamilyMember {
                id: parent2,
                parent1_id: None,
                parent2_id: None,
                generation: 1,
            },
        ],
        generation_count: STUB_FAMILY_TREE_GENERATIONS,
    }
}

#[async_trait]
impl ChainClient for DojoClient {
    async fn register_player(&self, address: &str) -> Result<String> {
        tracing::debug!("[STUB] register_player called with address: {}", address);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!("Player registered (stub): {}, tx: {}", address, tx_hash);
        Ok(tx_hash)
    }

    async fn gain_player_xp(&self, address: &str, amount: u64) -> Result<String> {
        tracing::debug!("[STUB] gain_player_xp called - address: {}, amount: {}", address, amount);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!("Player XP gained (stub): {} +{}, tx: {}", address, amount, tx_hash);
        Ok(tx_hash)
    }

    async fn mint_fish(&self, address: &str) -> Result<String> {
        tracing::debug!("[STUB] mint_fish called with address: {}", address);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!("Fish minted (stub): owner={}, tx: {}", address, tx_hash);
        Ok(tx_hash)
    }

    async fn feed_fish_batch(&self, fish_ids: &[i64]) -> Result<String> {
        tracing::debug!("[STUB] feed_fish_batch called with fish_ids: {:?}", fish_ids);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!("Fish fed (stub): {} fish, tx: {}", fish_ids.len(), tx_hash);
        Ok(tx_hash)
    }

    async fn gain_fish_xp(&self, fish_id: i64, amount: u64) -> Result<String> {
        tracing::debug!("[STUB] gain_fish_xp called - fish: {}, amount: {}", fish_id, amount);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!("Fish XP gained (stub): fish={} +{}, tx: {}", fish_id, amount, tx_hash);
        Ok(tx_hash)
    }

    async fn breed_fish(&self, fish1_id: i64, fish2_id: i64) -> Result<String> {
        tracing::debug!("[STUB] breed_fish called - fish1: {}, fish2: {}", fish1_id, fish2_id);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!("Fish bred (stub): parents={},{}, tx: {}", fish1_id, fish2_id, tx_hash);
        Ok(tx_hash)
    }

    async fn get_fish_family_tree(&self, fish_id: i64) -> Result<FishFamilyTree> {
        tracing::debug!("[STUB] get_fish_family_tree called with fish_id: {}", fish_id);
        let tree = mock_family_tree(fish_id);
        tracing::info!(
            "Fish family tree retrieved (stub): fish={}, generations={}",
            fish_id,
            tree.generation_count
        );
        Ok(tree)
    }

    async fn mint_tank(&self, address: &str) -> Result<String> {
        tracing::debug!("[STUB] mint_tank called with address: {}", address);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!("Tank minted (stub): owner={}, tx: {}", address, tx_hash);
        Ok(tx_hash)
    }

    async fn get_xp_multiplier(&self, tank_id: i64) -> Result<f64> {
        tracing::debug!("[STUB] get_xp_multiplier called with tank_id: {}", tank_id);
        tracing::info!(
            "XP multiplier retrieved (stub): tank={}, multiplier={}",
            tank_id,
            STUB_XP_MULTIPLIER
        );
        Ok(STUB_XP_MULTIPLIER)
    }

    async fn mint_decoration(&self, address: &str, kind: DecorationKind) -> Result<String> {
        tracing::debug!("[STUB] mint_decoration called - address: {}, kind: {}", address, kind);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!(
            "Decoration minted (stub): owner={}, kind={}, tx: {}",
            address,
            kind,
            tx_hash
        );
        Ok(tx_hash)
    }

    async fn activate_decoration(&self, id: i64) -> Result<String> {
        tracing::debug!("[STUB] activate_decoration called with id: {}", id);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!("Decoration activated (stub): id={}, tx: {}", id, tx_hash);
        Ok(tx_hash)
    }

    async fn deactivate_decoration(&self, id: i64) -> Result<String> {
        tracing::debug!("[STUB] deactivate_decoration called with id: {}", id);
        let tx_hash = generate_mock_tx_hash();
        tracing::info!("Decoration deactivated (stub): id={}, tx: {}", id, tx_hash);
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn is_tx_hash(value: &str) -> bool {
        value.len() == 66
            && value.starts_with("0x")
            && value[2..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn mock_tx_hashes_are_well_formed_and_distinct() {
        let a = generate_mock_tx_hash();
        let b = generate_mock_tx_hash();
        assert!(is_tx_hash(&a));
        assert!(is_tx_hash(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn initialize_is_idempotent() {
        let client = DojoClient::from_config(&test_config("postgres://localhost/aqua"));
        assert!(!client.is_ready());
        assert!(client.initialize());
        assert!(client.initialize());
        assert!(client.is_ready());
    }

    #[test]
    fn family_tree_has_two_generations() {
        let tree = mock_family_tree(7);
        assert_eq!(tree.fish_id, 7);
        assert_eq!(tree.generation_count, 2);
        assert_eq!(tree.ancestors.len(), 3);
        assert_eq!(tree.ancestors[0].parent1_id, Some(107));
        assert_eq!(tree.ancestors[0].parent2_id, Some(108));
        assert!(tree.ancestors[1..]
            .iter()
            .all(|m| m.generation == 1 && m.parent1_id.is_none()));
    }

    #[test]
    fn family_tree_near_the_id_limit_does_not_overflow() {
        let tree = mock_family_tree(i64::MAX);
        assert_eq!(tree.ancestors[0].parent1_id, Some(i64::MAX));
        assert_eq!(tree.ancestors[0].parent2_id, Some(i64::MAX));
        assert_eq!(tree.ancestors.len(), 3);
    }

    #[tokio::test]
    async fn stub_calls_never_fail() {
        let client = DojoClient::from_config(&test_config("postgres://localhost/aqua"));
        let tx = client.feed_fish_batch(&[1, 2, 3]).await.unwrap();
        assert!(is_tx_hash(&tx));
        assert_eq!(client.get_xp_multiplier(1).await.unwrap(), STUB_XP_MULTIPLIER);
        let tx = client
            .mint_decoration("0x1", DecorationKind::Plant)
            .await
            .unwrap();
        assert!(is_tx_hash(&tx));
        assert!(is_tx_hash(&client.gain_player_xp("0x1", 10).await.unwrap()));
        assert!(is_tx_hash(&client.gain_fish_xp(3, 5).await.unwrap()));
    }
}
