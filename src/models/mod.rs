// src/models/mod.rs
pub mod decoration;
pub mod fish;
pub mod player;
pub mod sync;
pub mod tank;

pub use decoration::{Decoration, DecorationKind, DecorationRow, MintDecorationRequest};
pub use fish::{
    BreedFishRequest, FeedFishRequest, Fish, FishFamilyMember, FishFamilyTree, FishRow,
    FishSummary,
};
pub use player::{AddressRequest, Player, PlayerRow};
pub use sync::{
    EntityType, NewSyncItem, OnChainReceipt, SyncItemUpdate, SyncQueueItem, SyncQueueRow, SyncStatus,
};
pub use tank::{Tank, TankDetails, TankOverview, TankRow};
