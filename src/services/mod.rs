pub mod decoration_service;
pub mod dojo;
pub mod fish_service;
pub mod player_service;
pub mod sync_service;
pub mod tank_service;
pub mod validation;

pub use decoration_service::DecorationService;
pub use dojo::{ChainClient, DojoClient};
pub use fish_service::FishService;
pub use player_service::PlayerService;
pub use sync_service::SyncService;
pub use tank_service::TankService;
