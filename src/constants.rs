/// Application constants

pub const API_NAME: &str = "Aqua Stark Backend API";
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation successful";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unexpected error occurred";

// Game constants
pub const MAX_TANK_CAPACITY: i32 = 50;
pub const XP_MULTIPLIER: f64 = 1.0;

// Starknet addresses are felts: 0x + up to 64 hex digits, usually left-padded to 63 or 64.
pub const ADDRESS_MIN_HEX_LEN: usize = 63;
pub const ADDRESS_MAX_HEX_LEN: usize = 64;
pub const TX_HASH_MAX_HEX_LEN: usize = 64;

pub const MAX_FEED_BATCH: usize = 50;

// Stub chain payloads
pub const STUB_XP_MULTIPLIER: f64 = 1.25;
pub const STUB_FAMILY_TREE_GENERATIONS: u32 = 2;
