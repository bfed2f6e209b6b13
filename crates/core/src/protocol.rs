//! Protocol-wide constants shared by the client and server crates (§6).

pub const PROTOCOL_VERSION: u32 = 1;
pub const DEFAULT_PORT: u16 = 27800;
pub const MAX_PLAYERS: u8 = 16;
pub const MAX_NAME_LENGTH: usize = 31;
pub const TICK_RATE: u32 = 20;
pub const KEEPALIVE_INTERVAL_MS: u64 = 1000;
pub const TIMEOUT_MS: u64 = 10_000;
pub const MAX_ENTITIES_PER_ZONE: usize = 512;
pub const MAX_SYNC_ENTITIES: usize = 2048;

pub const CHANNEL_COUNT: usize = 3;
pub const CHANNEL_RELIABLE_ORDERED: u8 = 0;
pub const CHANNEL_RELIABLE_UNORDERED: u8 = 1;
pub const CHANNEL_UNRELIABLE_SEQUENCED: u8 = 2;
