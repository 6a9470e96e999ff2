//! Application constants
//!
//! Centralized location for network constants and configuration defaults.

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Fixed storage key for the persisted address book
pub const FRIENDS_KEY: &str = "friends";

/// Base URL of the public block explorer
pub const EXPLORER_TX_URL: &str = "https://explorer.solana.com/tx";

/// Name of the directory (under home) holding config, friends and logs
pub const APP_DIR: &str = ".solfriends";

/// Config file name inside the app directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Log file name inside the app directory
pub const LOG_FILE: &str = "solfriends.log";

/// Entries kept in the in-session activity log
pub const MAX_ACTIVITY: usize = 50;

/// HTTP timeout for RPC calls, in seconds
pub const RPC_TIMEOUT_SECS: u64 = 30;

/// Application name
pub const APP_NAME: &str = "SolFriends";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
