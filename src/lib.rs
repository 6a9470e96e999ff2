//! # SolFriends TUI
//!
//! A terminal Solana wallet with a local address book.
//!
//! ## Features
//! - Connect a keypair-file wallet
//! - Show the wallet balance in SOL
//! - Keep a list of named friends, persisted as JSON
//! - Send SOL to a friend and get an explorer link back
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime) - wallet provider and RPC node

pub mod constants;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod ui;
pub mod wallet;
pub mod transfer;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Config;
pub use error::{RpcError, StorageError, TransferError, WalletError};
pub use models::{Cluster, Contact, PendingTransaction, TransferOutcome};
pub use storage::{AddressBook, ContactStore, FileContactStore, MemoryContactStore};
pub use wallet::{KeypairWallet, Pubkey, Signature, WalletProvider};
pub use transfer::{compose_transfer, submit_transfer};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor, ViewState};
pub use network::{Connection, NetworkActor, RpcConnection};
