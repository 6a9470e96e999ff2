//! Network messages - communication between App and Network layers

use crate::models::PendingTransaction;
use crate::wallet::pubkey::{Pubkey, Signature};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Ask the wallet provider for its identity
    Connect { id: u64 },
    /// Forget the wallet identity
    Disconnect,
    /// Fetch the raw balance of a wallet
    FetchBalance { id: u64, pubkey: Pubkey },
    /// Compose, sign and submit a transfer
    SubmitTransfer { id: u64, pending: PendingTransaction },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Connected { id: u64, pubkey: Pubkey },
    ConnectFailed { id: u64, error: String },
    /// Raw balance in lamports
    Balance { id: u64, lamports: u64 },
    BalanceFailed { id: u64, error: String },
    TransferConfirmed { id: u64, signature: Signature },
    TransferFailed { id: u64, error: String },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Connected { id, .. } => *id,
            NetworkResponse::ConnectFailed { id, .. } => *id,
            NetworkResponse::Balance { id, .. } => *id,
            NetworkResponse::BalanceFailed { id, .. } => *id,
            NetworkResponse::TransferConfirmed { id, .. } => *id,
            NetworkResponse::TransferFailed { id, .. } => *id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            NetworkResponse::ConnectFailed { .. }
                | NetworkResponse::BalanceFailed { .. }
                | NetworkResponse::TransferFailed { .. }
        )
    }
}
