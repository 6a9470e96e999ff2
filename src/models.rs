use serde::{Deserialize, Serialize};

use crate::constants::{EXPLORER_TX_URL, LAMPORTS_PER_SOL};
use crate::error::TransferError;
use crate::wallet::pubkey::Signature;

/// Address book entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub address: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Contact {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Transfer built from the form at submit time
#[derive(Clone, Debug, PartialEq)]
pub struct PendingTransaction {
    pub address: String,
    pub amount: f64,
}

/// Solana cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
}

impl Cluster {
    pub fn as_str(&self) -> &str {
        match self {
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Localnet => "localnet",
        }
    }

    /// Default public RPC endpoint
    pub fn rpc_url(&self) -> &str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Explorer link for a confirmed transaction
    pub fn explorer_url(&self, signature: &Signature) -> String {
        match self {
            Cluster::MainnetBeta => format!("{}/{}", EXPLORER_TX_URL, signature),
            Cluster::Localnet => format!("{}/{}?cluster=custom", EXPLORER_TX_URL, signature),
            other => format!("{}/{}?cluster={}", EXPLORER_TX_URL, signature, other.as_str()),
        }
    }
}

/// Convert raw lamports to SOL for display
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Convert a SOL amount to lamports, rounding to the nearest lamport
pub fn sol_to_lamports(amount: f64) -> Result<u64, TransferError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(TransferError::InvalidAmount(amount.to_string()));
    }
    let lamports = (amount * LAMPORTS_PER_SOL as f64).round();
    // u64::MAX as f64 rounds up to 2^64, which is already out of range
    if lamports >= u64::MAX as f64 {
        return Err(TransferError::InvalidAmount(amount.to_string()));
    }
    Ok(lamports as u64)
}

/// Result of a submit attempt, as seen by the App
#[derive(Clone, Debug, PartialEq)]
pub enum TransferOutcome {
    Confirmed(Signature),
    Failed(String),
}

/// In-session activity log entry
#[derive(Clone, Debug)]
pub struct TransferRecord {
    pub recipient: String,
    pub amount: f64,
    pub outcome: TransferOutcome,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(2_000_000_000), 2.0);
        assert_eq!(lamports_to_sol(0), 0.0);
        assert_eq!(lamports_to_sol(1), 0.000_000_001);
    }

    #[test]
    fn test_sol_to_lamports() {
        assert_eq!(sol_to_lamports(1.5).unwrap(), 1_500_000_000);
        assert_eq!(sol_to_lamports(0.1).unwrap(), 100_000_000);
        assert!(sol_to_lamports(-1.0).is_err());
        assert!(sol_to_lamports(f64::NAN).is_err());
        assert!(sol_to_lamports(f64::INFINITY).is_err());
    }

    #[test]
    fn test_sol_to_lamports_rejects_overflow() {
        assert!(matches!(
            sol_to_lamports(u64::MAX as f64 / LAMPORTS_PER_SOL as f64),
            Err(TransferError::InvalidAmount(_))
        ));
        assert!(sol_to_lamports(1e12).is_err());
        assert_eq!(sol_to_lamports(1e9).unwrap(), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_explorer_url() {
        let sig = Signature::new([1u8; 64]);
        let devnet = Cluster::Devnet.explorer_url(&sig);
        assert_eq!(devnet, format!("https://explorer.solana.com/tx/{}?cluster=devnet", sig));
        assert!(!Cluster::MainnetBeta.explorer_url(&sig).contains('?'));
        assert!(Cluster::Localnet.explorer_url(&sig).ends_with("?cluster=custom"));
    }

    #[test]
    fn test_contact_json_shape() {
        let json = serde_json::to_string(&Contact::new("alice", "addr")).unwrap();
        assert_eq!(json, r#"{"name":"alice","address":"addr"}"#);
    }
}
