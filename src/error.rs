//! Error types for storage, wallet, RPC and transfer operations

use thiserror::Error;

/// Address book persistence failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt address book: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failures talking to the RPC node
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Node error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Wallet provider failures
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Cannot read keypair file {path}: {source}")]
    KeypairRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

/// Transfer composition and submission failures
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(#[from] ParsePubkeyError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

/// Base58 public key / hash parse failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePubkeyError {
    #[error("not valid base58")]
    InvalidBase58,

    #[error("expected 32 bytes, got {0}")]
    WrongLength(usize),
}

/// Base58 signature parse failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSignatureError {
    #[error("not valid base58")]
    InvalidBase58,

    #[error("expected 64 bytes, got {0}")]
    WrongLength(usize),
}

impl From<ParseSignatureError> for RpcError {
    fn from(err: ParseSignatureError) -> Self {
        RpcError::MalformedResponse(format!("signature: {}", err))
    }
}

impl From<ParsePubkeyError> for RpcError {
    fn from(err: ParsePubkeyError) -> Self {
        RpcError::MalformedResponse(format!("hash: {}", err))
    }
}
