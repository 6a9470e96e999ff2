//! Keypair-file wallet provider

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use ed25519_dalek::SigningKey;

use crate::error::WalletError;
use crate::network::rpc::Connection;
use crate::wallet::pubkey::{Pubkey, Signature};
use crate::wallet::transaction::{Instruction, Message, Transaction};
use crate::wallet::WalletProvider;

/// Where the signing key comes from
enum KeySource {
    /// Solana CLI keypair file: JSON array of 64 bytes (secret ++ public)
    File(PathBuf),
    /// Key held in memory
    Memory(SigningKey),
}

/// Wallet backed by a local ed25519 keypair
pub struct KeypairWallet {
    source: KeySource,
    signer: RwLock<Option<SigningKey>>,
}

impl KeypairWallet {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        KeypairWallet {
            source: KeySource::File(path.into()),
            signer: RwLock::new(None),
        }
    }

    pub fn from_signing_key(key: SigningKey) -> Self {
        KeypairWallet {
            source: KeySource::Memory(key),
            signer: RwLock::new(None),
        }
    }

    fn current_signer(&self) -> Option<SigningKey> {
        self.signer.read().ok().and_then(|guard| guard.clone())
    }
}

/// Parse Solana CLI keypair JSON
pub fn parse_keypair_json(content: &str) -> Result<SigningKey, WalletError> {
    let bytes: Vec<u8> = serde_json::from_str(content)
        .map_err(|e| WalletError::InvalidKeypair(format!("not a JSON byte array: {}", e)))?;
    let array: [u8; 64] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| WalletError::InvalidKeypair(format!("expected 64 bytes, got {}", bytes.len())))?;
    SigningKey::from_keypair_bytes(&array)
        .map_err(|e| WalletError::InvalidKeypair(e.to_string()))
}

async fn read_keypair_file(path: &Path) -> Result<SigningKey, WalletError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| WalletError::KeypairRead {
            path: path.display().to_string(),
            source,
        })?;
    parse_keypair_json(&content)
}

#[async_trait]
impl WalletProvider for KeypairWallet {
    async fn connect(&self) -> Result<Pubkey, WalletError> {
        let key = match &self.source {
            KeySource::File(path) => {
                tracing::info!(path = %path.display(), "Loading keypair");
                read_keypair_file(path).await?
            }
            KeySource::Memory(key) => key.clone(),
        };
        let pubkey = Pubkey::new(key.verifying_key().to_bytes());

        if let Ok(mut guard) = self.signer.write() {
            *guard = Some(key);
        }
        Ok(pubkey)
    }

    fn disconnect(&self) {
        if let Ok(mut guard) = self.signer.write() {
            *guard = None;
        }
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.current_signer()
            .map(|key| Pubkey::new(key.verifying_key().to_bytes()))
    }

    async fn sign_and_send(
        &self,
        instructions: &[Instruction],
        connection: &dyn Connection,
    ) -> Result<Signature, WalletError> {
        let signer = self.current_signer().ok_or(WalletError::NotConnected)?;
        let payer = Pubkey::new(signer.verifying_key().to_bytes());

        let blockhash = connection.get_latest_blockhash().await?;
        let message = Message::new(instructions, &payer, blockhash);
        let tx = Transaction::new_signed(message, &signer);

        let signature = connection.send_transaction(&tx.serialize()).await?;
        tracing::debug!(%signature, local = ?tx.signature(), "Transaction accepted by node");
        Ok(signature)
    }
}
