//! Transaction composer - turns a pending transfer into a submitted transaction

use crate::error::{TransferError, WalletError};
use crate::models::{sol_to_lamports, PendingTransaction};
use crate::network::rpc::Connection;
use crate::wallet::pubkey::{Pubkey, Signature};
use crate::wallet::transaction::{system_transfer, Instruction};
use crate::wallet::WalletProvider;

/// Build the single transfer instruction for `pending`, paid by `from`
pub fn compose_transfer(from: &Pubkey, pending: &PendingTransaction) -> Result<Instruction, TransferError> {
    let to: Pubkey = pending.address.parse()?;
    let lamports = sol_to_lamports(pending.amount)?;
    Ok(system_transfer(from, &to, lamports))
}

/// Compose and submit a transfer through the wallet provider
pub async fn submit_transfer(
    wallet: &dyn WalletProvider,
    connection: &dyn Connection,
    pending: &PendingTransaction,
) -> Result<Signature, TransferError> {
    let from = wallet.public_key().ok_or(WalletError::NotConnected)?;
    let instruction = compose_transfer(&from, pending)?;

    tracing::info!(
        to = %pending.address,
        amount = pending.amount,
        "Submitting transfer"
    );
    let signature = wallet.sign_and_send(&[instruction], connection).await?;
    Ok(signature)
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory collaborators shared by composer, actor and state tests

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::RpcError;
    use crate::network::rpc::Connection;
    use crate::wallet::pubkey::{Hash, Pubkey, Signature};

    /// Connection answering from fixed values and recording submissions
    pub struct FakeConnection {
        pub lamports: u64,
        pub reject_with: Option<String>,
        pub sent: Mutex<Vec<Vec<u8>>>,
    }

    impl FakeConnection {
        pub fn accepting(lamports: u64) -> Self {
            FakeConnection {
                lamports,
                reject_with: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn rejecting(message: &str) -> Self {
            FakeConnection {
                lamports: 0,
                reject_with: Some(message.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    pub const FAKE_SIGNATURE: Signature = Signature::new([42u8; 64]);

    #[async_trait]
    impl Connection for FakeConnection {
        async fn get_balance(&self, _pubkey: &Pubkey) -> Result<u64, RpcError> {
            Ok(self.lamports)
        }

        async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
            Ok(Hash::new([8u8; 32]))
        }

        async fn send_transaction(&self, tx: &[u8]) -> Result<Signature, RpcError> {
            if let Some(message) = &self.reject_with {
                return Err(RpcError::Node {
                    code: -32002,
                    message: message.clone(),
                });
            }
            self.sent.lock().unwrap().push(tx.to_vec());
            Ok(FAKE_SIGNATURE)
        }
    }
}
