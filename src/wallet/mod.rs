//! Wallet layer - keys, transaction wire format and the provider boundary
//!
//! The App never touches key material. It asks a `WalletProvider` to
//! connect, report its identity, and sign-and-submit instructions over a
//! network `Connection`.

pub mod keypair;
pub mod pubkey;
pub mod transaction;

use async_trait::async_trait;

use crate::error::WalletError;
use crate::network::rpc::Connection;

pub use keypair::KeypairWallet;
pub use pubkey::{Hash, Pubkey, Signature};
pub use transaction::{system_transfer, Instruction, Message, Transaction};

/// Something that holds a signing identity and can submit transactions
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Make the identity available; returns the connected public key
    async fn connect(&self) -> Result<Pubkey, WalletError>;

    /// Forget the identity
    fn disconnect(&self);

    /// Currently connected identity, if any
    fn public_key(&self) -> Option<Pubkey>;

    /// Sign `instructions` with the connected key and submit them.
    /// Returns the confirmation signature reported by the node.
    async fn sign_and_send(
        &self,
        instructions: &[Instruction],
        connection: &dyn Connection,
    ) -> Result<Signature, WalletError>;
}
