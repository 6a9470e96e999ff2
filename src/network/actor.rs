//! Network actor - runs wallet and RPC calls in Tokio async runtime

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::rpc::Connection;
use crate::transfer::submit_transfer;
use crate::wallet::WalletProvider;

/// Network actor that talks to the wallet provider and the cluster node
pub struct NetworkActor {
    wallet: Arc<dyn WalletProvider>,
    connection: Arc<dyn Connection>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        connection: Arc<dyn Connection>,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Self {
        NetworkActor {
            wallet,
            connection,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Connect { id }) => {
                            let wallet = self.wallet.clone();
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                let response = match wallet.connect().await {
                                    Ok(pubkey) => {
                                        tracing::info!(id, %pubkey, "Wallet connected");
                                        NetworkResponse::Connected { id, pubkey }
                                    }
                                    Err(e) => {
                                        tracing::error!(id, error = %e, "Wallet connect failed");
                                        NetworkResponse::ConnectFailed { id, error: e.to_string() }
                                    }
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Disconnect) => {
                            self.wallet.disconnect();
                        }

                        Some(NetworkCommand::FetchBalance { id, pubkey }) => {
                            let connection = self.connection.clone();
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                let response = match connection.get_balance(&pubkey).await {
                                    Ok(lamports) => {
                                        tracing::info!(id, %pubkey, lamports, "Balance fetched");
                                        NetworkResponse::Balance { id, lamports }
                                    }
                                    Err(e) => {
                                        tracing::error!(id, %pubkey, error = %e, "Balance fetch failed");
                                        NetworkResponse::BalanceFailed { id, error: e.to_string() }
                                    }
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::SubmitTransfer { id, pending }) => {
                            let wallet = self.wallet.clone();
                            let connection = self.connection.clone();
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                let result = submit_transfer(wallet.as_ref(), connection.as_ref(), &pending).await;
                                let response = match result {
                                    Ok(signature) => {
                                        tracing::info!(id, %signature, "Transfer confirmed");
                                        NetworkResponse::TransferConfirmed { id, signature }
                                    }
                                    Err(e) => {
                                        tracing::error!(id, to = %pending.address, error = %e, "Transfer failed");
                                        NetworkResponse::TransferFailed { id, error: e.to_string() }
                                    }
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {
                    // Task completed - responses are sent by the tasks themselves
                }
            }
        }
    }
}
