//! Network layer - wallet and cluster RPC calls
//!
//! The Network actor receives wallet/RPC commands and sends back responses.

pub mod actor;
pub mod rpc;

pub use actor::NetworkActor;
pub use rpc::{Connection, RpcConnection};
