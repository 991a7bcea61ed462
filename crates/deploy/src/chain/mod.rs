//! Chain access.
//!
//! [`ChainClient`] is everything the deployment needs from a node paired with a
//! signing identity. [`RpcChainClient`] implements it with an alloy provider
//! over HTTP and a local private key.

mod http;

use std::{future::Future, time::Duration};

use alloy_core::primitives::{Address, Bytes, TxHash};
pub use alloy_rpc_types_eth::{TransactionReceipt, TransactionRequest};

pub use http::RpcChainClient;

use crate::error::DeploymentError;

/// A node connection paired with a signing identity.
pub trait ChainClient: Send + Sync {
    /// The address transactions are signed with.
    fn signer_address(&self) -> Address;

    /// Fill, sign and broadcast `request`. Returns once the node accepted it.
    fn submit(
        &self,
        request: TransactionRequest,
    ) -> impl Future<Output = Result<TxHash, DeploymentError>> + Send;

    /// Wait until `tx_hash` is mined and return its receipt.
    ///
    /// With `timeout` set to `None` this waits for as long as it takes. An
    /// elapsed timeout is [`DeploymentError::ConfirmationTimeout`].
    fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<TransactionReceipt, DeploymentError>> + Send;

    /// Execute a read-only call against the latest block.
    fn call(
        &self,
        request: TransactionRequest,
    ) -> impl Future<Output = Result<Bytes, DeploymentError>> + Send;
}
