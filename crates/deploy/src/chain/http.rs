//! [`ChainClient`] over an alloy HTTP provider with a local signer.

use std::time::Duration;

use alloy_core::primitives::{Address, Bytes, TxHash};
use alloy_network::EthereumWallet;
use alloy_provider::{
    DynProvider, PendingTransactionBuilder, PendingTransactionError, Provider, ProviderBuilder,
    WatchTxError,
};
use alloy_signer_local::PrivateKeySigner;
use url::Url;

use super::{ChainClient, TransactionReceipt, TransactionRequest};
use crate::{config::DeployConfig, error::DeploymentError};

/// A JSON-RPC node connection paired with a local private key.
///
/// Construction does no I/O. Chain id, nonce, gas limit and fees are filled
/// by the provider on each submission.
#[derive(Clone)]
pub struct RpcChainClient {
    provider: DynProvider,
    signer: Address,
}

impl RpcChainClient {
    /// Create a client for the node at `url`, signing with `signer`.
    pub fn new(url: Url, signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url);

        Self {
            provider: provider.erased(),
            signer: address,
        }
    }

    /// Create a client from the endpoint, key and poll interval of a [`DeployConfig`].
    pub fn from_config(config: &DeployConfig) -> Self {
        let client = Self::new(config.rpc_url.clone(), config.private_key.clone());
        client.provider.client().set_poll_interval(config.poll_interval);

        tracing::debug!(
            rpc_url = %config.rpc_url,
            signer = %client.signer,
            poll_interval = ?config.poll_interval,
            "Chain client ready"
        );
        client
    }
}

impl std::fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl ChainClient for RpcChainClient {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn submit(&self, request: TransactionRequest) -> Result<TxHash, DeploymentError> {
        let request = request.from(self.signer);
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(DeploymentError::rpc("eth_sendRawTransaction"))?;

        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt, DeploymentError> {
        PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_timeout(timeout)
            .get_receipt()
            .await
            .map_err(|source| match (source, timeout) {
                (PendingTransactionError::TxWatcher(WatchTxError::Timeout), Some(limit)) => {
                    DeploymentError::ConfirmationTimeout(tx_hash, limit)
                }
                (source, _) => DeploymentError::Confirmation { tx_hash, source },
            })
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes, DeploymentError> {
        self.provider
            .call(request.from(self.signer))
            .await
            .map_err(DeploymentError::rpc("eth_call"))
    }
}
