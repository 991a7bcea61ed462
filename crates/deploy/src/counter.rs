//! Binding for the embedded `Counter` contract.

use std::time::Duration;

use alloy_core::primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue, sol};

use crate::{
    chain::{ChainClient, TransactionRequest},
    error::DeploymentError,
};

sol! {
    /// Interface of the embedded `Counter` contract.
    interface ICounter {
        event CountIncremented(uint256 newCount);

        function increment() external;

        function getCount() external view returns (uint256);
    }
}

/// A deployed `Counter` instance.
pub struct CounterHandle<'a, C: ChainClient> {
    address: Address,
    client: &'a C,
    timeout: Option<Duration>,
}

impl<'a, C: ChainClient> CounterHandle<'a, C> {
    /// Attach to the counter at `address`.
    pub fn new(address: Address, client: &'a C) -> Self {
        Self {
            address,
            client,
            timeout: None,
        }
    }

    /// Set how long to wait for `increment` transactions to be mined.
    pub fn confirmation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The counter's address.
    pub fn address(&self) -> Address {
        self.address
    }

    fn request<T: SolCall>(&self, call: T) -> TransactionRequest {
        TransactionRequest::default()
            .to(self.address)
            .input(Bytes::from(call.abi_encode()).into())
    }

    /// Send `increment()` and wait for it to be mined.
    ///
    /// Returns the value carried by the `CountIncremented` event, if the receipt has one.
    pub async fn increment(&self) -> Result<Option<U256>, DeploymentError> {
        let tx_hash = self
            .client
            .submit(self.request(ICounter::incrementCall {}))
            .await?;

        let receipt = self.client.wait_for_receipt(tx_hash, self.timeout).await?;
        if !receipt.status() {
            return Err(DeploymentError::Reverted(tx_hash));
        }

        let new_count = receipt
            .inner
            .logs()
            .iter()
            .filter(|log| log.address() == self.address)
            .find_map(|log| log.log_decode::<ICounter::CountIncremented>().ok())
            .map(|event| event.inner.data.newCount);

        tracing::debug!(%tx_hash, ?new_count, "Counter incremented");
        Ok(new_count)
    }

    /// Read the current count.
    pub async fn get_count(&self) -> Result<U256, DeploymentError> {
        let output = self
            .client
            .call(self.request(ICounter::getCountCall {}))
            .await?;
        Ok(U256::abi_decode(&output)?)
    }

    /// Increment once and check that the stored count moved by exactly one and
    /// matches the emitted event. Returns the new count.
    pub async fn verify_increment(&self) -> Result<U256, DeploymentError> {
        let before = self.get_count().await?;
        let emitted = self.increment().await?;
        let after = self.get_count().await?;

        let expected = before + U256::from(1);
        if after != expected {
            return Err(DeploymentError::CounterMismatch {
                expected,
                actual: after,
            });
        }
        if let Some(emitted) = emitted.filter(|emitted| *emitted != after) {
            return Err(DeploymentError::CounterMismatch {
                expected: after,
                actual: emitted,
            });
        }

        tracing::info!(address = %self.address, count = %after, "Counter verified");
        Ok(after)
    }
}
