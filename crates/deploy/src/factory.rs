//! Contract factory: turns a compiled artifact into a deployed contract.

use std::{fmt, time::Duration};

use alloy_network::TransactionBuilder;

use alloy_core::{
    json_abi::JsonAbi,
    primitives::{Address, Bytes, TxHash},
};

use crate::{
    chain::{ChainClient, TransactionRequest},
    compiler::CompiledArtifact,
    error::DeploymentError,
};

/// The outcome of a confirmed deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentResult {
    /// Address of the new contract instance.
    pub contract_address: Address,
    /// Hash of the creation transaction.
    pub transaction_hash: TxHash,
    /// Block the creation was included in, when reported.
    pub block_number: Option<u64>,
}

impl fmt::Display for DeploymentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "contract={} tx={}",
            self.contract_address, self.transaction_hash
        )?;
        if let Some(block) = self.block_number {
            write!(f, " block={}", block)?;
        }
        Ok(())
    }
}

/// A factory bound to an ABI, creation bytecode and the client's signer.
pub struct ContractFactory<'a, C: ChainClient> {
    abi: JsonAbi,
    bytecode: Bytes,
    client: &'a C,
}

impl<'a, C: ChainClient> ContractFactory<'a, C> {
    /// Bind `artifact` to the signer of `client`.
    pub fn new(artifact: CompiledArtifact, client: &'a C) -> Self {
        Self {
            abi: artifact.abi,
            bytecode: artifact.bytecode,
            client,
        }
    }

    /// Sign and broadcast the creation transaction.
    ///
    /// The init code is the bare bytecode, so constructors that take
    /// arguments are rejected before anything is sent.
    pub async fn deploy(&self) -> Result<PendingDeployment<'a, C>, DeploymentError> {
        let arguments = self
            .abi
            .constructor
            .as_ref()
            .map_or(0, |constructor| constructor.inputs.len());
        if arguments > 0 {
            return Err(DeploymentError::UnsupportedConstructor(arguments));
        }

        let request = TransactionRequest::default()
            .into_create()
            .input(self.bytecode.clone().into());
        let tx_hash = self.client.submit(request).await?;

        tracing::info!(
            %tx_hash,
            deployer = %self.client.signer_address(),
            "Creation transaction submitted"
        );

        Ok(PendingDeployment {
            tx_hash,
            client: self.client,
        })
    }
}

/// A creation transaction accepted by the node but not yet confirmed.
pub struct PendingDeployment<'a, C: ChainClient> {
    tx_hash: TxHash,
    client: &'a C,
}

impl<C: ChainClient> PendingDeployment<'_, C> {
    /// Hash of the creation transaction.
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait for the creation to be mined and extract the new contract's address.
    pub async fn wait(self, timeout: Option<Duration>) -> Result<DeploymentResult, DeploymentError> {
        let receipt = self.client.wait_for_receipt(self.tx_hash, timeout).await?;

        if !receipt.status() {
            return Err(DeploymentError::Reverted(receipt.transaction_hash));
        }

        let contract_address = receipt
            .contract_address
            .ok_or(DeploymentError::MissingContractAddress(receipt.transaction_hash))?;

        Ok(DeploymentResult {
            contract_address,
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }
}
