//! soldeploy-deploy - Compile a Solidity contract and deploy it to an EVM node.
//!
//! The flow is linear: [`DeployConfig`] is loaded and validated, the
//! [`ContractSource`] is compiled by a [`SolidityCompiler`], and a
//! [`ContractFactory`] submits the creation transaction through a
//! [`ChainClient`] and waits for it to be mined. [`Pipeline`] ties these steps
//! together.

pub mod chain;
pub use chain::{ChainClient, RpcChainClient, TransactionReceipt, TransactionRequest};

pub mod compiler;
pub use compiler::{CompiledArtifact, Solc, SolidityCompiler};

mod config;
pub use config::{
    CONFIG_FILENAME, DEFAULT_POLL_INTERVAL, DEFAULT_SOLC, DeployConfig, ENV_PREFIX,
    PRIVATE_KEY_ENV, RPC_URL_ENV,
};

mod counter;
pub use counter::{CounterHandle, ICounter};

mod error;
pub use error::{CompilationError, ConfigError, DeployError, DeploymentError, Result};

mod factory;
pub use factory::{ContractFactory, DeploymentResult, PendingDeployment};

pub mod pipeline;
pub use pipeline::{Pipeline, PipelineOptions};

pub mod rpc;

mod source;
pub use source::{COUNTER_CONTRACT_NAME, COUNTER_FILE_NAME, COUNTER_SOURCE, ContractSource};

#[cfg(test)]
mod testing;
