//! Error types returned by the deployment library.
//!
//! Every failure is fatal for a run. The library hands the tagged error back to
//! its caller and never terminates the process itself.

use std::time::Duration;

use alloy_core::primitives::{TxHash, U256};
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportError;

/// Convenience alias for results carrying a [`DeployError`].
pub type Result<T, E = DeployError> = std::result::Result<T, E>;

/// Top-level error of a deployment run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("compilation error: {0}")]
    Compilation(#[from] CompilationError),

    #[error("deployment error: {0}")]
    Deployment(#[from] DeploymentError),
}

/// Missing or malformed settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Extract(Box::new(error))
    }
}

/// Failures of the compiler adapter.
#[derive(Debug, thiserror::Error)]
pub enum CompilationError {
    #[error("the `{executable}` executable not found in $PATH: {reason}")]
    ExecutableNotFound { executable: String, reason: String },

    #[error("failed to run `{executable}`: {source}")]
    Process {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{executable}` exited with {status}: {stderr}")]
    ExitStatus {
        executable: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("failed to parse compiler output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("compiler reported errors:\n{}", .0.join("\n"))]
    Diagnostics(Vec<String>),

    #[error("contract `{contract}` not found in `{file}`")]
    ContractNotFound { file: String, contract: String },

    #[error("contract `{0}` has no ABI in the compiler output")]
    MissingAbi(String),

    #[error("contract `{0}` has no bytecode")]
    EmptyBytecode(String),

    #[error("contract `{contract}` has invalid bytecode: {reason}")]
    InvalidBytecode { contract: String, reason: String },

    #[error("failed to read source `{path}`: {source}")]
    Source {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while talking to the chain.
#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("{method} failed: {source}")]
    Rpc {
        method: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("failed to watch transaction {tx_hash}: {source}")]
    Confirmation {
        tx_hash: TxHash,
        #[source]
        source: PendingTransactionError,
    },

    #[error("transaction {0} was not confirmed within {1:?}")]
    ConfirmationTimeout(TxHash, Duration),

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("receipt for {0} carries no contract address")]
    MissingContractAddress(TxHash),

    #[error("constructor takes {0} argument(s), only argument-less constructors are supported")]
    UnsupportedConstructor(usize),

    #[error("failed to decode call result: {0}")]
    Decode(#[from] alloy_sol_types::Error),

    #[error("counter mismatch: expected {expected}, got {actual}")]
    CounterMismatch { expected: U256, actual: U256 },

    #[error("{name} not ready after {timeout:?}")]
    NotReady { name: String, timeout: Duration },
}

impl DeploymentError {
    pub(crate) fn rpc(method: &'static str) -> impl FnOnce(TransportError) -> Self {
        move |source| Self::Rpc { method, source }
    }
}
