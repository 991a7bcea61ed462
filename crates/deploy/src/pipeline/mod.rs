//! The deployment pipeline: compile, submit, confirm.
//!
//! Each step consumes the pipeline and returns it in the next stage, so the
//! order is enforced by the type system. Any failure ends the run.
//!
//! ```no_run
//! use soldeploy_deploy::{ContractSource, DeployConfig, Pipeline, RpcChainClient, Solc};
//!
//! # async fn example() -> Result<(), soldeploy_deploy::DeployError> {
//! let config = DeployConfig::from_env()?;
//! let solc = Solc::new(&config.solc)?;
//! let client = RpcChainClient::from_config(&config);
//!
//! let result = Pipeline::new(&solc, &client, (&config).into())
//!     .run(&ContractSource::counter())
//!     .await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

mod stages;

use std::time::Duration;

use alloy_core::primitives::TxHash;

pub use stages::{Compiled, Confirmed, PipelineStage, Stage, Start, Submitted};

use crate::{
    chain::ChainClient,
    compiler::{CompiledArtifact, SolidityCompiler},
    config::DeployConfig,
    error::DeployError,
    factory::{ContractFactory, DeploymentResult},
    source::ContractSource,
};

/// Knobs of the confirmation wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// How long to wait for the creation to be mined. `None` waits forever.
    pub confirmation_timeout: Option<Duration>,
}

impl From<&DeployConfig> for PipelineOptions {
    fn from(config: &DeployConfig) -> Self {
        Self {
            confirmation_timeout: config.confirmation_timeout,
        }
    }
}

/// A single-shot deployment pipeline in stage `S`.
pub struct Pipeline<'a, K, C, S = Start>
where
    K: SolidityCompiler,
    C: ChainClient,
    S: PipelineStage,
{
    compiler: &'a K,
    client: &'a C,
    options: PipelineOptions,
    state: S,
}

impl<'a, K, C, S> Pipeline<'a, K, C, S>
where
    K: SolidityCompiler,
    C: ChainClient,
    S: PipelineStage,
{
    /// The current stage.
    pub fn stage(&self) -> Stage {
        S::STAGE
    }

    fn advance<N: PipelineStage>(self, state: N) -> Pipeline<'a, K, C, N> {
        tracing::debug!(from = %S::STAGE, to = %N::STAGE, "Pipeline stage transition");
        Pipeline {
            compiler: self.compiler,
            client: self.client,
            options: self.options,
            state,
        }
    }
}

impl<'a, K, C> Pipeline<'a, K, C, Start>
where
    K: SolidityCompiler,
    C: ChainClient,
{
    /// Create a pipeline over a compiler and a chain client.
    pub fn new(compiler: &'a K, client: &'a C, options: PipelineOptions) -> Self {
        Self {
            compiler,
            client,
            options,
            state: Start,
        }
    }

    /// Run all stages and return the deployed contract.
    pub async fn run(self, source: &ContractSource) -> Result<DeploymentResult, DeployError> {
        let result = self.compile(source)?.submit().await?.confirm().await?.finish();

        tracing::info!(
            contract_address = %result.contract_address,
            transaction_hash = %result.transaction_hash,
            "Deployment complete"
        );

        Ok(result)
    }

    /// Compile `source` and pick its contract.
    pub fn compile(
        self,
        source: &ContractSource,
    ) -> Result<Pipeline<'a, K, C, Compiled>, DeployError> {
        tracing::info!(
            file = %source.file_name,
            contract = %source.contract_name,
            "Compiling contract..."
        );

        let artifact = self.compiler.compile(source).inspect_err(|e| {
            tracing::error!(error = %e, "Contract compilation failed");
        })?;

        tracing::info!(
            abi_items = artifact.abi.items().count(),
            bytecode_len = artifact.bytecode.len(),
            "Contract compiled successfully"
        );

        Ok(self.advance(Compiled { artifact }))
    }
}

impl<'a, K, C> Pipeline<'a, K, C, Compiled>
where
    K: SolidityCompiler,
    C: ChainClient,
{
    /// The compiled artifact.
    pub fn artifact(&self) -> &CompiledArtifact {
        &self.state.artifact
    }

    /// Build the factory and submit the creation transaction.
    pub async fn submit(self) -> Result<Pipeline<'a, K, C, Submitted<'a, C>>, DeployError> {
        tracing::info!("Deploying contract to blockchain...");

        let factory = ContractFactory::new(self.state.artifact.clone(), self.client);
        let pending = factory.deploy().await.inspect_err(|e| {
            tracing::error!(error = %e, "Deployment failed");
        })?;

        Ok(self.advance(Submitted { pending }))
    }
}

impl<'a, K, C> Pipeline<'a, K, C, Submitted<'a, C>>
where
    K: SolidityCompiler,
    C: ChainClient,
{
    /// Hash of the submitted creation transaction.
    pub fn tx_hash(&self) -> TxHash {
        self.state.pending.tx_hash()
    }

    /// Wait for the creation transaction to be mined.
    pub async fn confirm(self) -> Result<Pipeline<'a, K, C, Confirmed>, DeployError> {
        let options = self.options;
        tracing::info!(
            tx_hash = %self.tx_hash(),
            timeout = ?options.confirmation_timeout,
            "Waiting for transaction confirmation..."
        );

        let Pipeline {
            compiler,
            client,
            state,
            ..
        } = self;

        let result = state
            .pending
            .wait(options.confirmation_timeout)
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, "Deployment failed");
            })?;

        tracing::debug!(from = %Stage::Submitted, to = %Stage::Confirmed, "Pipeline stage transition");
        Ok(Pipeline {
            compiler,
            client,
            options,
            state: Confirmed { result },
        })
    }
}

impl<'a, K, C> Pipeline<'a, K, C, Confirmed>
where
    K: SolidityCompiler,
    C: ChainClient,
{
    /// The confirmed deployment.
    pub fn finish(self) -> DeploymentResult {
        self.state.result
    }
}
