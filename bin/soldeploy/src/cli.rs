use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "soldeploy")]
#[command(
    author,
    version,
    about = "Compile a Solidity contract and deploy it to an EVM node"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "SOLDEPLOY_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// Path to a dotenv file to load before reading the configuration.
    ///
    /// Defaults to `.env` in the working directory, when present.
    #[arg(long, env = "SOLDEPLOY_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Path to a Solidity file to deploy instead of the embedded `Counter` contract.
    #[arg(long, env = "SOLDEPLOY_SOURCE", requires = "contract")]
    pub source: Option<PathBuf>,

    /// Name of the contract to deploy from `--source`.
    #[arg(long, env = "SOLDEPLOY_CONTRACT", requires = "source")]
    pub contract: Option<String>,

    /// Path or name of the `solc` executable.
    ///
    /// Overrides the `solc` setting of the configuration.
    #[arg(long, env = "SOLDEPLOY_SOLC")]
    pub solc: Option<String>,

    /// Seconds to wait for the creation transaction to be mined.
    ///
    /// Waits forever when unset.
    #[arg(long, env = "SOLDEPLOY_CONFIRMATION_TIMEOUT")]
    pub confirmation_timeout: Option<u64>,

    /// Increment the deployed counter once and check the stored value.
    ///
    /// Only meaningful for the embedded `Counter` contract.
    #[arg(long, env = "SOLDEPLOY_VERIFY", conflicts_with = "source")]
    pub verify: bool,
}
