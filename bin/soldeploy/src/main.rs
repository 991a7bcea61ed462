//! soldeploy compiles a Solidity contract and deploys it to an EVM node.

mod cli;

use std::{ffi::OsString, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};
use figment::Figment;

use cli::Cli;
use soldeploy_deploy::{
    ChainClient, CompilationError, ContractSource, CounterHandle, DeployConfig, DeploymentResult,
    Pipeline, RpcChainClient, Solc, SolidityCompiler,
};

/// Environment variable naming the dotenv file, mirrored by `--env-file`.
const ENV_FILE_ENV: &str = "SOLDEPLOY_ENV_FILE";

#[tokio::main]
async fn main() -> Result<()> {
    // The dotenv file may carry SOLDEPLOY_* values, so it is loaded before clap reads them.
    let env_file = env_file_arg(std::env::args_os())
        .or_else(|| std::env::var_os(ENV_FILE_ENV).map(PathBuf::from));
    load_env_file(env_file)?;

    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    run(
        cli,
        DeployConfig::figment(),
        |config| open_solc(&config.solc),
        RpcChainClient::from_config,
    )
    .await?;

    Ok(())
}

/// Validate the configuration, then compile, deploy and optionally verify.
///
/// Nothing is built before the configuration is valid: the compiler and the
/// chain client are only created through `make_compiler` and `make_client`
/// once it is.
async fn run<K, C, FK, FC>(
    cli: Cli,
    figment: Figment,
    make_compiler: FK,
    make_client: FC,
) -> Result<DeploymentResult>
where
    K: SolidityCompiler,
    C: ChainClient,
    FK: FnOnce(&DeployConfig) -> Result<K, CompilationError>,
    FC: FnOnce(&DeployConfig) -> C,
{
    let mut figment = figment;
    if let Some(solc) = &cli.solc {
        figment = figment.merge(("solc", solc));
    }
    if let Some(secs) = cli.confirmation_timeout {
        figment = figment.merge(("confirmation_timeout", secs));
    }
    let config = DeployConfig::from_figment(&figment).context("Invalid configuration")?;
    tracing::debug!(env_file = ?cli.env_file, ?config, "Configuration loaded");

    let source = match (&cli.source, cli.contract) {
        (Some(path), Some(contract)) => ContractSource::from_path(path, contract)?,
        _ => ContractSource::counter(),
    };

    let compiler = make_compiler(&config)?;
    let client = make_client(&config);

    let result = Pipeline::new(&compiler, &client, (&config).into())
        .run(&source)
        .await
        .context("Deployment pipeline failed")?;

    println!("{}", summary(&source, &result));

    if cli.verify {
        let counter = CounterHandle::new(result.contract_address, &client)
            .confirmation_timeout(config.confirmation_timeout);
        let count = counter
            .verify_increment()
            .await
            .context("Counter verification failed")?;
        println!("Counter verified: getCount() = {count}");
    }

    Ok(result)
}

/// Resolve the compiler. An unreadable version is only worth a warning.
fn open_solc(executable: &str) -> Result<Solc, CompilationError> {
    let solc = Solc::new(executable)?;
    match solc.version() {
        Ok(version) => {
            tracing::info!(solc = %solc.path().display(), %version, "Using Solidity compiler");
        }
        Err(e) => {
            tracing::warn!(solc = %solc.path().display(), error = %e, "Could not read compiler version");
        }
    }
    Ok(solc)
}

/// Find `--env-file <path>` or `--env-file=<path>` ahead of full argument parsing.
fn env_file_arg(args: impl IntoIterator<Item = OsString>) -> Option<PathBuf> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--" {
            break;
        }
        if arg == "--env-file" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.to_str().and_then(|a| a.strip_prefix("--env-file=")) {
            return Some(PathBuf::from(path));
        }
    }
    None
}

/// Load an explicit dotenv file, or `.env` when one exists.
fn load_env_file(path: Option<PathBuf>) -> Result<()> {
    match path {
        Some(path) => dotenvy::from_path(&path)
            .with_context(|| format!("Failed to load env file {}", path.display())),
        None => ignore_missing(dotenvy::dotenv()),
    }
}

/// A missing file is fine. A file that exists but does not parse is not.
fn ignore_missing<T>(result: dotenvy::Result<T>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env"),
    }
}

fn summary(source: &ContractSource, result: &DeploymentResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Contract".to_string(), source.contract_name.clone()]);
    table.add_row(vec![
        "Contract address".to_string(),
        result.contract_address.to_string(),
    ]);
    table.add_row(vec![
        "Transaction hash".to_string(),
        result.transaction_hash.to_string(),
    ]);
    if let Some(block) = result.block_number {
        table.add_row(vec!["Block".to_string(), block.to_string()]);
    }
    table
}
