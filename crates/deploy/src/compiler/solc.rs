//! The `solc` executable.

use std::{
    io::Write,
    path::PathBuf,
    process::{Command, Stdio},
};

use super::{
    CompiledArtifact, SolidityCompiler,
    standard_json::{Input, Output},
};
use crate::{error::CompilationError, source::ContractSource};

/// A `solc` executable driven through `--standard-json`.
#[derive(Debug, Clone)]
pub struct Solc {
    /// The executable name as given by the user.
    executable: String,
    /// The resolved executable path.
    path: PathBuf,
}

impl Solc {
    /// Resolve `executable` in `$PATH` (or as a path).
    pub fn new(executable: impl Into<String>) -> Result<Self, CompilationError> {
        let executable = executable.into();
        let path = which::which(&executable).map_err(|e| CompilationError::ExecutableNotFound {
            executable: executable.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { executable, path })
    }

    /// The resolved executable path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// The version line reported by `solc --version`.
    pub fn version(&self) -> Result<String, CompilationError> {
        let output = Command::new(&self.path)
            .arg("--version")
            .output()
            .map_err(|source| self.process_error(source))?;

        if !output.status.success() {
            return Err(self.status_error(output.status, &output.stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .find(|line| line.starts_with("Version:"))
            .map(|line| line.trim_start_matches("Version:").trim().to_string())
            .unwrap_or_else(|| stdout.trim().to_string()))
    }

    /// Run the compiler on a standard JSON input.
    pub fn standard_json(&self, input: &Input) -> Result<Output, CompilationError> {
        let input_json = serde_json::to_vec(input)?;

        let mut process = Command::new(&self.path)
            .arg("--standard-json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.process_error(source))?;

        // Dropping stdin closes the pipe so solc sees EOF.
        if let Some(mut stdin) = process.stdin.take() {
            stdin
                .write_all(&input_json)
                .map_err(|source| self.process_error(source))?;
        }

        let output = process
            .wait_with_output()
            .map_err(|source| self.process_error(source))?;

        if !output.status.success() {
            return Err(self.status_error(output.status, &output.stderr));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn process_error(&self, source: std::io::Error) -> CompilationError {
        CompilationError::Process {
            executable: self.executable.clone(),
            source,
        }
    }

    fn status_error(&self, status: std::process::ExitStatus, stderr: &[u8]) -> CompilationError {
        CompilationError::ExitStatus {
            executable: self.executable.clone(),
            status,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}

impl SolidityCompiler for Solc {
    fn compile(&self, source: &ContractSource) -> Result<CompiledArtifact, CompilationError> {
        tracing::debug!(
            solc = %self.path.display(),
            file = %source.file_name,
            contract = %source.contract_name,
            "Running solc --standard-json"
        );

        let output = self.standard_json(&Input::from_source(source))?;
        output.into_artifact(&source.file_name, &source.contract_name)
    }
}
