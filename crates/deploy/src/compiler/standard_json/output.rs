//! The `solc --standard-json` output.

use std::collections::BTreeMap;

use alloy_core::{
    json_abi::JsonAbi,
    primitives::{Bytes, hex},
};
use serde::Deserialize;

use crate::{compiler::CompiledArtifact, error::CompilationError};

/// The `solc --standard-json` output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Output {
    /// The file-contract map. Absent when compilation failed.
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, Contract>>,
    /// The compilation errors and warnings.
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
}

/// A single compiled contract.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contract {
    /// The contract ABI.
    #[serde(default)]
    pub abi: Option<JsonAbi>,
    /// EVM outputs.
    #[serde(default)]
    pub evm: Option<Evm>,
}

/// The EVM outputs of a contract.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Evm {
    /// Creation bytecode.
    #[serde(default)]
    pub bytecode: Option<Bytecode>,
}

/// A bytecode object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bytecode {
    /// Hex-encoded bytecode, without `0x` prefix. May contain unlinked library placeholders.
    pub object: String,
}

/// A compiler error or warning.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// `error`, `warning` or `info`.
    pub severity: String,
    /// The short message.
    pub message: String,
    /// The message with source location, when available.
    #[serde(default)]
    pub formatted_message: Option<String>,
    /// The diagnostic category, e.g. `ParserError`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Diagnostic {
    /// Whether the diagnostic fails the compilation.
    pub fn is_error(&self) -> bool {
        self.severity == "error"
    }

    /// The most descriptive message available.
    pub fn text(&self) -> &str {
        self.formatted_message.as_deref().unwrap_or(&self.message)
    }
}

impl Output {
    /// Extract the artifact of `contract` declared in `file`.
    ///
    /// Fails when the compiler reported any error, even if the requested contract is present.
    pub fn into_artifact(
        mut self,
        file: &str,
        contract: &str,
    ) -> Result<CompiledArtifact, CompilationError> {
        let mut errors = Vec::new();
        for diagnostic in &self.errors {
            if diagnostic.is_error() {
                errors.push(diagnostic.text().trim_end().to_string());
            } else {
                tracing::warn!(
                    severity = %diagnostic.severity,
                    kind = diagnostic.kind.as_deref().unwrap_or("unknown"),
                    message = %diagnostic.message,
                    "Compiler diagnostic"
                );
            }
        }
        if !errors.is_empty() {
            return Err(CompilationError::Diagnostics(errors));
        }

        let compiled = self
            .contracts
            .get_mut(file)
            .and_then(|contracts| contracts.remove(contract))
            .ok_or_else(|| CompilationError::ContractNotFound {
                file: file.to_string(),
                contract: contract.to_string(),
            })?;

        let abi = compiled
            .abi
            .ok_or_else(|| CompilationError::MissingAbi(contract.to_string()))?;

        let object = compiled
            .evm
            .and_then(|evm| evm.bytecode)
            .map(|bytecode| bytecode.object)
            .unwrap_or_default();
        if object.is_empty() {
            return Err(CompilationError::EmptyBytecode(contract.to_string()));
        }

        let bytecode = hex::decode(&object).map_err(|e| CompilationError::InvalidBytecode {
            contract: contract.to_string(),
            reason: e.to_string(),
        })?;

        Ok(CompiledArtifact {
            abi,
            bytecode: Bytes::from(bytecode),
        })
    }
}
