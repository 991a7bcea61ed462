//! Solidity sources fed to the compiler.

use std::path::Path;

use crate::error::CompilationError;

/// File name of the embedded counter contract.
pub const COUNTER_FILE_NAME: &str = "Counter.sol";

/// Name of the embedded counter contract.
pub const COUNTER_CONTRACT_NAME: &str = "Counter";

/// The embedded counter contract.
pub const COUNTER_SOURCE: &str = r#"
pragma solidity ^0.8.0;

contract Counter {
    uint256 private count;

    event CountIncremented(uint256 newCount);

    function increment() public {
        count += 1;
        emit CountIncremented(count);
    }

    function getCount() public view returns (uint256) {
        return count;
    }
}
"#;

/// A single Solidity file and the contract to deploy from it.
///
/// `file_name` and `contract_name` together form the lookup key into the
/// compiler output, so they must match the source exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSource {
    /// Key of the file in the compiler input, e.g. `Counter.sol`.
    pub file_name: String,
    /// The contract to pick from the compiled file.
    pub contract_name: String,
    /// Solidity source text.
    pub content: String,
}

impl ContractSource {
    /// Create a new source from its parts.
    pub fn new(
        file_name: impl Into<String>,
        contract_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            contract_name: contract_name.into(),
            content: content.into(),
        }
    }

    /// The embedded `Counter` contract.
    pub fn counter() -> Self {
        Self::new(COUNTER_FILE_NAME, COUNTER_CONTRACT_NAME, COUNTER_SOURCE)
    }

    /// Read a source file from disk. The file name becomes the lookup key.
    pub fn from_path(
        path: impl AsRef<Path>,
        contract_name: impl Into<String>,
    ) -> Result<Self, CompilationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CompilationError::Source {
            path: path.display().to_string(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(file_name, contract_name, content))
    }
}

impl Default for ContractSource {
    fn default() -> Self {
        Self::counter()
    }
}
