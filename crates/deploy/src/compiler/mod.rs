//! Solidity compilation.
//!
//! The [`SolidityCompiler`] trait is the seam between the deployment pipeline and
//! the compiler. [`Solc`] drives a `solc` executable through its standard JSON
//! interface.

mod solc;
pub mod standard_json;

use alloy_core::{json_abi::JsonAbi, primitives::Bytes};

pub use solc::Solc;

use crate::{error::CompilationError, source::ContractSource};

/// ABI and creation bytecode of one compiled contract.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledArtifact {
    /// The contract interface.
    pub abi: JsonAbi,
    /// The creation bytecode.
    pub bytecode: Bytes,
}

/// A compiler able to turn a [`ContractSource`] into a [`CompiledArtifact`].
pub trait SolidityCompiler {
    /// Compile `source` and extract the artifact of `source.contract_name`.
    fn compile(&self, source: &ContractSource) -> Result<CompiledArtifact, CompilationError>;
}

impl<T: SolidityCompiler + ?Sized> SolidityCompiler for &T {
    fn compile(&self, source: &ContractSource) -> Result<CompiledArtifact, CompilationError> {
        (**self).compile(source)
    }
}
