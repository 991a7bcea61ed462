//! The `solc --standard-json` input.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::source::ContractSource;

/// Wildcard matching every file or every contract in an output selection.
const WILDCARD: &str = "*";

/// The `solc --standard-json` input.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// The input language.
    pub language: Language,
    /// The source files, keyed by file name.
    pub sources: BTreeMap<String, Source>,
    /// The compiler settings.
    pub settings: Settings,
}

/// The input language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Language {
    Solidity,
}

/// A source file passed inline.
#[derive(Debug, Clone, Serialize)]
pub struct Source {
    /// The source code.
    pub content: String,
}

/// The compiler settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Per-file, per-contract output selection.
    pub output_selection: BTreeMap<String, BTreeMap<String, Vec<SelectionFlag>>>,
}

/// A requested compiler output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SelectionFlag {
    /// The contract ABI.
    #[serde(rename = "abi")]
    Abi,
    /// The creation bytecode.
    #[serde(rename = "evm.bytecode")]
    Bytecode,
}

impl Settings {
    /// Select the ABI and creation bytecode of every contract in every file.
    pub fn abi_and_bytecode() -> Self {
        let per_contract = BTreeMap::from([(
            WILDCARD.to_string(),
            vec![SelectionFlag::Abi, SelectionFlag::Bytecode],
        )]);

        Self {
            output_selection: BTreeMap::from([(WILDCARD.to_string(), per_contract)]),
        }
    }
}

impl Input {
    /// Build the input for a single Solidity file.
    pub fn from_source(source: &ContractSource) -> Self {
        Self {
            language: Language::Solidity,
            sources: BTreeMap::from([(
                source.file_name.clone(),
                Source {
                    content: source.content.clone(),
                },
            )]),
            settings: Settings::abi_and_bytecode(),
        }
    }
}
