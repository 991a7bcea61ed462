//! The `solc --standard-json` input and output representations.
//!
//! Only the parts needed to produce an ABI and creation bytecode are modeled.

pub mod input;
pub mod output;

pub use input::{Input, Language, SelectionFlag, Settings, Source};
pub use output::{Bytecode, Contract, Diagnostic, Evm, Output};
