//! Pipeline stage markers for the type-state pattern.
//!
//! The order is fixed: Start -> Compiled -> Submitted -> Confirmed.
//! Each stage carries what the next one needs.

use crate::{
    chain::ChainClient, compiler::CompiledArtifact, factory::DeploymentResult,
    factory::PendingDeployment,
};

/// Name of a pipeline stage, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    Start,
    Compiled,
    Submitted,
    Confirmed,
}

/// Nothing done yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Start;

/// The source compiled successfully.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub(super) artifact: CompiledArtifact,
}

/// The creation transaction was accepted by the node.
pub struct Submitted<'a, C: ChainClient> {
    pub(super) pending: PendingDeployment<'a, C>,
}

/// The creation transaction was mined.
#[derive(Debug, Clone, Copy)]
pub struct Confirmed {
    pub(super) result: DeploymentResult,
}

/// Sealed trait for pipeline stages.
mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Start {}
    impl Sealed for super::Compiled {}
    impl<C: crate::chain::ChainClient> Sealed for super::Submitted<'_, C> {}
    impl Sealed for super::Confirmed {}
}

/// Marker trait for valid pipeline stages.
pub trait PipelineStage: sealed::Sealed {
    const STAGE: Stage;
}

impl PipelineStage for Start {
    const STAGE: Stage = Stage::Start;
}

impl PipelineStage for Compiled {
    const STAGE: Stage = Stage::Compiled;
}

impl<C: ChainClient> PipelineStage for Submitted<'_, C> {
    const STAGE: Stage = Stage::Submitted;
}

impl PipelineStage for Confirmed {
    const STAGE: Stage = Stage::Confirmed;
}
