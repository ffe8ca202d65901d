//! High-level operations.
//!
//! This module contains the implementation of acme-build commands.

pub mod build;
pub mod stage;

pub use build::{build, resolve_config, BuildOptions, BuildOutcome};
pub use stage::{stage, StagingPlan, StagingReport};
