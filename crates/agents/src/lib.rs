//! TaskHive agent tree.
//!
//! Provides the [`AgentFactory`] that turns the `[agents]` configuration and
//! the populated [`models::ModelRegistry`] into a fixed tree: one
//! [`CoordinatorAgent`] at the root with named [`SpecialistAgent`] children
//! (analysis, browser automation, research).
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Agents sequence model calls through the
//! [`hive::ModelClient`] port and delegate through the [`hive::Agent`] port.
//! They contain no transport details.

pub mod coordinator;
pub mod errors;
pub mod factory;
pub mod specialist;
#[cfg(test)]
mod test_support;

pub use coordinator::{parse_decision, CoordinatorAgent, Decision};
pub use errors::AgentBuildError;
pub use factory::AgentFactory;
pub use specialist::SpecialistAgent;
