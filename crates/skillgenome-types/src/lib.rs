//! Shared domain types for SkillGenome.
//!
//! Skills, dependencies, generation payloads, graph snapshots, quiz shapes,
//! configuration, and the error taxonomy used across the workspace.
//!
//! No infrastructure dependencies -- only serde, thiserror, schemars.

pub mod config;
pub mod error;
pub mod payload;
pub mod quiz;
pub mod skill;
pub mod snapshot;
