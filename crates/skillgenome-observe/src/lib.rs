//! Observability setup for SkillGenome hosts.

pub mod tracing_setup;
