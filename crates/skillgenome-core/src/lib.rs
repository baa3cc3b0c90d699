//! Skill dependency graph engine for SkillGenome.
//!
//! - `graph` -- the `SkillGraph` DAG engine (build, queries, snapshot)
//! - `payload` -- classification of raw generation output
//! - `quiz` -- mastery-check grading
//! - `session` -- a learner's role, graph, and active quiz
//! - `repository` -- storage port for session records
//!
//! Depends only on `skillgenome-types`; no I/O happens here.

pub mod graph;
pub mod payload;
pub mod quiz;
pub mod repository;
pub mod session;

pub use graph::{EngineState, SkillGraph};
pub use session::LearningSession;
