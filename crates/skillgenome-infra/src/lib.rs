//! Infrastructure layer for SkillGenome.
//!
//! Contains the filesystem implementation of the `SnapshotRepository` port
//! defined in `skillgenome-core`, plus config loading and data directory
//! resolution for hosts.

pub mod config;
pub mod filesystem;
