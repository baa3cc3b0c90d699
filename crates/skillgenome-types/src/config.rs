//! Global configuration types for SkillGenome.
//!
//! `GenomeConfig` represents the `skillgenome.toml` file that controls quiz
//! grading, rebuild behavior, and telemetry. Every field has a default.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenomeConfig {
    #[serde(default)]
    pub grading: GradingConfig,

    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Mastery-check grading rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Minimum `score / total` for a pass.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,

    #[serde(default = "default_pass_feedback")]
    pub pass_feedback: String,

    #[serde(default = "default_fail_feedback")]
    pub fail_feedback: String,
}

pub const DEFAULT_PASS_THRESHOLD: f64 = 0.7;

fn default_pass_threshold() -> f64 {
    DEFAULT_PASS_THRESHOLD
}

fn default_pass_feedback() -> String {
    "Great job!".to_string()
}

fn default_fail_feedback() -> String {
    "You need to review these concepts.".to_string()
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            pass_feedback: default_pass_feedback(),
            fail_feedback: default_fail_feedback(),
        }
    }
}

/// Graph lifecycle settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub rebuild_policy: RebuildPolicy,
}

/// What happens to completion progress when the graph is rebuilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildPolicy {
    /// Discard all progress; every rebuilt skill starts pending.
    #[default]
    Fresh,
    /// Keep `completed` for skill ids present before and after the rebuild.
    PreserveProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Export spans to OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = GenomeConfig::default();
        assert!((config.grading.pass_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.grading.pass_feedback, "Great job!");
        assert_eq!(config.graph.rebuild_policy, RebuildPolicy::Fresh);
        assert!(!config.telemetry.otel);
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: GenomeConfig = toml::from_str("").unwrap();
        assert_eq!(config, GenomeConfig::default());
    }

    #[test]
    fn test_deserialize_with_values() {
        let toml_str = r#"
[grading]
pass_threshold = 0.8
fail_feedback = "Try again."

[graph]
rebuild_policy = "preserve_progress"

[telemetry]
otel = true
"#;
        let config: GenomeConfig = toml::from_str(toml_str).unwrap();
        assert!((config.grading.pass_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.grading.pass_feedback, "Great job!");
        assert_eq!(config.grading.fail_feedback, "Try again.");
        assert_eq!(config.graph.rebuild_policy, RebuildPolicy::PreserveProgress);
        assert!(config.telemetry.otel);
    }
}
