//! Configuration loader for SkillGenome.
//!
//! Reads `skillgenome.toml` from the data directory (`~/.skillgenome/` in
//! production) and deserializes it into [`GenomeConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::Path;

use skillgenome_types::config::{DEFAULT_PASS_THRESHOLD, GenomeConfig};

pub const CONFIG_FILE: &str = "skillgenome.toml";

/// Load configuration from `{data_dir}/skillgenome.toml`.
///
/// - If the file does not exist, returns [`GenomeConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
/// - Otherwise returns the parsed config with its pass threshold normalized.
pub async fn load_config(data_dir: &Path) -> GenomeConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {CONFIG_FILE} found at {}, using defaults", config_path.display());
            return GenomeConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GenomeConfig::default();
        }
    };

    match toml::from_str::<GenomeConfig>(&content) {
        Ok(mut config) => {
            config.grading.pass_threshold = normalize_threshold(config.grading.pass_threshold);
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GenomeConfig::default()
        }
    }
}

/// Keep the pass threshold inside `(0.0, 1.0]`.
///
/// Values above 1.0 are capped; zero, negative, and non-finite values fall
/// back to the default.
pub fn normalize_threshold(threshold: f64) -> f64 {
    if !threshold.is_finite() || threshold <= 0.0 {
        tracing::warn!(threshold, "pass_threshold out of range, using {DEFAULT_PASS_THRESHOLD}");
        return DEFAULT_PASS_THRESHOLD;
    }
    if threshold > 1.0 {
        tracing::warn!(threshold, "pass_threshold above 1.0, capping");
        return 1.0;
    }
    threshold
}
