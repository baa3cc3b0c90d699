//! Filesystem adapters for SkillGenome.
//!
//! Implements the `SnapshotRepository` trait from `skillgenome-core` as one
//! pretty-printed JSON file per session under `{root}/sessions/`.

use std::path::{Path, PathBuf};

use skillgenome_core::repository::SnapshotRepository;
use skillgenome_types::error::RepositoryError;
use skillgenome_types::snapshot::SessionRecord;

const SESSIONS_DIR: &str = "sessions";
const EXTENSION: &str = "json";

/// Session store backed by `tokio::fs`.
#[derive(Debug, Clone)]
pub struct FsSnapshotRepository {
    root: PathBuf,
}

impl FsSnapshotRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compute the sessions directory: `{root}/sessions/`.
    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join(SESSIONS_DIR)
    }

    /// Compute the file path for a session, validating its name.
    pub fn session_path(&self, name: &str) -> Result<PathBuf, RepositoryError> {
        validate_name(name)?;
        Ok(self.sessions_dir().join(format!("{name}.{EXTENSION}")))
    }
}

/// Session names map straight onto file names, so only `[A-Za-z0-9_-]+` is
/// allowed.
pub fn validate_name(name: &str) -> Result<(), RepositoryError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidName(name.to_string()))
    }
}

impl SnapshotRepository for FsSnapshotRepository {
    async fn save(&self, name: &str, record: &SessionRecord) -> Result<(), RepositoryError> {
        let path = self.session_path(name)?;
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tokio::fs::create_dir_all(self.sessions_dir()).await?;
        // Atomic replace via a sibling temp file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(session = name, path = %path.display(), "session saved");
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<Option<SessionRecord>, RepositoryError> {
        let path = self.session_path(name)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let record = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::Serialization(format!("{}: {e}", path.display()))
        })?;
        Ok(Some(record))
    }

    async fn list(&self) -> Result<Vec<String>, RepositoryError> {
        let mut entries = match tokio::fs::read_dir(self.sessions_dir()).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, RepositoryError> {
        let path = self.session_path(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(session = name, "session deleted");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `SKILLGENOME_DATA_DIR` environment variable
/// 2. `~/.skillgenome`
/// 3. `./.skillgenome`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SKILLGENOME_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".skillgenome");
    }

    PathBuf::from(".skillgenome")
}
