//! Application state shared by every command handler.
//!
//! AppState pins the session store to the filesystem implementation and
//! carries the loaded config and the selected session name.

use std::path::PathBuf;

use anyhow::Context;

use skillgenome_core::LearningSession;
use skillgenome_core::repository::SnapshotRepository;
use skillgenome_infra::filesystem::{FsSnapshotRepository, validate_name};
use skillgenome_types::config::GenomeConfig;

pub struct AppState {
    pub data_dir: PathBuf,
    pub config: GenomeConfig,
    pub repo: FsSnapshotRepository,
    pub session_name: String,
}

impl AppState {
    /// Ensure the data directory exists and wire the session store.
    pub async fn init(
        data_dir: PathBuf,
        config: GenomeConfig,
        session_name: &str,
    ) -> anyhow::Result<Self> {
        validate_name(session_name)?;
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        Ok(Self {
            repo: FsSnapshotRepository::new(&data_dir),
            data_dir,
            config,
            session_name: session_name.to_string(),
        })
    }

    /// Load the selected session, or start an empty one if none is stored.
    pub async fn load_session(&self) -> anyhow::Result<LearningSession> {
        match self.repo.load(&self.session_name).await? {
            Some(record) => LearningSession::restore(record, self.config.clone())
                .with_context(|| format!("Session '{}' is corrupt", self.session_name)),
            None => {
                tracing::debug!(session = %self.session_name, "starting new session");
                Ok(LearningSession::new("", self.config.clone()))
            }
        }
    }

    pub async fn save_session(&self, session: &LearningSession) -> anyhow::Result<()> {
        self.repo
            .save(&self.session_name, &session.record())
            .await
            .with_context(|| format!("Failed to save session '{}'", self.session_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgenome_types::payload::{EdgeSpec, GraphDescription, NodeSpec};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_session_starts_empty() {
        let dir = tempdir().unwrap();
        let state = AppState::init(dir.path().to_path_buf(), GenomeConfig::default(), "default")
            .await
            .unwrap();
        let session = state.load_session().await.unwrap();
        assert!(session.graph().is_empty());
        assert_eq!(session.role(), "");
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let dir = tempdir().unwrap();
        let state = AppState::init(dir.path().to_path_buf(), GenomeConfig::default(), "work")
            .await
            .unwrap();

        let mut session = LearningSession::new("SRE", GenomeConfig::default());
        session
            .regenerate(GraphDescription {
                nodes: vec![NodeSpec::new("Linux"), NodeSpec::new("Kubernetes")],
                edges: vec![EdgeSpec::new("Linux", "Kubernetes")],
            })
            .unwrap();
        session.graph_mut().mark_completed("Linux").unwrap();
        state.save_session(&session).await.unwrap();

        let loaded = state.load_session().await.unwrap();
        assert_eq!(loaded.role(), "SRE");
        assert_eq!(loaded.graph().progress().completed, 1);
        assert_eq!(loaded.graph().frontier(), vec!["Kubernetes"]);
    }

    #[tokio::test]
    async fn test_invalid_session_name_rejected() {
        let dir = tempdir().unwrap();
        let result =
            AppState::init(dir.path().to_path_buf(), GenomeConfig::default(), "../x").await;
        assert!(result.is_err());
    }
}
