//! Snapshot repository trait definition (port).
//!
//! Defines how learning sessions are persisted between runs. The
//! infrastructure layer (skillgenome-infra) implements it; the engine itself
//! never touches storage.

use skillgenome_types::error::RepositoryError;
use skillgenome_types::snapshot::SessionRecord;

/// Named storage for session records.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait SnapshotRepository: Send + Sync {
    /// Insert or replace the record stored under `name`.
    fn save(
        &self,
        name: &str,
        record: &SessionRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Load the record stored under `name`, if any.
    fn load(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<SessionRecord>, RepositoryError>> + Send;

    /// Names of all stored records, sorted.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Delete the record stored under `name`. Returns `true` if it existed.
    fn delete(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
