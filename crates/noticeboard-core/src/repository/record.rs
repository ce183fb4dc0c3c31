//! Record repository trait definition.

use noticeboard_types::error::RepositoryError;
use noticeboard_types::record::{Record, RecordId};
use noticeboard_types::section::SectionKey;

/// Repository trait for content record persistence.
///
/// Implementations live in noticeboard-infra (e.g., `SqliteRecordRepository`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
///
/// Every call is atomic on its own; there are no cross-record invariants and
/// no multi-call transactions.
pub trait RecordRepository: Send + Sync {
    /// Insert a new record and return its store-assigned id.
    ///
    /// Duplicate bodies within a section are allowed.
    fn append(
        &self,
        section: SectionKey,
        body: &str,
        details: Option<&str>,
    ) -> impl std::future::Future<Output = Result<RecordId, RepositoryError>> + Send;

    /// List a section's records, newest first (`created_at DESC, id DESC`).
    ///
    /// An empty section yields an empty list, not an error.
    fn list(
        &self,
        section: SectionKey,
    ) -> impl std::future::Future<Output = Result<Vec<Record>, RepositoryError>> + Send;

    /// Get a record by id.
    fn get(
        &self,
        id: RecordId,
    ) -> impl std::future::Future<Output = Result<Option<Record>, RepositoryError>> + Send;

    /// Set or clear a record's details.
    ///
    /// No-op if the id is absent; callers check existence with `get` first.
    fn update_details(
        &self,
        id: RecordId,
        details: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Replace a record's body and details. No-op if the id is absent.
    fn replace(
        &self,
        id: RecordId,
        body: &str,
        details: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a record. Deleting an absent id is a no-op.
    fn delete(
        &self,
        id: RecordId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Number of records in a section.
    fn count(
        &self,
        section: SectionKey,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
