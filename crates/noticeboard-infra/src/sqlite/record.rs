//! SQLite record repository implementation.
//!
//! Implements `RecordRepository` from `noticeboard-core` using sqlx with split
//! read/write pools. Timestamps are stored as RFC 3339 text with microsecond
//! precision and a `Z` suffix, so lexical order in SQL matches time order.

use chrono::{DateTime, SecondsFormat, Utc};
use noticeboard_core::repository::record::RecordRepository;
use noticeboard_types::error::RepositoryError;
use noticeboard_types::record::{Record, RecordId};
use noticeboard_types::section::SectionKey;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `RecordRepository`.
pub struct SqliteRecordRepository {
    pool: DatabasePool,
}

impl SqliteRecordRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct RecordRow {
    id: i64,
    section: String,
    body: String,
    details: Option<String>,
    created_at: String,
}

impl RecordRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            section: row.try_get("section")?,
            body: row.try_get("body")?,
            details: row.try_get("details")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<Record, RepositoryError> {
        let section: SectionKey = self
            .section
            .parse()
            .map_err(RepositoryError::Query)?;

        Ok(Record {
            id: RecordId(self.id),
            section,
            body: self.body,
            details: self.details,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// RecordRepository implementation
// ---------------------------------------------------------------------------

impl RecordRepository for SqliteRecordRepository {
    async fn append(
        &self,
        section: SectionKey,
        body: &str,
        details: Option<&str>,
    ) -> Result<RecordId, RepositoryError> {
        let now = format_datetime(&Utc::now());

        let result = sqlx::query(
            "INSERT INTO records (section, body, details, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(section.as_str())
        .bind(body)
        .bind(details)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(RecordId(result.last_insert_rowid()))
    }

    async fn list(&self, section: SectionKey) -> Result<Vec<Record>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM records WHERE section = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(section.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let record_row =
                RecordRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            records.push(record_row.into_record()?);
        }

        Ok(records)
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM records WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let record_row =
                    RecordRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(record_row.into_record()?))
            }
            None => Ok(None),
        }
    }

    async fn update_details(
        &self,
        id: RecordId,
        details: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE records SET details = ? WHERE id = ?")
            .bind(details)
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(())
    }

    async fn replace(
        &self,
        id: RecordId,
        body: &str,
        details: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE records SET body = ?, details = ? WHERE id = ?")
            .bind(body)
            .bind(details)
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(())
    }

    async fn delete(&self, id: RecordId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM records WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(())
    }

    async fn count(&self, section: SectionKey) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE section = ?")
            .bind(section.as_str())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = crate::sqlite::pool::database_url(dir.path());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn insert_at(
        pool: &DatabasePool,
        section: SectionKey,
        body: &str,
        created_at: DateTime<Utc>,
    ) -> RecordId {
        let result =
            sqlx::query("INSERT INTO records (section, body, created_at) VALUES (?, ?, ?)")
                .bind(section.as_str())
                .bind(body)
                .bind(format_datetime(&created_at))
                .execute(&pool.writer)
                .await
                .unwrap();
        RecordId(result.last_insert_rowid())
    }

    #[tokio::test]
    async fn test_append_and_get() {
        let repo = SqliteRecordRepository::new(test_pool().await);

        let id = repo
            .append(SectionKey::Films, "Friday screening", Some("Room 2"))
            .await
            .unwrap();
        let record = repo.get(id).await.unwrap().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.section, SectionKey::Films);
        assert_eq!(record.body, "Friday screening");
        assert_eq!(record.details.as_deref(), Some("Room 2"));
    }

    #[tokio::test]
    async fn test_ids_increase_across_sections() {
        let repo = SqliteRecordRepository::new(test_pool().await);

        let a = repo.append(SectionKey::Films, "a", None).await.unwrap();
        let b = repo.append(SectionKey::Edu, "b", None).await.unwrap();
        let c = repo.append(SectionKey::Films, "a", None).await.unwrap();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = SqliteRecordRepository::new(test_pool().await);

        let a = repo.append(SectionKey::Films, "a", None).await.unwrap();
        let b = repo.append(SectionKey::Films, "b", None).await.unwrap();
        repo.delete(b).await.unwrap();
        let c = repo.append(SectionKey::Films, "c", None).await.unwrap();
        assert!(c > b && b > a);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let pool = test_pool().await;
        let r1 = insert_at(
            &pool,
            SectionKey::Lectures,
            "R1",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .await;
        let r2 = insert_at(
            &pool,
            SectionKey::Lectures,
            "R2",
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        )
        .await;
        insert_at(
            &pool,
            SectionKey::Films,
            "other",
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        )
        .await;
        let repo = SqliteRecordRepository::new(pool);

        let ids: Vec<RecordId> = repo
            .list(SectionKey::Lectures)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![r2, r1]);
    }

    #[tokio::test]
    async fn test_list_ties_broken_by_id() {
        let pool = test_pool().await;
        let at = Utc.with_ymd_and_hms(2024, 5, 5, 12, 0, 0).unwrap();
        let first = insert_at(&pool, SectionKey::Conf, "first", at).await;
        let second = insert_at(&pool, SectionKey::Conf, "second", at).await;
        let repo = SqliteRecordRepository::new(pool);

        let ids: Vec<RecordId> = repo
            .list(SectionKey::Conf)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_list_empty_section() {
        let repo = SqliteRecordRepository::new(test_pool().await);
        assert!(repo.list(SectionKey::Projects).await.unwrap().is_empty());
        assert_eq!(repo.count(SectionKey::Projects).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_body_is_stored() {
        let repo = SqliteRecordRepository::new(test_pool().await);
        let id = repo.append(SectionKey::Library, "", None).await.unwrap();
        assert_eq!(repo.get(id).await.unwrap().unwrap().body, "");
    }

    #[tokio::test]
    async fn test_update_details_set_and_clear() {
        let repo = SqliteRecordRepository::new(test_pool().await);
        let id = repo.append(SectionKey::Edu, "Course", Some("foo")).await.unwrap();

        repo.update_details(id, Some("bar")).await.unwrap();
        assert_eq!(
            repo.get(id).await.unwrap().unwrap().details.as_deref(),
            Some("bar")
        );

        repo.update_details(id, None).await.unwrap();
        assert!(repo.get(id).await.unwrap().unwrap().details.is_none());
    }

    #[tokio::test]
    async fn test_replace() {
        let repo = SqliteRecordRepository::new(test_pool().await);
        let id = repo.append(SectionKey::Edu, "Old", Some("d")).await.unwrap();
        let before = repo.get(id).await.unwrap().unwrap();

        repo.replace(id, "New", None).await.unwrap();
        let after = repo.get(id).await.unwrap().unwrap();
        assert_eq!(after.body, "New");
        assert!(after.details.is_none());
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_missing_ids_are_noops() {
        let repo = SqliteRecordRepository::new(test_pool().await);

        assert!(repo.get(RecordId(404)).await.unwrap().is_none());
        repo.update_details(RecordId(404), Some("x")).await.unwrap();
        repo.replace(RecordId(404), "x", None).await.unwrap();
        repo.delete(RecordId(404)).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = SqliteRecordRepository::new(test_pool().await);
        let id = repo.append(SectionKey::Groups, "x", None).await.unwrap();

        repo.delete(id).await.unwrap();
        repo.delete(id).await.unwrap();
        assert!(repo.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count() {
        let repo = SqliteRecordRepository::new(test_pool().await);
        repo.append(SectionKey::Groups, "a", None).await.unwrap();
        repo.append(SectionKey::Groups, "a", None).await.unwrap();
        repo.append(SectionKey::Films, "b", None).await.unwrap();

        assert_eq!(repo.count(SectionKey::Groups).await.unwrap(), 2);
        assert_eq!(repo.count(SectionKey::Films).await.unwrap(), 1);
    }

    #[test]
    fn test_datetime_roundtrip_precision() {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 8, 30, 0).unwrap();
        let text = format_datetime(&at);
        assert_eq!(text, "2024-02-01T08:30:00.000000Z");
        assert_eq!(parse_datetime(&text).unwrap(), at);
    }
}
