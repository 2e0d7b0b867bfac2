//! # Activity Log Repository
//!
//! Append-only activity entries. Writes here are best-effort by contract:
//! the engine swallows failures so a logging hiccup never fails the primary
//! operation.

use sqlx::SqlitePool;

use crate::error::DbResult;
use vantage_core::ActivityLog;

/// Repository for the activity log.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: SqlitePool,
}

impl ActivityLogRepository {
    /// Creates a new ActivityLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ActivityLogRepository { pool }
    }

    /// Appends an activity entry.
    pub async fn append(&self, entry: &ActivityLog) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_log (id, business_id, employee_id, action, details, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.business_id)
        .bind(&entry.employee_id)
        .bind(&entry.action)
        .bind(&entry.details)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists a business's activity, newest first, up to `limit` entries.
    pub async fn list_for_business(
        &self,
        business_id: &str,
        limit: i64,
    ) -> DbResult<Vec<ActivityLog>> {
        let entries = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, business_id, employee_id, action, details, created_at
            FROM activity_log
            WHERE business_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
