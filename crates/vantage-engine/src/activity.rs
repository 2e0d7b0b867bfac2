//! # Activity Recorder
//!
//! Best-effort activity logging. An entry is written only after the primary
//! operation is durably committed, and a failed write is logged and
//! swallowed — it never rolls back or fails the operation that produced it.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use vantage_core::{ActivityAction, ActivityLog};
use vantage_db::Database;

/// Fire-and-forget writer for the activity log.
#[derive(Debug, Clone)]
pub struct ActivityRecorder {
    db: Database,
}

impl ActivityRecorder {
    /// Creates a new ActivityRecorder.
    pub fn new(db: Database) -> Self {
        ActivityRecorder { db }
    }

    /// Appends an entry, swallowing persistence failures.
    pub async fn record(
        &self,
        business_id: &str,
        employee_id: Option<&str>,
        action: ActivityAction,
        details: String,
    ) {
        let entry = ActivityLog {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            employee_id: employee_id.map(str::to_string),
            action: action.as_str().to_string(),
            details,
            created_at: Utc::now(),
        };

        if let Err(err) = self.db.activity().append(&entry).await {
            warn!(
                action = action.as_str(),
                business_id, %err,
                "Activity log write dropped"
            );
        }
    }

    /// Recent activity for a business, newest first.
    pub async fn recent(
        &self,
        business_id: &str,
        limit: i64,
    ) -> Result<Vec<ActivityLog>, vantage_db::DbError> {
        self.db.activity().list_for_business(business_id, limit).await
    }
}
