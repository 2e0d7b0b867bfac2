//! # Payment Intent Repository
//!
//! Gateway hand-off records. An intent is created when a hosted checkout is
//! issued and resolved exactly once when the gateway calls back; resolution
//! is guarded by a conditional update on `state = 'pending'` so a duplicate
//! callback cannot apply the same payment twice.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vantage_core::{IntentState, PaymentIntent};

const SELECT_COLUMNS: &str = r#"
    SELECT reference, sale_id, amount_cents, email, metadata, state,
           created_at, resolved_at
    FROM payment_intents
"#;

/// Repository for gateway payment intents.
#[derive(Debug, Clone)]
pub struct PaymentIntentRepository {
    pool: SqlitePool,
}

impl PaymentIntentRepository {
    /// Creates a new PaymentIntentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentIntentRepository { pool }
    }

    /// Inserts a pending intent.
    pub async fn insert(&self, intent: &PaymentIntent) -> DbResult<()> {
        debug!(reference = %intent.reference, sale_id = %intent.sale_id, "Inserting payment intent");

        sqlx::query(
            r#"
            INSERT INTO payment_intents (
                reference, sale_id, amount_cents, email, metadata, state, created_at, resolved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&intent.reference)
        .bind(&intent.sale_id)
        .bind(intent.amount_cents)
        .bind(&intent.email)
        .bind(&intent.metadata)
        .bind(intent.state)
        .bind(intent.created_at)
        .bind(intent.resolved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an intent by its gateway reference.
    pub async fn get_by_reference(&self, reference: &str) -> DbResult<Option<PaymentIntent>> {
        let intent =
            sqlx::query_as::<_, PaymentIntent>(&format!("{SELECT_COLUMNS} WHERE reference = ?1"))
                .bind(reference)
                .fetch_optional(&self.pool)
                .await?;

        Ok(intent)
    }

    /// Lists the intents issued for a sale, newest first.
    pub async fn list_for_sale(&self, sale_id: &str) -> DbResult<Vec<PaymentIntent>> {
        let intents = sqlx::query_as::<_, PaymentIntent>(&format!(
            "{SELECT_COLUMNS} WHERE sale_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(intents)
    }

    /// Moves a pending intent to `applied` or `failed`.
    ///
    /// Conditioned on the intent still being pending; a second callback for
    /// the same reference gets [`DbError::VersionConflict`].
    pub async fn resolve(&self, reference: &str, state: IntentState) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE payment_intents SET
                state = ?2,
                resolved_at = ?3
            WHERE reference = ?1 AND state = 'pending'
            "#,
        )
        .bind(reference)
        .bind(state)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::version_conflict("PaymentIntent", reference));
        }

        Ok(())
    }
}
