//! # Commission Transaction Repository
//!
//! One row per recorded sale, carrying the frozen commission/house split.
//! Rows are immutable after insert except for the `commission_paid` flag,
//! which the payroll action flips.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vantage_core::Transaction;

const SELECT_COLUMNS: &str = r#"
    SELECT id, business_id, employee_id, service_id, total_cents,
           commission_cents, house_cents, commission_paid, created_at
    FROM transactions
"#;

/// Repository for commission transactions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Inserts a transaction with its frozen split.
    pub async fn insert(&self, transaction: &Transaction) -> DbResult<()> {
        debug!(
            id = %transaction.id,
            employee_id = %transaction.employee_id,
            total = %transaction.total_cents,
            "Inserting transaction"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, business_id, employee_id, service_id,
                total_cents, commission_cents, house_cents,
                commission_paid, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.business_id)
        .bind(&transaction.employee_id)
        .bind(&transaction.service_id)
        .bind(transaction.total_cents)
        .bind(transaction.commission_cents)
        .bind(transaction.house_cents)
        .bind(transaction.commission_paid)
        .bind(transaction.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a transaction by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let transaction =
            sqlx::query_as::<_, Transaction>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(transaction)
    }

    /// Lists a business's transactions, newest first.
    pub async fn list_for_business(&self, business_id: &str) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS} WHERE business_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Lists an employee's transactions, newest first.
    pub async fn list_for_employee(&self, employee_id: &str) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS} WHERE employee_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Marks a transaction's commission as paid out.
    pub async fn mark_commission_paid(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE transactions SET commission_paid = 1 WHERE id = ?1 AND commission_paid = 0",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction (unpaid)", id));
        }

        Ok(())
    }
}
