//! # Ledger Sale Repository
//!
//! Database operations for ledger sales, their line items, and payments.
//!
//! ## Payment Application
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 record_payment(payment, update, version)                │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT INTO payments (...)                                           │
//! │    UPDATE sales SET paid/balance/status, row_version = row_version + 1  │
//! │          WHERE id = ?  AND row_version = <version the caller read>      │
//! │    rows_affected == 0 ?  ──► ROLLBACK, VersionConflict                  │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The payment row and the sale update are one unit: either both are      │
//! │  durable or neither is. A concurrent payment that bumped row_version    │
//! │  between the caller's read and this write fails the whole unit.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vantage_core::ledger::LedgerUpdate;
use vantage_core::{Payment, Sale, SaleItem};

const SELECT_COLUMNS: &str = r#"
    SELECT id, business_id, sale_number, customer_name, customer_phone,
           total_cents, paid_cents, balance_cents, payment_status,
           payment_method, discount_cents, row_version, created_at, updated_at
    FROM sales
"#;

/// Repository for ledger sales and payments.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale together with its line items, atomically.
    pub async fn insert_sale(&self, sale: &Sale, items: &[SaleItem]) -> DbResult<()> {
        debug!(id = %sale.id, sale_number = %sale.sale_number, items = items.len(), "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, business_id, sale_number, customer_name, customer_phone,
                total_cents, paid_cents, balance_cents, payment_status,
                payment_method, discount_cents, row_version, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.business_id)
        .bind(&sale.sale_number)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(sale.total_cents)
        .bind(sale.paid_cents)
        .bind(sale.balance_cents)
        .bind(sale.payment_status)
        .bind(sale.payment_method)
        .bind(sale.discount_cents)
        .bind(sale.row_version)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, description, quantity,
                    unit_price_cents, discount_cents, line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.discount_cents)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets all line items for a sale.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, description, quantity, unit_price_cents,
                   discount_cents, line_total_cents, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// All sales of a business with an outstanding balance, newest first.
    pub async fn list_outstanding(&self, business_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "{SELECT_COLUMNS} WHERE business_id = ?1 AND balance_cents > 0 ORDER BY created_at DESC"
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Applies a payment as one atomic unit.
    ///
    /// Inserts the payment row and moves the sale to the ledger state the
    /// caller computed, conditioned on `expected_version` — the row version
    /// the caller read the balance at. A mismatch means a concurrent write
    /// got there first; nothing is committed and the caller sees
    /// [`DbError::VersionConflict`].
    pub async fn record_payment(
        &self,
        payment: &Payment,
        update: &LedgerUpdate,
        expected_version: i64,
    ) -> DbResult<()> {
        debug!(
            sale_id = %payment.sale_id,
            amount = %payment.amount_cents,
            expected_version,
            "Recording payment"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO payments (id, sale_id, amount_cents, method, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.sale_id)
        .bind(payment.amount_cents)
        .bind(payment.method)
        .bind(payment.status)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE sales SET
                paid_cents = ?2,
                balance_cents = ?3,
                payment_status = ?4,
                row_version = row_version + 1,
                updated_at = ?5
            WHERE id = ?1 AND row_version = ?6
            "#,
        )
        .bind(&payment.sale_id)
        .bind(update.paid_cents)
        .bind(update.balance_cents)
        .bind(update.status)
        .bind(now)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::version_conflict("Sale", &payment.sale_id));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets all payments for a sale, oldest first.
    pub async fn get_payments(&self, sale_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, amount_cents, method, status, created_at
            FROM payments
            WHERE sale_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Gets the total amount paid against a sale.
    ///
    /// Used by invariant checks: must always equal the sale's `paid_cents`.
    pub async fn get_total_paid(&self, sale_id: &str) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(amount_cents) FROM payments WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }
}
