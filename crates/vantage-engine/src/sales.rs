//! # Sale Recorder
//!
//! Records a sale against the service catalog: validates the input, computes
//! the commission split, persists the transaction, then emits the activity
//! entry.
//!
//! ## Recording Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(actor, employee, service, amount)                          │
//! │                                                                         │
//! │  1. Validate: amount > 0, service selected          ── ValidationError  │
//! │  2. Resolve employee + service, check business scope                    │
//! │  3. split(amount, employee.policy())                ── pure             │
//! │  4. INSERT transaction (commission_paid = false)    ── must succeed     │
//! │  5. Activity entry "sale_recorded"                  ── best-effort      │
//! │                                                                         │
//! │  A failure at step 4 aborts before step 5: no orphan activity entry     │
//! │  for a transaction that never existed. A failure at step 5 is logged    │
//! │  and swallowed: the transaction stands.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use vantage_core::commission::split;
use vantage_core::validation::{validate_amount_cents, validate_selection};
use vantage_core::{types, ActivityAction, Money, Service, Transaction, ValidationError};
use vantage_db::Database;

use crate::activity::ActivityRecorder;
use crate::auth::Actor;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Service for recording sales and their commission transactions.
#[derive(Debug, Clone)]
pub struct SaleRecorder {
    db: Database,
    config: EngineConfig,
    activity: ActivityRecorder,
}

impl SaleRecorder {
    /// Creates a new SaleRecorder.
    pub fn new(db: Database, config: EngineConfig) -> Self {
        let activity = ActivityRecorder::new(db.clone());
        SaleRecorder {
            db,
            config,
            activity,
        }
    }

    /// The caller's sellable catalog (active services of their business).
    pub async fn catalog(&self, actor: &Actor) -> EngineResult<Vec<Service>> {
        Ok(self.db.services().list_active(&actor.business_id).await?)
    }

    /// Price lookup used to auto-populate the sale amount from the catalog.
    ///
    /// `Ok(None)` means the service isn't in the caller's catalog.
    pub async fn service_price(
        &self,
        actor: &Actor,
        service_id: &str,
    ) -> EngineResult<Option<Money>> {
        let catalog = self
            .db
            .services()
            .list_for_business(&actor.business_id)
            .await?;
        Ok(types::service_price(&catalog, service_id))
    }

    /// Records a sale and returns the persisted transaction.
    ///
    /// The commission split is computed from the employee's policy at this
    /// moment and frozen on the transaction; later policy or price changes
    /// never rewrite it.
    pub async fn record_sale(
        &self,
        actor: &Actor,
        employee_id: &str,
        service_id: &str,
        amount: Money,
    ) -> EngineResult<Transaction> {
        debug!(employee_id, service_id, amount = %amount, "record_sale");

        validate_selection("service", service_id)?;
        validate_amount_cents("sale amount", amount.cents())?;

        let employee = self
            .db
            .employees()
            .get_by_id(employee_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", employee_id))?;
        actor.require_same_business(&employee.business_id)?;

        let service = self
            .db
            .services()
            .get_by_id(service_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Service", service_id))?;
        actor.require_same_business(&service.business_id)?;

        if !service.is_active {
            return Err(ValidationError::Inactive {
                entity: "Service".to_string(),
                id: service.id.clone(),
            }
            .into());
        }

        let result = split(amount, employee.policy());

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            business_id: employee.business_id.clone(),
            employee_id: employee.id.clone(),
            service_id: service.id.clone(),
            total_cents: amount.cents(),
            commission_cents: result.commission.cents(),
            house_cents: result.house.cents(),
            commission_paid: false,
            created_at: Utc::now(),
        };

        // Persist first; the activity entry only exists for a durable sale.
        self.db.transactions().insert(&transaction).await?;

        info!(
            transaction_id = %transaction.id,
            employee_id = %employee.id,
            total = %transaction.total_cents,
            commission = %transaction.commission_cents,
            negative_house = result.house_is_negative(),
            "Sale recorded"
        );

        self.activity
            .record(
                &transaction.business_id,
                Some(&transaction.employee_id),
                ActivityAction::SaleRecorded,
                format!(
                    "{} recorded a sale of {}",
                    employee.name,
                    self.config.format_currency(amount.cents())
                ),
            )
            .await;

        Ok(transaction)
    }

    /// Payroll hook: marks a transaction's commission as paid out.
    pub async fn mark_commission_paid(
        &self,
        actor: &Actor,
        transaction_id: &str,
    ) -> EngineResult<()> {
        let transaction = self
            .db
            .transactions()
            .get_by_id(transaction_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Transaction", transaction_id))?;
        actor.require_same_business(&transaction.business_id)?;

        self.db
            .transactions()
            .mark_commission_paid(transaction_id)
            .await?;

        info!(transaction_id, "Commission marked paid");
        Ok(())
    }

    /// Commission history for an employee, newest first.
    pub async fn transactions_for_employee(
        &self,
        actor: &Actor,
        employee_id: &str,
    ) -> EngineResult<Vec<Transaction>> {
        let employee = self
            .db
            .employees()
            .get_by_id(employee_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", employee_id))?;
        actor.require_same_business(&employee.business_id)?;

        Ok(self.db.transactions().list_for_employee(employee_id).await?)
    }
}
