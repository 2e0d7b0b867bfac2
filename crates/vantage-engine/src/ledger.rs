//! # Debt Ledger
//!
//! Opens ledger sales, applies incremental payments against them, and keeps
//! the outstanding-balance book consistent.
//!
//! ## Payment Application
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_payment(actor, sale_id, amount, method)                          │
//! │                                                                         │
//! │  1. Fetch sale (remember its row_version)                               │
//! │  2. Pure arithmetic: next paid/balance/status    ── overpayment rejected│
//! │  3. One DB transaction:                                                 │
//! │       INSERT payment + conditional UPDATE sale                          │
//! │       version mismatch → Conflict, zero effect                          │
//! │  4. Receipt snapshot + best-effort activity entry                       │
//! │                                                                         │
//! │  The precondition is re-validated against the persisted state by        │
//! │  conditioning the write on the version read in step 1: two concurrent   │
//! │  payments can never both be accepted against a stale balance.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use vantage_core::ledger;
use vantage_core::validation::{validate_price_cents, validate_quantity};
use vantage_core::{
    Money, Payment, PaymentMethod, PaymentState, PaymentStatus, Sale, SaleItem, ValidationError,
    MAX_SALE_ITEMS,
};
use vantage_core::ActivityAction;
use vantage_db::Database;

use crate::activity::ActivityRecorder;
use crate::auth::Actor;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// A line item on a new ledger sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub discount_cents: i64,
}

/// Input for opening a ledger sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSale {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: PaymentMethod,
    pub items: Vec<NewSaleItem>,
    /// Order-level discount on top of per-line discounts.
    pub discount_cents: i64,
}

/// Snapshot handed to the receipt-rendering collaborator after a payment.
///
/// Captures the reconciliation at application time; later payments don't
/// rewrite an issued receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub receipt_id: String,
    pub sale_id: String,
    pub sale_number: String,
    pub previously_paid_cents: i64,
    pub amount_cents: i64,
    pub total_paid_cents: i64,
    pub balance_cents: i64,
    pub method: PaymentMethod,
    pub issued_at: DateTime<Utc>,
}

/// Result of a successful payment application.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    /// The sale as persisted after the payment.
    pub sale: Sale,
    pub receipt: PaymentReceipt,
}

/// One line on a rendered sale receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// Payload for the (external) PDF receipt renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceiptPayload {
    pub business_name: String,
    pub sale_number: String,
    pub items: Vec<ReceiptLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub paid_cents: i64,
    pub balance_cents: i64,
    pub payment_method: PaymentMethod,
    pub issued_at: DateTime<Utc>,
}

// =============================================================================
// Debt Ledger Service
// =============================================================================

/// Service owning the outstanding-balance book.
#[derive(Debug, Clone)]
pub struct DebtLedger {
    db: Database,
    config: EngineConfig,
    activity: ActivityRecorder,
}

impl DebtLedger {
    /// Creates a new DebtLedger.
    pub fn new(db: Database, config: EngineConfig) -> Self {
        let activity = ActivityRecorder::new(db.clone());
        DebtLedger {
            db,
            config,
            activity,
        }
    }

    /// Opens a ledger sale with its line items.
    ///
    /// The sale starts unpaid (`paid = 0`, full balance, `Partial`); a
    /// zero-total sale is born `Completed`. Payments arrive through
    /// [`apply_payment`](Self::apply_payment) only.
    pub async fn open_sale(&self, actor: &Actor, input: OpenSale) -> EngineResult<Sale> {
        if input.items.is_empty() {
            return Err(ValidationError::Required {
                field: "line items".to_string(),
            }
            .into());
        }
        if input.items.len() > MAX_SALE_ITEMS {
            return Err(ValidationError::OutOfRange {
                field: "line items".to_string(),
                min: 1,
                max: MAX_SALE_ITEMS as i64,
            }
            .into());
        }
        validate_price_cents(input.discount_cents)?;

        let now = Utc::now();
        let sale_id = Uuid::new_v4().to_string();

        let mut subtotal = Money::zero();
        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            validate_quantity(line.quantity)?;
            validate_price_cents(line.unit_price_cents)?;
            validate_price_cents(line.discount_cents)?;

            let line_total = ledger::line_total(
                Money::from_cents(line.unit_price_cents),
                line.quantity,
                Money::from_cents(line.discount_cents),
            );
            subtotal += line_total;

            items.push(SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                description: line.description.trim().to_string(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                discount_cents: line.discount_cents,
                line_total_cents: line_total.cents(),
                created_at: now,
            });
        }

        let total = (subtotal - Money::from_cents(input.discount_cents)).max_zero();

        let sale = Sale {
            id: sale_id,
            business_id: actor.business_id.clone(),
            sale_number: self.generate_sale_number(),
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            total_cents: total.cents(),
            paid_cents: 0,
            balance_cents: total.cents(),
            payment_status: if total.is_zero() {
                PaymentStatus::Completed
            } else {
                PaymentStatus::Partial
            },
            payment_method: input.payment_method,
            discount_cents: input.discount_cents,
            row_version: 0,
            created_at: now,
            updated_at: now,
        };

        self.db.sales().insert_sale(&sale, &items).await?;

        info!(
            sale_id = %sale.id,
            sale_number = %sale.sale_number,
            total = %sale.total_cents,
            items = items.len(),
            "Sale opened"
        );

        Ok(sale)
    }

    /// Applies an incremental payment against a sale.
    ///
    /// Precondition `0 < amount <= balance`; violations are validation
    /// errors with zero effect. The payment row and the sale update commit
    /// as one unit or not at all, and the update is conditioned on the
    /// version the balance was read at.
    pub async fn apply_payment(
        &self,
        actor: &Actor,
        sale_id: &str,
        amount: Money,
        method: PaymentMethod,
    ) -> EngineResult<PaymentOutcome> {
        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Sale", sale_id))?;
        actor.require_same_business(&sale.business_id)?;

        self.apply_to(sale, amount, method).await
    }

    /// Applies a payment to an already-resolved sale.
    ///
    /// Shared by the direct path above and by gateway verification, so both
    /// have the identical effect on the ledger.
    pub(crate) async fn apply_to(
        &self,
        sale: Sale,
        amount: Money,
        method: PaymentMethod,
    ) -> EngineResult<PaymentOutcome> {
        debug!(sale_id = %sale.id, amount = %amount, ?method, "apply_payment");

        let update = ledger::apply_payment(&sale, amount)?;

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            amount_cents: amount.cents(),
            method,
            status: PaymentState::Successful,
            created_at: Utc::now(),
        };

        self.db
            .sales()
            .record_payment(&payment, &update, sale.row_version)
            .await?;

        // Read back the persisted state; the receipt reconciles against it.
        let updated = self
            .db
            .sales()
            .get_by_id(&sale.id)
            .await?
            .ok_or_else(|| EngineError::not_found("Sale", &sale.id))?;

        let receipt = PaymentReceipt {
            receipt_id: Uuid::new_v4().to_string(),
            sale_id: updated.id.clone(),
            sale_number: updated.sale_number.clone(),
            previously_paid_cents: sale.paid_cents,
            amount_cents: amount.cents(),
            total_paid_cents: updated.paid_cents,
            balance_cents: updated.balance_cents,
            method,
            issued_at: payment.created_at,
        };

        info!(
            sale_id = %updated.id,
            amount = %amount.cents(),
            balance = %updated.balance_cents,
            status = ?updated.payment_status,
            "Payment applied"
        );

        self.activity
            .record(
                &updated.business_id,
                None,
                ActivityAction::PaymentApplied,
                format!(
                    "payment of {} on {} ({} outstanding)",
                    self.config.format_currency(amount.cents()),
                    updated.sale_number,
                    self.config.format_currency(updated.balance_cents),
                ),
            )
            .await;

        Ok(PaymentOutcome {
            sale: updated,
            receipt,
        })
    }

    /// All debtors of the caller's business, newest first.
    pub async fn list_outstanding(&self, actor: &Actor) -> EngineResult<Vec<Sale>> {
        Ok(self
            .db
            .sales()
            .list_outstanding(&actor.business_id)
            .await?)
    }

    /// Client-side debtor filter over an already-fetched set.
    ///
    /// Matches customer name, phone, or sale number; never touches the
    /// store.
    pub fn search<'a>(sales: &'a [Sale], query: &str) -> Vec<&'a Sale> {
        sales
            .iter()
            .filter(|s| ledger::matches_debtor_query(s, query))
            .collect()
    }

    /// Payment history for a sale, oldest first.
    pub async fn payments(&self, actor: &Actor, sale_id: &str) -> EngineResult<Vec<Payment>> {
        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Sale", sale_id))?;
        actor.require_same_business(&sale.business_id)?;

        Ok(self.db.sales().get_payments(sale_id).await?)
    }

    /// Builds the receipt payload for the PDF-rendering collaborator.
    pub async fn sale_receipt(
        &self,
        actor: &Actor,
        sale_id: &str,
    ) -> EngineResult<SaleReceiptPayload> {
        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Sale", sale_id))?;
        actor.require_same_business(&sale.business_id)?;

        let items = self.db.sales().get_items(sale_id).await?;
        let subtotal: i64 = items.iter().map(|i| i.line_total_cents).sum();

        Ok(SaleReceiptPayload {
            business_name: self.config.business_name.clone(),
            sale_number: sale.sale_number.clone(),
            items: items
                .into_iter()
                .map(|i| ReceiptLine {
                    description: i.description,
                    quantity: i.quantity,
                    unit_price_cents: i.unit_price_cents,
                    line_total_cents: i.line_total_cents,
                })
                .collect(),
            subtotal_cents: subtotal,
            discount_cents: sale.discount_cents,
            total_cents: sale.total_cents,
            paid_cents: sale.paid_cents,
            balance_cents: sale.balance_cents,
            payment_method: sale.payment_method,
            issued_at: Utc::now(),
        })
    }

    /// Generates a sale number: `PREFIX-YYMMDD-XXXXXX`.
    ///
    /// The suffix comes from a fresh UUID, so numbers stay unique without a
    /// per-day counter in the database.
    fn generate_sale_number(&self) -> String {
        let date = Utc::now().format("%y%m%d");
        let id = Uuid::new_v4().simple().to_string();
        format!(
            "{}-{}-{}",
            self.config.sale_number_prefix,
            date,
            id[..6].to_uppercase()
        )
    }
}
