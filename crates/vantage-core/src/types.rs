//! # Domain Types
//!
//! Core domain types for Vantage Back Office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Service      │   │    Employee     │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  business_id    │   │  commission_*   │   │  commission /   │       │
//! │  │  base_price     │   │  policy()       │   │  house split    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Sale        │   │    Payment      │   │  ActivityLog    │       │
//! │  │  (ledger view)  │   │  (append-only)  │   │  (best-effort)  │       │
//! │  │  paid/balance/  │   │  amount, method │   │  action+details │       │
//! │  │  status         │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Transaction` (commission view) and the `Sale` (ledger view) are
//! deliberately separate records: one answers "who earned what on this
//! sale", the other answers "how much of this sale is still owed".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::commission::{CommissionPolicy, CommissionRate};
use crate::money::Money;

// =============================================================================
// Service (catalog entry)
// =============================================================================

/// A service offered by a business.
///
/// Immutable once referenced by a transaction, except for the `is_active`
/// flag and the price (price changes never rewrite past transactions — the
/// split is computed and frozen at recording time).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business this service belongs to.
    pub business_id: String,

    /// Display name shown in the catalog and on receipts.
    pub name: String,

    /// Base price in cents.
    pub base_price_cents: i64,

    /// Whether the service can currently be sold (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Returns the base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }
}

/// Looks up a service price by id.
///
/// Returns `None` when the id is absent (including an empty catalog) — the
/// caller uses this to auto-populate a sale amount from the catalog.
pub fn service_price(services: &[Service], service_id: &str) -> Option<Money> {
    services
        .iter()
        .find(|s| s.id == service_id)
        .map(Service::base_price)
}

/// Filters a catalog down to the sellable services of one business.
///
/// The result is exactly `{s : s.business_id == business_id && s.is_active}` —
/// no omissions, no extras.
pub fn active_services<'a>(services: &'a [Service], business_id: &str) -> Vec<&'a Service> {
    services
        .iter()
        .filter(|s| s.business_id == business_id && s.is_active)
        .collect()
}

// =============================================================================
// Employee
// =============================================================================

/// How an employee's commission is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    /// Percentage of the sale amount.
    Percentage,
    /// Flat amount per sale.
    Fixed,
}

/// An employee of a business.
///
/// Both commission fields are always stored; `commission_type` selects which
/// one is active. The calculator ignores the other.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub commission_type: CommissionType,
    /// Percentage rate in basis points (1500 = 15%). Active when
    /// `commission_type == Percentage`.
    pub commission_rate_bps: u32,
    /// Flat commission in cents. Active when `commission_type == Fixed`.
    pub fixed_commission_cents: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Resolves the employee's active commission policy.
    pub fn policy(&self) -> CommissionPolicy {
        match self.commission_type {
            CommissionType::Percentage => CommissionPolicy::Percentage {
                rate: CommissionRate::from_bps(self.commission_rate_bps),
            },
            CommissionType::Fixed => CommissionPolicy::Fixed {
                amount: Money::from_cents(self.fixed_commission_cents),
            },
        }
    }
}

// =============================================================================
// Transaction (commission view of a sale)
// =============================================================================

/// A recorded sale with its frozen commission split.
///
/// ## Invariants
/// - `commission_cents + house_cents == total_cents` (exact)
/// - `business_id == employee.business_id`
///
/// Created once at recording time; `commission_paid` is the only field that
/// changes afterward (flipped by the payroll action).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub business_id: String,
    pub employee_id: String,
    pub service_id: String,
    pub total_cents: i64,
    pub commission_cents: i64,
    pub house_cents: i64,
    pub commission_paid: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn commission(&self) -> Money {
        Money::from_cents(self.commission_cents)
    }

    #[inline]
    pub fn house(&self) -> Money {
        Money::from_cents(self.house_cents)
    }
}

// =============================================================================
// Payment Status / Method
// =============================================================================

/// Ledger status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Fully paid: `balance_cents == 0`.
    Completed,
    /// Outstanding balance remains: `balance_cents > 0`.
    Partial,
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    /// Hosted-checkout payment applied through gateway verification.
    Online,
}

// =============================================================================
// Sale (ledger view)
// =============================================================================

/// A sale tracked by the debt ledger.
///
/// ## Invariants
/// - `paid_cents + balance_cents == total_cents`
/// - `balance_cents == 0 ⇔ payment_status == Completed`
/// - `balance_cents > 0 ⇔ payment_status == Partial`
///
/// Mutated only by the ledger's payment application; never deleted, only
/// driven to zero balance. `row_version` backs the optimistic write check.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub business_id: String,
    /// Human-readable invoice number, unique per store.
    pub sale_number: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub total_cents: i64,
    pub paid_cents: i64,
    pub balance_cents: i64,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub discount_cents: i64,
    /// Incremented on every ledger write; writes are conditioned on the
    /// version last read.
    pub row_version: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }

    /// A debtor is a sale with anything still owed on it.
    #[inline]
    pub fn is_debtor(&self) -> bool {
        self.balance_cents > 0
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a ledger sale, frozen at sale time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    /// What was sold, as shown on the receipt.
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub discount_cents: i64,
    /// `unit_price × quantity − discount`, frozen at sale time.
    pub line_total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Lifecycle state of a recorded payment event.
///
/// Payments are appended only after they succeed (failed gateway attempts
/// stay on the intent, see `PaymentIntent`), so the only state a stored row
/// can carry is `Successful`. Kept as an enum so the wire format is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Successful,
}

/// A payment applied against a sale. Append-only.
///
/// `sum(payments.amount for sale) == sale.paid_cents` is an invariant the
/// ledger preserves on every write.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub sale_id: String,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub status: PaymentState,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Payment Intent (gateway hand-off)
// =============================================================================

/// Resolution state of a gateway payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum IntentState {
    /// Checkout issued, awaiting the verification callback.
    Pending,
    /// Verified successfully; the payment was applied to the sale.
    Applied,
    /// Gateway reported failure; nothing was applied.
    Failed,
}

/// A persisted gateway hand-off awaiting out-of-band verification.
///
/// `metadata` is the serialized closed checkout record (JSON); the engine
/// owns the typed form and rejects unknown fields on the way back in.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PaymentIntent {
    /// Unique reference shared with the gateway; primary key.
    pub reference: String,
    pub sale_id: String,
    pub amount_cents: i64,
    pub email: String,
    /// Closed checkout metadata as JSON.
    pub metadata: String,
    pub state: IntentState,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl PaymentIntent {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Activity Log
// =============================================================================

/// Machine-readable activity actions.
///
/// The string forms are stable identifiers consumed by the (external)
/// activity display; never rename an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    SaleRecorded,
    PaymentApplied,
    ContractSigned,
    ContractTerminated,
}

impl ActivityAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::SaleRecorded => "sale_recorded",
            ActivityAction::PaymentApplied => "payment_applied",
            ActivityAction::ContractSigned => "contract_signed",
            ActivityAction::ContractTerminated => "contract_terminated",
        }
    }
}

/// One best-effort activity entry. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ActivityLog {
    pub id: String,
    pub business_id: String,
    pub employee_id: Option<String>,
    pub action: String,
    pub details: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
