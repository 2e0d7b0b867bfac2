//! # Ledger Arithmetic
//!
//! The pure half of the Debt Ledger: given a sale and an incremental
//! payment, compute the next consistent `paid / balance / status` state.
//!
//! ## Payment Application
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale: total $1000.00, paid $0.00, balance $1000.00 (partial)           │
//! │       │                                                                 │
//! │       ▼  apply $400.00                                                  │
//! │  paid $400.00, balance $600.00 (partial)                                │
//! │       │                                                                 │
//! │       ▼  apply $600.00                                                  │
//! │  paid $1000.00, balance $0.00 (completed)                               │
//! │       │                                                                 │
//! │       ▼  apply $700.00                                                  │
//! │  REJECTED: exceeds balance — nothing changes                            │
//! │                                                                         │
//! │  INVARIANT after every accepted payment:                                │
//! │    paid + balance == total                                              │
//! │    balance == 0  ⇔  completed                                           │
//! │    balance  > 0  ⇔  partial                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence (the payment row, the conditional sale update, the receipt)
//! lives in vantage-engine; this module only decides what the next state is.

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaymentStatus, Sale};

// =============================================================================
// Ledger Update
// =============================================================================

/// The next ledger state for a sale after an accepted payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerUpdate {
    pub paid_cents: i64,
    pub balance_cents: i64,
    pub status: PaymentStatus,
}

/// Computes the ledger state after applying `amount` to `sale`.
///
/// ## Preconditions
/// - `amount > 0` — zero and negative payments are validation errors
/// - `amount <= sale.balance` — overpayment is rejected, nothing changes
///
/// ## Effect (on acceptance)
/// - `paid' = paid + amount`
/// - `balance' = max(0, total − paid')`
/// - `status' = Completed` iff `balance' == 0`, else `Partial`
pub fn apply_payment(sale: &Sale, amount: Money) -> CoreResult<LedgerUpdate> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        }
        .into());
    }

    if amount > sale.balance() {
        return Err(ValidationError::ExceedsBalance {
            requested_cents: amount.cents(),
            balance_cents: sale.balance_cents,
        }
        .into());
    }

    let paid = sale.paid() + amount;
    let balance = (sale.total() - paid).max_zero();
    let status = if balance.is_zero() {
        PaymentStatus::Completed
    } else {
        PaymentStatus::Partial
    };

    Ok(LedgerUpdate {
        paid_cents: paid.cents(),
        balance_cents: balance.cents(),
        status,
    })
}

/// Computes a frozen line total: `unit_price × quantity − discount`.
pub fn line_total(unit_price: Money, quantity: i64, discount: Money) -> Money {
    unit_price.multiply_quantity(quantity) - discount
}

// =============================================================================
// Debtor Search
// =============================================================================

/// Client-side debtor filter predicate.
///
/// Matches case-insensitively against customer name, customer phone, or the
/// sale number. An empty query matches every sale. Pure — never touches
/// ledger state.
pub fn matches_debtor_query(sale: &Sale, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    let name_hit = sale
        .customer_name
        .as_deref()
        .is_some_and(|n| n.to_lowercase().contains(&query));
    let phone_hit = sale
        .customer_phone
        .as_deref()
        .is_some_and(|p| p.to_lowercase().contains(&query));

    name_hit || phone_hit || sale.sale_number.to_lowercase().contains(&query)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::PaymentMethod;
    use chrono::{TimeZone, Utc};

    fn sale(total: i64, paid: i64) -> Sale {
        let t = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let balance = total - paid;
        Sale {
            id: "sale-1".to_string(),
            business_id: "biz-1".to_string(),
            sale_number: "INV-20260201-0001".to_string(),
            customer_name: Some("Bisi Adeyemi".to_string()),
            customer_phone: Some("+2348012345678".to_string()),
            total_cents: total,
            paid_cents: paid,
            balance_cents: balance,
            payment_status: if balance == 0 {
                PaymentStatus::Completed
            } else {
                PaymentStatus::Partial
            },
            payment_method: PaymentMethod::Cash,
            discount_cents: 0,
            row_version: 0,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn test_partial_then_full_payment() {
        // Spec scenario: total 1000.00, pay 400.00 then 600.00
        let s = sale(100_000, 0);

        let first = apply_payment(&s, Money::from_cents(40_000)).unwrap();
        assert_eq!(first.paid_cents, 40_000);
        assert_eq!(first.balance_cents, 60_000);
        assert_eq!(first.status, PaymentStatus::Partial);

        let s = sale(100_000, 40_000);
        let second = apply_payment(&s, Money::from_cents(60_000)).unwrap();
        assert_eq!(second.paid_cents, 100_000);
        assert_eq!(second.balance_cents, 0);
        assert_eq!(second.status, PaymentStatus::Completed);
    }

    #[test]
    fn test_overpayment_rejected() {
        // 700.00 against a 600.00 balance
        let s = sale(100_000, 40_000);
        let err = apply_payment(&s, Money::from_cents(70_000)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::ExceedsBalance {
                requested_cents: 70_000,
                balance_cents: 60_000,
            })
        ));
    }

    #[test]
    fn test_non_positive_payments_rejected() {
        let s = sale(100_000, 0);
        assert!(apply_payment(&s, Money::zero()).is_err());
        assert!(apply_payment(&s, Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_exact_balance_completes() {
        let s = sale(100_000, 99_999);
        let update = apply_payment(&s, Money::from_cents(1)).unwrap();
        assert_eq!(update.balance_cents, 0);
        assert_eq!(update.status, PaymentStatus::Completed);
        assert_eq!(update.paid_cents + update.balance_cents, s.total_cents);
    }

    #[test]
    fn test_line_total() {
        let total = line_total(Money::from_cents(2_500), 3, Money::from_cents(500));
        assert_eq!(total.cents(), 7_000);
    }

    #[test]
    fn test_debtor_query_matches() {
        let s = sale(100_000, 40_000);

        assert!(matches_debtor_query(&s, ""));
        assert!(matches_debtor_query(&s, "bisi"));
        assert!(matches_debtor_query(&s, "ADEYEMI"));
        assert!(matches_debtor_query(&s, "0801234"));
        assert!(matches_debtor_query(&s, "inv-20260201"));
        assert!(!matches_debtor_query(&s, "nonesuch"));
    }

    #[test]
    fn test_debtor_query_without_customer() {
        let mut s = sale(100_000, 0);
        s.customer_name = None;
        s.customer_phone = None;

        assert!(matches_debtor_query(&s, "inv-"));
        assert!(!matches_debtor_query(&s, "bisi"));
    }
}
