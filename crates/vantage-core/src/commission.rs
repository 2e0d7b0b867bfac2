//! # Commission Calculator
//!
//! Turns a sale amount and an employee's commission policy into a
//! commission/house split.
//!
//! ## The Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale amount $1000.00                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CommissionPolicy::Percentage(15%) ──► commission $150.00               │
//! │                                        house      $850.00               │
//! │                                                                         │
//! │  CommissionPolicy::Fixed($120.00)  ──► commission $120.00               │
//! │                                        house      $880.00               │
//! │                                                                         │
//! │  INVARIANT: commission + house == sale amount, exactly, always.         │
//! │                                                                         │
//! │  A fixed commission larger than the sale amount produces a NEGATIVE     │
//! │  house amount. That is deliberate: the policy question belongs to the   │
//! │  business owner, not to this function. See house_is_negative().         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is pure and deterministic, which is what lets the whole
//! payout path be property-tested (see `tests/commission_properties.rs`).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Commission Rate
// =============================================================================

/// A percentage commission rate in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% — integer all the way down, no float drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommissionRate(u32);

impl CommissionRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        CommissionRate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        CommissionRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        CommissionRate(0)
    }
}

impl Default for CommissionRate {
    fn default() -> Self {
        CommissionRate::zero()
    }
}

// =============================================================================
// Commission Policy
// =============================================================================

/// An employee's commission configuration.
///
/// Employees store both fields (rate and fixed amount); the policy selects
/// which one is semantically active. See `Employee::policy()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommissionPolicy {
    /// Commission is a percentage of the sale amount.
    Percentage { rate: CommissionRate },
    /// Commission is a flat amount, independent of the sale amount.
    Fixed { amount: Money },
}

// =============================================================================
// Commission Split
// =============================================================================

/// The result of splitting a sale amount between employee and house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommissionSplit {
    /// Employee's share of the sale.
    pub commission: Money,
    /// What the business retains: `sale amount - commission`.
    pub house: Money,
}

impl CommissionSplit {
    /// True when a fixed commission exceeded the sale amount.
    ///
    /// Callers that want to warn the owner check this flag; the split itself
    /// is never clamped.
    #[inline]
    pub const fn house_is_negative(&self) -> bool {
        self.house.is_negative()
    }

    /// The sale amount this split was computed from.
    #[inline]
    pub fn total(&self) -> Money {
        self.commission + self.house
    }
}

/// Splits a sale amount according to a commission policy.
///
/// ## Rules
/// - `Percentage`: commission = `amount × rate` (half-up cent rounding);
///   the house side absorbs the rounding remainder, so the two sides always
///   sum back to `amount` exactly.
/// - `Fixed`: commission is the configured amount, whatever the sale was.
///
/// Pure and total: no error conditions, no side effects.
///
/// ## Example
/// ```rust
/// use vantage_core::commission::{split, CommissionPolicy, CommissionRate};
/// use vantage_core::money::Money;
///
/// let policy = CommissionPolicy::Percentage { rate: CommissionRate::from_bps(1500) };
/// let result = split(Money::from_cents(100_000), policy);
/// assert_eq!(result.commission.cents(), 15_000);
/// assert_eq!(result.house.cents(), 85_000);
/// ```
pub fn split(amount: Money, policy: CommissionPolicy) -> CommissionSplit {
    let commission = match policy {
        CommissionPolicy::Percentage { rate } => amount.fraction_bps(rate.bps()),
        CommissionPolicy::Fixed { amount: fixed } => fixed,
    };

    CommissionSplit {
        commission,
        house: amount - commission,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
