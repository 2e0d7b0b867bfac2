//! # vantage-core: Pure Business Logic for Vantage Back Office
//!
//! This crate is the heart of the system: the commission split, the ledger
//! arithmetic, and the contract state machine, all as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Vantage Back Office Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Calling layer (UI / API — out of scope)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                vantage-engine (services)                        │   │
//! │  │   record_sale, apply_payment, sign/terminate, verify intent     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vantage-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  money   │ │commission│ │  ledger  │ │ contract │          │   │
//! │  │   │  cents   │ │  split   │ │  math    │ │  machine │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  vantage-db (SQLite layer)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Service, Employee, Transaction, Sale, ...)
//! - [`money`] - Integer-cent monetary values (no floating point)
//! - [`commission`] - Commission split calculator
//! - [`ledger`] - Payment-application arithmetic and debtor predicates
//! - [`contract`] - Contract state machine
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic, side-effect free (property-tested)
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: every amount is cents (i64), every rate is bps
//! 4. **Explicit Errors**: typed errors, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commission;
pub mod contract;
pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use commission::{split, CommissionPolicy, CommissionRate, CommissionSplit};
pub use contract::{Contract, ContractStatus, SigningParty};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::LedgerUpdate;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of display names and titles.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum line items on a single ledger sale.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// Guards against fat-finger entry (1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum commission rate: 10000 bps == 100%.
pub const MAX_COMMISSION_RATE_BPS: u32 = 10000;
