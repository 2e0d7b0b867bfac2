//! # Error Types
//!
//! Domain-specific error types for vantage-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vantage-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  vantage-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  vantage-engine errors                                                  │
//! │  └── EngineError      - What a calling layer sees                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → EngineError → caller     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, never manual impls
//! 2. Context in every message (amounts, ids, field names)
//! 3. Errors are enum variants, never bare strings
//! 4. Every variant renders a user-facing message

use thiserror::Error;

use crate::contract::{ContractStatus, SigningParty};

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and domain logic failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The contract is in a terminal state and cannot transition further.
    ///
    /// ## When This Occurs
    /// - Signing a terminated or expired contract
    /// - Terminating a contract twice
    #[error("Contract is {status:?}, cannot {event}")]
    TerminalContract {
        status: ContractStatus,
        event: &'static str,
    },

    /// The same party tried to sign a second time.
    #[error("{party} has already signed this contract")]
    AlreadySigned { party: SigningParty },

    /// Expiry requested but the contract has no end date, or the end date
    /// has not passed yet.
    #[error("Contract end date has not passed")]
    ExpiryNotDue,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs and before anything is persisted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Referenced entity exists but is switched off (soft-deleted service).
    #[error("{entity} {id} is not active")]
    Inactive { entity: String, id: String },

    /// A payment larger than the outstanding balance (overpayment guard).
    #[error("Payment of {requested_cents} cents exceeds outstanding balance of {balance_cents} cents")]
    ExceedsBalance {
        requested_cents: i64,
        balance_cents: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
