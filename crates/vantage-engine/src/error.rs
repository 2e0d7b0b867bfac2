//! # Engine Error Type
//!
//! Unified error taxonomy for every engine operation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Vantage                                │
//! │                                                                         │
//! │  ValidationError ──┐                                                    │
//! │  (vantage-core)    │   rejected BEFORE any mutation                     │
//! │                    ▼                                                    │
//! │  CoreError ─────► EngineError ◄───── DbError                            │
//! │  (rule breaches)   │                 (NotFound, VersionConflict, ...)   │
//! │                    ▼                                                    │
//! │  Caller: code() for programmatic handling, Display for the user.        │
//! │                                                                         │
//! │  Taxonomy:                                                              │
//! │    Validation    → bad input, never retried automatically               │
//! │    Conflict      → stale write / illegal transition, re-fetch and retry │
//! │    Authorization → non-owner attempting an owner action                 │
//! │    NotFound      → missing sale/service/employee/contract/intent        │
//! │    Persistence   → store unavailable, whole operation failed            │
//! │                                                                         │
//! │  No operation partially commits and then reports failure.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use vantage_core::{CoreError, ValidationError};
use vantage_db::DbError;

/// Engine-level error returned by every service operation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Input rejected before any mutation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Stale-state write or illegal state transition. The caller may
    /// re-fetch and retry manually; the engine never retries.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller lacks the required role. Authorization is normally checked
    /// upstream; the engine still hard-fails when the flag is missing.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// The store failed; the whole operation failed with it.
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

/// Machine-readable error codes for programmatic handling at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    Conflict,
    AuthorizationError,
    PersistenceError,
}

impl EngineError {
    /// Creates a not found error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an authorization error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        EngineError::Authorization(message.into())
    }

    /// The machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::Validation(_) => ErrorCode::ValidationError,
            EngineError::NotFound { .. } => ErrorCode::NotFound,
            EngineError::Conflict(_) => ErrorCode::Conflict,
            EngineError::Authorization(_) => ErrorCode::AuthorizationError,
            EngineError::Persistence(_) => ErrorCode::PersistenceError,
        }
    }
}

/// Converts core rule breaches to engine errors.
impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => EngineError::Validation(e),
            CoreError::TerminalContract { .. }
            | CoreError::AlreadySigned { .. }
            | CoreError::ExpiryNotDue => EngineError::Conflict(err.to_string()),
        }
    }
}

/// Converts database errors to engine errors.
impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => EngineError::NotFound { entity, id },
            DbError::VersionConflict { .. } => EngineError::Conflict(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                EngineError::Conflict(err.to_string())
            }
            DbError::QueryFailed(ref e) | DbError::TransactionFailed(ref e) => {
                tracing::error!("Database operation failed: {e}");
                EngineError::Persistence(err.to_string())
            }
            DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::PoolExhausted
            | DbError::Internal(_) => EngineError::Persistence(err.to_string()),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
