//! # Contract State Machine
//!
//! Employment contracts move through a fixed lifecycle driven by two
//! independent signature events and an administrative termination event.
//!
//! ## States and Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   draft ──(first signature)──► pending ──(second signature)──► signed   │
//! │     │                            │                               │      │
//! │     │                            │                               │      │
//! │     └────────────┬───────────────┴───────────────┬───────────────┘      │
//! │                  │ terminate(reason)             │ expire(past end)     │
//! │                  ▼                               ▼                      │
//! │             terminated                        expired                   │
//! │                                                                         │
//! │  terminated / expired are TERMINAL: no signature or termination         │
//! │  transition leaves them.                                                │
//! │                                                                         │
//! │  Signature order is unconstrained: employee-then-employer and           │
//! │  employer-then-employee both end in `signed`. Signing twice as the      │
//! │  same party is rejected with no mutation.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition validates all preconditions before touching a field, so
//! a rejected call leaves the contract exactly as it was.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Contract Status
// =============================================================================

/// Lifecycle status of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Created, nobody has signed yet.
    Draft,
    /// Exactly one party has signed.
    Pending,
    /// Both parties have signed.
    Signed,
    /// End date passed. Terminal.
    Expired,
    /// Administratively terminated. Terminal.
    Terminated,
}

impl Default for ContractStatus {
    fn default() -> Self {
        ContractStatus::Draft
    }
}

/// Which side of the contract performed a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SigningParty {
    Employee,
    Employer,
}

impl fmt::Display for SigningParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningParty::Employee => write!(f, "Employee"),
            SigningParty::Employer => write!(f, "Employer"),
        }
    }
}

// =============================================================================
// Contract
// =============================================================================

/// An employment contract with dual signatures.
///
/// Created in `Draft`; mutated only through the transition methods below.
/// `row_version` backs the optimistic write check in the repository layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Contract {
    pub id: String,
    pub employee_id: String,
    pub business_id: String,
    pub title: String,
    /// Free-form category ("full_time", "contractor", ...). Owned by the
    /// business, not interpreted by the state machine.
    pub contract_type: String,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
    pub terms: String,
    pub salary_cents: Option<i64>,
    pub status: ContractStatus,
    pub employee_signature: Option<String>,
    #[ts(as = "Option<String>")]
    pub employee_signed_at: Option<DateTime<Utc>>,
    pub employer_signature: Option<String>,
    #[ts(as = "Option<String>")]
    pub employer_signed_at: Option<DateTime<Utc>>,
    pub employer_name: Option<String>,
    pub termination_reason: Option<String>,
    #[ts(as = "Option<String>")]
    pub terminated_at: Option<DateTime<Utc>>,
    pub row_version: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// True for states that admit no further transitions.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ContractStatus::Terminated | ContractStatus::Expired
        )
    }

    /// True once both signatures are present.
    #[inline]
    pub fn is_fully_signed(&self) -> bool {
        self.employee_signed_at.is_some() && self.employer_signed_at.is_some()
    }

    pub fn salary(&self) -> Option<Money> {
        self.salary_cents.map(Money::from_cents)
    }

    fn ensure_not_terminal(&self, event: &'static str) -> CoreResult<()> {
        if self.is_terminal() {
            return Err(CoreError::TerminalContract {
                status: self.status,
                event,
            });
        }
        Ok(())
    }

    /// Records the employee's signature.
    ///
    /// Legal iff the employee has not signed yet and the contract is not in
    /// a terminal state. Status becomes `Signed` if the employer already
    /// signed, otherwise `Pending`.
    pub fn sign_as_employee(&mut self, signature: &str, now: DateTime<Utc>) -> CoreResult<()> {
        validate_signature(signature)?;
        self.ensure_not_terminal("sign")?;
        if self.employee_signed_at.is_some() {
            return Err(CoreError::AlreadySigned {
                party: SigningParty::Employee,
            });
        }

        self.employee_signature = Some(signature.to_string());
        self.employee_signed_at = Some(now);
        self.status = if self.employer_signed_at.is_some() {
            ContractStatus::Signed
        } else {
            ContractStatus::Pending
        };
        self.updated_at = now;
        Ok(())
    }

    /// Records the employer's signature. Symmetric with
    /// [`sign_as_employee`](Self::sign_as_employee).
    pub fn sign_as_employer(
        &mut self,
        signature: &str,
        employer_name: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        validate_signature(signature)?;
        if employer_name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "employer name".to_string(),
            }
            .into());
        }
        self.ensure_not_terminal("sign")?;
        if self.employer_signed_at.is_some() {
            return Err(CoreError::AlreadySigned {
                party: SigningParty::Employer,
            });
        }

        self.employer_signature = Some(signature.to_string());
        self.employer_signed_at = Some(now);
        self.employer_name = Some(employer_name.trim().to_string());
        self.status = if self.employee_signed_at.is_some() {
            ContractStatus::Signed
        } else {
            ContractStatus::Pending
        };
        self.updated_at = now;
        Ok(())
    }

    /// Terminates the contract. Irreversible.
    ///
    /// Legal from any non-terminal state. The reason is mandatory.
    /// Authorization (business owner) is checked by the engine layer before
    /// this is called.
    pub fn terminate(&mut self, reason: &str, now: DateTime<Utc>) -> CoreResult<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::Required {
                field: "termination reason".to_string(),
            }
            .into());
        }
        self.ensure_not_terminal("terminate")?;

        self.status = ContractStatus::Terminated;
        self.termination_reason = Some(reason.to_string());
        self.terminated_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Marks the contract expired once its end date has passed.
    ///
    /// Legal iff an end date exists, `now` is strictly past it, and the
    /// contract is not already terminal.
    pub fn expire(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        self.ensure_not_terminal("expire")?;
        match self.end_date {
            Some(end) if now.date_naive() > end => {
                self.status = ContractStatus::Expired;
                self.updated_at = now;
                Ok(())
            }
            _ => Err(CoreError::ExpiryNotDue),
        }
    }
}

fn validate_signature(signature: &str) -> CoreResult<()> {
    if signature.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "signature".to_string(),
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
