//! # Caller Identity
//!
//! Every engine operation takes an explicit [`Actor`] — who is calling, for
//! which business, with what role. There is no ambient session state to read
//! from; the calling layer authenticates and hands the identity down.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Role of the caller within the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Business owner/admin: may terminate contracts and change settings.
    Owner,
    /// Regular staff member.
    Staff,
}

/// The authenticated caller of an engine operation.
///
/// Authorization is checked upstream (session layer, out of scope), but the
/// engine re-checks the role flag on owner-only operations: a missing check
/// upstream must fail hard here, never fall through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Id of the authenticated user.
    pub user_id: String,
    /// Business the caller is operating on.
    pub business_id: String,
    pub role: Role,
}

impl Actor {
    /// Creates an owner actor.
    pub fn owner(user_id: impl Into<String>, business_id: impl Into<String>) -> Self {
        Actor {
            user_id: user_id.into(),
            business_id: business_id.into(),
            role: Role::Owner,
        }
    }

    /// Creates a staff actor.
    pub fn staff(user_id: impl Into<String>, business_id: impl Into<String>) -> Self {
        Actor {
            user_id: user_id.into(),
            business_id: business_id.into(),
            role: Role::Staff,
        }
    }

    /// True for business owners/admins.
    #[inline]
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }

    /// Fails with an authorization error unless the caller is the owner.
    pub fn require_owner(&self, action: &str) -> EngineResult<()> {
        if self.is_owner() {
            Ok(())
        } else {
            Err(EngineError::unauthorized(format!(
                "only the business owner may {action}"
            )))
        }
    }

    /// Fails unless the entity belongs to the caller's business.
    pub fn require_same_business(&self, entity_business_id: &str) -> EngineResult<()> {
        if self.business_id == entity_business_id {
            Ok(())
        } else {
            Err(EngineError::unauthorized(
                "entity belongs to another business",
            ))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
