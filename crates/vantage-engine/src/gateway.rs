//! # Gateway Checkout Verification
//!
//! The hosted-checkout collaborator is modeled as an issue/await/verify
//! contract rather than an ad hoc callback path:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_intent ──► ChargeRequest {amount, email, reference, metadata}   │
//! │                         │  (handed to the hosted checkout, out of       │
//! │                         │   scope here)                                 │
//! │                         ▼                                               │
//! │  ... customer pays on the gateway's page ...                            │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  verify({reference, status})                                            │
//! │    status == success ──► DebtLedger::apply_to  (same code path, same    │
//! │                          atomicity and receipt as a cash payment)       │
//! │    status == failed  ──► intent marked failed, ledger untouched         │
//! │                                                                         │
//! │  Duplicate callbacks: the intent resolves pending → applied/failed      │
//! │  exactly once; a second callback for the same reference is a Conflict.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Metadata is a closed, versioned record — unknown fields are rejected at
//! deserialization, never passed through untyped.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use vantage_core::validation::validate_email;
use vantage_core::{IntentState, Money, PaymentIntent, PaymentMethod, ValidationError};
use vantage_db::Database;

use crate::auth::Actor;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::ledger::{DebtLedger, PaymentOutcome};

/// Current checkout metadata schema version.
pub const CHECKOUT_METADATA_VERSION: u32 = 1;

// =============================================================================
// Wire Types
// =============================================================================

/// Closed, versioned metadata attached to a checkout.
///
/// `deny_unknown_fields`: an unrecognized field in a callback payload is an
/// error, not something to forward blindly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckoutMetadata {
    pub schema_version: u32,
    pub sale_id: String,
    pub business_id: String,
    pub sale_number: String,
}

/// The charge request handed to the hosted checkout collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub amount_cents: i64,
    pub email: String,
    pub reference: String,
    pub metadata: CheckoutMetadata,
}

/// What the gateway reports back for a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStatus {
    Success,
    Failed,
}

/// The out-of-band verification callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCallback {
    pub reference: String,
    pub status: GatewayStatus,
}

// =============================================================================
// Checkout Gateway Service
// =============================================================================

/// Issues payment intents and maps verification callbacks onto the ledger.
#[derive(Debug, Clone)]
pub struct CheckoutGateway {
    db: Database,
    ledger: DebtLedger,
}

impl CheckoutGateway {
    /// Creates a new CheckoutGateway.
    pub fn new(db: Database, config: EngineConfig) -> Self {
        let ledger = DebtLedger::new(db.clone(), config);
        CheckoutGateway { db, ledger }
    }

    /// Issues a checkout intent for part (or all) of a sale's balance.
    ///
    /// The intent is persisted before the charge request is returned, so a
    /// callback for it can always be resolved.
    pub async fn create_intent(
        &self,
        actor: &Actor,
        sale_id: &str,
        amount: Money,
        email: &str,
    ) -> EngineResult<ChargeRequest> {
        validate_email(email)?;

        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Sale", sale_id))?;
        actor.require_same_business(&sale.business_id)?;

        if !amount.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "amount".to_string(),
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

        let metadata = CheckoutMetadata {
            schema_version: CHECKOUT_METADATA_VERSION,
            sale_id: sale.id.clone(),
            business_id: sale.business_id.clone(),
            sale_number: sale.sale_number.clone(),
        };
        let metadata_json = serde_json::to_string(&metadata)
            .map_err(|e| EngineError::Persistence(format!("metadata serialization: {e}")))?;

        let intent = PaymentIntent {
            reference: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            amount_cents: amount.cents(),
            email: email.trim().to_string(),
            metadata: metadata_json,
            state: IntentState::Pending,
            created_at: Utc::now(),
            resolved_at: None,
        };

        self.db.intents().insert(&intent).await?;

        info!(
            reference = %intent.reference,
            sale_id = %sale.id,
            amount = %intent.amount_cents,
            "Checkout intent issued"
        );

        Ok(ChargeRequest {
            amount_cents: intent.amount_cents,
            email: intent.email,
            reference: intent.reference,
            metadata,
        })
    }

    /// Resolves a verification callback.
    ///
    /// A successful status applies the intent's amount to its sale through
    /// the ledger — identical in effect to a direct `apply_payment` call —
    /// and returns the outcome. A failed status marks the intent failed and
    /// returns `None`. An unknown reference is NotFound; a reference that
    /// already resolved is a Conflict.
    pub async fn verify(
        &self,
        callback: VerificationCallback,
    ) -> EngineResult<Option<PaymentOutcome>> {
        let intent = self
            .db
            .intents()
            .get_by_reference(&callback.reference)
            .await?
            .ok_or_else(|| EngineError::not_found("PaymentIntent", &callback.reference))?;

        if intent.state != IntentState::Pending {
            return Err(EngineError::Conflict(format!(
                "payment intent {} already resolved",
                intent.reference
            )));
        }

        // The metadata round-trips through the gateway; reject anything that
        // doesn't parse as the closed record we issued.
        let metadata: CheckoutMetadata =
            serde_json::from_str(&intent.metadata).map_err(|e| {
                EngineError::Validation(ValidationError::InvalidFormat {
                    field: "metadata".to_string(),
                    reason: e.to_string(),
                })
            })?;

        match callback.status {
            GatewayStatus::Failed => {
                self.db
                    .intents()
                    .resolve(&intent.reference, IntentState::Failed)
                    .await?;
                warn!(reference = %intent.reference, "Gateway reported failure");
                Ok(None)
            }
            GatewayStatus::Success => {
                let sale = self
                    .db
                    .sales()
                    .get_by_id(&metadata.sale_id)
                    .await?
                    .ok_or_else(|| EngineError::not_found("Sale", &metadata.sale_id))?;

                // Apply first: the ledger's atomic unit and row-version
                // check are the real guards. The intent flip afterwards
                // closes the reference against later callbacks.
                let outcome = self
                    .ledger
                    .apply_to(sale, intent.amount(), PaymentMethod::Online)
                    .await?;

                self.db
                    .intents()
                    .resolve(&intent.reference, IntentState::Applied)
                    .await?;

                info!(
                    reference = %intent.reference,
                    sale_id = %metadata.sale_id,
                    amount = %intent.amount_cents,
                    "Gateway payment verified and applied"
                );

                Ok(Some(outcome))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
