//! # vantage-engine: Back-Office Services
//!
//! The orchestration layer of Vantage Back Office, and the only surface a
//! calling layer (UI or API) needs.
//!
//! ## Services
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Engine Services                                │
//! │                                                                         │
//! │   SaleRecorder      record_sale, service_price, mark_commission_paid    │
//! │   DebtLedger        open_sale, apply_payment, list_outstanding          │
//! │   ContractService   create_draft, sign_as_*, terminate, mark_expired    │
//! │   CheckoutGateway   create_intent, verify (callback → apply_payment)    │
//! │   CatalogService    owner-only service/employee administration          │
//! │   ActivityRecorder  best-effort activity log                            │
//! │                                                                         │
//! │   Every operation takes an explicit Actor (user, business, role);       │
//! │   there is no ambient session state.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use vantage_db::{Database, DbConfig};
//! use vantage_engine::{Engine, EngineConfig, Actor};
//!
//! let db = Database::new(DbConfig::new("./vantage.db")).await?;
//! let engine = Engine::new(db, EngineConfig::from_env());
//!
//! let actor = Actor::staff("user-1", "biz-1");
//! let tx = engine.sales().record_sale(&actor, &emp_id, &svc_id, amount).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod activity;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod contracts;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod sales;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use activity::ActivityRecorder;
pub use auth::{Actor, Role};
pub use catalog::{CatalogService, NewEmployee, NewService};
pub use config::EngineConfig;
pub use contracts::{ContractPayload, ContractService, NewContract};
pub use error::{EngineError, EngineResult, ErrorCode};
pub use gateway::{
    ChargeRequest, CheckoutGateway, CheckoutMetadata, GatewayStatus, VerificationCallback,
};
pub use ledger::{
    DebtLedger, NewSaleItem, OpenSale, PaymentOutcome, PaymentReceipt, SaleReceiptPayload,
};
pub use sales::SaleRecorder;

use vantage_db::Database;

// =============================================================================
// Engine Facade
// =============================================================================

/// Entry point bundling all services over one database handle.
///
/// Services are cheap to construct (they share the pool), so accessors
/// return fresh instances the way repositories do in vantage-db.
#[derive(Debug, Clone)]
pub struct Engine {
    db: Database,
    config: EngineConfig,
}

impl Engine {
    /// Creates a new Engine.
    pub fn new(db: Database, config: EngineConfig) -> Self {
        Engine { db, config }
    }

    /// Returns the sale recorder.
    pub fn sales(&self) -> SaleRecorder {
        SaleRecorder::new(self.db.clone(), self.config.clone())
    }

    /// Returns the debt ledger.
    pub fn ledger(&self) -> DebtLedger {
        DebtLedger::new(self.db.clone(), self.config.clone())
    }

    /// Returns the contract lifecycle service.
    pub fn contracts(&self) -> ContractService {
        ContractService::new(self.db.clone())
    }

    /// Returns the checkout gateway service.
    pub fn gateway(&self) -> CheckoutGateway {
        CheckoutGateway::new(self.db.clone(), self.config.clone())
    }

    /// Returns the owner-facing catalog administration service.
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.db.clone())
    }

    /// Returns the activity recorder.
    pub fn activity(&self) -> ActivityRecorder {
        ActivityRecorder::new(self.db.clone())
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }
}
