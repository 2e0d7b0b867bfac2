//! # Contract Lifecycle Service
//!
//! Wraps the pure state machine in `vantage_core::contract` with
//! persistence: fetch, transition in memory, write conditioned on the row
//! version read. A rejected transition or a stale write leaves the stored
//! contract untouched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use vantage_core::validation::validate_name;
use vantage_core::{ActivityAction, Contract, ContractStatus, ValidationError};
use vantage_db::Database;

use crate::activity::ActivityRecorder;
use crate::auth::Actor;
use crate::error::{EngineError, EngineResult};

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// Input for drafting a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    pub employee_id: String,
    pub title: String,
    pub contract_type: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub terms: String,
    pub salary_cents: Option<i64>,
}

/// Payload for the (external) contract PDF renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractPayload {
    pub title: String,
    pub contract_type: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub terms: String,
    pub salary_cents: Option<i64>,
    pub status: ContractStatus,
    pub employee_signature: Option<String>,
    pub employee_signed_at: Option<DateTime<Utc>>,
    pub employer_signature: Option<String>,
    pub employer_signed_at: Option<DateTime<Utc>>,
    pub employer_name: Option<String>,
}

// =============================================================================
// Contract Service
// =============================================================================

/// Service for drafting, signing, terminating and expiring contracts.
#[derive(Debug, Clone)]
pub struct ContractService {
    db: Database,
    activity: ActivityRecorder,
}

impl ContractService {
    /// Creates a new ContractService.
    pub fn new(db: Database) -> Self {
        let activity = ActivityRecorder::new(db.clone());
        ContractService { db, activity }
    }

    /// Drafts a contract for an employee of the caller's business.
    pub async fn create_draft(&self, actor: &Actor, input: NewContract) -> EngineResult<Contract> {
        validate_name("contract title", &input.title)?;
        if input.terms.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "terms".to_string(),
            }
            .into());
        }

        let employee = self
            .db
            .employees()
            .get_by_id(&input.employee_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", &input.employee_id))?;
        actor.require_same_business(&employee.business_id)?;

        let now = Utc::now();
        let contract = Contract {
            id: Uuid::new_v4().to_string(),
            employee_id: employee.id.clone(),
            business_id: employee.business_id.clone(),
            title: input.title.trim().to_string(),
            contract_type: input.contract_type.trim().to_string(),
            start_date: input.start_date,
            end_date: input.end_date,
            terms: input.terms,
            salary_cents: input.salary_cents,
            status: ContractStatus::Draft,
            employee_signature: None,
            employee_signed_at: None,
            employer_signature: None,
            employer_signed_at: None,
            employer_name: None,
            termination_reason: None,
            terminated_at: None,
            row_version: 0,
            created_at: now,
            updated_at: now,
        };

        self.db.contracts().insert(&contract).await?;
        info!(contract_id = %contract.id, employee_id = %contract.employee_id, "Contract drafted");
        Ok(contract)
    }

    /// Records the employee's signature.
    pub async fn sign_as_employee(
        &self,
        actor: &Actor,
        contract_id: &str,
        signature: &str,
    ) -> EngineResult<Contract> {
        let mut contract = self.fetch_scoped(actor, contract_id).await?;
        let read_version = contract.row_version;

        contract.sign_as_employee(signature, Utc::now())?;
        self.persist_transition(contract, read_version, "employee signature")
            .await
    }

    /// Records the employer's signature.
    pub async fn sign_as_employer(
        &self,
        actor: &Actor,
        contract_id: &str,
        signature: &str,
        employer_name: &str,
    ) -> EngineResult<Contract> {
        let mut contract = self.fetch_scoped(actor, contract_id).await?;
        let read_version = contract.row_version;

        contract.sign_as_employer(signature, employer_name, Utc::now())?;
        self.persist_transition(contract, read_version, "employer signature")
            .await
    }

    /// Terminates a contract. Owner only; irreversible.
    pub async fn terminate(
        &self,
        actor: &Actor,
        contract_id: &str,
        reason: &str,
    ) -> EngineResult<Contract> {
        actor.require_owner("terminate contracts")?;

        let mut contract = self.fetch_scoped(actor, contract_id).await?;
        let read_version = contract.row_version;

        contract.terminate(reason, Utc::now())?;
        let contract = self
            .persist_transition(contract, read_version, "termination")
            .await?;

        self.activity
            .record(
                &contract.business_id,
                Some(&contract.employee_id),
                ActivityAction::ContractTerminated,
                format!("contract '{}' terminated", contract.title),
            )
            .await;

        Ok(contract)
    }

    /// Marks a contract expired once its end date has passed.
    pub async fn mark_expired(&self, actor: &Actor, contract_id: &str) -> EngineResult<Contract> {
        let mut contract = self.fetch_scoped(actor, contract_id).await?;
        let read_version = contract.row_version;

        contract.expire(Utc::now())?;
        self.persist_transition(contract, read_version, "expiry").await
    }

    /// Lists a business's contracts, newest first.
    pub async fn list_for_business(&self, actor: &Actor) -> EngineResult<Vec<Contract>> {
        Ok(self
            .db
            .contracts()
            .list_for_business(&actor.business_id)
            .await?)
    }

    /// Lists an employee's contracts, newest first.
    pub async fn list_for_employee(
        &self,
        actor: &Actor,
        employee_id: &str,
    ) -> EngineResult<Vec<Contract>> {
        let employee = self
            .db
            .employees()
            .get_by_id(employee_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", employee_id))?;
        actor.require_same_business(&employee.business_id)?;

        Ok(self.db.contracts().list_for_employee(employee_id).await?)
    }

    /// Builds the payload for the contract PDF renderer.
    pub async fn render_payload(
        &self,
        actor: &Actor,
        contract_id: &str,
    ) -> EngineResult<ContractPayload> {
        let contract = self.fetch_scoped(actor, contract_id).await?;

        Ok(ContractPayload {
            title: contract.title,
            contract_type: contract.contract_type,
            start_date: contract.start_date,
            end_date: contract.end_date,
            terms: contract.terms,
            salary_cents: contract.salary_cents,
            status: contract.status,
            employee_signature: contract.employee_signature,
            employee_signed_at: contract.employee_signed_at,
            employer_signature: contract.employer_signature,
            employer_signed_at: contract.employer_signed_at,
            employer_name: contract.employer_name,
        })
    }

    async fn fetch_scoped(&self, actor: &Actor, contract_id: &str) -> EngineResult<Contract> {
        let contract = self
            .db
            .contracts()
            .get_by_id(contract_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Contract", contract_id))?;
        actor.require_same_business(&contract.business_id)?;
        Ok(contract)
    }

    /// Persists a transitioned contract conditioned on the version it was
    /// read at, and emits the signature activity entry where applicable.
    async fn persist_transition(
        &self,
        mut contract: Contract,
        read_version: i64,
        event: &str,
    ) -> EngineResult<Contract> {
        self.db
            .contracts()
            .update_transitioned(&contract, read_version)
            .await?;
        contract.row_version = read_version + 1;

        info!(
            contract_id = %contract.id,
            status = ?contract.status,
            event,
            "Contract transition persisted"
        );

        if contract.status == ContractStatus::Signed {
            self.activity
                .record(
                    &contract.business_id,
                    Some(&contract.employee_id),
                    ActivityAction::ContractSigned,
                    format!("contract '{}' fully signed", contract.title),
                )
                .await;
        }

        Ok(contract)
    }
}
