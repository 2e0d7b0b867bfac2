//! # Contract Repository
//!
//! Contracts transition through the state machine in vantage-core; this
//! repository persists the transitioned row, conditioned on the row version
//! the caller read. A stale write never lands.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vantage_core::Contract;

const SELECT_COLUMNS: &str = r#"
    SELECT id, employee_id, business_id, title, contract_type, start_date,
           end_date, terms, salary_cents, status,
           employee_signature, employee_signed_at,
           employer_signature, employer_signed_at, employer_name,
           termination_reason, terminated_at,
           row_version, created_at, updated_at
    FROM contracts
"#;

/// Repository for employment contracts.
#[derive(Debug, Clone)]
pub struct ContractRepository {
    pool: SqlitePool,
}

impl ContractRepository {
    /// Creates a new ContractRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ContractRepository { pool }
    }

    /// Inserts a draft contract.
    pub async fn insert(&self, contract: &Contract) -> DbResult<()> {
        debug!(id = %contract.id, employee_id = %contract.employee_id, "Inserting contract");

        sqlx::query(
            r#"
            INSERT INTO contracts (
                id, employee_id, business_id, title, contract_type, start_date,
                end_date, terms, salary_cents, status,
                employee_signature, employee_signed_at,
                employer_signature, employer_signed_at, employer_name,
                termination_reason, terminated_at,
                row_version, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20
            )
            "#,
        )
        .bind(&contract.id)
        .bind(&contract.employee_id)
        .bind(&contract.business_id)
        .bind(&contract.title)
        .bind(&contract.contract_type)
        .bind(contract.start_date)
        .bind(contract.end_date)
        .bind(&contract.terms)
        .bind(contract.salary_cents)
        .bind(contract.status)
        .bind(&contract.employee_signature)
        .bind(contract.employee_signed_at)
        .bind(&contract.employer_signature)
        .bind(contract.employer_signed_at)
        .bind(&contract.employer_name)
        .bind(&contract.termination_reason)
        .bind(contract.terminated_at)
        .bind(contract.row_version)
        .bind(contract.created_at)
        .bind(contract.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a contract by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Contract>> {
        let contract = sqlx::query_as::<_, Contract>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contract)
    }

    /// Lists a business's contracts, newest first.
    pub async fn list_for_business(&self, business_id: &str) -> DbResult<Vec<Contract>> {
        let contracts = sqlx::query_as::<_, Contract>(&format!(
            "{SELECT_COLUMNS} WHERE business_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contracts)
    }

    /// Lists an employee's contracts, newest first.
    pub async fn list_for_employee(&self, employee_id: &str) -> DbResult<Vec<Contract>> {
        let contracts = sqlx::query_as::<_, Contract>(&format!(
            "{SELECT_COLUMNS} WHERE employee_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contracts)
    }

    /// Persists a transitioned contract, conditioned on the version the
    /// caller fetched it at.
    ///
    /// The caller applies a state-machine transition in memory (signature,
    /// termination, expiry) and hands the whole row back; the write bumps
    /// `row_version` and fails with [`DbError::VersionConflict`] if another
    /// writer got there first.
    pub async fn update_transitioned(
        &self,
        contract: &Contract,
        expected_version: i64,
    ) -> DbResult<()> {
        debug!(
            id = %contract.id,
            status = ?contract.status,
            expected_version,
            "Persisting contract transition"
        );

        let result = sqlx::query(
            r#"
            UPDATE contracts SET
                status = ?2,
                employee_signature = ?3,
                employee_signed_at = ?4,
                employer_signature = ?5,
                employer_signed_at = ?6,
                employer_name = ?7,
                termination_reason = ?8,
                terminated_at = ?9,
                row_version = row_version + 1,
                updated_at = ?10
            WHERE id = ?1 AND row_version = ?11
            "#,
        )
        .bind(&contract.id)
        .bind(contract.status)
        .bind(&contract.employee_signature)
        .bind(contract.employee_signed_at)
        .bind(&contract.employer_signature)
        .bind(contract.employer_signed_at)
        .bind(&contract.employer_name)
        .bind(&contract.termination_reason)
        .bind(contract.terminated_at)
        .bind(contract.updated_at)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::version_conflict("Contract", &contract.id));
        }

        Ok(())
    }
}
