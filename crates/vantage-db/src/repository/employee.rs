//! # Employee Repository

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vantage_core::{CommissionType, Employee};

const SELECT_COLUMNS: &str = r#"
    SELECT id, business_id, name, commission_type, commission_rate_bps,
           fixed_commission_cents, is_active, created_at, updated_at
    FROM employees
"#;

/// Repository for employees and their commission policies.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Inserts an employee.
    pub async fn insert(&self, employee: &Employee) -> DbResult<()> {
        debug!(id = %employee.id, name = %employee.name, "Inserting employee");

        sqlx::query(
            r#"
            INSERT INTO employees (
                id, business_id, name, commission_type, commission_rate_bps,
                fixed_commission_cents, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.business_id)
        .bind(&employee.name)
        .bind(employee.commission_type)
        .bind(employee.commission_rate_bps)
        .bind(employee.fixed_commission_cents)
        .bind(employee.is_active)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an employee by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    /// Lists the employees of a business.
    pub async fn list_for_business(&self, business_id: &str) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "{SELECT_COLUMNS} WHERE business_id = ?1 ORDER BY name"
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Updates an employee's commission policy.
    pub async fn update_policy(
        &self,
        id: &str,
        commission_type: CommissionType,
        commission_rate_bps: u32,
        fixed_commission_cents: i64,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE employees SET
                commission_type = ?2,
                commission_rate_bps = ?3,
                fixed_commission_cents = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(commission_type)
        .bind(commission_rate_bps)
        .bind(fixed_commission_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id));
        }

        Ok(())
    }
}
