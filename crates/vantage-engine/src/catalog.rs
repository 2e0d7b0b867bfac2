//! # Catalog Management
//!
//! Owner-only administration of the service catalog and employee commission
//! policies. Settings changes are authorized upstream, but the owner check
//! is repeated here so a missing upstream check fails hard.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use vantage_core::validation::{
    validate_commission_rate_bps, validate_name, validate_price_cents,
};
use vantage_core::{CommissionType, Employee, Service};
use vantage_db::Database;

use crate::auth::Actor;
use crate::error::EngineResult;

/// Input for creating a catalog service.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub base_price_cents: i64,
}

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub commission_type: CommissionType,
    pub commission_rate_bps: u32,
    pub fixed_commission_cents: i64,
}

/// Owner-facing catalog and staff administration.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    /// Creates a new CatalogService.
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Creates a service in the caller's catalog.
    pub async fn create_service(&self, actor: &Actor, input: NewService) -> EngineResult<Service> {
        actor.require_owner("edit the service catalog")?;
        validate_name("service name", &input.name)?;
        validate_price_cents(input.base_price_cents)?;

        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4().to_string(),
            business_id: actor.business_id.clone(),
            name: input.name.trim().to_string(),
            base_price_cents: input.base_price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.db.services().insert(&service).await?;
        info!(service_id = %service.id, name = %service.name, "Service created");
        Ok(service)
    }

    /// Updates a service's name, price, and active flag.
    ///
    /// Past transactions keep their frozen split; only future recordings see
    /// the new price.
    pub async fn update_service(
        &self,
        actor: &Actor,
        service_id: &str,
        name: &str,
        base_price_cents: i64,
        is_active: bool,
    ) -> EngineResult<()> {
        actor.require_owner("edit the service catalog")?;
        validate_name("service name", name)?;
        validate_price_cents(base_price_cents)?;

        // Scope check before the write
        let service = self
            .db
            .services()
            .get_by_id(service_id)
            .await?
            .ok_or_else(|| crate::error::EngineError::not_found("Service", service_id))?;
        actor.require_same_business(&service.business_id)?;

        self.db
            .services()
            .update(service_id, name.trim(), base_price_cents, is_active)
            .await?;

        info!(service_id, "Service updated");
        Ok(())
    }

    /// Creates an employee with a commission policy.
    pub async fn create_employee(
        &self,
        actor: &Actor,
        input: NewEmployee,
    ) -> EngineResult<Employee> {
        actor.require_owner("manage employees")?;
        validate_name("employee name", &input.name)?;
        validate_commission_rate_bps(input.commission_rate_bps)?;
        validate_price_cents(input.fixed_commission_cents)?;

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            business_id: actor.business_id.clone(),
            name: input.name.trim().to_string(),
            commission_type: input.commission_type,
            commission_rate_bps: input.commission_rate_bps,
            fixed_commission_cents: input.fixed_commission_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.db.employees().insert(&employee).await?;
        info!(employee_id = %employee.id, name = %employee.name, "Employee created");
        Ok(employee)
    }

    /// Changes an employee's commission policy. Applies to future sales only.
    pub async fn update_commission_policy(
        &self,
        actor: &Actor,
        employee_id: &str,
        commission_type: CommissionType,
        commission_rate_bps: u32,
        fixed_commission_cents: i64,
    ) -> EngineResult<()> {
        actor.require_owner("manage employees")?;
        validate_commission_rate_bps(commission_rate_bps)?;
        validate_price_cents(fixed_commission_cents)?;

        let employee = self
            .db
            .employees()
            .get_by_id(employee_id)
            .await?
            .ok_or_else(|| crate::error::EngineError::not_found("Employee", employee_id))?;
        actor.require_same_business(&employee.business_id)?;

        self.db
            .employees()
            .update_policy(
                employee_id,
                commission_type,
                commission_rate_bps,
                fixed_commission_cents,
            )
            .await?;

        info!(employee_id, "Commission policy updated");
        Ok(())
    }

    /// Lists the employees of the caller's business.
    pub async fn employees(&self, actor: &Actor) -> EngineResult<Vec<Employee>> {
        Ok(self
            .db
            .employees()
            .list_for_business(&actor.business_id)
            .await?)
    }
}
