//! Repository integration tests against an in-memory SQLite database.

use chrono::Utc;
use vantage_core::ledger::LedgerUpdate;
use vantage_core::{
    ActivityLog, CommissionType, Contract, ContractStatus, Employee, IntentState, Payment,
    PaymentIntent, PaymentMethod, PaymentState, PaymentStatus, Sale, SaleItem, Service,
    Transaction,
};
use vantage_db::repository::generate_id;
use vantage_db::{Database, DbConfig, DbError};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn service(business_id: &str, price: i64, active: bool) -> Service {
    let now = Utc::now();
    Service {
        id: generate_id(),
        business_id: business_id.to_string(),
        name: "Haircut".to_string(),
        base_price_cents: price,
        is_active: active,
        created_at: now,
        updated_at: now,
    }
}

fn employee(business_id: &str) -> Employee {
    let now = Utc::now();
    Employee {
        id: generate_id(),
        business_id: business_id.to_string(),
        name: "Ada".to_string(),
        commission_type: CommissionType::Percentage,
        commission_rate_bps: 1500,
        fixed_commission_cents: 0,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn sale(business_id: &str, total: i64) -> Sale {
    let now = Utc::now();
    Sale {
        id: generate_id(),
        business_id: business_id.to_string(),
        sale_number: format!("INV-{}", generate_id()),
        customer_name: Some("Bisi Adeyemi".to_string()),
        customer_phone: Some("+2348012345678".to_string()),
        total_cents: total,
        paid_cents: 0,
        balance_cents: total,
        payment_status: PaymentStatus::Partial,
        payment_method: PaymentMethod::Cash,
        discount_cents: 0,
        row_version: 0,
        created_at: now,
        updated_at: now,
    }
}

fn payment(sale_id: &str, amount: i64) -> Payment {
    Payment {
        id: generate_id(),
        sale_id: sale_id.to_string(),
        amount_cents: amount,
        method: PaymentMethod::Cash,
        status: PaymentState::Successful,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn service_round_trip_and_active_filter() {
    let db = test_db().await;

    let active = service("biz-1", 5_000, true);
    let inactive = service("biz-1", 8_000, false);
    let other_business = service("biz-2", 5_000, true);
    db.services().insert(&active).await.unwrap();
    db.services().insert(&inactive).await.unwrap();
    db.services().insert(&other_business).await.unwrap();

    let fetched = db.services().get_by_id(&active.id).await.unwrap().unwrap();
    assert_eq!(fetched.base_price_cents, 5_000);
    assert!(fetched.is_active);

    let sellable = db.services().list_active("biz-1").await.unwrap();
    assert_eq!(sellable.len(), 1);
    assert_eq!(sellable[0].id, active.id);

    let all = db.services().list_for_business("biz-1").await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn service_update_changes_price_and_flag() {
    let db = test_db().await;
    let svc = service("biz-1", 5_000, true);
    db.services().insert(&svc).await.unwrap();

    db.services()
        .update(&svc.id, "Haircut Deluxe", 6_500, false)
        .await
        .unwrap();

    let fetched = db.services().get_by_id(&svc.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Haircut Deluxe");
    assert_eq!(fetched.base_price_cents, 6_500);
    assert!(!fetched.is_active);

    let missing = db.services().update("nope", "x", 1, true).await;
    assert!(matches!(missing, Err(DbError::NotFound { .. })));
}

#[tokio::test]
async fn employee_round_trip_and_policy_update() {
    let db = test_db().await;
    let emp = employee("biz-1");
    db.employees().insert(&emp).await.unwrap();

    let fetched = db.employees().get_by_id(&emp.id).await.unwrap().unwrap();
    assert_eq!(fetched.commission_type, CommissionType::Percentage);
    assert_eq!(fetched.commission_rate_bps, 1500);

    db.employees()
        .update_policy(&emp.id, CommissionType::Fixed, 0, 12_000)
        .await
        .unwrap();

    let fetched = db.employees().get_by_id(&emp.id).await.unwrap().unwrap();
    assert_eq!(fetched.commission_type, CommissionType::Fixed);
    assert_eq!(fetched.fixed_commission_cents, 12_000);
}

#[tokio::test]
async fn transaction_insert_and_mark_paid() {
    let db = test_db().await;
    let emp = employee("biz-1");
    let svc = service("biz-1", 100_000, true);
    db.employees().insert(&emp).await.unwrap();
    db.services().insert(&svc).await.unwrap();

    let tx = Transaction {
        id: generate_id(),
        business_id: "biz-1".to_string(),
        employee_id: emp.id.clone(),
        service_id: svc.id.clone(),
        total_cents: 100_000,
        commission_cents: 15_000,
        house_cents: 85_000,
        commission_paid: false,
        created_at: Utc::now(),
    };
    db.transactions().insert(&tx).await.unwrap();

    let listed = db.transactions().list_for_employee(&emp.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed[0].commission_cents + listed[0].house_cents,
        listed[0].total_cents
    );

    db.transactions().mark_commission_paid(&tx.id).await.unwrap();
    let fetched = db.transactions().get_by_id(&tx.id).await.unwrap().unwrap();
    assert!(fetched.commission_paid);

    // Second mark is a no-op row-wise and reports not-found
    let again = db.transactions().mark_commission_paid(&tx.id).await;
    assert!(matches!(again, Err(DbError::NotFound { .. })));
}

#[tokio::test]
async fn sale_insert_with_items_is_atomic_unit() {
    let db = test_db().await;
    let s = sale("biz-1", 7_000);
    let now = Utc::now();
    let items = vec![SaleItem {
        id: generate_id(),
        sale_id: s.id.clone(),
        description: "Haircut".to_string(),
        quantity: 2,
        unit_price_cents: 3_750,
        discount_cents: 500,
        line_total_cents: 7_000,
        created_at: now,
    }];

    db.sales().insert_sale(&s, &items).await.unwrap();

    let fetched = db.sales().get_by_id(&s.id).await.unwrap().unwrap();
    assert_eq!(fetched.balance_cents, 7_000);
    assert_eq!(fetched.payment_status, PaymentStatus::Partial);

    let stored_items = db.sales().get_items(&s.id).await.unwrap();
    assert_eq!(stored_items.len(), 1);
    assert_eq!(stored_items[0].line_total_cents, 7_000);
}

#[tokio::test]
async fn record_payment_updates_sale_atomically() {
    let db = test_db().await;
    let s = sale("biz-1", 100_000);
    db.sales().insert_sale(&s, &[]).await.unwrap();

    let update = LedgerUpdate {
        paid_cents: 40_000,
        balance_cents: 60_000,
        status: PaymentStatus::Partial,
    };
    db.sales()
        .record_payment(&payment(&s.id, 40_000), &update, 0)
        .await
        .unwrap();

    let fetched = db.sales().get_by_id(&s.id).await.unwrap().unwrap();
    assert_eq!(fetched.paid_cents, 40_000);
    assert_eq!(fetched.balance_cents, 60_000);
    assert_eq!(fetched.row_version, 1);

    // Payment events reconcile with the sale row
    assert_eq!(db.sales().get_total_paid(&s.id).await.unwrap(), 40_000);
}

#[tokio::test]
async fn record_payment_rejects_stale_version_with_no_effect() {
    let db = test_db().await;
    let s = sale("biz-1", 100_000);
    db.sales().insert_sale(&s, &[]).await.unwrap();

    let first = LedgerUpdate {
        paid_cents: 40_000,
        balance_cents: 60_000,
        status: PaymentStatus::Partial,
    };
    db.sales()
        .record_payment(&payment(&s.id, 40_000), &first, 0)
        .await
        .unwrap();

    // Second writer read version 0 before the first commit landed
    let stale = LedgerUpdate {
        paid_cents: 30_000,
        balance_cents: 70_000,
        status: PaymentStatus::Partial,
    };
    let result = db
        .sales()
        .record_payment(&payment(&s.id, 30_000), &stale, 0)
        .await;
    assert!(matches!(result, Err(DbError::VersionConflict { .. })));

    // Neither the payment nor the sale update from the stale writer landed
    let fetched = db.sales().get_by_id(&s.id).await.unwrap().unwrap();
    assert_eq!(fetched.paid_cents, 40_000);
    assert_eq!(fetched.row_version, 1);
    assert_eq!(db.sales().get_total_paid(&s.id).await.unwrap(), 40_000);
    assert_eq!(db.sales().get_payments(&s.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_outstanding_only_returns_debtors_newest_first() {
    let db = test_db().await;

    let open = sale("biz-1", 50_000);
    db.sales().insert_sale(&open, &[]).await.unwrap();

    let mut settled = sale("biz-1", 20_000);
    settled.paid_cents = 20_000;
    settled.balance_cents = 0;
    settled.payment_status = PaymentStatus::Completed;
    db.sales().insert_sale(&settled, &[]).await.unwrap();

    let foreign = sale("biz-2", 10_000);
    db.sales().insert_sale(&foreign, &[]).await.unwrap();

    let debtors = db.sales().list_outstanding("biz-1").await.unwrap();
    assert_eq!(debtors.len(), 1);
    assert_eq!(debtors[0].id, open.id);
}

#[tokio::test]
async fn contract_round_trip_and_conditional_transition() {
    let db = test_db().await;
    let emp = employee("biz-1");
    db.employees().insert(&emp).await.unwrap();

    let now = Utc::now();
    let mut contract = Contract {
        id: generate_id(),
        employee_id: emp.id.clone(),
        business_id: "biz-1".to_string(),
        title: "Stylist Agreement".to_string(),
        contract_type: "full_time".to_string(),
        start_date: now.date_naive(),
        end_date: None,
        terms: "Standard terms.".to_string(),
        salary_cents: Some(250_000),
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
    db.contracts().insert(&contract).await.unwrap();

    contract.sign_as_employee("sig-a", Utc::now()).unwrap();
    db.contracts()
        .update_transitioned(&contract, 0)
        .await
        .unwrap();

    let fetched = db.contracts().get_by_id(&contract.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, ContractStatus::Pending);
    assert_eq!(fetched.row_version, 1);
    assert!(fetched.employee_signed_at.is_some());

    // A writer holding the old version must fail
    let stale = db.contracts().update_transitioned(&contract, 0).await;
    assert!(matches!(stale, Err(DbError::VersionConflict { .. })));
}

#[tokio::test]
async fn intent_resolves_exactly_once() {
    let db = test_db().await;
    let s = sale("biz-1", 50_000);
    db.sales().insert_sale(&s, &[]).await.unwrap();

    let intent = PaymentIntent {
        reference: generate_id(),
        sale_id: s.id.clone(),
        amount_cents: 20_000,
        email: "ada@example.com".to_string(),
        metadata: "{}".to_string(),
        state: IntentState::Pending,
        created_at: Utc::now(),
        resolved_at: None,
    };
    db.intents().insert(&intent).await.unwrap();

    db.intents()
        .resolve(&intent.reference, IntentState::Applied)
        .await
        .unwrap();

    let fetched = db
        .intents()
        .get_by_reference(&intent.reference)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.state, IntentState::Applied);
    assert!(fetched.resolved_at.is_some());

    // Duplicate callback
    let again = db
        .intents()
        .resolve(&intent.reference, IntentState::Applied)
        .await;
    assert!(matches!(again, Err(DbError::VersionConflict { .. })));
}

#[tokio::test]
async fn activity_log_appends_and_lists() {
    let db = test_db().await;

    for i in 0..3 {
        let entry = ActivityLog {
            id: generate_id(),
            business_id: "biz-1".to_string(),
            employee_id: Some("emp-1".to_string()),
            action: "sale_recorded".to_string(),
            details: format!("recorded sale #{i}"),
            created_at: Utc::now(),
        };
        db.activity().append(&entry).await.unwrap();
    }

    let listed = db.activity().list_for_business("biz-1", 10).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|e| e.action == "sale_recorded"));

    let limited = db.activity().list_for_business("biz-1", 2).await.unwrap();
    assert_eq!(limited.len(), 2);
}
