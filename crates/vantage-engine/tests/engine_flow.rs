//! End-to-end engine tests against an in-memory database.
//!
//! These walk the worked scenarios: a 15% commission on a $1000.00 sale, a
//! $400.00 + $600.00 partial-payment sequence with an overpayment attempt in
//! between, both contract signing orders, and gateway verification mapping
//! onto the ledger.

use vantage_core::{
    CommissionType, ContractStatus, Money, PaymentMethod, PaymentStatus,
};
use vantage_db::{Database, DbConfig};
use vantage_engine::{
    Actor, Engine, EngineConfig, ErrorCode, GatewayStatus, NewContract, NewEmployee, NewSaleItem,
    NewService, OpenSale, VerificationCallback,
};

async fn engine() -> Engine {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    Engine::new(db, EngineConfig::default())
}

fn owner() -> Actor {
    Actor::owner("user-owner", "biz-1")
}

fn staff() -> Actor {
    Actor::staff("user-staff", "biz-1")
}

async fn seed_employee(engine: &Engine, commission_type: CommissionType, rate: u32, fixed: i64) -> String {
    engine
        .catalog()
        .create_employee(
            &owner(),
            NewEmployee {
                name: "Ada Okafor".to_string(),
                commission_type,
                commission_rate_bps: rate,
                fixed_commission_cents: fixed,
            },
        )
        .await
        .unwrap()
        .id
}

async fn seed_service(engine: &Engine, price: i64) -> String {
    engine
        .catalog()
        .create_service(
            &owner(),
            NewService {
                name: "Premium Styling".to_string(),
                base_price_cents: price,
            },
        )
        .await
        .unwrap()
        .id
}

fn one_item_sale(total: i64) -> OpenSale {
    OpenSale {
        customer_name: Some("Bisi Adeyemi".to_string()),
        customer_phone: Some("+2348012345678".to_string()),
        payment_method: PaymentMethod::Cash,
        items: vec![NewSaleItem {
            description: "Premium Styling".to_string(),
            quantity: 1,
            unit_price_cents: total,
            discount_cents: 0,
        }],
        discount_cents: 0,
    }
}

// =============================================================================
// Sale Recorder
// =============================================================================

#[tokio::test]
async fn record_sale_splits_commission_and_logs_activity() {
    let engine = engine().await;
    let employee_id = seed_employee(&engine, CommissionType::Percentage, 1500, 0).await;
    let service_id = seed_service(&engine, 100_000).await;

    // $1000.00 at 15% → commission $150.00, house $850.00
    let tx = engine
        .sales()
        .record_sale(&staff(), &employee_id, &service_id, Money::from_cents(100_000))
        .await
        .unwrap();

    assert_eq!(tx.commission_cents, 15_000);
    assert_eq!(tx.house_cents, 85_000);
    assert_eq!(tx.commission_cents + tx.house_cents, tx.total_cents);
    assert_eq!(tx.business_id, "biz-1");
    assert_eq!(tx.employee_id, employee_id);
    assert!(!tx.commission_paid);

    // Exactly one activity entry, matching action and employee
    let entries = engine.activity().recent("biz-1", 50).await.unwrap();
    let recorded: Vec<_> = entries
        .iter()
        .filter(|e| e.action == "sale_recorded")
        .collect();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].employee_id.as_deref(), Some(employee_id.as_str()));
    assert!(recorded[0].details.contains("$1000.00"));
}

#[tokio::test]
async fn record_sale_rejects_bad_input_without_persisting() {
    let engine = engine().await;
    let employee_id = seed_employee(&engine, CommissionType::Percentage, 1500, 0).await;
    let service_id = seed_service(&engine, 100_000).await;

    // Non-positive amount
    let err = engine
        .sales()
        .record_sale(&staff(), &employee_id, &service_id, Money::zero())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    // No service selected
    let err = engine
        .sales()
        .record_sale(&staff(), &employee_id, "", Money::from_cents(100))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    // Nothing was recorded, no activity emitted
    let transactions = engine
        .sales()
        .transactions_for_employee(&staff(), &employee_id)
        .await
        .unwrap();
    assert!(transactions.is_empty());
    assert!(engine.activity().recent("biz-1", 50).await.unwrap().is_empty());
}

#[tokio::test]
async fn record_sale_fixed_policy_allows_negative_house() {
    let engine = engine().await;
    let employee_id = seed_employee(&engine, CommissionType::Fixed, 0, 12_000).await;
    let service_id = seed_service(&engine, 5_000).await;

    let tx = engine
        .sales()
        .record_sale(&staff(), &employee_id, &service_id, Money::from_cents(5_000))
        .await
        .unwrap();

    // Preserved, not clamped
    assert_eq!(tx.commission_cents, 12_000);
    assert_eq!(tx.house_cents, -7_000);
    assert_eq!(tx.commission_cents + tx.house_cents, tx.total_cents);
}

#[tokio::test]
async fn record_sale_enforces_business_scope_and_active_service() {
    let engine = engine().await;
    let employee_id = seed_employee(&engine, CommissionType::Percentage, 1500, 0).await;
    let service_id = seed_service(&engine, 100_000).await;

    // Wrong business
    let foreign = Actor::staff("user-x", "biz-2");
    let err = engine
        .sales()
        .record_sale(&foreign, &employee_id, &service_id, Money::from_cents(100))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AuthorizationError);

    // Deactivated service
    engine
        .catalog()
        .update_service(&owner(), &service_id, "Premium Styling", 100_000, false)
        .await
        .unwrap();
    let err = engine
        .sales()
        .record_sale(&staff(), &employee_id, &service_id, Money::from_cents(100))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[tokio::test]
async fn service_price_lookup_feeds_sale_amount() {
    let engine = engine().await;
    let service_id = seed_service(&engine, 100_000).await;

    let price = engine
        .sales()
        .service_price(&staff(), &service_id)
        .await
        .unwrap();
    assert_eq!(price, Some(Money::from_cents(100_000)));

    let missing = engine
        .sales()
        .service_price(&staff(), "no-such-service")
        .await
        .unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn mark_commission_paid_flips_flag_once() {
    let engine = engine().await;
    let employee_id = seed_employee(&engine, CommissionType::Percentage, 1000, 0).await;
    let service_id = seed_service(&engine, 10_000).await;

    let tx = engine
        .sales()
        .record_sale(&staff(), &employee_id, &service_id, Money::from_cents(10_000))
        .await
        .unwrap();

    engine
        .sales()
        .mark_commission_paid(&owner(), &tx.id)
        .await
        .unwrap();

    let listed = engine
        .sales()
        .transactions_for_employee(&staff(), &employee_id)
        .await
        .unwrap();
    assert!(listed[0].commission_paid);
}

// =============================================================================
// Debt Ledger
// =============================================================================

#[tokio::test]
async fn partial_payments_drive_balance_to_zero() {
    let engine = engine().await;
    let ledger = engine.ledger();

    let sale = ledger.open_sale(&staff(), one_item_sale(100_000)).await.unwrap();
    assert_eq!(sale.balance_cents, 100_000);
    assert_eq!(sale.payment_status, PaymentStatus::Partial);

    // First payment: $400.00 → balance $600.00, still partial
    let outcome = ledger
        .apply_payment(&staff(), &sale.id, Money::from_cents(40_000), PaymentMethod::Cash)
        .await
        .unwrap();
    assert_eq!(outcome.sale.paid_cents, 40_000);
    assert_eq!(outcome.sale.balance_cents, 60_000);
    assert_eq!(outcome.sale.payment_status, PaymentStatus::Partial);
    assert_eq!(outcome.receipt.previously_paid_cents, 0);
    assert_eq!(outcome.receipt.amount_cents, 40_000);
    assert_eq!(outcome.receipt.total_paid_cents, 40_000);
    assert_eq!(outcome.receipt.balance_cents, 60_000);

    // Overpayment attempt: $700.00 against $600.00 → rejected, no change
    let err = ledger
        .apply_payment(&staff(), &sale.id, Money::from_cents(70_000), PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    let unchanged = engine.db().sales().get_by_id(&sale.id).await.unwrap().unwrap();
    assert_eq!(unchanged.paid_cents, 40_000);
    assert_eq!(unchanged.balance_cents, 60_000);
    assert_eq!(unchanged.payment_status, PaymentStatus::Partial);

    // Second payment: $600.00 → balance zero, completed
    let outcome = ledger
        .apply_payment(&staff(), &sale.id, Money::from_cents(60_000), PaymentMethod::Transfer)
        .await
        .unwrap();
    assert_eq!(outcome.sale.balance_cents, 0);
    assert_eq!(outcome.sale.payment_status, PaymentStatus::Completed);
    assert_eq!(outcome.sale.paid_cents + outcome.sale.balance_cents, 100_000);

    // Payment events reconcile with the sale row
    let total_paid = engine.db().sales().get_total_paid(&sale.id).await.unwrap();
    assert_eq!(total_paid, outcome.sale.paid_cents);
}

#[tokio::test]
async fn settled_sales_leave_the_debtor_book() {
    let engine = engine().await;
    let ledger = engine.ledger();

    let open = ledger.open_sale(&staff(), one_item_sale(50_000)).await.unwrap();
    let to_settle = ledger.open_sale(&staff(), one_item_sale(20_000)).await.unwrap();

    ledger
        .apply_payment(&staff(), &to_settle.id, Money::from_cents(20_000), PaymentMethod::Cash)
        .await
        .unwrap();

    let debtors = ledger.list_outstanding(&staff()).await.unwrap();
    let ids: Vec<&str> = debtors.iter().map(|s| s.id.as_str()).collect();
    assert!(ids.contains(&open.id.as_str()));
    assert!(!ids.contains(&to_settle.id.as_str()));
}

#[tokio::test]
async fn debtor_search_is_a_pure_filter() {
    let engine = engine().await;
    let ledger = engine.ledger();

    let mut input = one_item_sale(30_000);
    input.customer_name = Some("Chidi Eze".to_string());
    ledger.open_sale(&staff(), input).await.unwrap();
    ledger.open_sale(&staff(), one_item_sale(40_000)).await.unwrap();

    let debtors = ledger.list_outstanding(&staff()).await.unwrap();
    assert_eq!(debtors.len(), 2);

    let hits = vantage_engine::DebtLedger::search(&debtors, "chidi");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].customer_name.as_deref(), Some("Chidi Eze"));

    // Empty query matches everything
    assert_eq!(vantage_engine::DebtLedger::search(&debtors, "").len(), 2);
}

#[tokio::test]
async fn open_sale_computes_line_totals_and_discounts() {
    let engine = engine().await;

    let sale = engine
        .ledger()
        .open_sale(
            &staff(),
            OpenSale {
                customer_name: None,
                customer_phone: None,
                payment_method: PaymentMethod::Card,
                items: vec![
                    NewSaleItem {
                        description: "Cut".to_string(),
                        quantity: 2,
                        unit_price_cents: 10_000,
                        discount_cents: 1_000,
                    },
                    NewSaleItem {
                        description: "Color".to_string(),
                        quantity: 1,
                        unit_price_cents: 25_000,
                        discount_cents: 0,
                    },
                ],
                discount_cents: 4_000,
            },
        )
        .await
        .unwrap();

    // (2×10000 − 1000) + 25000 = 44000, minus 4000 order discount
    assert_eq!(sale.total_cents, 40_000);
    assert_eq!(sale.balance_cents, 40_000);

    let receipt = engine
        .ledger()
        .sale_receipt(&staff(), &sale.id)
        .await
        .unwrap();
    assert_eq!(receipt.items.len(), 2);
    assert_eq!(receipt.subtotal_cents, 44_000);
    assert_eq!(receipt.discount_cents, 4_000);
    assert_eq!(receipt.total_cents, 40_000);
}

#[tokio::test]
async fn open_sale_rejects_empty_and_invalid_items() {
    let engine = engine().await;

    let mut empty = one_item_sale(10_000);
    empty.items.clear();
    let err = engine.ledger().open_sale(&staff(), empty).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    let mut bad_qty = one_item_sale(10_000);
    bad_qty.items[0].quantity = 0;
    let err = engine.ledger().open_sale(&staff(), bad_qty).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

// =============================================================================
// Contract Lifecycle
// =============================================================================

async fn draft_contract(engine: &Engine, employee_id: &str) -> String {
    engine
        .contracts()
        .create_draft(
            &owner(),
            NewContract {
                employee_id: employee_id.to_string(),
                title: "Stylist Agreement".to_string(),
                contract_type: "full_time".to_string(),
                start_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                end_date: None,
                terms: "Standard terms.".to_string(),
                salary_cents: Some(250_000),
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn contract_signing_is_order_independent() {
    let engine = engine().await;
    let employee_id = seed_employee(&engine, CommissionType::Percentage, 1000, 0).await;

    // Employee first
    let contract_id = draft_contract(&engine, &employee_id).await;
    let c = engine
        .contracts()
        .sign_as_employee(&staff(), &contract_id, "sig-emp")
        .await
        .unwrap();
    assert_eq!(c.status, ContractStatus::Pending);
    let c = engine
        .contracts()
        .sign_as_employer(&owner(), &contract_id, "sig-own", "Vantage Ltd")
        .await
        .unwrap();
    assert_eq!(c.status, ContractStatus::Signed);

    // Employer first
    let contract_id = draft_contract(&engine, &employee_id).await;
    let c = engine
        .contracts()
        .sign_as_employer(&owner(), &contract_id, "sig-own", "Vantage Ltd")
        .await
        .unwrap();
    assert_eq!(c.status, ContractStatus::Pending);
    let c = engine
        .contracts()
        .sign_as_employee(&staff(), &contract_id, "sig-emp")
        .await
        .unwrap();
    assert_eq!(c.status, ContractStatus::Signed);
    assert!(c.is_fully_signed());
}

#[tokio::test]
async fn double_signing_is_a_conflict() {
    let engine = engine().await;
    let employee_id = seed_employee(&engine, CommissionType::Percentage, 1000, 0).await;
    let contract_id = draft_contract(&engine, &employee_id).await;

    engine
        .contracts()
        .sign_as_employee(&staff(), &contract_id, "first")
        .await
        .unwrap();

    let err = engine
        .contracts()
        .sign_as_employee(&staff(), &contract_id, "second")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);

    // Stored contract still carries the first signature
    let stored = engine
        .db()
        .contracts()
        .get_by_id(&contract_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.employee_signature.as_deref(), Some("first"));
}

#[tokio::test]
async fn termination_requires_owner_and_is_terminal() {
    let engine = engine().await;
    let employee_id = seed_employee(&engine, CommissionType::Percentage, 1000, 0).await;
    let contract_id = draft_contract(&engine, &employee_id).await;

    // Staff cannot terminate
    let err = engine
        .contracts()
        .terminate(&staff(), &contract_id, "cutbacks")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AuthorizationError);

    // Empty reason rejected
    let err = engine
        .contracts()
        .terminate(&owner(), &contract_id, "  ")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    // Owner with a reason succeeds
    let c = engine
        .contracts()
        .terminate(&owner(), &contract_id, "cutbacks")
        .await
        .unwrap();
    assert_eq!(c.status, ContractStatus::Terminated);
    assert_eq!(c.termination_reason.as_deref(), Some("cutbacks"));

    // No signatures after termination
    let err = engine
        .contracts()
        .sign_as_employee(&staff(), &contract_id, "late")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn contract_payload_carries_both_signatures() {
    let engine = engine().await;
    let employee_id = seed_employee(&engine, CommissionType::Percentage, 1000, 0).await;
    let contract_id = draft_contract(&engine, &employee_id).await;

    engine
        .contracts()
        .sign_as_employee(&staff(), &contract_id, "sig-emp")
        .await
        .unwrap();
    engine
        .contracts()
        .sign_as_employer(&owner(), &contract_id, "sig-own", "Vantage Ltd")
        .await
        .unwrap();

    let payload = engine
        .contracts()
        .render_payload(&staff(), &contract_id)
        .await
        .unwrap();
    assert_eq!(payload.status, ContractStatus::Signed);
    assert_eq!(payload.employee_signature.as_deref(), Some("sig-emp"));
    assert_eq!(payload.employer_signature.as_deref(), Some("sig-own"));
    assert_eq!(payload.employer_name.as_deref(), Some("Vantage Ltd"));
    assert!(payload.employee_signed_at.is_some());
    assert!(payload.employer_signed_at.is_some());
}

// =============================================================================
// Gateway Verification
// =============================================================================

#[tokio::test]
async fn gateway_verification_applies_like_a_direct_payment() {
    let engine = engine().await;
    let sale = engine
        .ledger()
        .open_sale(&staff(), one_item_sale(50_000))
        .await
        .unwrap();

    let charge = engine
        .gateway()
        .create_intent(&staff(), &sale.id, Money::from_cents(20_000), "ada@example.com")
        .await
        .unwrap();
    assert_eq!(charge.amount_cents, 20_000);
    assert_eq!(charge.metadata.sale_id, sale.id);

    let outcome = engine
        .gateway()
        .verify(VerificationCallback {
            reference: charge.reference.clone(),
            status: GatewayStatus::Success,
        })
        .await
        .unwrap()
        .expect("successful verification applies a payment");

    assert_eq!(outcome.sale.paid_cents, 20_000);
    assert_eq!(outcome.sale.balance_cents, 30_000);
    assert_eq!(outcome.sale.payment_status, PaymentStatus::Partial);
    assert_eq!(outcome.receipt.amount_cents, 20_000);

    // Identical in effect to apply_payment: one payment row, reconciled
    let payments = engine.ledger().payments(&staff(), &sale.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount_cents, 20_000);
}

#[tokio::test]
async fn duplicate_gateway_callback_is_rejected() {
    let engine = engine().await;
    let sale = engine
        .ledger()
        .open_sale(&staff(), one_item_sale(50_000))
        .await
        .unwrap();

    let charge = engine
        .gateway()
        .create_intent(&staff(), &sale.id, Money::from_cents(20_000), "ada@example.com")
        .await
        .unwrap();

    engine
        .gateway()
        .verify(VerificationCallback {
            reference: charge.reference.clone(),
            status: GatewayStatus::Success,
        })
        .await
        .unwrap();

    let err = engine
        .gateway()
        .verify(VerificationCallback {
            reference: charge.reference.clone(),
            status: GatewayStatus::Success,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);

    // The balance moved exactly once
    let stored = engine.db().sales().get_by_id(&sale.id).await.unwrap().unwrap();
    assert_eq!(stored.paid_cents, 20_000);
}

#[tokio::test]
async fn failed_gateway_callback_leaves_ledger_untouched() {
    let engine = engine().await;
    let sale = engine
        .ledger()
        .open_sale(&staff(), one_item_sale(50_000))
        .await
        .unwrap();

    let charge = engine
        .gateway()
        .create_intent(&staff(), &sale.id, Money::from_cents(20_000), "ada@example.com")
        .await
        .unwrap();

    let outcome = engine
        .gateway()
        .verify(VerificationCallback {
            reference: charge.reference,
            status: GatewayStatus::Failed,
        })
        .await
        .unwrap();
    assert!(outcome.is_none());

    let stored = engine.db().sales().get_by_id(&sale.id).await.unwrap().unwrap();
    assert_eq!(stored.paid_cents, 0);
    assert_eq!(stored.balance_cents, 50_000);
    assert!(engine.ledger().payments(&staff(), &sale.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn gateway_intent_validates_inputs() {
    let engine = engine().await;
    let sale = engine
        .ledger()
        .open_sale(&staff(), one_item_sale(50_000))
        .await
        .unwrap();

    // Over the balance
    let err = engine
        .gateway()
        .create_intent(&staff(), &sale.id, Money::from_cents(60_000), "ada@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    // Broken email
    let err = engine
        .gateway()
        .create_intent(&staff(), &sale.id, Money::from_cents(10_000), "not-an-email")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    // Unknown reference on verify
    let err = engine
        .gateway()
        .verify(VerificationCallback {
            reference: "no-such-reference".to_string(),
            status: GatewayStatus::Success,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}
