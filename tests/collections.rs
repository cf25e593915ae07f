mod common;

use chrono::Utc;
use common::*;
use dla_backend::entities::{CashRegisterStatus, PaymentMethod, PaymentStatus};
use dla_backend::error::AppError;
use dla_backend::models::*;
use dla_backend::services::{CashRegisterService, ExpenseService};

fn payment(order_id: i32, amount: i64, method: PaymentMethod) -> CreateCollectionRequest {
    CreateCollectionRequest {
        order_id,
        amount,
        method,
        reference: None,
    }
}

#[tokio::test]
async fn test_payments_move_status_from_partial_to_paid() {
    let fx = Fixture::new().await;
    // one box at FRECUENTE = 16,800
    let order_id = fx.place_order(1).await;
    let collections = fx.collections();

    let err = collections
        .register_payment(None, payment(order_id, 20_000, PaymentMethod::Cash))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    collections
        .register_payment(None, payment(order_id, 10_000, PaymentMethod::Transfer))
        .await
        .unwrap();
    let order = fx.orders().get_order(order_id).await.unwrap();
    assert_eq!(order.order.payment_status, PaymentStatus::Partial);
    assert_eq!(order.balance_due, 6_800);

    let balance = collections.customer_balance(fx.customer_id).await.unwrap();
    assert_eq!(balance.outstanding, 6_800);
    assert_eq!(balance.open_orders, 1);
    // no credit limit configured
    assert_eq!(balance.available_credit, None);

    collections
        .register_payment(None, payment(order_id, 6_800, PaymentMethod::Card))
        .await
        .unwrap();
    let order = fx.orders().get_order(order_id).await.unwrap();
    assert_eq!(order.order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.balance_due, 0);

    let pending = collections
        .list_receivables(&ReceivableQuery::default())
        .await
        .unwrap();
    assert!(pending.data.is_empty());

    let history = collections
        .list_collections(&CollectionQuery {
            order_id: Some(order_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(history.meta.total, 2);
}

#[tokio::test]
async fn test_cancelled_orders_take_no_payments() {
    let fx = Fixture::new().await;
    let order_id = fx.place_order(1).await;
    fx.orders()
        .cancel_order(
            order_id,
            None,
            CancelOrderRequest {
                reason: "sin existencia".to_string(),
            },
        )
        .await
        .unwrap();
    let err = fx
        .collections()
        .register_payment(None, payment(order_id, 100, PaymentMethod::Cash))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_cash_register_expected_and_difference() {
    let fx = Fixture::new().await;
    let registers = CashRegisterService::new(fx.db.clone());

    let register = registers
        .open_register(
            Some(1),
            OpenCashRegisterRequest {
                branch_id: fx.branch_id,
                opening_amount: 50_000,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(register.status, CashRegisterStatus::Open);

    let err = registers
        .open_register(
            None,
            OpenCashRegisterRequest {
                branch_id: fx.branch_id,
                opening_amount: 0,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // cash in, a transfer that does not touch the drawer, and cash out
    let order_id = fx.place_order(1).await;
    let collections = fx.collections();
    collections
        .register_payment(None, payment(order_id, 10_000, PaymentMethod::Cash))
        .await
        .unwrap();
    collections
        .register_payment(None, payment(order_id, 2_000, PaymentMethod::Transfer))
        .await
        .unwrap();
    ExpenseService::new(fx.db.clone())
        .create_expense(
            None,
            CreateExpenseRequest {
                branch_id: fx.branch_id,
                category: "combustible".to_string(),
                description: "Gasolina ruta norte".to_string(),
                amount: 3_000,
                payment_method: PaymentMethod::Cash,
                expense_date: Utc::now().date_naive(),
            },
        )
        .await
        .unwrap();

    let current = registers.current_register(fx.branch_id).await.unwrap();
    assert_eq!(current.cash_collections, 10_000);
    assert_eq!(current.cash_expenses, 3_000);
    assert_eq!(current.current_expected, 57_000);

    let closed = registers
        .close_register(
            register.id,
            CloseCashRegisterRequest {
                closing_amount: 56_500,
                notes: Some("faltante".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(closed.status, CashRegisterStatus::Closed);
    assert_eq!(closed.expected_amount, Some(57_000));
    assert_eq!(closed.difference, Some(-500));
    assert!(closed.closed_at.is_some());

    let err = registers
        .close_register(
            register.id,
            CloseCashRegisterRequest {
                closing_amount: 0,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = registers.current_register(fx.branch_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
