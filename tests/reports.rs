mod common;

use chrono::Utc;
use common::*;
use dla_backend::entities::{OrderStatus, PaymentMethod, PaymentType};
use dla_backend::models::*;
use dla_backend::services::ReportService;

/// Three orders placed today: 2 boxes of the fixture product, 3 boxes of a
/// second product, and 1 box of the fixture product that gets cancelled.
struct SalesDay {
    fx: Fixture,
    first: i32,
    second: i32,
    other_product: i32,
}

async fn sales_day() -> SalesDay {
    let fx = Fixture::new().await;
    let other_product = create_product(&fx.db, "FRI-001").await;
    add_stock(&fx.db, other_product, fx.branch_id, 240).await;

    let first = fx.place_order(2).await;
    let mut request = fx.order_request(3, PaymentType::Credit);
    request.items[0].product_id = other_product;
    let second = fx.orders().create_order(None, request).await.unwrap().order.id;
    let cancelled = fx.place_order(1).await;
    fx.orders()
        .cancel_order(
            cancelled,
            None,
            CancelOrderRequest {
                reason: "duplicado".to_string(),
            },
        )
        .await
        .unwrap();

    SalesDay {
        fx,
        first,
        second,
        other_product,
    }
}

fn today() -> ReportRangeQuery {
    let today = Utc::now().date_naive();
    ReportRangeQuery {
        from: today,
        to: today,
        branch_id: None,
    }
}

#[tokio::test]
async fn test_daily_sales_leave_out_cancelled_orders() {
    let day = sales_day().await;
    let reports = ReportService::new(day.fx.db.clone());

    let daily = reports.sales_by_day(&today()).await.unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].date, Utc::now().date_naive());
    assert_eq!(daily[0].order_count, 2);
    assert_eq!(daily[0].total, 33_600 + 50_400);

    let summary = reports.sales_summary(&today()).await.unwrap();
    assert_eq!(summary.order_count, 2);
    assert_eq!(summary.net_sales, 84_000);
    assert_eq!(summary.average_ticket, 42_000);
    let cancelled = summary
        .by_status
        .iter()
        .find(|s| s.status == OrderStatus::Cancelled)
        .unwrap();
    assert_eq!(cancelled.count, 1);
}

#[tokio::test]
async fn test_top_products_rank_by_pieces() {
    let day = sales_day().await;
    let reports = ReportService::new(day.fx.db.clone());
    let range = today();

    let top = reports
        .top_products(&TopProductsQuery {
            from: range.from,
            to: range.to,
            branch_id: Some(day.fx.branch_id),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].product_id, day.other_product);
    assert_eq!(top[0].pieces, 36);
    assert_eq!(top[0].revenue, 50_400);
    // the cancelled box does not count
    assert_eq!(top[1].product_id, day.fx.product_id);
    assert_eq!(top[1].pieces, 24);

    let only_first = reports
        .top_products(&TopProductsQuery {
            from: range.from,
            to: range.to,
            branch_id: None,
            limit: Some(1),
        })
        .await
        .unwrap();
    assert_eq!(only_first.len(), 1);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let day = sales_day().await;
    let fx = &day.fx;
    let orders = fx.orders();
    for status in [OrderStatus::Confirmed, OrderStatus::Preparing] {
        orders
            .update_status(day.first, None, UpdateOrderStatusRequest { status })
            .await
            .unwrap();
    }
    // 96 pieces left, below the 9 box minimum
    fx.inventory()
        .create_stock_rule(CreateStockRuleRequest {
            product_id: fx.product_id,
            branch_id: fx.branch_id,
            min_boxes: 9,
            min_pieces: 0,
        })
        .await
        .unwrap();
    fx.collections()
        .register_payment(
            None,
            CreateCollectionRequest {
                order_id: day.second,
                amount: 10_000,
                method: PaymentMethod::Transfer,
                reference: None,
            },
        )
        .await
        .unwrap();

    let dashboard = ReportService::new(fx.db.clone())
        .dashboard(&DashboardQuery::default())
        .await
        .unwrap();
    assert_eq!(dashboard.orders_today, 3);
    assert_eq!(dashboard.sales_today, 84_000);
    assert_eq!(dashboard.pending_deliveries, 1);
    assert_eq!(dashboard.stock_alerts, 1);
    assert_eq!(dashboard.receivables_total, 33_600 + 50_400 - 10_000);
}
