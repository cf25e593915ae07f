mod common;

use chrono::{NaiveDate, Utc};
use common::*;
use dla_backend::entities::{OrderStatus, RouteStatus, StopStatus};
use dla_backend::error::AppError;
use dla_backend::models::*;
use dla_backend::services::SettingsService;

/// Places a one-box order and walks it up to PREPARING
async fn prepared_order(fx: &Fixture) -> i32 {
    let order_id = fx.place_order(1).await;
    let orders = fx.orders();
    for next in [OrderStatus::Confirmed, OrderStatus::Preparing] {
        orders
            .update_status(order_id, None, UpdateOrderStatusRequest { status: next })
            .await
            .unwrap();
    }
    order_id
}

async fn driver(fx: &Fixture) -> i32 {
    fx.deliveries()
        .create_driver(CreateDriverRequest {
            name: "Juan Pérez".to_string(),
            phone: None,
            license_number: Some("LIC-123".to_string()),
            vehicle: Some("Nissan NP300".to_string()),
        })
        .await
        .unwrap()
        .id
}

fn route_request(fx: &Fixture, driver_id: i32, order_ids: Vec<i32>) -> CreateRouteRequest {
    CreateRouteRequest {
        branch_id: fx.branch_id,
        driver_id,
        route_date: Utc::now().date_naive(),
        vehicle: None,
        order_ids,
        notes: None,
    }
}

fn stop_for(detail: &RouteDetail, order_id: i32) -> i32 {
    detail
        .stops
        .iter()
        .find(|s| s.stop.order_id == order_id)
        .map(|s| s.stop.id)
        .expect("stop for order")
}

#[tokio::test]
async fn test_route_delivers_and_fails_stops() {
    let fx = Fixture::new().await;
    let first = prepared_order(&fx).await;
    let second = prepared_order(&fx).await;
    let driver_id = driver(&fx).await;
    let deliveries = fx.deliveries();

    let planned = deliveries
        .create_route(route_request(&fx, driver_id, vec![first, second]))
        .await
        .unwrap();
    assert_eq!(planned.route.status, RouteStatus::Planned);
    assert_eq!(planned.route.vehicle.as_deref(), Some("Nissan NP300"));
    assert_eq!(planned.stops.len(), 2);
    assert_eq!(planned.stops[0].stop.sequence, 1);

    let started = deliveries.start_route(planned.route.id, None).await.unwrap();
    assert_eq!(started.route.status, RouteStatus::InProgress);
    assert!(
        started
            .stops
            .iter()
            .all(|s| s.order_status == OrderStatus::InRoute)
    );

    let route_id = planned.route.id;
    deliveries
        .deliver_stop(
            route_id,
            stop_for(&planned, first),
            None,
            StopUpdateRequest::default(),
        )
        .await
        .unwrap();
    let detail = deliveries
        .fail_stop(
            route_id,
            stop_for(&planned, second),
            None,
            StopUpdateRequest {
                notes: Some("cliente ausente".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(detail.route.status, RouteStatus::Completed);
    assert!(detail.route.completed_at.is_some());
    let orders = fx.orders();
    let delivered = orders.get_order(first).await.unwrap().order;
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.delivered_at.is_some());
    let failed = orders.get_order(second).await.unwrap().order;
    assert_eq!(failed.status, OrderStatus::Preparing);

    let failed_stop = detail
        .stops
        .iter()
        .find(|s| s.stop.order_id == second)
        .unwrap();
    assert_eq!(failed_stop.stop.status, StopStatus::Failed);
    assert_eq!(failed_stop.stop.notes.as_deref(), Some("cliente ausente"));

    // 16,800 earns 16 points at 10.00 per point
    let wallet = fx.loyalty().get_wallet(fx.customer_id).await.unwrap();
    assert_eq!(wallet.available_points, 16);

    // both orders keep their stock out of the warehouse
    assert_eq!(fx.stock().await, 96);

    // the failed order can go out again
    let retry = deliveries
        .create_route(route_request(&fx, driver_id, vec![second]))
        .await
        .unwrap();
    assert_eq!(retry.stops.len(), 1);
}

#[tokio::test]
async fn test_route_only_takes_prepared_orders() {
    let fx = Fixture::new().await;
    let created = fx.place_order(1).await;
    let driver_id = driver(&fx).await;

    let err = fx
        .deliveries()
        .create_route(route_request(&fx, driver_id, vec![created]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_order_cannot_sit_on_two_open_routes() {
    let fx = Fixture::new().await;
    let order_id = prepared_order(&fx).await;
    let driver_id = driver(&fx).await;
    let deliveries = fx.deliveries();

    deliveries
        .create_route(route_request(&fx, driver_id, vec![order_id]))
        .await
        .unwrap();
    let err = deliveries
        .create_route(route_request(&fx, driver_id, vec![order_id]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_route_date_must_be_a_delivery_day() {
    let fx = Fixture::new().await;
    let order_id = prepared_order(&fx).await;
    let driver_id = driver(&fx).await;
    SettingsService::new(fx.db.clone())
        .update_branch(
            fx.branch_id,
            UpdateBranchRequest {
                delivery_days: Some(vec!["MON".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut request = route_request(&fx, driver_id, vec![order_id]);
    // a Tuesday
    request.route_date = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
    let err = fx.deliveries().create_route(request.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // a Monday
    request.route_date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    fx.deliveries().create_route(request).await.unwrap();
}

#[tokio::test]
async fn test_only_planned_routes_can_be_cancelled() {
    let fx = Fixture::new().await;
    let order_id = prepared_order(&fx).await;
    let driver_id = driver(&fx).await;
    let deliveries = fx.deliveries();

    let first = deliveries
        .create_route(route_request(&fx, driver_id, vec![order_id]))
        .await
        .unwrap();
    let cancelled = deliveries.cancel_route(first.route.id).await.unwrap();
    assert_eq!(cancelled.status, RouteStatus::Cancelled);
    assert_eq!(
        fx.orders().get_order(order_id).await.unwrap().order.status,
        OrderStatus::Preparing
    );

    let second = deliveries
        .create_route(route_request(&fx, driver_id, vec![order_id]))
        .await
        .unwrap();
    deliveries.start_route(second.route.id, None).await.unwrap();
    let err = deliveries.cancel_route(second.route.id).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_driver_with_routes_cannot_be_deleted() {
    let fx = Fixture::new().await;
    let order_id = prepared_order(&fx).await;
    let driver_id = driver(&fx).await;
    let deliveries = fx.deliveries();
    deliveries
        .create_route(route_request(&fx, driver_id, vec![order_id]))
        .await
        .unwrap();

    let err = deliveries.delete_driver(driver_id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_routed_order_only_moves_through_its_stop() {
    let fx = Fixture::new().await;
    let order_id = prepared_order(&fx).await;
    let driver_id = driver(&fx).await;
    let deliveries = fx.deliveries();
    let orders = fx.orders();

    let planned = deliveries
        .create_route(route_request(&fx, driver_id, vec![order_id]))
        .await
        .unwrap();
    let err = orders
        .update_status(
            order_id,
            None,
            UpdateOrderStatusRequest {
                status: OrderStatus::InRoute,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    deliveries.start_route(planned.route.id, None).await.unwrap();
    for status in [OrderStatus::Delivered, OrderStatus::Preparing] {
        let err = orders
            .update_status(order_id, None, UpdateOrderStatusRequest { status })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
    assert_eq!(
        orders.get_order(order_id).await.unwrap().order.status,
        OrderStatus::InRoute
    );

    let detail = deliveries
        .deliver_stop(
            planned.route.id,
            stop_for(&planned, order_id),
            None,
            StopUpdateRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(detail.route.status, RouteStatus::Completed);
    assert_eq!(detail.stops[0].order_status, OrderStatus::Delivered);
}

#[tokio::test]
async fn test_cancelling_a_planned_order_releases_its_stop() {
    let fx = Fixture::new().await;
    let kept = prepared_order(&fx).await;
    let dropped = prepared_order(&fx).await;
    let driver_id = driver(&fx).await;
    let deliveries = fx.deliveries();

    let planned = deliveries
        .create_route(route_request(&fx, driver_id, vec![kept, dropped]))
        .await
        .unwrap();
    assert_eq!(fx.stock().await, 96);

    fx.orders()
        .cancel_order(
            dropped,
            None,
            CancelOrderRequest {
                reason: "cliente canceló".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(fx.stock().await, 108);

    let started = deliveries.start_route(planned.route.id, None).await.unwrap();
    assert_eq!(started.route.status, RouteStatus::InProgress);
    let kept_stop = started.stops.iter().find(|s| s.stop.order_id == kept).unwrap();
    assert_eq!(kept_stop.order_status, OrderStatus::InRoute);
    let dropped_stop = started
        .stops
        .iter()
        .find(|s| s.stop.order_id == dropped)
        .unwrap();
    assert_eq!(dropped_stop.stop.status, StopStatus::Failed);
    assert_eq!(dropped_stop.order_status, OrderStatus::Cancelled);

    // a route whose every order was cancelled completes as soon as it starts
    let lone = prepared_order(&fx).await;
    let empty = deliveries
        .create_route(route_request(&fx, driver_id, vec![lone]))
        .await
        .unwrap();
    fx.orders()
        .cancel_order(
            lone,
            None,
            CancelOrderRequest {
                reason: "sin stock".to_string(),
            },
        )
        .await
        .unwrap();
    let finished = deliveries.start_route(empty.route.id, None).await.unwrap();
    assert_eq!(finished.route.status, RouteStatus::Completed);
}
