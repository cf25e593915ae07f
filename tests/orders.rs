mod common;

use chrono::{Duration, Utc};
use common::*;
use dla_backend::entities::{CustomerTier, DiscountType, MovementType, OrderStatus, PaymentType};
use dla_backend::error::AppError;
use dla_backend::models::*;
use dla_backend::services::ProductService;

fn status(next: OrderStatus) -> UpdateOrderStatusRequest {
    UpdateOrderStatusRequest { status: next }
}

#[tokio::test]
async fn test_order_priced_by_customer_tier() {
    let fx = Fixture::new().await;
    let detail = fx
        .orders()
        .create_order(Some(1), fx.order_request(2, PaymentType::Cash))
        .await
        .unwrap();

    // FRECUENTE piece price 14.00, 12 per box
    assert_eq!(detail.order.subtotal, 2 * 12 * 1400);
    assert_eq!(detail.order.total, detail.order.subtotal);
    assert_eq!(detail.order.status, OrderStatus::Created);
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].item.pieces, 24);
    assert_eq!(detail.balance_due, detail.order.total);
    assert!(detail.order.order_number.starts_with("PED-"));

    // nothing leaves the warehouse until the order is confirmed
    assert_eq!(fx.stock().await, 120);
}

#[tokio::test]
async fn test_confirm_takes_stock_and_cancel_returns_it() {
    let fx = Fixture::new().await;
    let order_id = fx.place_order(2).await;
    let orders = fx.orders();

    let confirmed = orders
        .update_status(order_id, None, status(OrderStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    assert!(confirmed.confirmed_at.is_some());
    assert_eq!(fx.stock().await, 96);

    let cancelled = orders
        .cancel_order(
            order_id,
            None,
            CancelOrderRequest {
                reason: "cliente cerrado".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("cliente cerrado"));
    assert_eq!(fx.stock().await, 120);

    let movements = fx
        .inventory()
        .list_movements(&MovementQuery {
            product_id: Some(fx.product_id),
            ..Default::default()
        })
        .await
        .unwrap();
    let types: Vec<MovementType> = movements
        .data
        .iter()
        .map(|m| m.movement_type.clone())
        .collect();
    assert!(types.contains(&MovementType::Sale));
    assert!(types.contains(&MovementType::Return));
}

#[tokio::test]
async fn test_cancel_before_confirm_leaves_stock_alone() {
    let fx = Fixture::new().await;
    let order_id = fx.place_order(1).await;
    fx.orders()
        .cancel_order(
            order_id,
            None,
            CancelOrderRequest {
                reason: "duplicado".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(fx.stock().await, 120);
}

#[tokio::test]
async fn test_illegal_transition_is_rejected() {
    let fx = Fixture::new().await;
    let order_id = fx.place_order(1).await;
    let orders = fx.orders();

    let err = orders
        .update_status(order_id, None, status(OrderStatus::Delivered))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = orders
        .update_status(order_id, None, status(OrderStatus::Cancelled))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let detail = orders.get_order(order_id).await.unwrap();
    assert_eq!(detail.order.status, OrderStatus::Created);
}

#[tokio::test]
async fn test_confirm_without_stock_changes_nothing() {
    let fx = Fixture::new().await;
    // 11 boxes = 132 pieces, only 120 on hand
    let order_id = fx.place_order(11).await;
    let orders = fx.orders();

    let err = orders
        .update_status(order_id, None, status(OrderStatus::Confirmed))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert_eq!(fx.stock().await, 120);
    assert_eq!(
        orders.get_order(order_id).await.unwrap().order.status,
        OrderStatus::Created
    );
}

#[tokio::test]
async fn test_blocked_customer_cannot_order() {
    let fx = Fixture::new().await;
    let customer = fx.customers().toggle_blocked(fx.customer_id).await.unwrap();
    assert!(customer.is_blocked);

    let err = fx
        .orders()
        .create_order(None, fx.order_request(1, PaymentType::Cash))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_credit_limit_applies_to_credit_orders() {
    let fx = Fixture::new().await;
    let customer_id = create_customer(&fx.db, "CLI-0002", CustomerTier::Frecuente, 20_000).await;
    let orders = fx.orders();

    let mut request = fx.order_request(1, PaymentType::Credit);
    request.customer_id = customer_id;
    // 16,800 fits under the 20,000 limit
    orders.create_order(None, request.clone()).await.unwrap();

    // a second one would put the customer at 33,600
    let err = orders.create_order(None, request.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // cash orders are not bound by the limit
    request.payment_type = PaymentType::Cash;
    orders.create_order(None, request).await.unwrap();
}

#[tokio::test]
async fn test_promotion_discount_and_use_count() {
    let fx = Fixture::new().await;
    let now = Utc::now();
    let promotion = fx
        .promotions()
        .create_promotion(CreatePromotionRequest {
            code: "VERANO10".to_string(),
            name: "Verano".to_string(),
            description: None,
            discount_type: DiscountType::Percentage,
            value: 10,
            min_purchase: 0,
            tier: None,
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
            max_uses: Some(5),
            is_active: true,
        })
        .await
        .unwrap();

    let mut request = fx.order_request(2, PaymentType::Cash);
    request.promotion_code = Some("verano10".to_string());
    let detail = fx.orders().create_order(None, request).await.unwrap();
    assert_eq!(detail.order.discount, 3_360);
    assert_eq!(detail.order.total, 33_600 - 3_360);
    assert_eq!(detail.order.promotion_id, Some(promotion.id));

    let promotions = fx.promotions();
    assert_eq!(promotions.get_promotion(promotion.id).await.unwrap().uses_count, 1);

    fx.orders()
        .cancel_order(
            detail.order.id,
            None,
            CancelOrderRequest {
                reason: "error de captura".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(promotions.get_promotion(promotion.id).await.unwrap().uses_count, 0);
}

#[tokio::test]
async fn test_oversized_quantities_are_rejected() {
    let fx = Fixture::new().await;
    let orders = fx.orders();

    let err = orders
        .create_order(None, fx.order_request(200_000_000, PaymentType::Cash))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // within the line cap, but the piece count does not fit
    let pallet = ProductService::new(fx.db.clone())
        .create_product(CreateProductRequest {
            sku: "PAL-001".to_string(),
            name: "Tarima".to_string(),
            description: None,
            category_id: None,
            brand_id: None,
            units_per_box: 5_000,
            price_eventual: 10,
            price_frecuente: 10,
            price_vip: 10,
        })
        .await
        .unwrap();
    let mut request = fx.order_request(1, PaymentType::Cash);
    request.items[0].product_id = pallet.id;
    request.items[0].quantity = 1_000_000;
    let err = orders.create_order(None, request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let listed = orders.list_orders(&OrderQuery::default()).await.unwrap();
    assert_eq!(listed.meta.total, 0);
    assert_eq!(fx.stock().await, 120);
}

#[tokio::test]
async fn test_order_numbers_follow_a_daily_sequence() {
    let fx = Fixture::new().await;
    let first = fx.place_order(1).await;
    let second = fx.place_order(1).await;
    let orders = fx.orders();

    let prefix = format!("PED-{}-", Utc::now().format("%Y%m%d"));
    let first = orders.get_order(first).await.unwrap().order.order_number;
    let second = orders.get_order(second).await.unwrap().order.order_number;
    assert_eq!(first, format!("{prefix}000001"));
    assert_eq!(second, format!("{prefix}000002"));
}

fn promotion_request(code: &str, tier: Option<CustomerTier>, max_uses: Option<i32>) -> CreatePromotionRequest {
    let now = Utc::now();
    CreatePromotionRequest {
        code: code.to_string(),
        name: format!("Promo {code}"),
        description: None,
        discount_type: DiscountType::FixedAmount,
        value: 1_000,
        min_purchase: 0,
        tier,
        starts_at: now - Duration::days(1),
        ends_at: now + Duration::days(1),
        max_uses,
        is_active: true,
    }
}

#[tokio::test]
async fn test_promotion_stops_at_max_uses() {
    let fx = Fixture::new().await;
    let promotions = fx.promotions();
    let promotion = promotions
        .create_promotion(promotion_request("UNICA", None, Some(1)))
        .await
        .unwrap();

    let mut request = fx.order_request(1, PaymentType::Cash);
    request.promotion_code = Some("UNICA".to_string());
    fx.orders().create_order(None, request.clone()).await.unwrap();

    let err = fx.orders().create_order(None, request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert_eq!(promotions.get_promotion(promotion.id).await.unwrap().uses_count, 1);
}

#[tokio::test]
async fn test_promotion_tier_restriction_can_be_lifted() {
    let fx = Fixture::new().await;
    let promotions = fx.promotions();
    let promotion = promotions
        .create_promotion(promotion_request("SOLOVIP", Some(CustomerTier::Vip), Some(3)))
        .await
        .unwrap();
    let check = || ValidatePromotionRequest {
        code: "SOLOVIP".to_string(),
        customer_id: Some(fx.customer_id),
        subtotal: 20_000,
    };

    let err = promotions.validate_promotion(check()).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // leaving the fields out keeps them
    let kept = promotions
        .update_promotion(
            promotion.id,
            UpdatePromotionRequest {
                name: Some("Solo VIP".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(kept.tier, Some(CustomerTier::Vip));
    assert_eq!(kept.max_uses, Some(3));

    let open = promotions
        .update_promotion(
            promotion.id,
            UpdatePromotionRequest {
                tier: Some(None),
                max_uses: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(open.tier, None);
    assert_eq!(open.max_uses, None);
    let validation = promotions.validate_promotion(check()).await.unwrap();
    assert_eq!(validation.discount, 1_000);
}
