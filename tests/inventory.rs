mod common;

use common::*;
use dla_backend::entities::MovementType;
use dla_backend::error::AppError;
use dla_backend::models::*;

fn movement(fx: &Fixture, movement_type: MovementType, quantity: i32) -> CreateMovementRequest {
    CreateMovementRequest {
        product_id: fx.product_id,
        branch_id: fx.branch_id,
        movement_type,
        quantity,
        reference: None,
        note: None,
    }
}

#[tokio::test]
async fn test_exit_cannot_go_below_zero() {
    let fx = Fixture::new().await;
    let inventory = fx.inventory();

    let out = inventory
        .create_movement(Some(1), movement(&fx, MovementType::Exit, 20))
        .await
        .unwrap();
    assert_eq!(out.quantity, -20);
    assert_eq!(out.balance_after, 100);

    let err = inventory
        .create_movement(None, movement(&fx, MovementType::Exit, 101))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert_eq!(fx.stock().await, 100);
}

#[tokio::test]
async fn test_adjustment_sets_the_absolute_quantity() {
    let fx = Fixture::new().await;
    let adjusted = fx
        .inventory()
        .create_movement(None, movement(&fx, MovementType::Adjustment, 37))
        .await
        .unwrap();
    assert_eq!(adjusted.quantity, 37 - 120);
    assert_eq!(adjusted.balance_after, 37);

    let item = fx
        .inventory()
        .list_inventory(&InventoryQuery {
            product_id: Some(fx.product_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(item.data.len(), 1);
    assert_eq!(item.data[0].boxes, 3);
    assert_eq!(item.data[0].pieces, 1);
}

#[tokio::test]
async fn test_sale_movements_are_not_manual() {
    let fx = Fixture::new().await;
    let err = fx
        .inventory()
        .create_movement(None, movement(&fx, MovementType::Sale, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_alert_fires_only_below_threshold() {
    let fx = Fixture::new().await;
    let inventory = fx.inventory();

    // 5 boxes of 12 = 60 pieces
    let rule = inventory
        .create_stock_rule(CreateStockRuleRequest {
            product_id: fx.product_id,
            branch_id: fx.branch_id,
            min_boxes: 5,
            min_pieces: 0,
        })
        .await
        .unwrap();
    let alerts = inventory.get_alerts(&AlertQuery::default()).await.unwrap();
    assert!(alerts.is_empty());

    // exactly at the threshold is still fine
    inventory
        .create_movement(None, movement(&fx, MovementType::Exit, 60))
        .await
        .unwrap();
    assert!(inventory.get_alerts(&AlertQuery::default()).await.unwrap().is_empty());

    inventory
        .create_movement(None, movement(&fx, MovementType::Exit, 10))
        .await
        .unwrap();
    let alerts = inventory
        .get_alerts(&AlertQuery {
            branch_id: Some(fx.branch_id),
        })
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].rule_id, rule.id);
    assert_eq!(alerts[0].threshold, 60);
    assert_eq!(alerts[0].quantity, 50);
    assert_eq!(alerts[0].missing, 10);

    // inactive rules stay quiet
    inventory
        .update_stock_rule(
            rule.id,
            UpdateStockRuleRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(inventory.get_alerts(&AlertQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_one_rule_per_product_and_branch() {
    let fx = Fixture::new().await;
    let request = CreateStockRuleRequest {
        product_id: fx.product_id,
        branch_id: fx.branch_id,
        min_boxes: 1,
        min_pieces: 6,
    };
    let inventory = fx.inventory();
    inventory.create_stock_rule(request.clone()).await.unwrap();
    let err = inventory.create_stock_rule(request).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_movement_quantity_is_capped() {
    let fx = Fixture::new().await;
    let inventory = fx.inventory();
    for movement_type in [MovementType::Entry, MovementType::Adjustment] {
        let err = inventory
            .create_movement(None, movement(&fx, movement_type, 1_000_001))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
    assert_eq!(fx.stock().await, 120);
}
