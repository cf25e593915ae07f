mod common;

use common::*;
use dla_backend::config::LoyaltyConfig;
use dla_backend::entities::LoyaltyTransactionType;
use dla_backend::error::AppError;
use dla_backend::models::*;
use dla_backend::services::LoyaltyService;

fn earn(customer_id: i32, points: i64) -> EarnPointsRequest {
    EarnPointsRequest {
        customer_id,
        points,
        order_id: None,
        description: None,
    }
}

fn redeem(customer_id: i32, points: i64) -> RedeemPointsRequest {
    RedeemPointsRequest {
        customer_id,
        points,
        description: None,
    }
}

#[tokio::test]
async fn test_wallet_starts_empty() {
    let fx = Fixture::new().await;
    let wallet = fx.loyalty().get_wallet(fx.customer_id).await.unwrap();
    assert_eq!(wallet.available_points, 0);
    assert_eq!(wallet.total_points, 0);

    let err = fx.loyalty().get_wallet(9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_redeem_needs_available_points() {
    let fx = Fixture::new().await;
    let loyalty = fx.loyalty();

    let tx = loyalty.earn_points(earn(fx.customer_id, 100)).await.unwrap();
    assert_eq!(tx.transaction_type, LoyaltyTransactionType::Earn);
    assert!(tx.expires_at.is_some());

    let err = loyalty
        .redeem_points(redeem(fx.customer_id, 150))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = loyalty
        .redeem_points(redeem(fx.customer_id, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let wallet = loyalty
        .redeem_points(redeem(fx.customer_id, 40))
        .await
        .unwrap();
    assert_eq!(wallet.available_points, 60);
    assert_eq!(wallet.redeemed_points, 40);
    assert_eq!(wallet.total_points, 100);

    let history = loyalty
        .list_transactions(&LoyaltyTransactionQuery {
            customer_id: Some(fx.customer_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(history.meta.total, 2);
}

#[tokio::test]
async fn test_expire_is_capped_by_available_points() {
    let fx = Fixture::new().await;
    // earned points are already past their expiry date
    let loyalty = LoyaltyService::new(
        fx.db.clone(),
        LoyaltyConfig {
            expiration_days: -1,
            ..loyalty_config()
        },
    );

    loyalty.earn_points(earn(fx.customer_id, 100)).await.unwrap();
    loyalty
        .redeem_points(redeem(fx.customer_id, 70))
        .await
        .unwrap();

    let result = loyalty.expire_points().await.unwrap();
    assert_eq!(result.expired_transactions, 1);
    assert_eq!(result.expired_points, 30);

    let wallet = loyalty.get_wallet(fx.customer_id).await.unwrap();
    assert_eq!(wallet.available_points, 0);
    assert_eq!(wallet.expired_points, 30);

    // a second sweep finds nothing left to expire
    let again = loyalty.expire_points().await.unwrap();
    assert_eq!(again, ExpirePointsResponse::default());
}

#[tokio::test]
async fn test_points_not_yet_due_survive_the_sweep() {
    let fx = Fixture::new().await;
    let loyalty = fx.loyalty();
    loyalty.earn_points(earn(fx.customer_id, 25)).await.unwrap();

    let result = loyalty.expire_points().await.unwrap();
    assert_eq!(result.expired_transactions, 0);
    assert_eq!(
        loyalty
            .get_wallet(fx.customer_id)
            .await
            .unwrap()
            .available_points,
        25
    );
}
