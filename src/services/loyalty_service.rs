use std::collections::HashMap;

use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::config::LoyaltyConfig;
use crate::entities::{
    LoyaltyTransactionType, customer_entity as customers,
    loyalty_transaction_entity as loyalty_tx, loyalty_wallet_entity as wallets,
    order_entity as orders,
};
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Clone)]
pub struct LoyaltyService {
    pool: DatabaseConnection,
    config: LoyaltyConfig,
}

/// Points an order total is worth
pub fn points_for_total(total: i64, cents_per_point: i64) -> i64 {
    if cents_per_point <= 0 || total <= 0 {
        return 0;
    }
    total / cents_per_point
}

/// Wallet for a customer, created empty on first use
pub(crate) async fn ensure_wallet<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
) -> AppResult<wallets::Model> {
    if let Some(wallet) = wallets::Entity::find()
        .filter(wallets::Column::CustomerId.eq(customer_id))
        .one(db)
        .await?
    {
        return Ok(wallet);
    }

    let wallet = wallets::ActiveModel {
        customer_id: Set(customer_id),
        total_points: Set(0),
        available_points: Set(0),
        redeemed_points: Set(0),
        expired_points: Set(0),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(wallet)
}

async fn reload_wallet<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<wallets::Model> {
    wallets::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Loyalty wallet not found".to_string()))
}

async fn credit_points<C: ConnectionTrait>(
    db: &C,
    config: &LoyaltyConfig,
    customer_id: i32,
    points: i64,
    order_id: Option<i32>,
    description: Option<String>,
) -> AppResult<loyalty_tx::Model> {
    let now = Utc::now();
    let wallet = ensure_wallet(db, customer_id).await?;
    wallets::Entity::update_many()
        .col_expr(
            wallets::Column::TotalPoints,
            Expr::col(wallets::Column::TotalPoints).add(points),
        )
        .col_expr(
            wallets::Column::AvailablePoints,
            Expr::col(wallets::Column::AvailablePoints).add(points),
        )
        .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
        .filter(wallets::Column::Id.eq(wallet.id))
        .exec(db)
        .await?;

    let tx = loyalty_tx::ActiveModel {
        customer_id: Set(customer_id),
        transaction_type: Set(LoyaltyTransactionType::Earn),
        points: Set(points),
        order_id: Set(order_id),
        description: Set(description),
        expires_at: Set(Some(now + Duration::days(config.expiration_days))),
        is_expired: Set(false),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(tx)
}

/// Credits the points a delivered order earns. Returns `None` when the total
/// is too small to earn anything.
pub(crate) async fn award_order_points<C: ConnectionTrait>(
    db: &C,
    config: &LoyaltyConfig,
    order: &orders::Model,
) -> AppResult<Option<loyalty_tx::Model>> {
    let points = points_for_total(order.total, config.cents_per_point);
    if points == 0 {
        return Ok(None);
    }
    let tx = credit_points(
        db,
        config,
        order.customer_id,
        points,
        Some(order.id),
        Some(format!("Order {}", order.order_number)),
    )
    .await?;
    log::info!(
        "Awarded {} points to customer {} for order {}",
        points,
        order.customer_id,
        order.order_number
    );
    Ok(Some(tx))
}

impl LoyaltyService {
    pub fn new(pool: DatabaseConnection, config: LoyaltyConfig) -> Self {
        Self { pool, config }
    }

    pub async fn get_wallet(&self, customer_id: i32) -> AppResult<wallets::Model> {
        customers::Entity::find_by_id(customer_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
        ensure_wallet(&self.pool, customer_id).await
    }

    pub async fn list_transactions(
        &self,
        query: &LoyaltyTransactionQuery,
    ) -> AppResult<PaginatedResponse<loyalty_tx::Model>> {
        let params = query.pagination();
        let mut select = loyalty_tx::Entity::find();
        if let Some(customer_id) = query.customer_id {
            select = select.filter(loyalty_tx::Column::CustomerId.eq(customer_id));
        }
        if let Some(t) = &query.transaction_type {
            select = select.filter(loyalty_tx::Column::TransactionType.eq(t.clone()));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(loyalty_tx::Column::CreatedAt)
            .order_by_desc(loyalty_tx::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn earn_points(&self, request: EarnPointsRequest) -> AppResult<loyalty_tx::Model> {
        request.validate()?;
        let txn = self.pool.begin().await?;
        customers::Entity::find_by_id(request.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
        let tx = credit_points(
            &txn,
            &self.config,
            request.customer_id,
            request.points,
            request.order_id,
            request.description,
        )
        .await?;
        txn.commit().await?;
        log::info!(
            "Manually credited {} points to customer {}",
            tx.points,
            tx.customer_id
        );
        Ok(tx)
    }

    pub async fn redeem_points(&self, request: RedeemPointsRequest) -> AppResult<wallets::Model> {
        request.validate()?;

        let txn = self.pool.begin().await?;
        customers::Entity::find_by_id(request.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
        let wallet = ensure_wallet(&txn, request.customer_id).await?;

        // the balance check lives in the UPDATE so concurrent redemptions
        // cannot both spend the same points
        let now = Utc::now();
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::AvailablePoints,
                Expr::col(wallets::Column::AvailablePoints).sub(request.points),
            )
            .col_expr(
                wallets::Column::RedeemedPoints,
                Expr::col(wallets::Column::RedeemedPoints).add(request.points),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
            .filter(wallets::Column::Id.eq(wallet.id))
            .filter(wallets::Column::AvailablePoints.gte(request.points))
            .exec(&txn)
            .await?;
        let wallet = reload_wallet(&txn, wallet.id).await?;
        if result.rows_affected != 1 {
            return Err(AppError::ValidationError(format!(
                "Insufficient points: {} available, {} requested",
                wallet.available_points, request.points
            )));
        }

        loyalty_tx::ActiveModel {
            customer_id: Set(request.customer_id),
            transaction_type: Set(LoyaltyTransactionType::Redeem),
            points: Set(request.points),
            order_id: Set(None),
            description: Set(request.description),
            expires_at: Set(None),
            is_expired: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!(
            "Customer {} redeemed {} points",
            request.customer_id,
            request.points
        );
        Ok(wallet)
    }

    /// Expires every earn transaction past its expiry date. The points taken
    /// from a wallet never exceed what is still available.
    pub async fn expire_points(&self) -> AppResult<ExpirePointsResponse> {
        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let due = loyalty_tx::Entity::find()
            .filter(loyalty_tx::Column::TransactionType.eq(LoyaltyTransactionType::Earn))
            .filter(loyalty_tx::Column::IsExpired.eq(false))
            .filter(loyalty_tx::Column::ExpiresAt.lt(now))
            .order_by_asc(loyalty_tx::Column::Id)
            .all(&txn)
            .await?;

        let mut by_customer: HashMap<i32, Vec<loyalty_tx::Model>> = HashMap::new();
        for tx in due {
            by_customer.entry(tx.customer_id).or_default().push(tx);
        }

        let mut result = ExpirePointsResponse::default();
        for (customer_id, due) in by_customer {
            // claim each earn so a concurrent sweep cannot expire it twice
            let mut earned = Vec::with_capacity(due.len());
            for tx in due {
                let claimed = loyalty_tx::Entity::update_many()
                    .col_expr(loyalty_tx::Column::IsExpired, Expr::value(true))
                    .filter(loyalty_tx::Column::Id.eq(tx.id))
                    .filter(loyalty_tx::Column::IsExpired.eq(false))
                    .exec(&txn)
                    .await?;
                if claimed.rows_affected == 1 {
                    earned.push(tx);
                }
            }
            result.expired_transactions += earned.len() as u64;

            let wallet = ensure_wallet(&txn, customer_id).await?;
            let mut available = wallet.available_points;
            let amounts: Vec<i64> = earned
                .iter()
                .map(|tx| {
                    let amount = tx.points.min(available);
                    available -= amount;
                    amount
                })
                .collect();
            let to_expire = wallet.available_points - available;
            if to_expire == 0 {
                continue;
            }

            let debited = wallets::Entity::update_many()
                .col_expr(
                    wallets::Column::AvailablePoints,
                    Expr::col(wallets::Column::AvailablePoints).sub(to_expire),
                )
                .col_expr(
                    wallets::Column::ExpiredPoints,
                    Expr::col(wallets::Column::ExpiredPoints).add(to_expire),
                )
                .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
                .filter(wallets::Column::Id.eq(wallet.id))
                .filter(wallets::Column::AvailablePoints.gte(to_expire))
                .exec(&txn)
                .await?;
            if debited.rows_affected != 1 {
                return Err(AppError::Conflict(format!(
                    "Wallet of customer {customer_id} changed during the expiry sweep"
                )));
            }

            for (tx, amount) in earned.into_iter().zip(amounts) {
                if amount == 0 {
                    continue;
                }
                loyalty_tx::ActiveModel {
                    customer_id: Set(customer_id),
                    transaction_type: Set(LoyaltyTransactionType::Expire),
                    points: Set(amount),
                    order_id: Set(tx.order_id),
                    description: Set(Some(format!("Expired earn #{}", tx.id))),
                    expires_at: Set(None),
                    is_expired: Set(false),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                result.expired_points += amount;
            }
        }
        txn.commit().await?;

        if result.expired_transactions > 0 {
            log::info!(
                "Expired {} points across {} transactions",
                result.expired_points,
                result.expired_transactions
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_for_total() {
        assert_eq!(points_for_total(12_345, 1000), 12);
        assert_eq!(points_for_total(999, 1000), 0);
        assert_eq!(points_for_total(5000, 0), 0);
    }
}
