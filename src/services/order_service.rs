use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

use super::collection_service::outstanding_balance;
use super::delivery_service::{open_route_of, release_cancelled_order};
use super::inventory_service::{StockChange, apply_stock_change};
use super::loyalty_service::award_order_points;
use super::promotion_service::{check_applicable, find_by_code, record_use};
use crate::config::LoyaltyConfig;
use crate::entities::{
    MovementType, OrderStatus, PaymentStatus, PaymentType, branch_entity as branches,
    customer_entity as customers, order_entity as orders, order_item_entity as order_items,
    product_entity as products,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{day_end, day_start, next_order_number, order_number_prefix};

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    loyalty: LoyaltyConfig,
}

/// Takes the order's pieces out of (SALE) or back into (RETURN) its branch
async fn move_order_stock<C: ConnectionTrait>(
    db: &C,
    order: &orders::Model,
    movement_type: MovementType,
    user_id: Option<i32>,
) -> AppResult<()> {
    let items = order_items::Entity::find()
        .filter(order_items::Column::OrderId.eq(order.id))
        .order_by_asc(order_items::Column::Id)
        .all(db)
        .await?;
    let sign = match movement_type {
        MovementType::Sale => -1,
        _ => 1,
    };
    for item in items {
        apply_stock_change(
            db,
            StockChange {
                product_id: item.product_id,
                branch_id: order.branch_id,
                movement_type: movement_type.clone(),
                delta: sign * item.pieces,
                expected: None,
                reference: Some(order.order_number.as_str()),
                note: None,
                user_id,
            },
        )
        .await?;
    }
    Ok(())
}

/// Moves an order to `next`, applying the side effects of the new state:
/// stock leaves the branch on CONFIRMED and comes back when a confirmed
/// order is cancelled; DELIVERED earns loyalty points.
pub(crate) async fn transition_order<C: ConnectionTrait>(
    db: &C,
    loyalty: &LoyaltyConfig,
    order: orders::Model,
    next: OrderStatus,
    user_id: Option<i32>,
    reason: Option<String>,
) -> AppResult<orders::Model> {
    if !order.status.can_transition_to(&next) {
        return Err(AppError::ValidationError(format!(
            "Order {} cannot go from {} to {}",
            order.order_number, order.status, next
        )));
    }

    match next {
        OrderStatus::Confirmed => {
            move_order_stock(db, &order, MovementType::Sale, user_id).await?;
        }
        OrderStatus::Cancelled => {
            if order.status.holds_stock() {
                move_order_stock(db, &order, MovementType::Return, user_id).await?;
            }
            if let Some(promotion_id) = order.promotion_id {
                record_use(db, promotion_id, -1).await?;
            }
        }
        _ => {}
    }

    let now = Utc::now();
    let previous = order.status.clone();
    let mut am = order.into_active_model();
    am.status = Set(next.clone());
    am.updated_at = Set(now);
    match next {
        OrderStatus::Confirmed => am.confirmed_at = Set(Some(now)),
        OrderStatus::Delivered => am.delivered_at = Set(Some(now)),
        OrderStatus::Cancelled => {
            am.cancelled_at = Set(Some(now));
            am.cancel_reason = Set(reason);
        }
        _ => {}
    }
    let updated = am.update(db).await?;

    if updated.status == OrderStatus::Delivered {
        award_order_points(db, loyalty, &updated).await?;
    }

    log::info!(
        "Order {} moved from {} to {}",
        updated.order_number,
        previous,
        updated.status
    );
    Ok(updated)
}

impl OrderService {
    pub fn new(pool: DatabaseConnection, loyalty: LoyaltyConfig) -> Self {
        Self { pool, loyalty }
    }

    pub async fn list_orders(
        &self,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<orders::Model>> {
        let params = query.pagination();
        let mut select = orders::Entity::find();
        if let Some(status) = &query.status {
            select = select.filter(orders::Column::Status.eq(status.clone()));
        }
        if let Some(customer_id) = query.customer_id {
            select = select.filter(orders::Column::CustomerId.eq(customer_id));
        }
        if let Some(branch_id) = query.branch_id {
            select = select.filter(orders::Column::BranchId.eq(branch_id));
        }
        if let Some(from) = query.from {
            select = select.filter(orders::Column::CreatedAt.gte(day_start(from)));
        }
        if let Some(to) = query.to {
            select = select.filter(orders::Column::CreatedAt.lt(day_end(to)));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_order(&self, id: i32) -> AppResult<OrderDetail> {
        let order = orders::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let customer_name = customers::Entity::find_by_id(order.customer_id)
            .one(&self.pool)
            .await?
            .map(|c| c.name)
            .unwrap_or_default();

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .order_by_asc(order_items::Column::Id)
            .all(&self.pool)
            .await?;
        let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
        let product_map: HashMap<i32, products::Model> = products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let items = items
            .into_iter()
            .map(|item| {
                let product = product_map.get(&item.product_id);
                OrderItemDetail {
                    sku: product.map(|p| p.sku.clone()).unwrap_or_default(),
                    product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    item,
                }
            })
            .collect();

        Ok(OrderDetail {
            balance_due: order.balance_due(),
            order,
            customer_name,
            items,
        })
    }

    pub async fn create_order(
        &self,
        user_id: Option<i32>,
        request: CreateOrderRequest,
    ) -> AppResult<OrderDetail> {
        request.validate()?;

        let txn = self.pool.begin().await?;
        let customer = customers::Entity::find_by_id(request.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
        if customer.is_blocked {
            return Err(AppError::ValidationError(format!(
                "Customer {} is blocked",
                customer.code
            )));
        }
        let branch = branches::Entity::find_by_id(request.branch_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;
        if !branch.is_active {
            return Err(AppError::ValidationError(format!(
                "Branch {} is not active",
                branch.code
            )));
        }

        let mut lines = Vec::with_capacity(request.items.len());
        let mut subtotal = 0i64;
        for item in &request.items {
            let product = products::Entity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Product {} not found", item.product_id))
                })?;
            if !product.is_active {
                return Err(AppError::ValidationError(format!(
                    "Product {} is not active",
                    product.sku
                )));
            }
            let out_of_range = || {
                AppError::ValidationError(format!(
                    "Quantity {} of product {} is out of range",
                    item.quantity, product.sku
                ))
            };
            let pieces = product
                .to_pieces(&item.unit, item.quantity)
                .ok_or_else(out_of_range)?;
            let unit_price = product
                .unit_price(&customer.tier, &item.unit)
                .ok_or_else(out_of_range)?;
            let line_total = unit_price
                .checked_mul(item.quantity as i64)
                .ok_or_else(out_of_range)?;
            subtotal = subtotal.checked_add(line_total).ok_or_else(out_of_range)?;
            lines.push(order_items::ActiveModel {
                product_id: Set(product.id),
                unit: Set(item.unit.clone()),
                quantity: Set(item.quantity),
                pieces: Set(pieces),
                unit_price: Set(unit_price),
                line_total: Set(line_total),
                ..Default::default()
            });
        }

        let now = Utc::now();
        let (promotion_id, discount) = match request
            .promotion_code
            .as_deref()
            .filter(|c| !c.trim().is_empty())
        {
            Some(code) => {
                let promotion = find_by_code(&txn, code).await?;
                let discount = check_applicable(&promotion, Some(&customer.tier), subtotal, now)?;
                record_use(&txn, promotion.id, 1).await?;
                (Some(promotion.id), discount)
            }
            None => (None, 0),
        };
        let total = subtotal - discount;

        if request.payment_type == PaymentType::Credit && customer.credit_limit > 0 {
            let outstanding = outstanding_balance(&txn, customer.id).await?;
            if outstanding + total > customer.credit_limit {
                return Err(AppError::ValidationError(format!(
                    "Credit limit exceeded: {} outstanding, {} limit, order total {}",
                    outstanding, customer.credit_limit, total
                )));
            }
        }

        let last_number = orders::Entity::find()
            .filter(orders::Column::OrderNumber.starts_with(&order_number_prefix(now)))
            .order_by_desc(orders::Column::OrderNumber)
            .one(&txn)
            .await?
            .map(|o| o.order_number);
        let order = orders::ActiveModel {
            order_number: Set(next_order_number(now, last_number.as_deref())),
            customer_id: Set(customer.id),
            branch_id: Set(branch.id),
            user_id: Set(user_id),
            status: Set(OrderStatus::Created),
            payment_type: Set(request.payment_type),
            payment_status: Set(PaymentStatus::Pending),
            subtotal: Set(subtotal),
            discount: Set(discount),
            total: Set(total),
            paid_amount: Set(0),
            promotion_id: Set(promotion_id),
            notes: Set(request.notes),
            cancel_reason: Set(None),
            confirmed_at: Set(None),
            delivered_at: Set(None),
            cancelled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
                "Another order took the same number; retry the request".to_string(),
            ),
            _ => AppError::from(e),
        })?;

        for mut line in lines {
            line.order_id = Set(order.id);
            line.insert(&txn).await?;
        }
        txn.commit().await?;

        log::info!(
            "Order {} created for customer {}: total {}",
            order.order_number,
            customer.code,
            order.total
        );
        self.get_order(order.id).await
    }

    pub async fn update_status(
        &self,
        id: i32,
        user_id: Option<i32>,
        request: UpdateOrderStatusRequest,
    ) -> AppResult<orders::Model> {
        if request.status == OrderStatus::Cancelled {
            return Err(AppError::ValidationError(
                "Use the cancel operation to cancel an order".to_string(),
            ));
        }
        let txn = self.pool.begin().await?;
        let order = orders::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        // routed orders move with their stops
        if let Some((_, route)) = open_route_of(&txn, order.id).await? {
            return Err(AppError::Conflict(format!(
                "Order {} is on route {}; update it through the route",
                order.order_number, route.id
            )));
        }
        let updated =
            transition_order(&txn, &self.loyalty, order, request.status, user_id, None).await?;
        txn.commit().await?;
        Ok(updated)
    }

    pub async fn cancel_order(
        &self,
        id: i32,
        user_id: Option<i32>,
        request: CancelOrderRequest,
    ) -> AppResult<orders::Model> {
        request.validate()?;
        let txn = self.pool.begin().await?;
        let order = orders::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        let updated = transition_order(
            &txn,
            &self.loyalty,
            order,
            OrderStatus::Cancelled,
            user_id,
            Some(request.reason.trim().to_string()),
        )
        .await?;
        release_cancelled_order(&txn, &updated).await?;
        txn.commit().await?;
        Ok(updated)
    }
}
