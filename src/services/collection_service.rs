use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::cash_register_service::open_register_for_branch;
use crate::entities::{
    OrderStatus, PaymentMethod, PaymentStatus, collection_entity as collections,
    customer_entity as customers, order_entity as orders,
};
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Clone)]
pub struct CollectionService {
    pool: DatabaseConnection,
}

/// Orders of a customer that still owe money, oldest first
pub(crate) async fn open_orders<C: ConnectionTrait>(
    db: &C,
    customer_id: Option<i32>,
    branch_id: Option<i32>,
) -> AppResult<Vec<orders::Model>> {
    let mut select = orders::Entity::find()
        .filter(orders::Column::Status.ne(OrderStatus::Cancelled))
        .filter(orders::Column::PaymentStatus.ne(PaymentStatus::Paid));
    if let Some(customer_id) = customer_id {
        select = select.filter(orders::Column::CustomerId.eq(customer_id));
    }
    if let Some(branch_id) = branch_id {
        select = select.filter(orders::Column::BranchId.eq(branch_id));
    }
    let rows = select
        .order_by_asc(orders::Column::CreatedAt)
        .order_by_asc(orders::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().filter(|o| o.balance_due() > 0).collect())
}

/// Money a customer owes across every open order
pub(crate) async fn outstanding_balance<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
) -> AppResult<i64> {
    Ok(open_orders(db, Some(customer_id), None)
        .await?
        .iter()
        .map(|o| o.balance_due())
        .sum())
}

/// Payment is due `credit_days` after delivery
pub fn due_date(order: &orders::Model, credit_days: i32) -> Option<DateTime<Utc>> {
    order
        .delivered_at
        .map(|d| d + Duration::days(credit_days as i64))
}

fn to_receivable(
    order: orders::Model,
    customer: Option<&customers::Model>,
    now: DateTime<Utc>,
) -> ReceivableResponse {
    let credit_days = customer.map(|c| c.credit_days).unwrap_or(0);
    let due_at = due_date(&order, credit_days);
    ReceivableResponse {
        order_id: order.id,
        balance_due: order.balance_due(),
        order_number: order.order_number,
        customer_id: order.customer_id,
        customer_name: customer.map(|c| c.name.clone()).unwrap_or_default(),
        total: order.total,
        paid_amount: order.paid_amount,
        payment_status: order.payment_status,
        delivered_at: order.delivered_at,
        due_at,
        overdue: due_at.is_some_and(|d| d < now),
    }
}

impl CollectionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_collections(
        &self,
        query: &CollectionQuery,
    ) -> AppResult<PaginatedResponse<collections::Model>> {
        let params = query.pagination();
        let mut select = collections::Entity::find();
        if let Some(customer_id) = query.customer_id {
            select = select.filter(collections::Column::CustomerId.eq(customer_id));
        }
        if let Some(order_id) = query.order_id {
            select = select.filter(collections::Column::OrderId.eq(order_id));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(collections::Column::CollectedAt)
            .order_by_desc(collections::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn register_payment(
        &self,
        user_id: Option<i32>,
        request: CreateCollectionRequest,
    ) -> AppResult<collections::Model> {
        request.validate()?;

        let txn = self.pool.begin().await?;
        let order = orders::Entity::find_by_id(request.order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        if order.status == OrderStatus::Cancelled {
            return Err(AppError::ValidationError(
                "Cannot collect payment for a cancelled order".to_string(),
            ));
        }
        let balance_due = order.balance_due();
        if request.amount > balance_due {
            return Err(AppError::ValidationError(format!(
                "Payment of {} exceeds the balance due of {}",
                request.amount, balance_due
            )));
        }

        // re-checked in the UPDATE so concurrent payments cannot overpay
        let now = Utc::now();
        let applied = orders::Entity::update_many()
            .col_expr(
                orders::Column::PaidAmount,
                Expr::col(orders::Column::PaidAmount).add(request.amount),
            )
            .col_expr(orders::Column::UpdatedAt, Expr::value(now))
            .filter(orders::Column::Id.eq(order.id))
            .filter(orders::Column::Status.ne(OrderStatus::Cancelled))
            .filter(
                Expr::col(orders::Column::PaidAmount)
                    .lte(Expr::col(orders::Column::Total).sub(request.amount)),
            )
            .exec(&txn)
            .await?;
        if applied.rows_affected != 1 {
            return Err(AppError::Conflict(format!(
                "Order {} changed while registering the payment",
                order.order_number
            )));
        }
        let order = orders::Entity::find_by_id(order.id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let cash_register_id = match request.method {
            PaymentMethod::Cash => open_register_for_branch(&txn, order.branch_id)
                .await?
                .map(|r| r.id),
            _ => None,
        };

        let collection = collections::ActiveModel {
            order_id: Set(order.id),
            customer_id: Set(order.customer_id),
            amount: Set(request.amount),
            method: Set(request.method),
            reference: Set(request.reference),
            cash_register_id: Set(cash_register_id),
            user_id: Set(user_id),
            collected_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let status = PaymentStatus::from_amounts(order.paid_amount, order.total);
        let order_number = order.order_number.clone();
        let mut am = order.into_active_model();
        am.payment_status = Set(status.clone());
        am.update(&txn).await?;
        txn.commit().await?;

        log::info!(
            "Collected {} on order {} ({:?})",
            collection.amount,
            order_number,
            status
        );
        Ok(collection)
    }

    pub async fn list_receivables(
        &self,
        query: &ReceivableQuery,
    ) -> AppResult<PaginatedResponse<ReceivableResponse>> {
        let params = query.pagination();
        let now = Utc::now();
        let open = open_orders(&self.pool, query.customer_id, query.branch_id).await?;

        let mut customer_ids: Vec<i32> = open.iter().map(|o| o.customer_id).collect();
        customer_ids.sort_unstable();
        customer_ids.dedup();
        let customer_map: HashMap<i32, customers::Model> = customers::Entity::find()
            .filter(customers::Column::Id.is_in(customer_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let receivables: Vec<ReceivableResponse> = open
            .into_iter()
            .map(|o| {
                let customer = customer_map.get(&o.customer_id);
                to_receivable(o, customer, now)
            })
            .filter(|r| !query.overdue_only.unwrap_or(false) || r.overdue)
            .collect();

        let total = receivables.len() as u64;
        let page = receivables
            .into_iter()
            .skip(params.get_offset() as usize)
            .take(params.get_limit() as usize)
            .collect();
        Ok(PaginatedResponse::new(page, &params, total))
    }

    pub async fn customer_balance(&self, customer_id: i32) -> AppResult<CustomerBalance> {
        let customer = customers::Entity::find_by_id(customer_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        let now = Utc::now();
        let open = open_orders(&self.pool, Some(customer_id), None).await?;
        let outstanding: i64 = open.iter().map(|o| o.balance_due()).sum();
        let overdue_orders = open
            .iter()
            .filter(|o| due_date(o, customer.credit_days).is_some_and(|d| d < now))
            .count() as u64;

        Ok(CustomerBalance {
            customer_id,
            credit_limit: customer.credit_limit,
            outstanding,
            available_credit: (customer.credit_limit > 0)
                .then(|| (customer.credit_limit - outstanding).max(0)),
            open_orders: open.len() as u64,
            overdue_orders,
        })
    }
}
