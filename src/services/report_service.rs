use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use super::collection_service::open_orders;
use super::inventory_service::stock_alerts;
use crate::entities::{
    OrderStatus, order_entity as orders, order_item_entity as order_items,
    product_entity as products,
};
use crate::error::AppResult;
use crate::models::*;
use crate::utils::{day_end, day_start};

const DEFAULT_TOP_PRODUCTS: u64 = 10;

#[derive(Clone)]
pub struct ReportService {
    pool: DatabaseConnection,
}

/// Sales figures over a set of orders. Cancelled orders only show up in the
/// status breakdown.
pub fn summarize_sales(from: NaiveDate, to: NaiveDate, orders: &[orders::Model]) -> SalesSummary {
    let mut by_status: BTreeMap<String, (OrderStatus, u64)> = BTreeMap::new();
    for order in orders {
        by_status
            .entry(order.status.to_string())
            .or_insert((order.status.clone(), 0))
            .1 += 1;
    }

    let sales: Vec<&orders::Model> = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .collect();
    let order_count = sales.len() as u64;
    let gross_sales: i64 = sales.iter().map(|o| o.subtotal).sum();
    let discounts: i64 = sales.iter().map(|o| o.discount).sum();
    let net_sales: i64 = sales.iter().map(|o| o.total).sum();

    SalesSummary {
        from,
        to,
        order_count,
        gross_sales,
        discounts,
        net_sales,
        average_ticket: if order_count == 0 {
            0
        } else {
            net_sales / order_count as i64
        },
        by_status: by_status
            .into_values()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
    }
}

impl ReportService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn orders_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        branch_id: Option<i32>,
    ) -> AppResult<Vec<orders::Model>> {
        let mut select = orders::Entity::find()
            .filter(orders::Column::CreatedAt.gte(day_start(from)))
            .filter(orders::Column::CreatedAt.lt(day_end(to)));
        if let Some(branch_id) = branch_id {
            select = select.filter(orders::Column::BranchId.eq(branch_id));
        }
        Ok(select.all(&self.pool).await?)
    }

    pub async fn sales_summary(&self, query: &ReportRangeQuery) -> AppResult<SalesSummary> {
        query.validate()?;
        let orders = self
            .orders_between(query.from, query.to, query.branch_id)
            .await?;
        Ok(summarize_sales(query.from, query.to, &orders))
    }

    pub async fn sales_by_day(&self, query: &ReportRangeQuery) -> AppResult<Vec<DailySales>> {
        query.validate()?;
        let orders = self
            .orders_between(query.from, query.to, query.branch_id)
            .await?;

        let mut days: BTreeMap<NaiveDate, DailySales> = BTreeMap::new();
        for order in orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
        {
            let date = order.created_at.date_naive();
            let entry = days.entry(date).or_insert(DailySales {
                date,
                order_count: 0,
                total: 0,
            });
            entry.order_count += 1;
            entry.total += order.total;
        }
        Ok(days.into_values().collect())
    }

    pub async fn top_products(&self, query: &TopProductsQuery) -> AppResult<Vec<TopProduct>> {
        ReportRangeQuery {
            from: query.from,
            to: query.to,
            branch_id: query.branch_id,
        }
        .validate()?;

        let order_ids: Vec<i32> = self
            .orders_between(query.from, query.to, query.branch_id)
            .await?
            .into_iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.id)
            .collect();
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.is_in(order_ids))
            .all(&self.pool)
            .await?;
        let mut totals: HashMap<i32, (i64, i64)> = HashMap::new();
        for item in items {
            let entry = totals.entry(item.product_id).or_default();
            entry.0 += item.pieces as i64;
            entry.1 += item.line_total;
        }

        let product_map: HashMap<i32, products::Model> = products::Entity::find()
            .filter(products::Column::Id.is_in(totals.keys().copied().collect::<Vec<_>>()))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut ranked: Vec<TopProduct> = totals
            .into_iter()
            .map(|(product_id, (pieces, revenue))| {
                let product = product_map.get(&product_id);
                TopProduct {
                    product_id,
                    sku: product.map(|p| p.sku.clone()).unwrap_or_default(),
                    name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    pieces,
                    revenue,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.pieces
                .cmp(&a.pieces)
                .then(b.revenue.cmp(&a.revenue))
                .then(a.product_id.cmp(&b.product_id))
        });
        ranked.truncate(query.limit.unwrap_or(DEFAULT_TOP_PRODUCTS).clamp(1, 100) as usize);
        Ok(ranked)
    }

    pub async fn dashboard(&self, query: &DashboardQuery) -> AppResult<Dashboard> {
        let today = Utc::now().date_naive();
        let todays = self.orders_between(today, today, query.branch_id).await?;
        let sales_today = todays
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total)
            .sum();

        let mut pending = orders::Entity::find().filter(
            orders::Column::Status.is_in([OrderStatus::Preparing, OrderStatus::InRoute]),
        );
        if let Some(branch_id) = query.branch_id {
            pending = pending.filter(orders::Column::BranchId.eq(branch_id));
        }
        let pending_deliveries = pending.count(&self.pool).await?;

        let stock_alerts = stock_alerts(&self.pool, query.branch_id).await?.len() as u64;
        let receivables_total = open_orders(&self.pool, None, query.branch_id)
            .await?
            .iter()
            .map(|o| o.balance_due())
            .sum();

        Ok(Dashboard {
            orders_today: todays.len() as u64,
            sales_today,
            pending_deliveries,
            stock_alerts,
            receivables_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PaymentStatus, PaymentType};

    fn order(id: i32, status: OrderStatus, subtotal: i64, discount: i64) -> orders::Model {
        let now = Utc::now();
        orders::Model {
            id,
            order_number: format!("PED-{id}"),
            customer_id: 1,
            branch_id: 1,
            user_id: None,
            status,
            payment_type: PaymentType::Cash,
            payment_status: PaymentStatus::Pending,
            subtotal,
            discount,
            total: subtotal - discount,
            paid_amount: 0,
            promotion_id: None,
            notes: None,
            cancel_reason: None,
            confirmed_at: None,
            delivered_at: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summary_excludes_cancelled_from_sales() {
        let today = Utc::now().date_naive();
        let orders = vec![
            order(1, OrderStatus::Delivered, 10_000, 1_000),
            order(2, OrderStatus::Created, 5_000, 0),
            order(3, OrderStatus::Cancelled, 50_000, 0),
        ];
        let summary = summarize_sales(today, today, &orders);
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.gross_sales, 15_000);
        assert_eq!(summary.discounts, 1_000);
        assert_eq!(summary.net_sales, 14_000);
        assert_eq!(summary.average_ticket, 7_000);
        assert_eq!(summary.by_status.len(), 3);
        assert!(
            summary
                .by_status
                .iter()
                .any(|s| s.status == OrderStatus::Cancelled && s.count == 1)
        );
    }

    #[test]
    fn test_summary_of_nothing() {
        let today = Utc::now().date_naive();
        let summary = summarize_sales(today, today, &[]);
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.average_ticket, 0);
        assert!(summary.by_status.is_empty());
    }
}
