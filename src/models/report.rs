use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Validate;
use crate::entities::OrderStatus;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub branch_id: Option<i32>,
}

impl Validate for ReportRangeQuery {
    fn validate(&self) -> AppResult<()> {
        if self.to < self.from {
            return Err(AppError::ValidationError(
                "'to' must not be before 'from'".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Orders that count as sales (not cancelled)
    pub order_count: u64,
    pub gross_sales: i64,
    pub discounts: i64,
    pub net_sales: i64,
    pub average_ticket: i64,
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub order_count: u64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProductsQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub branch_id: Option<i32>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: i32,
    pub sku: String,
    pub name: String,
    pub pieces: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub branch_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub orders_today: u64,
    pub sales_today: i64,
    pub pending_deliveries: u64,
    pub stock_alerts: u64,
    pub receivables_total: i64,
}
