use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::{PaymentMethod, PaymentStatus};
use crate::error::AppResult;
use crate::utils::require_positive;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub customer_id: Option<i32>,
    pub order_id: Option<i32>,
}

impl CollectionQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    pub order_id: i32,
    pub amount: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

impl Validate for CreateCollectionRequest {
    fn validate(&self) -> AppResult<()> {
        require_positive("amount", self.amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub customer_id: Option<i32>,
    pub branch_id: Option<i32>,
    pub overdue_only: Option<bool>,
}

impl ReceivableQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

/// An order that still has money owed on it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableResponse {
    pub order_id: i32,
    pub order_number: String,
    pub customer_id: i32,
    pub customer_name: String,
    pub total: i64,
    pub paid_amount: i64,
    pub balance_due: i64,
    pub payment_status: PaymentStatus,
    pub delivered_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub overdue: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBalance {
    pub customer_id: i32,
    pub credit_limit: i64,
    pub outstanding: i64,
    /// `None` when the customer has no credit limit
    pub available_credit: Option<i64>,
    pub open_orders: u64,
    pub overdue_orders: u64,
}
