use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::{OrderStatus, OrderUnit, PaymentType, order_entity, order_item_entity};
use crate::error::{AppError, AppResult};
use crate::utils::{MAX_QUANTITY, require_at_most, require_non_empty};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<OrderStatus>,
    pub customer_id: Option<i32>,
    pub branch_id: Option<i32>,
    /// Inclusive, by creation date
    pub from: Option<NaiveDate>,
    /// Inclusive, by creation date
    pub to: Option<NaiveDate>,
}

impl OrderQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: i32,
    pub unit: OrderUnit,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: i32,
    pub branch_id: i32,
    pub payment_type: PaymentType,
    pub items: Vec<CreateOrderItem>,
    pub promotion_code: Option<String>,
    pub notes: Option<String>,
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::ValidationError(
                "An order needs at least one item".to_string(),
            ));
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity <= 0) {
            return Err(AppError::ValidationError(format!(
                "Quantity for product {} must be greater than zero",
                item.product_id
            )));
        }
        for item in &self.items {
            require_at_most("quantity", item.quantity as i64, MAX_QUANTITY as i64)?;
        }
        if let Some(code) = &self.promotion_code {
            require_non_empty("promotionCode", code)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub reason: String,
}

impl Validate for CancelOrderRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("reason", &self.reason)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: order_item_entity::Model,
    pub sku: String,
    pub product_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: order_entity::Model,
    pub customer_name: String,
    pub balance_due: i64,
    pub items: Vec<OrderItemDetail>,
}
