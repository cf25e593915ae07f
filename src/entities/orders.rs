use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order lifecycle:
/// `CREATED -> CONFIRMED -> PREPARING -> IN_ROUTE -> DELIVERED`,
/// with `CANCELLED` reachable until the order leaves the warehouse.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "CREATED")]
    Created,
    #[sea_orm(string_value = "CONFIRMED")]
    Confirmed,
    #[sea_orm(string_value = "PREPARING")]
    Preparing,
    #[sea_orm(string_value = "IN_ROUTE")]
    InRoute,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    pub fn can_transition_to(&self, next: &OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Created, Confirmed)
                | (Confirmed, Preparing)
                | (Preparing, InRoute)
                | (InRoute, Delivered)
                // a failed delivery goes back to the warehouse
                | (InRoute, Preparing)
                | (Created, Cancelled)
                | (Confirmed, Cancelled)
                | (Preparing, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Stock has been taken out of the branch for this order
    pub fn holds_stock(&self) -> bool {
        matches!(
            self,
            OrderStatus::Confirmed
                | OrderStatus::Preparing
                | OrderStatus::InRoute
                | OrderStatus::Delivered
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::InRoute => "IN_ROUTE",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    #[sea_orm(string_value = "CASH")]
    Cash,
    #[sea_orm(string_value = "CREDIT")]
    Credit,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PARTIAL")]
    Partial,
    #[sea_orm(string_value = "PAID")]
    Paid,
}

impl PaymentStatus {
    pub fn from_amounts(paid: i64, total: i64) -> Self {
        if paid <= 0 {
            PaymentStatus::Pending
        } else if paid < total {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Paid
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub order_number: String,
    pub customer_id: i32,
    pub branch_id: i32,
    pub user_id: Option<i32>,
    pub status: OrderStatus,
    pub payment_type: PaymentType,
    pub payment_status: PaymentStatus,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub paid_amount: i64,
    pub promotion_id: Option<i32>,
    pub notes: Option<String>,
    pub cancel_reason: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn balance_due(&self) -> i64 {
        (self.total - self.paid_amount).max(0)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(OrderStatus::Created.can_transition_to(&OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(&OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(&OrderStatus::InRoute));
        assert!(OrderStatus::InRoute.can_transition_to(&OrderStatus::Delivered));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!OrderStatus::Created.can_transition_to(&OrderStatus::Delivered));
        assert!(!OrderStatus::Confirmed.can_transition_to(&OrderStatus::Created));
        assert!(!OrderStatus::InRoute.can_transition_to(&OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(&OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(&OrderStatus::Created));
    }

    #[test]
    fn test_terminal_and_stock() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Created.holds_stock());
        assert!(OrderStatus::Preparing.holds_stock());
    }

    #[test]
    fn test_payment_status_from_amounts() {
        assert_eq!(PaymentStatus::from_amounts(0, 1000), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_amounts(400, 1000), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::from_amounts(1000, 1000), PaymentStatus::Paid);
    }
}
