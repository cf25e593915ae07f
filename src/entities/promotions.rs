use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::customers::CustomerTier;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    #[sea_orm(string_value = "PERCENTAGE")]
    Percentage,
    #[sea_orm(string_value = "FIXED_AMOUNT")]
    FixedAmount,
}

/// Discount rule.
/// - `value`: percent (1..=100) for PERCENTAGE, cents for FIXED_AMOUNT
/// - `tier`: when set, only customers of that tier may use it
/// - `max_uses`: total redemptions allowed (NULL = unlimited)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub value: i64,
    pub min_purchase: i64,
    pub tier: Option<CustomerTier>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub max_uses: Option<i32>,
    pub uses_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn is_within_window(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at <= self.ends_at
    }

    pub fn has_uses_left(&self) -> bool {
        match self.max_uses {
            None => true,
            Some(max) => self.uses_count < max,
        }
    }

    /// Discount in cents for a subtotal, never above the subtotal
    pub fn discount_for(&self, subtotal: i64) -> i64 {
        let raw = match self.discount_type {
            DiscountType::Percentage => (subtotal as i128 * self.value as i128 / 100) as i64,
            DiscountType::FixedAmount => self.value,
        };
        raw.clamp(0, subtotal.max(0))
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(discount_type: DiscountType, value: i64) -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            code: "VERANO".into(),
            name: "Verano".into(),
            description: None,
            discount_type,
            value,
            min_purchase: 0,
            tier: None,
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
            max_uses: Some(2),
            uses_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_percentage_discount() {
        let p = promo(DiscountType::Percentage, 10);
        assert_eq!(p.discount_for(50_000), 5_000);
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let p = promo(DiscountType::FixedAmount, 10_000);
        assert_eq!(p.discount_for(4_000), 4_000);
        assert_eq!(p.discount_for(20_000), 10_000);
    }

    #[test]
    fn test_window_and_uses() {
        let mut p = promo(DiscountType::Percentage, 5);
        assert!(p.is_within_window(Utc::now()));
        assert!(!p.is_within_window(Utc::now() + Duration::days(2)));
        assert!(p.has_uses_left());
        p.uses_count = 2;
        assert!(!p.has_uses_left());
        p.max_uses = None;
        assert!(p.has_uses_left());
    }
}
