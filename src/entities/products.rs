use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::customers::CustomerTier;
use super::order_items::OrderUnit;

/// Catalog product. Prices are per piece in cents, one per customer tier.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub units_per_box: i32,
    pub price_eventual: i64,
    pub price_frecuente: i64,
    pub price_vip: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Piece price for the given tier
    pub fn price_for(&self, tier: &CustomerTier) -> i64 {
        match tier {
            CustomerTier::Eventual => self.price_eventual,
            CustomerTier::Frecuente => self.price_frecuente,
            CustomerTier::Vip => self.price_vip,
        }
    }

    /// `None` when a box price does not fit in an i64
    pub fn unit_price(&self, tier: &CustomerTier, unit: &OrderUnit) -> Option<i64> {
        match unit {
            OrderUnit::Piece => Some(self.price_for(tier)),
            OrderUnit::Box => self.price_for(tier).checked_mul(self.units_per_box as i64),
        }
    }

    /// `None` when the piece count overflows
    pub fn to_pieces(&self, unit: &OrderUnit, quantity: i32) -> Option<i32> {
        match unit {
            OrderUnit::Piece => Some(quantity),
            OrderUnit::Box => quantity.checked_mul(self.units_per_box),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            sku: "ACE-001".into(),
            name: "Aceite 1L".into(),
            description: None,
            category_id: None,
            brand_id: None,
            units_per_box: 12,
            price_eventual: 3500,
            price_frecuente: 3300,
            price_vip: 3100,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_price_for_tier() {
        let p = product();
        assert_eq!(p.price_for(&CustomerTier::Eventual), 3500);
        assert_eq!(p.price_for(&CustomerTier::Frecuente), 3300);
        assert_eq!(p.price_for(&CustomerTier::Vip), 3100);
    }

    #[test]
    fn test_box_price_and_pieces() {
        let p = product();
        assert_eq!(p.unit_price(&CustomerTier::Vip, &OrderUnit::Box), Some(3100 * 12));
        assert_eq!(p.to_pieces(&OrderUnit::Box, 2), Some(24));
        assert_eq!(p.to_pieces(&OrderUnit::Piece, 5), Some(5));
    }

    #[test]
    fn test_overflowing_quantities() {
        let mut p = product();
        assert_eq!(p.to_pieces(&OrderUnit::Box, 200_000_000), None);
        p.price_vip = i64::MAX / 2;
        assert_eq!(p.unit_price(&CustomerTier::Vip, &OrderUnit::Box), None);
    }
}
