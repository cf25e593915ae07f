use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_rules")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub branch_id: i32,
    pub min_boxes: i32,
    pub min_pieces: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Minimum stock in pieces
    pub fn threshold(&self, units_per_box: i32) -> i32 {
        self.min_boxes * units_per_box + self.min_pieces
    }

    pub fn is_triggered(&self, quantity: i32, units_per_box: i32) -> bool {
        self.is_active && quantity < self.threshold(units_per_box)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(min_boxes: i32, min_pieces: i32) -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            product_id: 1,
            branch_id: 1,
            min_boxes,
            min_pieces,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_threshold() {
        assert_eq!(rule(2, 5).threshold(12), 29);
    }

    #[test]
    fn test_triggered_only_below_threshold() {
        let r = rule(1, 0);
        assert!(r.is_triggered(11, 12));
        assert!(!r.is_triggered(12, 12));
        let mut inactive = rule(10, 0);
        inactive.is_active = false;
        assert!(!inactive.is_triggered(0, 12));
    }
}
