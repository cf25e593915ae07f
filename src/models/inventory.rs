use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::MovementType;
use crate::error::{AppError, AppResult};
use crate::utils::{MAX_QUANTITY, require_at_most, require_non_negative};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub branch_id: Option<i32>,
    pub product_id: Option<i32>,
}

impl InventoryQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

/// Stock line with the box/piece breakdown
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemResponse {
    pub id: i32,
    pub product_id: i32,
    pub sku: String,
    pub product_name: String,
    pub branch_id: i32,
    pub quantity: i32,
    pub units_per_box: i32,
    pub boxes: i32,
    pub pieces: i32,
    pub updated_at: DateTime<Utc>,
}

/// Manual movement. Sales and returns are recorded by the order flow.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementRequest {
    pub product_id: i32,
    pub branch_id: i32,
    pub movement_type: MovementType,
    /// Pieces; for ADJUSTMENT the new absolute quantity
    pub quantity: i32,
    pub reference: Option<String>,
    pub note: Option<String>,
}

impl Validate for CreateMovementRequest {
    fn validate(&self) -> AppResult<()> {
        require_at_most("quantity", self.quantity as i64, MAX_QUANTITY as i64)?;
        match self.movement_type {
            MovementType::Entry | MovementType::Exit => {
                if self.quantity <= 0 {
                    return Err(AppError::ValidationError(
                        "quantity must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
            MovementType::Adjustment => require_non_negative("quantity", self.quantity as i64),
            MovementType::Sale | MovementType::Return => Err(AppError::ValidationError(
                "Sale and return movements are created by orders".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub product_id: Option<i32>,
    pub branch_id: Option<i32>,
    pub movement_type: Option<MovementType>,
}

impl MovementQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockRuleRequest {
    pub product_id: i32,
    pub branch_id: i32,
    pub min_boxes: i32,
    pub min_pieces: i32,
}

impl Validate for CreateStockRuleRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_negative("minBoxes", self.min_boxes as i64)?;
        require_non_negative("minPieces", self.min_pieces as i64)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockRuleRequest {
    pub min_boxes: Option<i32>,
    pub min_pieces: Option<i32>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateStockRuleRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(v) = self.min_boxes {
            require_non_negative("minBoxes", v as i64)?;
        }
        if let Some(v) = self.min_pieces {
            require_non_negative("minPieces", v as i64)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockRuleQuery {
    pub branch_id: Option<i32>,
    pub product_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertQuery {
    pub branch_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub rule_id: i32,
    pub product_id: i32,
    pub sku: String,
    pub product_name: String,
    pub branch_id: i32,
    pub quantity: i32,
    pub min_boxes: i32,
    pub min_pieces: i32,
    /// Minimum in pieces
    pub threshold: i32,
    pub missing: i32,
}
