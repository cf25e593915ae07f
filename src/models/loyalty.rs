use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::LoyaltyTransactionType;
use crate::error::AppResult;
use crate::utils::require_positive;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyTransactionQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub customer_id: Option<i32>,
    pub transaction_type: Option<LoyaltyTransactionType>,
}

impl LoyaltyTransactionQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarnPointsRequest {
    pub customer_id: i32,
    pub points: i64,
    pub order_id: Option<i32>,
    pub description: Option<String>,
}

impl Validate for EarnPointsRequest {
    fn validate(&self) -> AppResult<()> {
        require_positive("points", self.points)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemPointsRequest {
    pub customer_id: i32,
    #[schema(example = 100)]
    pub points: i64,
    pub description: Option<String>,
}

impl Validate for RedeemPointsRequest {
    fn validate(&self) -> AppResult<()> {
        require_positive("points", self.points)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpirePointsResponse {
    pub expired_transactions: u64,
    pub expired_points: i64,
}
