use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::{CashRegisterStatus, cash_register_entity};
use crate::error::AppResult;
use crate::utils::require_non_negative;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenCashRegisterRequest {
    pub branch_id: i32,
    pub opening_amount: i64,
    pub notes: Option<String>,
}

impl Validate for OpenCashRegisterRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_negative("openingAmount", self.opening_amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseCashRegisterRequest {
    pub closing_amount: i64,
    pub notes: Option<String>,
}

impl Validate for CloseCashRegisterRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_negative("closingAmount", self.closing_amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashRegisterQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub branch_id: Option<i32>,
    pub status: Option<CashRegisterStatus>,
}

impl CashRegisterQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRegisterQuery {
    pub branch_id: i32,
}

/// A session with its running totals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashRegisterSummary {
    #[serde(flatten)]
    pub register: cash_register_entity::Model,
    pub cash_collections: i64,
    pub cash_expenses: i64,
    /// Opening plus cash collections minus cash expenses
    pub current_expected: i64,
}
