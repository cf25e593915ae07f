use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::PaymentMethod;
use crate::error::AppResult;
use crate::utils::{require_non_empty, require_positive};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub branch_id: Option<i32>,
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ExpenseQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub branch_id: i32,
    #[schema(example = "COMBUSTIBLE")]
    pub category: String,
    pub description: String,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub expense_date: NaiveDate,
}

impl Validate for CreateExpenseRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("category", &self.category)?;
        require_non_empty("description", &self.description)?;
        require_positive("amount", self.amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<i64>,
    pub expense_date: Option<NaiveDate>,
}

impl Validate for UpdateExpenseRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(category) = &self.category {
            require_non_empty("category", category)?;
        }
        if let Some(description) = &self.description {
            require_non_empty("description", description)?;
        }
        if let Some(amount) = self.amount {
            require_positive("amount", amount)?;
        }
        Ok(())
    }
}
