use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::CustomerTier;
use crate::error::AppResult;
use crate::utils::{require_non_empty, require_non_negative, validate_code, validate_email, validate_phone};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Matches name or code
    pub search: Option<String>,
    pub tier: Option<CustomerTier>,
    pub is_blocked: Option<bool>,
    pub branch_id: Option<i32>,
}

impl CustomerQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[schema(example = "CLI-0001")]
    pub code: String,
    #[schema(example = "Abarrotes La Esperanza")]
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tier: CustomerTier,
    #[serde(default)]
    pub credit_limit: i64,
    #[serde(default)]
    pub credit_days: i32,
    pub branch_id: Option<i32>,
}

impl Validate for CreateCustomerRequest {
    fn validate(&self) -> AppResult<()> {
        validate_code("code", &self.code)?;
        require_non_empty("name", &self.name)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        require_non_negative("creditLimit", self.credit_limit)?;
        require_non_negative("creditDays", self.credit_days as i64)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tier: Option<CustomerTier>,
    pub credit_limit: Option<i64>,
    pub credit_days: Option<i32>,
    pub branch_id: Option<i32>,
}

impl Validate for UpdateCustomerRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(limit) = self.credit_limit {
            require_non_negative("creditLimit", limit)?;
        }
        if let Some(days) = self.credit_days {
            require_non_negative("creditDays", days as i64)?;
        }
        Ok(())
    }
}
