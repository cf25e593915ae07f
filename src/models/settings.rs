use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::branches::{format_delivery_days, parse_delivery_days};
use crate::entities::{branch_entity, permission_entity, role_entity, user_entity};
use crate::error::{AppError, AppResult};
use crate::utils::{require_non_empty, validate_code, validate_email, validate_password, validate_phone};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub branch_id: Option<i32>,
}

impl UserQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub branch_id: Option<i32>,
    #[serde(default)]
    pub role_ids: Vec<i32>,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> AppResult<()> {
        validate_email(&self.email)?;
        require_non_empty("name", &self.name)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub branch_id: Option<i32>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRolesRequest {
    pub role_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: user_entity::Model,
    pub roles: Vec<role_entity::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    #[schema(example = "ALMACEN")]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permission_codes: Vec<String>,
}

impl Validate for CreateRoleRequest {
    fn validate(&self) -> AppResult<()> {
        validate_code("name", &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPermissionsRequest {
    pub permission_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: role_entity::Model,
    pub permissions: Vec<permission_entity::Model>,
}

fn check_delivery_days(days: &[String]) -> AppResult<()> {
    let joined = days.join(",");
    if parse_delivery_days(&joined).len() != days.len() {
        return Err(AppError::ValidationError(format!(
            "Invalid delivery days: {joined}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRequest {
    #[schema(example = "MATRIZ")]
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Weekday codes, `MON`..`SUN`
    #[serde(default)]
    pub delivery_days: Vec<String>,
}

impl Validate for CreateBranchRequest {
    fn validate(&self) -> AppResult<()> {
        validate_code("code", &self.code)?;
        require_non_empty("name", &self.name)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        check_delivery_days(&self.delivery_days)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranchRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub delivery_days: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateBranchRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        if let Some(days) = &self.delivery_days {
            check_delivery_days(days)?;
        }
        Ok(())
    }
}

/// Branch as exposed over the API, with the day list expanded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchResponse {
    #[serde(flatten)]
    pub branch: branch_entity::Model,
    pub delivery_weekdays: Vec<String>,
}

impl From<branch_entity::Model> for BranchResponse {
    fn from(branch: branch_entity::Model) -> Self {
        let delivery_weekdays = branch
            .delivery_weekdays()
            .iter()
            .map(|d| format_delivery_days(&[*d]))
            .collect();
        Self {
            branch,
            delivery_weekdays,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_request_rejects_unknown_day() {
        let req = CreateBranchRequest {
            code: "NORTE".into(),
            name: "Sucursal Norte".into(),
            address: None,
            phone: None,
            delivery_days: vec!["MON".into(), "FUNDAY".into()],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_branch_request_accepts_weekdays() {
        let req = CreateBranchRequest {
            code: "NORTE".into(),
            name: "Sucursal Norte".into(),
            address: None,
            phone: None,
            delivery_days: vec!["MON".into(), "THU".into()],
        };
        assert!(req.validate().is_ok());
    }
}
