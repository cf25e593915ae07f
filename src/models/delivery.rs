use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::{
    OrderStatus, RouteStatus, StopStatus, delivery_route_entity, delivery_stop_entity,
    driver_entity,
};
use crate::error::{AppError, AppResult};
use crate::utils::{require_non_empty, validate_phone};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl DriverQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    pub name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub vehicle: Option<String>,
}

impl Validate for CreateDriverRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("name", &self.name)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub vehicle: Option<String>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateDriverRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub route_date: Option<NaiveDate>,
    pub driver_id: Option<i32>,
    pub branch_id: Option<i32>,
    pub status: Option<RouteStatus>,
}

impl RouteQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    pub branch_id: i32,
    pub driver_id: i32,
    pub route_date: NaiveDate,
    /// Falls back to the driver's vehicle
    pub vehicle: Option<String>,
    /// Stop order follows this list
    pub order_ids: Vec<i32>,
    pub notes: Option<String>,
}

impl Validate for CreateRouteRequest {
    fn validate(&self) -> AppResult<()> {
        if self.order_ids.is_empty() {
            return Err(AppError::ValidationError(
                "A route needs at least one order".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.order_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(AppError::ValidationError(format!(
                "Order {dup} appears twice in the route"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopUpdateRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDetail {
    #[serde(flatten)]
    pub stop: delivery_stop_entity::Model,
    pub order_number: String,
    pub order_status: OrderStatus,
    pub customer_name: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDetail {
    #[serde(flatten)]
    pub route: delivery_route_entity::Model,
    pub driver: driver_entity::Model,
    pub stops: Vec<StopDetail>,
}

impl RouteDetail {
    pub fn pending_stops(&self) -> usize {
        self.stops
            .iter()
            .filter(|s| s.stop.status == StopStatus::Pending)
            .count()
    }
}
