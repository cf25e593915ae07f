use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::CustomerTier;
use crate::error::{AppError, AppResult};
use crate::utils::{require_non_empty, require_non_negative};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Matches name or SKU
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub is_active: Option<bool>,
}

impl ProductQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[schema(example = "ACE-001")]
    pub sku: String,
    #[schema(example = "Aceite vegetal 1L")]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub units_per_box: i32,
    pub price_eventual: i64,
    pub price_frecuente: i64,
    pub price_vip: i64,
}

fn check_units_per_box(units: i32) -> AppResult<()> {
    if units < 1 {
        return Err(AppError::ValidationError(
            "unitsPerBox must be at least 1".to_string(),
        ));
    }
    Ok(())
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("sku", &self.sku)?;
        require_non_empty("name", &self.name)?;
        check_units_per_box(self.units_per_box)?;
        require_non_negative("priceEventual", self.price_eventual)?;
        require_non_negative("priceFrecuente", self.price_frecuente)?;
        require_non_negative("priceVip", self.price_vip)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub units_per_box: Option<i32>,
    pub price_eventual: Option<i64>,
    pub price_frecuente: Option<i64>,
    pub price_vip: Option<i64>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(units) = self.units_per_box {
            check_units_per_box(units)?;
        }
        for (field, price) in [
            ("priceEventual", self.price_eventual),
            ("priceFrecuente", self.price_frecuente),
            ("priceVip", self.price_vip),
        ] {
            if let Some(price) = price {
                require_non_negative(field, price)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

impl Validate for CreateCategoryRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("name", &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandRequest {
    pub name: String,
}

impl Validate for CreateBrandRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("name", &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuery {
    pub tier: CustomerTier,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPriceResponse {
    pub product_id: i32,
    pub tier: CustomerTier,
    pub piece_price: i64,
    pub box_price: i64,
    pub units_per_box: i32,
}
