use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::{PaginationParams, Validate};
use crate::entities::{CustomerTier, DiscountType};
use crate::error::{AppError, AppResult};
use crate::utils::{require_non_empty, require_non_negative, require_positive, validate_code};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl PromotionQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

fn check_value(discount_type: &DiscountType, value: i64) -> AppResult<()> {
    match discount_type {
        DiscountType::Percentage if !(1..=100).contains(&value) => Err(
            AppError::ValidationError("Percentage must be between 1 and 100".to_string()),
        ),
        _ => require_positive("value", value),
    }
}

fn check_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> AppResult<()> {
    if ends_at <= starts_at {
        return Err(AppError::ValidationError(
            "endsAt must be after startsAt".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionRequest {
    #[schema(example = "VERANO10")]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub value: i64,
    #[serde(default)]
    pub min_purchase: i64,
    pub tier: Option<CustomerTier>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub max_uses: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Validate for CreatePromotionRequest {
    fn validate(&self) -> AppResult<()> {
        validate_code("code", &self.code)?;
        require_non_empty("name", &self.name)?;
        check_value(&self.discount_type, self.value)?;
        require_non_negative("minPurchase", self.min_purchase)?;
        check_window(self.starts_at, self.ends_at)?;
        if let Some(max) = self.max_uses {
            require_positive("maxUses", max as i64)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromotionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub value: Option<i64>,
    pub min_purchase: Option<i64>,
    /// Absent keeps the tier, `null` opens the promotion to every tier
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<CustomerTier>, nullable)]
    pub tier: Option<Option<CustomerTier>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    /// Absent keeps the cap, `null` removes it
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i32>, nullable)]
    pub max_uses: Option<Option<i32>>,
}

impl Validate for UpdatePromotionRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(min) = self.min_purchase {
            require_non_negative("minPurchase", min)?;
        }
        if let (Some(starts_at), Some(ends_at)) = (self.starts_at, self.ends_at) {
            check_window(starts_at, ends_at)?;
        }
        if let Some(Some(max)) = self.max_uses {
            require_positive("maxUses", max as i64)?;
        }
        Ok(())
    }
}

/// A present key, `null` included, becomes `Some`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePromotionRequest {
    pub code: String,
    pub customer_id: Option<i32>,
    pub subtotal: i64,
}

impl Validate for ValidatePromotionRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("code", &self.code)?;
        require_non_negative("subtotal", self.subtotal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionValidation {
    pub promotion_id: i32,
    pub code: String,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
}

pub(crate) fn check_promotion_value(discount_type: &DiscountType, value: i64) -> AppResult<()> {
    check_value(discount_type, value)
}

pub(crate) fn check_promotion_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> AppResult<()> {
    check_window(starts_at, ends_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_tells_null_from_absent() {
        let keep: UpdatePromotionRequest = serde_json::from_str(r#"{"name":"Verano"}"#).unwrap();
        assert_eq!(keep.tier, None);
        assert_eq!(keep.max_uses, None);

        let clear: UpdatePromotionRequest =
            serde_json::from_str(r#"{"tier":null,"maxUses":null}"#).unwrap();
        assert_eq!(clear.tier, Some(None));
        assert_eq!(clear.max_uses, Some(None));

        let set: UpdatePromotionRequest = serde_json::from_str(r#"{"tier":"VIP"}"#).unwrap();
        assert_eq!(set.tier, Some(Some(CustomerTier::Vip)));
    }

    #[test]
    fn test_cleared_fields_serialize_as_null() {
        let request = UpdatePromotionRequest {
            tier: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["tier"].is_null());
        assert!(json.get("maxUses").is_none());
    }
}
