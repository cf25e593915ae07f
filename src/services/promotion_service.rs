use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{
    CustomerTier, customer_entity as customers, order_entity as orders,
    promotion_entity as promotions,
};
use crate::error::{AppError, AppResult};
use crate::models::promotion::{check_promotion_value, check_promotion_window};
use crate::models::*;

#[derive(Clone)]
pub struct PromotionService {
    pool: DatabaseConnection,
}

/// Discount a promotion grants on a purchase, or why it does not apply
pub fn check_applicable(
    promotion: &promotions::Model,
    tier: Option<&CustomerTier>,
    subtotal: i64,
    at: DateTime<Utc>,
) -> AppResult<i64> {
    if !promotion.is_active {
        return Err(AppError::ValidationError(format!(
            "Promotion {} is not active",
            promotion.code
        )));
    }
    if !promotion.is_within_window(at) {
        return Err(AppError::ValidationError(format!(
            "Promotion {} is not valid at this time",
            promotion.code
        )));
    }
    if !promotion.has_uses_left() {
        return Err(AppError::ValidationError(format!(
            "Promotion {} has no uses left",
            promotion.code
        )));
    }
    if subtotal < promotion.min_purchase {
        return Err(AppError::ValidationError(format!(
            "Promotion {} requires a minimum purchase of {}",
            promotion.code, promotion.min_purchase
        )));
    }
    if let Some(required) = &promotion.tier
        && tier != Some(required)
    {
        return Err(AppError::ValidationError(format!(
            "Promotion {} is only for {} customers",
            promotion.code, required
        )));
    }
    Ok(promotion.discount_for(subtotal))
}

pub(crate) async fn find_by_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> AppResult<promotions::Model> {
    promotions::Entity::find()
        .filter(promotions::Column::Code.eq(code.trim().to_ascii_uppercase()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Promotion {code} not found")))
}

/// Counts one use of a promotion, or gives one back when `delta` is negative.
/// A use is only counted while the promotion is below `max_uses`.
pub(crate) async fn record_use<C: ConnectionTrait>(
    db: &C,
    promotion_id: i32,
    delta: i32,
) -> AppResult<()> {
    let mut update = promotions::Entity::update_many()
        .col_expr(
            promotions::Column::UsesCount,
            Expr::col(promotions::Column::UsesCount).add(delta),
        )
        .col_expr(promotions::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(promotions::Column::Id.eq(promotion_id));
    if delta < 0 {
        update.filter(promotions::Column::UsesCount.gt(0)).exec(db).await?;
        return Ok(());
    }
    update = update.filter(
        Condition::any()
            .add(promotions::Column::MaxUses.is_null())
            .add(
                Expr::col(promotions::Column::UsesCount)
                    .lte(Expr::col(promotions::Column::MaxUses).sub(delta)),
            ),
    );
    if update.exec(db).await?.rows_affected != 1 {
        return Err(AppError::ValidationError(format!(
            "Promotion {promotion_id} has no uses left"
        )));
    }
    Ok(())
}

impl PromotionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_promotions(
        &self,
        query: &PromotionQuery,
    ) -> AppResult<PaginatedResponse<promotions::Model>> {
        let params = query.pagination();
        let mut select = promotions::Entity::find();
        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            select = select.filter(
                promotions::Column::Name
                    .contains(search.trim())
                    .or(promotions::Column::Code.contains(search.trim().to_ascii_uppercase())),
            );
        }
        if let Some(active) = query.is_active {
            select = select.filter(promotions::Column::IsActive.eq(active));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(promotions::Column::CreatedAt)
            .order_by_desc(promotions::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_promotion(&self, id: i32) -> AppResult<promotions::Model> {
        promotions::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Promotion not found".to_string()))
    }

    pub async fn create_promotion(
        &self,
        request: CreatePromotionRequest,
    ) -> AppResult<promotions::Model> {
        request.validate()?;

        let existing = promotions::Entity::find()
            .filter(promotions::Column::Code.eq(request.code.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "Promotion code {} already exists",
                request.code
            )));
        }

        let now = Utc::now();
        let promotion = promotions::ActiveModel {
            code: Set(request.code),
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            discount_type: Set(request.discount_type),
            value: Set(request.value),
            min_purchase: Set(request.min_purchase),
            tier: Set(request.tier),
            starts_at: Set(request.starts_at),
            ends_at: Set(request.ends_at),
            max_uses: Set(request.max_uses),
            uses_count: Set(0),
            is_active: Set(request.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Promotion {} created", promotion.code);
        Ok(promotion)
    }

    pub async fn update_promotion(
        &self,
        id: i32,
        request: UpdatePromotionRequest,
    ) -> AppResult<promotions::Model> {
        request.validate()?;
        let current = self.get_promotion(id).await?;

        let discount_type = request
            .discount_type
            .clone()
            .unwrap_or_else(|| current.discount_type.clone());
        let value = request.value.unwrap_or(current.value);
        check_promotion_value(&discount_type, value)?;
        check_promotion_window(
            request.starts_at.unwrap_or(current.starts_at),
            request.ends_at.unwrap_or(current.ends_at),
        )?;

        let mut am = current.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if request.description.is_some() {
            am.description = Set(request.description);
        }
        am.discount_type = Set(discount_type);
        am.value = Set(value);
        if let Some(min) = request.min_purchase {
            am.min_purchase = Set(min);
        }
        if let Some(tier) = request.tier {
            am.tier = Set(tier);
        }
        if let Some(starts_at) = request.starts_at {
            am.starts_at = Set(starts_at);
        }
        if let Some(ends_at) = request.ends_at {
            am.ends_at = Set(ends_at);
        }
        if let Some(max_uses) = request.max_uses {
            am.max_uses = Set(max_uses);
        }
        am.updated_at = Set(Utc::now());
        Ok(am.update(&self.pool).await?)
    }

    /// Used promotions are kept for order history; deactivate them instead.
    pub async fn delete_promotion(&self, id: i32) -> AppResult<()> {
        let promotion = self.get_promotion(id).await?;
        let used = orders::Entity::find()
            .filter(orders::Column::PromotionId.eq(promotion.id))
            .count(&self.pool)
            .await?;
        if used > 0 {
            return Err(AppError::Conflict(format!(
                "Promotion {} is referenced by {} orders",
                promotion.code, used
            )));
        }
        promotions::Entity::delete_by_id(id).exec(&self.pool).await?;
        log::info!("Promotion {} deleted", promotion.code);
        Ok(())
    }

    pub async fn toggle_promotion(&self, id: i32) -> AppResult<promotions::Model> {
        let current = self.get_promotion(id).await?;
        let active = !current.is_active;
        let mut am = current.into_active_model();
        am.is_active = Set(active);
        am.updated_at = Set(Utc::now());
        let updated = am.update(&self.pool).await?;
        log::info!("Promotion {} active = {}", updated.code, updated.is_active);
        Ok(updated)
    }

    pub async fn validate_promotion(
        &self,
        request: ValidatePromotionRequest,
    ) -> AppResult<PromotionValidation> {
        request.validate()?;
        let promotion = find_by_code(&self.pool, &request.code).await?;

        let tier = match request.customer_id {
            Some(customer_id) => Some(
                customers::Entity::find_by_id(customer_id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?
                    .tier,
            ),
            None => None,
        };

        let discount = check_applicable(&promotion, tier.as_ref(), request.subtotal, Utc::now())?;
        Ok(PromotionValidation {
            promotion_id: promotion.id,
            code: promotion.code,
            subtotal: request.subtotal,
            discount,
            total: request.subtotal - discount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DiscountType;
    use chrono::Duration;

    fn promo() -> promotions::Model {
        let now = Utc::now();
        promotions::Model {
            id: 1,
            code: "VIP20".into(),
            name: "VIP 20%".into(),
            description: None,
            discount_type: DiscountType::Percentage,
            value: 20,
            min_purchase: 10_000,
            tier: Some(CustomerTier::Vip),
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
            max_uses: Some(5),
            uses_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_applicable_promotion_gives_discount() {
        let discount =
            check_applicable(&promo(), Some(&CustomerTier::Vip), 50_000, Utc::now()).unwrap();
        assert_eq!(discount, 10_000);
    }

    #[test]
    fn test_tier_restriction() {
        assert!(check_applicable(&promo(), Some(&CustomerTier::Eventual), 50_000, Utc::now()).is_err());
        assert!(check_applicable(&promo(), None, 50_000, Utc::now()).is_err());
    }

    #[test]
    fn test_min_purchase_window_and_uses() {
        let p = promo();
        assert!(check_applicable(&p, Some(&CustomerTier::Vip), 9_999, Utc::now()).is_err());
        assert!(
            check_applicable(&p, Some(&CustomerTier::Vip), 50_000, p.ends_at + Duration::seconds(1))
                .is_err()
        );

        let exhausted = promotions::Model {
            uses_count: 5,
            ..promo()
        };
        assert!(check_applicable(&exhausted, Some(&CustomerTier::Vip), 50_000, Utc::now()).is_err());

        let inactive = promotions::Model {
            is_active: false,
            ..promo()
        };
        assert!(check_applicable(&inactive, Some(&CustomerTier::Vip), 50_000, Utc::now()).is_err());
    }

    #[tokio::test]
    async fn test_record_use_stops_at_max_uses() {
        let db = crate::database::memory_pool().await;
        let now = Utc::now();
        let promotion = PromotionService::new(db.clone())
            .create_promotion(CreatePromotionRequest {
                code: "DOSVECES".into(),
                name: "Dos veces".into(),
                description: None,
                discount_type: DiscountType::FixedAmount,
                value: 500,
                min_purchase: 0,
                tier: None,
                starts_at: now - Duration::days(1),
                ends_at: now + Duration::days(1),
                max_uses: Some(2),
                is_active: true,
            })
            .await
            .unwrap();

        record_use(&db, promotion.id, 1).await.unwrap();
        record_use(&db, promotion.id, 1).await.unwrap();
        assert!(matches!(
            record_use(&db, promotion.id, 1).await,
            Err(AppError::ValidationError(_))
        ));

        record_use(&db, promotion.id, -1).await.unwrap();
        let reloaded = promotions::Entity::find_by_id(promotion.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.uses_count, 1);
    }
}
