use super::{ApiClient, ClientResult, check};
use crate::entities::promotion_entity;
use crate::models::*;

impl ApiClient {
    pub async fn list_promotions(
        &self,
        query: &PromotionQuery,
    ) -> ClientResult<PaginatedResponse<promotion_entity::Model>> {
        self.get_with("/promotions", query).await
    }

    pub async fn get_promotion(&self, id: i32) -> ClientResult<promotion_entity::Model> {
        self.get(&format!("/promotions/{id}")).await
    }

    pub async fn create_promotion(
        &self,
        request: &CreatePromotionRequest,
    ) -> ClientResult<promotion_entity::Model> {
        check(request)?;
        self.post("/promotions", request).await
    }

    pub async fn update_promotion(
        &self,
        id: i32,
        request: &UpdatePromotionRequest,
    ) -> ClientResult<promotion_entity::Model> {
        check(request)?;
        self.put(&format!("/promotions/{id}"), request).await
    }

    pub async fn delete_promotion(&self, id: i32) -> ClientResult<()> {
        self.delete(&format!("/promotions/{id}")).await
    }

    pub async fn toggle_promotion(&self, id: i32) -> ClientResult<promotion_entity::Model> {
        self.patch_empty(&format!("/promotions/{id}/toggle")).await
    }

    pub async fn validate_promotion(
        &self,
        request: &ValidatePromotionRequest,
    ) -> ClientResult<PromotionValidation> {
        check(request)?;
        self.post("/promotions/validate", request).await
    }
}
