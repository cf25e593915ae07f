use super::{ApiClient, ClientResult, check};
use crate::entities::{CustomerTier, brand_entity, category_entity, product_entity};
use crate::models::*;

impl ApiClient {
    pub async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> ClientResult<PaginatedResponse<product_entity::Model>> {
        self.get_with("/products", query).await
    }

    pub async fn get_product(&self, id: i32) -> ClientResult<product_entity::Model> {
        self.get(&format!("/products/{id}")).await
    }

    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> ClientResult<product_entity::Model> {
        check(request)?;
        self.post("/products", request).await
    }

    pub async fn update_product(
        &self,
        id: i32,
        request: &UpdateProductRequest,
    ) -> ClientResult<product_entity::Model> {
        check(request)?;
        self.put(&format!("/products/{id}"), request).await
    }

    pub async fn delete_product(&self, id: i32) -> ClientResult<()> {
        self.delete(&format!("/products/{id}")).await
    }

    pub async fn get_product_price(
        &self,
        id: i32,
        tier: CustomerTier,
    ) -> ClientResult<ProductPriceResponse> {
        self.get_with(&format!("/products/{id}/price"), &PriceQuery { tier })
            .await
    }

    pub async fn list_categories(&self) -> ClientResult<Vec<category_entity::Model>> {
        self.get("/products/categories").await
    }

    pub async fn create_category(
        &self,
        request: &CreateCategoryRequest,
    ) -> ClientResult<category_entity::Model> {
        check(request)?;
        self.post("/products/categories", request).await
    }

    pub async fn list_brands(&self) -> ClientResult<Vec<brand_entity::Model>> {
        self.get("/products/brands").await
    }

    pub async fn create_brand(
        &self,
        request: &CreateBrandRequest,
    ) -> ClientResult<brand_entity::Model> {
        check(request)?;
        self.post("/products/brands", request).await
    }
}
