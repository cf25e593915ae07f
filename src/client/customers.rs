use super::{ApiClient, ClientResult, check};
use crate::entities::customer_entity;
use crate::models::*;

impl ApiClient {
    pub async fn list_customers(
        &self,
        query: &CustomerQuery,
    ) -> ClientResult<PaginatedResponse<customer_entity::Model>> {
        self.get_with("/customers", query).await
    }

    pub async fn get_customer(&self, id: i32) -> ClientResult<customer_entity::Model> {
        self.get(&format!("/customers/{id}")).await
    }

    pub async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
    ) -> ClientResult<customer_entity::Model> {
        check(request)?;
        self.post("/customers", request).await
    }

    pub async fn update_customer(
        &self,
        id: i32,
        request: &UpdateCustomerRequest,
    ) -> ClientResult<customer_entity::Model> {
        check(request)?;
        self.put(&format!("/customers/{id}"), request).await
    }

    pub async fn delete_customer(&self, id: i32) -> ClientResult<()> {
        self.delete(&format!("/customers/{id}")).await
    }

    pub async fn toggle_customer_blocked(&self, id: i32) -> ClientResult<customer_entity::Model> {
        self.patch_empty(&format!("/customers/{id}/toggle-blocked"))
            .await
    }
}
