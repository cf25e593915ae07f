use super::{ApiClient, ClientResult, check};
use crate::entities::collection_entity;
use crate::models::*;

impl ApiClient {
    pub async fn list_collections(
        &self,
        query: &CollectionQuery,
    ) -> ClientResult<PaginatedResponse<collection_entity::Model>> {
        self.get_with("/collections", query).await
    }

    pub async fn register_payment(
        &self,
        request: &CreateCollectionRequest,
    ) -> ClientResult<collection_entity::Model> {
        check(request)?;
        self.post("/collections", request).await
    }

    pub async fn list_receivables(
        &self,
        query: &ReceivableQuery,
    ) -> ClientResult<PaginatedResponse<ReceivableResponse>> {
        self.get_with("/collections/pending", query).await
    }

    pub async fn customer_balance(&self, customer_id: i32) -> ClientResult<CustomerBalance> {
        self.get(&format!("/collections/customers/{customer_id}/balance"))
            .await
    }
}
