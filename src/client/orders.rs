use super::{ApiClient, ClientResult, check};
use crate::entities::{OrderStatus, order_entity};
use crate::models::*;

impl ApiClient {
    pub async fn list_orders(
        &self,
        query: &OrderQuery,
    ) -> ClientResult<PaginatedResponse<order_entity::Model>> {
        self.get_with("/orders", query).await
    }

    pub async fn get_order(&self, id: i32) -> ClientResult<OrderDetail> {
        self.get(&format!("/orders/{id}")).await
    }

    pub async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<OrderDetail> {
        check(request)?;
        self.post("/orders", request).await
    }

    pub async fn update_order_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> ClientResult<order_entity::Model> {
        self.patch(
            &format!("/orders/{id}/status"),
            &UpdateOrderStatusRequest { status },
        )
        .await
    }

    pub async fn cancel_order(
        &self,
        id: i32,
        request: &CancelOrderRequest,
    ) -> ClientResult<order_entity::Model> {
        check(request)?;
        self.post(&format!("/orders/{id}/cancel"), request).await
    }
}
