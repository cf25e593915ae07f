use super::{ApiClient, ClientResult, check};
use crate::entities::{delivery_route_entity, driver_entity};
use crate::models::*;

impl ApiClient {
    pub async fn list_drivers(
        &self,
        query: &DriverQuery,
    ) -> ClientResult<PaginatedResponse<driver_entity::Model>> {
        self.get_with("/deliveries/drivers", query).await
    }

    pub async fn get_driver(&self, id: i32) -> ClientResult<driver_entity::Model> {
        self.get(&format!("/deliveries/drivers/{id}")).await
    }

    pub async fn create_driver(
        &self,
        request: &CreateDriverRequest,
    ) -> ClientResult<driver_entity::Model> {
        check(request)?;
        self.post("/deliveries/drivers", request).await
    }

    pub async fn update_driver(
        &self,
        id: i32,
        request: &UpdateDriverRequest,
    ) -> ClientResult<driver_entity::Model> {
        check(request)?;
        self.put(&format!("/deliveries/drivers/{id}"), request)
            .await
    }

    pub async fn delete_driver(&self, id: i32) -> ClientResult<()> {
        self.delete(&format!("/deliveries/drivers/{id}")).await
    }

    pub async fn list_routes(
        &self,
        query: &RouteQuery,
    ) -> ClientResult<PaginatedResponse<delivery_route_entity::Model>> {
        self.get_with("/deliveries/routes", query).await
    }

    pub async fn get_route(&self, id: i32) -> ClientResult<RouteDetail> {
        self.get(&format!("/deliveries/routes/{id}")).await
    }

    pub async fn create_route(&self, request: &CreateRouteRequest) -> ClientResult<RouteDetail> {
        check(request)?;
        self.post("/deliveries/routes", request).await
    }

    pub async fn start_route(&self, id: i32) -> ClientResult<RouteDetail> {
        self.post_empty(&format!("/deliveries/routes/{id}/start"))
            .await
    }

    pub async fn deliver_stop(
        &self,
        route_id: i32,
        stop_id: i32,
        request: &StopUpdateRequest,
    ) -> ClientResult<RouteDetail> {
        self.post(
            &format!("/deliveries/routes/{route_id}/stops/{stop_id}/deliver"),
            request,
        )
        .await
    }

    pub async fn fail_stop(
        &self,
        route_id: i32,
        stop_id: i32,
        request: &StopUpdateRequest,
    ) -> ClientResult<RouteDetail> {
        self.post(
            &format!("/deliveries/routes/{route_id}/stops/{stop_id}/fail"),
            request,
        )
        .await
    }

    pub async fn cancel_route(&self, id: i32) -> ClientResult<delivery_route_entity::Model> {
        self.post_empty(&format!("/deliveries/routes/{id}/cancel"))
            .await
    }
}
