use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::DeliveryService;

#[utoipa::path(
    get,
    path = "/deliveries/drivers",
    tag = "delivery",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("search" = Option<String>, Query, description = "Driver name"),
        ("isActive" = Option<bool>, Query, description = "Active flag")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Driver list")
    )
)]
pub async fn list_drivers(
    delivery_service: web::Data<DeliveryService>,
    query: web::Query<DriverQuery>,
) -> AppResult<HttpResponse> {
    let page = delivery_service.list_drivers(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/deliveries/drivers/{id}",
    tag = "delivery",
    params(("id" = i32, Path, description = "Driver id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Driver"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_driver(
    delivery_service: web::Data<DeliveryService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let driver = delivery_service.get_driver(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(driver)))
}

#[utoipa::path(
    post,
    path = "/deliveries/drivers",
    tag = "delivery",
    request_body = CreateDriverRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Driver created"),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_driver(
    delivery_service: web::Data<DeliveryService>,
    request: web::Json<CreateDriverRequest>,
) -> AppResult<HttpResponse> {
    let driver = delivery_service.create_driver(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(driver)))
}

#[utoipa::path(
    put,
    path = "/deliveries/drivers/{id}",
    tag = "delivery",
    params(("id" = i32, Path, description = "Driver id")),
    request_body = UpdateDriverRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Driver updated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_driver(
    delivery_service: web::Data<DeliveryService>,
    path: web::Path<i32>,
    request: web::Json<UpdateDriverRequest>,
) -> AppResult<HttpResponse> {
    let driver = delivery_service
        .update_driver(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(driver)))
}

#[utoipa::path(
    delete,
    path = "/deliveries/drivers/{id}",
    tag = "delivery",
    params(("id" = i32, Path, description = "Driver id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Driver deleted"),
        (status = 409, description = "Driver has routes")
    )
)]
pub async fn delete_driver(
    delivery_service: web::Data<DeliveryService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    delivery_service.delete_driver(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(id, "Driver deleted")))
}

#[utoipa::path(
    get,
    path = "/deliveries/routes",
    tag = "delivery",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("routeDate" = Option<String>, Query, description = "YYYY-MM-DD"),
        ("driverId" = Option<i32>, Query, description = "Driver"),
        ("branchId" = Option<i32>, Query, description = "Branch"),
        ("status" = Option<String>, Query, description = "PLANNED, IN_PROGRESS, COMPLETED or CANCELLED")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Route list")
    )
)]
pub async fn list_routes(
    delivery_service: web::Data<DeliveryService>,
    query: web::Query<RouteQuery>,
) -> AppResult<HttpResponse> {
    let page = delivery_service.list_routes(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/deliveries/routes/{id}",
    tag = "delivery",
    params(("id" = i32, Path, description = "Route id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Route with driver and stops"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_route(
    delivery_service: web::Data<DeliveryService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let route = delivery_service.get_route(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(route)))
}

#[utoipa::path(
    post,
    path = "/deliveries/routes",
    tag = "delivery",
    request_body = CreateRouteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Route planned"),
        (status = 400, description = "Driver inactive, no delivery that day or orders not ready")
    )
)]
pub async fn create_route(
    delivery_service: web::Data<DeliveryService>,
    request: web::Json<CreateRouteRequest>,
) -> AppResult<HttpResponse> {
    let route = delivery_service.create_route(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(route)))
}

#[utoipa::path(
    post,
    path = "/deliveries/routes/{id}/start",
    tag = "delivery",
    params(("id" = i32, Path, description = "Route id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Route in progress"),
        (status = 400, description = "Route is not planned")
    )
)]
pub async fn start_route(
    delivery_service: web::Data<DeliveryService>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let route = delivery_service
        .start_route(path.into_inner(), Some(user.id))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(route)))
}

#[utoipa::path(
    post,
    path = "/deliveries/routes/{id}/stops/{stop_id}/deliver",
    tag = "delivery",
    params(
        ("id" = i32, Path, description = "Route id"),
        ("stop_id" = i32, Path, description = "Stop id")
    ),
    request_body = StopUpdateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Stop delivered"),
        (status = 400, description = "Route not in progress or stop already closed")
    )
)]
pub async fn deliver_stop(
    delivery_service: web::Data<DeliveryService>,
    user: CurrentUser,
    path: web::Path<(i32, i32)>,
    request: Option<web::Json<StopUpdateRequest>>,
) -> AppResult<HttpResponse> {
    let (route_id, stop_id) = path.into_inner();
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let route = delivery_service
        .deliver_stop(route_id, stop_id, Some(user.id), request)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(route)))
}

#[utoipa::path(
    post,
    path = "/deliveries/routes/{id}/stops/{stop_id}/fail",
    tag = "delivery",
    params(
        ("id" = i32, Path, description = "Route id"),
        ("stop_id" = i32, Path, description = "Stop id")
    ),
    request_body = StopUpdateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Stop failed, order back to PREPARING"),
        (status = 400, description = "Route not in progress or stop already closed")
    )
)]
pub async fn fail_stop(
    delivery_service: web::Data<DeliveryService>,
    user: CurrentUser,
    path: web::Path<(i32, i32)>,
    request: Option<web::Json<StopUpdateRequest>>,
) -> AppResult<HttpResponse> {
    let (route_id, stop_id) = path.into_inner();
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let route = delivery_service
        .fail_stop(route_id, stop_id, Some(user.id), request)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(route)))
}

#[utoipa::path(
    post,
    path = "/deliveries/routes/{id}/cancel",
    tag = "delivery",
    params(("id" = i32, Path, description = "Route id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Route cancelled"),
        (status = 400, description = "Only planned routes can be cancelled")
    )
)]
pub async fn cancel_route(
    delivery_service: web::Data<DeliveryService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let route = delivery_service.cancel_route(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(route, "Route cancelled")))
}

pub fn delivery_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/deliveries")
            .route("/drivers", web::get().to(list_drivers))
            .route("/drivers", web::post().to(create_driver))
            .route("/drivers/{id}", web::get().to(get_driver))
            .route("/drivers/{id}", web::put().to(update_driver))
            .route("/drivers/{id}", web::delete().to(delete_driver))
            .route("/routes", web::get().to(list_routes))
            .route("/routes", web::post().to(create_route))
            .route("/routes/{id}", web::get().to(get_route))
            .route("/routes/{id}/start", web::post().to(start_route))
            .route(
                "/routes/{id}/stops/{stop_id}/deliver",
                web::post().to(deliver_stop),
            )
            .route("/routes/{id}/stops/{stop_id}/fail", web::post().to(fail_stop))
            .route("/routes/{id}/cancel", web::post().to(cancel_route)),
    );
}
