use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::OrderService;

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("status" = Option<String>, Query, description = "Order status"),
        ("customerId" = Option<i32>, Query, description = "Customer"),
        ("branchId" = Option<i32>, Query, description = "Branch"),
        ("from" = Option<String>, Query, description = "First day, YYYY-MM-DD"),
        ("to" = Option<String>, Query, description = "Last day, YYYY-MM-DD")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order list"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    query: web::Query<OrderQuery>,
) -> AppResult<HttpResponse> {
    let page = order_service.list_orders(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    params(("id" = i32, Path, description = "Order id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order with its items"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let order = order_service.get_order(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(order)))
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Order created"),
        (status = 400, description = "Invalid order, blocked customer or credit exceeded"),
        (status = 404, description = "Customer, branch or product not found")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    user: CurrentUser,
    request: web::Json<CreateOrderRequest>,
) -> AppResult<HttpResponse> {
    let order = order_service
        .create_order(Some(user.id), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(order)))
}

#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    tag = "order",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Status changed"),
        (status = 400, description = "Transition not allowed or insufficient stock"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_status(
    order_service: web::Data<OrderService>,
    user: CurrentUser,
    path: web::Path<i32>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> AppResult<HttpResponse> {
    let order = order_service
        .update_status(path.into_inner(), Some(user.id), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(order)))
}

#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    tag = "order",
    params(("id" = i32, Path, description = "Order id")),
    request_body = CancelOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order cancelled"),
        (status = 400, description = "Order can no longer be cancelled"),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_order(
    order_service: web::Data<OrderService>,
    user: CurrentUser,
    path: web::Path<i32>,
    request: web::Json<CancelOrderRequest>,
) -> AppResult<HttpResponse> {
    let order = order_service
        .cancel_order(path.into_inner(), Some(user.id), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(order, "Order cancelled")))
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(list_orders))
            .route("", web::post().to(create_order))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}/status", web::patch().to(update_status))
            .route("/{id}/cancel", web::post().to(cancel_order)),
    );
}
