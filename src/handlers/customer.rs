use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::models::*;
use crate::services::CustomerService;

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customer",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("search" = Option<String>, Query, description = "Name or code"),
        ("tier" = Option<String>, Query, description = "EVENTUAL, FRECUENTE or VIP"),
        ("isBlocked" = Option<bool>, Query, description = "Blocked flag"),
        ("branchId" = Option<i32>, Query, description = "Branch")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Customer list"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_customers(
    customer_service: web::Data<CustomerService>,
    query: web::Query<CustomerQuery>,
) -> AppResult<HttpResponse> {
    let page = customer_service.list_customers(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customer",
    params(("id" = i32, Path, description = "Customer id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Customer"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_customer(
    customer_service: web::Data<CustomerService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let customer = customer_service.get_customer(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(customer)))
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customer",
    request_body = CreateCustomerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Customer created"),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Code already in use")
    )
)]
pub async fn create_customer(
    customer_service: web::Data<CustomerService>,
    request: web::Json<CreateCustomerRequest>,
) -> AppResult<HttpResponse> {
    let customer = customer_service
        .create_customer(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(customer)))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customer",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = UpdateCustomerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Customer updated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_customer(
    customer_service: web::Data<CustomerService>,
    path: web::Path<i32>,
    request: web::Json<UpdateCustomerRequest>,
) -> AppResult<HttpResponse> {
    let customer = customer_service
        .update_customer(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(customer)))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customer",
    params(("id" = i32, Path, description = "Customer id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Customer deleted"),
        (status = 409, description = "Customer has orders")
    )
)]
pub async fn delete_customer(
    customer_service: web::Data<CustomerService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    customer_service.delete_customer(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(id, "Customer deleted")))
}

#[utoipa::path(
    patch,
    path = "/customers/{id}/toggle-blocked",
    tag = "customer",
    params(("id" = i32, Path, description = "Customer id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Blocked flag flipped"),
        (status = 404, description = "Not found")
    )
)]
pub async fn toggle_blocked(
    customer_service: web::Data<CustomerService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let customer = customer_service.toggle_blocked(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(customer)))
}

pub fn customer_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(list_customers))
            .route("", web::post().to(create_customer))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer))
            .route("/{id}/toggle-blocked", web::patch().to(toggle_blocked)),
    );
}
