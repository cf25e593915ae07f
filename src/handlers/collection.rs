use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::CollectionService;

#[utoipa::path(
    get,
    path = "/collections",
    tag = "collection",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("customerId" = Option<i32>, Query, description = "Customer"),
        ("orderId" = Option<i32>, Query, description = "Order")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Payments received")
    )
)]
pub async fn list_collections(
    collection_service: web::Data<CollectionService>,
    query: web::Query<CollectionQuery>,
) -> AppResult<HttpResponse> {
    let page = collection_service.list_collections(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    post,
    path = "/collections",
    tag = "collection",
    request_body = CreateCollectionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Payment registered"),
        (status = 400, description = "Amount exceeds balance or order cancelled"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn register_payment(
    collection_service: web::Data<CollectionService>,
    user: CurrentUser,
    request: web::Json<CreateCollectionRequest>,
) -> AppResult<HttpResponse> {
    let collection = collection_service
        .register_payment(Some(user.id), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(collection)))
}

#[utoipa::path(
    get,
    path = "/collections/pending",
    tag = "collection",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("customerId" = Option<i32>, Query, description = "Customer"),
        ("branchId" = Option<i32>, Query, description = "Branch"),
        ("overdueOnly" = Option<bool>, Query, description = "Only orders past their credit days")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Orders with balance due")
    )
)]
pub async fn list_receivables(
    collection_service: web::Data<CollectionService>,
    query: web::Query<ReceivableQuery>,
) -> AppResult<HttpResponse> {
    let page = collection_service.list_receivables(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/collections/customers/{customer_id}/balance",
    tag = "collection",
    params(("customer_id" = i32, Path, description = "Customer id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Outstanding balance and available credit", body = CustomerBalance),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn customer_balance(
    collection_service: web::Data<CollectionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let balance = collection_service
        .customer_balance(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(balance)))
}

pub fn collection_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/collections")
            .route("", web::get().to(list_collections))
            .route("", web::post().to(register_payment))
            .route("/pending", web::get().to(list_receivables))
            .route(
                "/customers/{customer_id}/balance",
                web::get().to(customer_balance),
            ),
    );
}
