use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::models::*;
use crate::services::LoyaltyService;

#[utoipa::path(
    get,
    path = "/loyalty/wallets/{customer_id}",
    tag = "loyalty",
    params(("customer_id" = i32, Path, description = "Customer id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Points wallet, created on first access"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_wallet(
    loyalty_service: web::Data<LoyaltyService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let wallet = loyalty_service.get_wallet(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(wallet)))
}

#[utoipa::path(
    get,
    path = "/loyalty/transactions",
    tag = "loyalty",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("customerId" = Option<i32>, Query, description = "Customer"),
        ("transactionType" = Option<String>, Query, description = "EARN, REDEEM or EXPIRE")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Points history")
    )
)]
pub async fn list_transactions(
    loyalty_service: web::Data<LoyaltyService>,
    query: web::Query<LoyaltyTransactionQuery>,
) -> AppResult<HttpResponse> {
    let page = loyalty_service.list_transactions(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    post,
    path = "/loyalty/earn",
    tag = "loyalty",
    request_body = EarnPointsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Points credited"),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn earn_points(
    loyalty_service: web::Data<LoyaltyService>,
    request: web::Json<EarnPointsRequest>,
) -> AppResult<HttpResponse> {
    let transaction = loyalty_service.earn_points(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(transaction)))
}

#[utoipa::path(
    post,
    path = "/loyalty/redeem",
    tag = "loyalty",
    request_body = RedeemPointsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Points redeemed, updated wallet"),
        (status = 400, description = "Not enough points")
    )
)]
pub async fn redeem_points(
    loyalty_service: web::Data<LoyaltyService>,
    request: web::Json<RedeemPointsRequest>,
) -> AppResult<HttpResponse> {
    let wallet = loyalty_service.redeem_points(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(wallet, "Points redeemed")))
}

#[utoipa::path(
    post,
    path = "/loyalty/expire",
    tag = "loyalty",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Expiration run", body = ExpirePointsResponse)
    )
)]
pub async fn expire_points(
    loyalty_service: web::Data<LoyaltyService>,
) -> AppResult<HttpResponse> {
    let result = loyalty_service.expire_points().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

pub fn loyalty_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/loyalty")
            .route("/wallets/{customer_id}", web::get().to(get_wallet))
            .route("/transactions", web::get().to(list_transactions))
            .route("/earn", web::post().to(earn_points))
            .route("/redeem", web::post().to(redeem_points))
            .route("/expire", web::post().to(expire_points)),
    );
}
