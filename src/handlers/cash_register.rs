use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::CashRegisterService;

#[utoipa::path(
    post,
    path = "/cash-register/open",
    tag = "cash_register",
    request_body = OpenCashRegisterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Session opened"),
        (status = 409, description = "Branch already has an open session")
    )
)]
pub async fn open_register(
    cash_register_service: web::Data<CashRegisterService>,
    user: CurrentUser,
    request: web::Json<OpenCashRegisterRequest>,
) -> AppResult<HttpResponse> {
    let register = cash_register_service
        .open_register(Some(user.id), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(register)))
}

#[utoipa::path(
    get,
    path = "/cash-register/current",
    tag = "cash_register",
    params(("branchId" = i32, Query, description = "Branch")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Open session with running totals"),
        (status = 404, description = "No open session")
    )
)]
pub async fn current_register(
    cash_register_service: web::Data<CashRegisterService>,
    query: web::Query<CurrentRegisterQuery>,
) -> AppResult<HttpResponse> {
    let summary = cash_register_service
        .current_register(query.branch_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

#[utoipa::path(
    get,
    path = "/cash-register",
    tag = "cash_register",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("branchId" = Option<i32>, Query, description = "Branch"),
        ("status" = Option<String>, Query, description = "OPEN or CLOSED")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Register sessions")
    )
)]
pub async fn list_registers(
    cash_register_service: web::Data<CashRegisterService>,
    query: web::Query<CashRegisterQuery>,
) -> AppResult<HttpResponse> {
    let page = cash_register_service.list_registers(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/cash-register/{id}",
    tag = "cash_register",
    params(("id" = i32, Path, description = "Session id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Session with totals"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_register(
    cash_register_service: web::Data<CashRegisterService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let summary = cash_register_service
        .get_register(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

#[utoipa::path(
    post,
    path = "/cash-register/{id}/close",
    tag = "cash_register",
    params(("id" = i32, Path, description = "Session id")),
    request_body = CloseCashRegisterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Session closed with expected amount and difference"),
        (status = 400, description = "Session already closed")
    )
)]
pub async fn close_register(
    cash_register_service: web::Data<CashRegisterService>,
    path: web::Path<i32>,
    request: web::Json<CloseCashRegisterRequest>,
) -> AppResult<HttpResponse> {
    let register = cash_register_service
        .close_register(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(register)))
}

pub fn cash_register_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cash-register")
            .route("", web::get().to(list_registers))
            .route("/open", web::post().to(open_register))
            .route("/current", web::get().to(current_register))
            .route("/{id}", web::get().to(get_register))
            .route("/{id}/close", web::post().to(close_register)),
    );
}
