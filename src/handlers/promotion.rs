use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::models::*;
use crate::services::PromotionService;

#[utoipa::path(
    get,
    path = "/promotions",
    tag = "promotion",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("search" = Option<String>, Query, description = "Code or name"),
        ("isActive" = Option<bool>, Query, description = "Active flag")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Promotion list")
    )
)]
pub async fn list_promotions(
    promotion_service: web::Data<PromotionService>,
    query: web::Query<PromotionQuery>,
) -> AppResult<HttpResponse> {
    let page = promotion_service.list_promotions(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/promotions/{id}",
    tag = "promotion",
    params(("id" = i32, Path, description = "Promotion id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Promotion"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let promotion = promotion_service.get_promotion(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(promotion)))
}

#[utoipa::path(
    post,
    path = "/promotions",
    tag = "promotion",
    request_body = CreatePromotionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Promotion created"),
        (status = 400, description = "Invalid value or window"),
        (status = 409, description = "Code already exists")
    )
)]
pub async fn create_promotion(
    promotion_service: web::Data<PromotionService>,
    request: web::Json<CreatePromotionRequest>,
) -> AppResult<HttpResponse> {
    let promotion = promotion_service
        .create_promotion(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(promotion)))
}

#[utoipa::path(
    put,
    path = "/promotions/{id}",
    tag = "promotion",
    params(("id" = i32, Path, description = "Promotion id")),
    request_body = UpdatePromotionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Promotion updated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
    request: web::Json<UpdatePromotionRequest>,
) -> AppResult<HttpResponse> {
    let promotion = promotion_service
        .update_promotion(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(promotion)))
}

#[utoipa::path(
    delete,
    path = "/promotions/{id}",
    tag = "promotion",
    params(("id" = i32, Path, description = "Promotion id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Promotion deleted"),
        (status = 409, description = "Promotion used by orders")
    )
)]
pub async fn delete_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    promotion_service.delete_promotion(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(id, "Promotion deleted")))
}

#[utoipa::path(
    patch,
    path = "/promotions/{id}/toggle",
    tag = "promotion",
    params(("id" = i32, Path, description = "Promotion id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Active flag flipped"),
        (status = 404, description = "Not found")
    )
)]
pub async fn toggle_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let promotion = promotion_service.toggle_promotion(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(promotion)))
}

#[utoipa::path(
    post,
    path = "/promotions/validate",
    tag = "promotion",
    request_body = ValidatePromotionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Discount for the subtotal", body = PromotionValidation),
        (status = 400, description = "Promotion does not apply"),
        (status = 404, description = "Unknown code")
    )
)]
pub async fn validate_promotion(
    promotion_service: web::Data<PromotionService>,
    request: web::Json<ValidatePromotionRequest>,
) -> AppResult<HttpResponse> {
    let validation = promotion_service
        .validate_promotion(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(validation)))
}

pub fn promotion_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/promotions")
            .route("", web::get().to(list_promotions))
            .route("", web::post().to(create_promotion))
            .route("/validate", web::post().to(validate_promotion))
            .route("/{id}", web::get().to(get_promotion))
            .route("/{id}", web::put().to(update_promotion))
            .route("/{id}", web::delete().to(delete_promotion))
            .route("/{id}/toggle", web::patch().to(toggle_promotion)),
    );
}
