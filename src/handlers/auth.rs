use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Wrong credentials or inactive user")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let response = auth_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = AuthResponse),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh(
    auth_service: web::Data<AuthService>,
    request: web::Json<RefreshRequest>,
) -> AppResult<HttpResponse> {
    let response = auth_service.refresh_token(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user profile", body = UserProfile),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(
    auth_service: web::Data<AuthService>,
    user: CurrentUser,
) -> AppResult<HttpResponse> {
    let profile = auth_service.get_profile(user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/me", web::get().to(me)),
    );
}
