//! Users, roles, permissions and branches. Every endpoint here requires
//! the `settings.manage` permission.

use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::middlewares::{CurrentUser, SETTINGS_MANAGE};
use crate::models::*;
use crate::services::SettingsService;

#[utoipa::path(
    get,
    path = "/settings/users",
    tag = "settings",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("search" = Option<String>, Query, description = "Name or email"),
        ("isActive" = Option<bool>, Query, description = "Active flag"),
        ("branchId" = Option<i32>, Query, description = "Branch")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Users with their roles"),
        (status = 403, description = "Missing settings.manage")
    )
)]
pub async fn list_users(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    query: web::Query<UserQuery>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let page = settings_service.list_users(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/settings/users/{id}",
    tag = "settings",
    params(("id" = i32, Path, description = "User id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User with roles"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let found = settings_service.get_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(found)))
}

#[utoipa::path(
    post,
    path = "/settings/users",
    tag = "settings",
    request_body = CreateUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "User created"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    request: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let created = settings_service.create_user(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

#[utoipa::path(
    put,
    path = "/settings/users/{id}",
    tag = "settings",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User updated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    path: web::Path<i32>,
    request: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let updated = settings_service
        .update_user(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

#[utoipa::path(
    patch,
    path = "/settings/users/{id}/toggle-active",
    tag = "settings",
    params(("id" = i32, Path, description = "User id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Active flag flipped"),
        (status = 400, description = "Cannot deactivate yourself")
    )
)]
pub async fn toggle_user_active(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let updated = settings_service
        .toggle_user_active(path.into_inner(), user.id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

#[utoipa::path(
    put,
    path = "/settings/users/{id}/roles",
    tag = "settings",
    params(("id" = i32, Path, description = "User id")),
    request_body = AssignRolesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Roles replaced"),
        (status = 404, description = "User or role not found")
    )
)]
pub async fn assign_roles(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    path: web::Path<i32>,
    request: web::Json<AssignRolesRequest>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let updated = settings_service
        .assign_roles(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

#[utoipa::path(
    get,
    path = "/settings/roles",
    tag = "settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Roles with their permissions")
    )
)]
pub async fn list_roles(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let roles = settings_service.list_roles().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(roles)))
}

#[utoipa::path(
    post,
    path = "/settings/roles",
    tag = "settings",
    request_body = CreateRoleRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Role created"),
        (status = 409, description = "Role already exists")
    )
)]
pub async fn create_role(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    request: web::Json<CreateRoleRequest>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let role = settings_service.create_role(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(role)))
}

#[utoipa::path(
    put,
    path = "/settings/roles/{id}/permissions",
    tag = "settings",
    params(("id" = i32, Path, description = "Role id")),
    request_body = SetPermissionsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Permissions replaced"),
        (status = 400, description = "Unknown permission code")
    )
)]
pub async fn set_role_permissions(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    path: web::Path<i32>,
    request: web::Json<SetPermissionsRequest>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let role = settings_service
        .set_role_permissions(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(role)))
}

#[utoipa::path(
    get,
    path = "/settings/permissions",
    tag = "settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Permission catalog")
    )
)]
pub async fn list_permissions(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let permissions = settings_service.list_permissions().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(permissions)))
}

#[utoipa::path(
    get,
    path = "/settings/branches",
    tag = "settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Branches with delivery weekdays")
    )
)]
pub async fn list_branches(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let branches = settings_service.list_branches().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(branches)))
}

#[utoipa::path(
    post,
    path = "/settings/branches",
    tag = "settings",
    request_body = CreateBranchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Branch created"),
        (status = 409, description = "Code already exists")
    )
)]
pub async fn create_branch(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    request: web::Json<CreateBranchRequest>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let branch = settings_service.create_branch(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(branch)))
}

#[utoipa::path(
    put,
    path = "/settings/branches/{id}",
    tag = "settings",
    params(("id" = i32, Path, description = "Branch id")),
    request_body = UpdateBranchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Branch updated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_branch(
    settings_service: web::Data<SettingsService>,
    user: CurrentUser,
    path: web::Path<i32>,
    request: web::Json<UpdateBranchRequest>,
) -> AppResult<HttpResponse> {
    user.require(SETTINGS_MANAGE)?;
    let branch = settings_service
        .update_branch(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(branch)))
}

pub fn settings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("/users", web::get().to(list_users))
            .route("/users", web::post().to(create_user))
            .route("/users/{id}", web::get().to(get_user))
            .route("/users/{id}", web::put().to(update_user))
            .route("/users/{id}/toggle-active", web::patch().to(toggle_user_active))
            .route("/users/{id}/roles", web::put().to(assign_roles))
            .route("/roles", web::get().to(list_roles))
            .route("/roles", web::post().to(create_role))
            .route("/roles/{id}/permissions", web::put().to(set_role_permissions))
            .route("/permissions", web::get().to(list_permissions))
            .route("/branches", web::get().to(list_branches))
            .route("/branches", web::post().to(create_branch))
            .route("/branches/{id}", web::put().to(update_branch)),
    );
}
