use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::InventoryService;

#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("branchId" = Option<i32>, Query, description = "Branch"),
        ("productId" = Option<i32>, Query, description = "Product")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Stock per product and branch")
    )
)]
pub async fn list_inventory(
    inventory_service: web::Data<InventoryService>,
    query: web::Query<InventoryQuery>,
) -> AppResult<HttpResponse> {
    let page = inventory_service.list_inventory(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i32, Path, description = "Inventory record id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Stock line", body = InventoryItemResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_inventory(
    inventory_service: web::Data<InventoryService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let item = inventory_service.get_inventory(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(item)))
}

#[utoipa::path(
    post,
    path = "/inventory/movements",
    tag = "inventory",
    request_body = CreateMovementRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Movement registered"),
        (status = 400, description = "Invalid movement or insufficient stock")
    )
)]
pub async fn create_movement(
    inventory_service: web::Data<InventoryService>,
    user: CurrentUser,
    request: web::Json<CreateMovementRequest>,
) -> AppResult<HttpResponse> {
    let movement = inventory_service
        .create_movement(Some(user.id), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(movement)))
}

#[utoipa::path(
    get,
    path = "/inventory/movements",
    tag = "inventory",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("productId" = Option<i32>, Query, description = "Product"),
        ("branchId" = Option<i32>, Query, description = "Branch"),
        ("movementType" = Option<String>, Query, description = "ENTRY, EXIT, ADJUSTMENT, SALE or RETURN")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Movement log")
    )
)]
pub async fn list_movements(
    inventory_service: web::Data<InventoryService>,
    query: web::Query<MovementQuery>,
) -> AppResult<HttpResponse> {
    let page = inventory_service.list_movements(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/inventory/stock-rules",
    tag = "inventory",
    params(
        ("branchId" = Option<i32>, Query, description = "Branch"),
        ("productId" = Option<i32>, Query, description = "Product")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Stock rules")
    )
)]
pub async fn list_stock_rules(
    inventory_service: web::Data<InventoryService>,
    query: web::Query<StockRuleQuery>,
) -> AppResult<HttpResponse> {
    let rules = inventory_service.list_stock_rules(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(rules)))
}

#[utoipa::path(
    post,
    path = "/inventory/stock-rules",
    tag = "inventory",
    request_body = CreateStockRuleRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Rule created"),
        (status = 409, description = "A rule for this product and branch exists")
    )
)]
pub async fn create_stock_rule(
    inventory_service: web::Data<InventoryService>,
    request: web::Json<CreateStockRuleRequest>,
) -> AppResult<HttpResponse> {
    let rule = inventory_service
        .create_stock_rule(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(rule)))
}

#[utoipa::path(
    put,
    path = "/inventory/stock-rules/{id}",
    tag = "inventory",
    params(("id" = i32, Path, description = "Rule id")),
    request_body = UpdateStockRuleRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rule updated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_stock_rule(
    inventory_service: web::Data<InventoryService>,
    path: web::Path<i32>,
    request: web::Json<UpdateStockRuleRequest>,
) -> AppResult<HttpResponse> {
    let rule = inventory_service
        .update_stock_rule(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(rule)))
}

#[utoipa::path(
    delete,
    path = "/inventory/stock-rules/{id}",
    tag = "inventory",
    params(("id" = i32, Path, description = "Rule id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rule deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_stock_rule(
    inventory_service: web::Data<InventoryService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    inventory_service.delete_stock_rule(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(id, "Stock rule deleted")))
}

#[utoipa::path(
    get,
    path = "/inventory/alerts",
    tag = "inventory",
    params(("branchId" = Option<i32>, Query, description = "Branch")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Products below their minimum", body = [StockAlert])
    )
)]
pub async fn get_alerts(
    inventory_service: web::Data<InventoryService>,
    query: web::Query<AlertQuery>,
) -> AppResult<HttpResponse> {
    let alerts = inventory_service.get_alerts(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(alerts)))
}

pub fn inventory_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/inventory")
            .route("", web::get().to(list_inventory))
            .route("/movements", web::get().to(list_movements))
            .route("/movements", web::post().to(create_movement))
            .route("/stock-rules", web::get().to(list_stock_rules))
            .route("/stock-rules", web::post().to(create_stock_rule))
            .route("/stock-rules/{id}", web::put().to(update_stock_rule))
            .route("/stock-rules/{id}", web::delete().to(delete_stock_rule))
            .route("/alerts", web::get().to(get_alerts))
            .route("/{id}", web::get().to(get_inventory)),
    );
}
