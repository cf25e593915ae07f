use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::models::*;
use crate::services::ReportService;

#[utoipa::path(
    get,
    path = "/reports/sales",
    tag = "report",
    params(
        ("from" = String, Query, description = "First day, YYYY-MM-DD"),
        ("to" = String, Query, description = "Last day, YYYY-MM-DD"),
        ("branchId" = Option<i32>, Query, description = "Branch")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Sales summary", body = SalesSummary),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn sales_summary(
    report_service: web::Data<ReportService>,
    query: web::Query<ReportRangeQuery>,
) -> AppResult<HttpResponse> {
    let summary = report_service.sales_summary(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

#[utoipa::path(
    get,
    path = "/reports/sales/daily",
    tag = "report",
    params(
        ("from" = String, Query, description = "First day, YYYY-MM-DD"),
        ("to" = String, Query, description = "Last day, YYYY-MM-DD"),
        ("branchId" = Option<i32>, Query, description = "Branch")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Sales per day", body = [DailySales]),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn sales_by_day(
    report_service: web::Data<ReportService>,
    query: web::Query<ReportRangeQuery>,
) -> AppResult<HttpResponse> {
    let days = report_service.sales_by_day(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(days)))
}

#[utoipa::path(
    get,
    path = "/reports/top-products",
    tag = "report",
    params(
        ("from" = String, Query, description = "First day, YYYY-MM-DD"),
        ("to" = String, Query, description = "Last day, YYYY-MM-DD"),
        ("branchId" = Option<i32>, Query, description = "Branch"),
        ("limit" = Option<u64>, Query, description = "How many products, default 10")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Best sellers by pieces", body = [TopProduct])
    )
)]
pub async fn top_products(
    report_service: web::Data<ReportService>,
    query: web::Query<TopProductsQuery>,
) -> AppResult<HttpResponse> {
    let products = report_service.top_products(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(products)))
}

#[utoipa::path(
    get,
    path = "/reports/dashboard",
    tag = "report",
    params(("branchId" = Option<i32>, Query, description = "Branch")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Today's figures", body = Dashboard)
    )
)]
pub async fn dashboard(
    report_service: web::Data<ReportService>,
    query: web::Query<DashboardQuery>,
) -> AppResult<HttpResponse> {
    let dashboard = report_service.dashboard(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(dashboard)))
}

pub fn report_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/sales", web::get().to(sales_summary))
            .route("/sales/daily", web::get().to(sales_by_day))
            .route("/top-products", web::get().to(top_products))
            .route("/dashboard", web::get().to(dashboard)),
    );
}
