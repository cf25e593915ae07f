use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::ExpenseService;

#[utoipa::path(
    get,
    path = "/expenses",
    tag = "expense",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("branchId" = Option<i32>, Query, description = "Branch"),
        ("category" = Option<String>, Query, description = "Category"),
        ("from" = Option<String>, Query, description = "First day, YYYY-MM-DD"),
        ("to" = Option<String>, Query, description = "Last day, YYYY-MM-DD")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Expense list")
    )
)]
pub async fn list_expenses(
    expense_service: web::Data<ExpenseService>,
    query: web::Query<ExpenseQuery>,
) -> AppResult<HttpResponse> {
    let page = expense_service.list_expenses(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/expenses/{id}",
    tag = "expense",
    params(("id" = i32, Path, description = "Expense id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Expense"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_expense(
    expense_service: web::Data<ExpenseService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let expense = expense_service.get_expense(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(expense)))
}

#[utoipa::path(
    post,
    path = "/expenses",
    tag = "expense",
    request_body = CreateExpenseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Expense recorded"),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_expense(
    expense_service: web::Data<ExpenseService>,
    user: CurrentUser,
    request: web::Json<CreateExpenseRequest>,
) -> AppResult<HttpResponse> {
    let expense = expense_service
        .create_expense(Some(user.id), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(expense)))
}

#[utoipa::path(
    put,
    path = "/expenses/{id}",
    tag = "expense",
    params(("id" = i32, Path, description = "Expense id")),
    request_body = UpdateExpenseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Expense updated"),
        (status = 400, description = "Its cash register is already closed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_expense(
    expense_service: web::Data<ExpenseService>,
    path: web::Path<i32>,
    request: web::Json<UpdateExpenseRequest>,
) -> AppResult<HttpResponse> {
    let expense = expense_service
        .update_expense(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(expense)))
}

#[utoipa::path(
    delete,
    path = "/expenses/{id}",
    tag = "expense",
    params(("id" = i32, Path, description = "Expense id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Expense deleted"),
        (status = 400, description = "Its cash register is already closed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_expense(
    expense_service: web::Data<ExpenseService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    expense_service.delete_expense(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(id, "Expense deleted")))
}

pub fn expense_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/expenses")
            .route("", web::get().to(list_expenses))
            .route("", web::post().to(create_expense))
            .route("/{id}", web::get().to(get_expense))
            .route("/{id}", web::put().to(update_expense))
            .route("/{id}", web::delete().to(delete_expense)),
    );
}
