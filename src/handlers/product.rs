use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::models::*;
use crate::services::ProductService;

#[utoipa::path(
    get,
    path = "/products",
    tag = "product",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("search" = Option<String>, Query, description = "Name or SKU"),
        ("categoryId" = Option<i32>, Query, description = "Category"),
        ("brandId" = Option<i32>, Query, description = "Brand"),
        ("isActive" = Option<bool>, Query, description = "Active flag")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Product list")
    )
)]
pub async fn list_products(
    product_service: web::Data<ProductService>,
    query: web::Query<ProductQuery>,
) -> AppResult<HttpResponse> {
    let page = product_service.list_products(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "product",
    params(("id" = i32, Path, description = "Product id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Product"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_product(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let product = product_service.get_product(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(product)))
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "product",
    request_body = CreateProductRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Product created"),
        (status = 409, description = "SKU already exists")
    )
)]
pub async fn create_product(
    product_service: web::Data<ProductService>,
    request: web::Json<CreateProductRequest>,
) -> AppResult<HttpResponse> {
    let product = product_service.create_product(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(product)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "product",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Product updated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_product(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
    request: web::Json<UpdateProductRequest>,
) -> AppResult<HttpResponse> {
    let product = product_service
        .update_product(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(product)))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "product",
    params(("id" = i32, Path, description = "Product id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Product deactivated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_product(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let product = product_service.delete_product(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        product,
        "Product deactivated",
    )))
}

#[utoipa::path(
    get,
    path = "/products/{id}/price",
    tag = "product",
    params(
        ("id" = i32, Path, description = "Product id"),
        ("tier" = String, Query, description = "EVENTUAL, FRECUENTE or VIP")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Prices for the tier", body = ProductPriceResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_price(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
    query: web::Query<PriceQuery>,
) -> AppResult<HttpResponse> {
    let price = product_service
        .get_price(path.into_inner(), query.into_inner().tier)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(price)))
}

#[utoipa::path(
    get,
    path = "/products/categories",
    tag = "product",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Categories")
    )
)]
pub async fn list_categories(
    product_service: web::Data<ProductService>,
) -> AppResult<HttpResponse> {
    let categories = product_service.list_categories().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(categories)))
}

#[utoipa::path(
    post,
    path = "/products/categories",
    tag = "product",
    request_body = CreateCategoryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Category created"),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_category(
    product_service: web::Data<ProductService>,
    request: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = product_service
        .create_category(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(category)))
}

#[utoipa::path(
    get,
    path = "/products/brands",
    tag = "product",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Brands")
    )
)]
pub async fn list_brands(product_service: web::Data<ProductService>) -> AppResult<HttpResponse> {
    let brands = product_service.list_brands().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(brands)))
}

#[utoipa::path(
    post,
    path = "/products/brands",
    tag = "product",
    request_body = CreateBrandRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Brand created"),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_brand(
    product_service: web::Data<ProductService>,
    request: web::Json<CreateBrandRequest>,
) -> AppResult<HttpResponse> {
    let brand = product_service.create_brand(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(brand)))
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    // static segments before /{id}
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/categories", web::get().to(list_categories))
            .route("/categories", web::post().to(create_category))
            .route("/brands", web::get().to(list_brands))
            .route("/brands", web::post().to(create_brand))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product))
            .route("/{id}/price", web::get().to(get_price)),
    );
}
