use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{
    CustomerTier, OrderUnit, brand_entity as brands, category_entity as categories,
    product_entity as products,
};
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Clone)]
pub struct ProductService {
    pool: DatabaseConnection,
}

impl ProductService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> AppResult<PaginatedResponse<products::Model>> {
        let params = query.pagination();
        let mut select = products::Entity::find();
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(products::Column::Name.contains(search))
                    .add(products::Column::Sku.contains(search.to_ascii_uppercase())),
            );
        }
        if let Some(category_id) = query.category_id {
            select = select.filter(products::Column::CategoryId.eq(category_id));
        }
        if let Some(brand_id) = query.brand_id {
            select = select.filter(products::Column::BrandId.eq(brand_id));
        }
        if let Some(active) = query.is_active {
            select = select.filter(products::Column::IsActive.eq(active));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_asc(products::Column::Name)
            .order_by_asc(products::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_product(&self, id: i32) -> AppResult<products::Model> {
        products::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    async fn check_references(&self, category_id: Option<i32>, brand_id: Option<i32>) -> AppResult<()> {
        if let Some(category_id) = category_id {
            categories::Entity::find_by_id(category_id)
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
        }
        if let Some(brand_id) = brand_id {
            brands::Entity::find_by_id(brand_id)
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))?;
        }
        Ok(())
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> AppResult<products::Model> {
        request.validate()?;
        let sku = request.sku.trim().to_ascii_uppercase();

        let existing = products::Entity::find()
            .filter(products::Column::Sku.eq(sku.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!("SKU {sku} already exists")));
        }
        self.check_references(request.category_id, request.brand_id)
            .await?;

        let now = Utc::now();
        let product = products::ActiveModel {
            sku: Set(sku),
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            category_id: Set(request.category_id),
            brand_id: Set(request.brand_id),
            units_per_box: Set(request.units_per_box),
            price_eventual: Set(request.price_eventual),
            price_frecuente: Set(request.price_frecuente),
            price_vip: Set(request.price_vip),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Product {} created", product.sku);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: i32,
        request: UpdateProductRequest,
    ) -> AppResult<products::Model> {
        request.validate()?;
        let current = self.get_product(id).await?;
        self.check_references(request.category_id, request.brand_id)
            .await?;

        let mut am = current.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if request.description.is_some() {
            am.description = Set(request.description);
        }
        if request.category_id.is_some() {
            am.category_id = Set(request.category_id);
        }
        if request.brand_id.is_some() {
            am.brand_id = Set(request.brand_id);
        }
        if let Some(units) = request.units_per_box {
            am.units_per_box = Set(units);
        }
        if let Some(price) = request.price_eventual {
            am.price_eventual = Set(price);
        }
        if let Some(price) = request.price_frecuente {
            am.price_frecuente = Set(price);
        }
        if let Some(price) = request.price_vip {
            am.price_vip = Set(price);
        }
        if let Some(active) = request.is_active {
            am.is_active = Set(active);
        }
        am.updated_at = Set(Utc::now());
        Ok(am.update(&self.pool).await?)
    }

    /// Soft delete: order history keeps pointing at the product
    pub async fn delete_product(&self, id: i32) -> AppResult<products::Model> {
        let mut am = self.get_product(id).await?.into_active_model();
        am.is_active = Set(false);
        am.updated_at = Set(Utc::now());
        let product = am.update(&self.pool).await?;
        log::info!("Product {} deactivated", product.sku);
        Ok(product)
    }

    pub async fn get_price(&self, id: i32, tier: CustomerTier) -> AppResult<ProductPriceResponse> {
        let product = self.get_product(id).await?;
        let box_price = product.unit_price(&tier, &OrderUnit::Box).ok_or_else(|| {
            AppError::ValidationError(format!("Box price of {} is out of range", product.sku))
        })?;
        Ok(ProductPriceResponse {
            product_id: product.id,
            piece_price: product.price_for(&tier),
            box_price,
            units_per_box: product.units_per_box,
            tier,
        })
    }

    pub async fn list_categories(&self) -> AppResult<Vec<categories::Model>> {
        Ok(categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.pool)
            .await?)
    }

    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> AppResult<categories::Model> {
        request.validate()?;
        let name = request.name.trim().to_string();
        let existing = categories::Entity::find()
            .filter(categories::Column::Name.eq(name.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!("Category {name} already exists")));
        }
        Ok(categories::ActiveModel {
            name: Set(name),
            description: Set(request.description),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?)
    }

    pub async fn list_brands(&self) -> AppResult<Vec<brands::Model>> {
        Ok(brands::Entity::find()
            .order_by_asc(brands::Column::Name)
            .all(&self.pool)
            .await?)
    }

    pub async fn create_brand(&self, request: CreateBrandRequest) -> AppResult<brands::Model> {
        request.validate()?;
        let name = request.name.trim().to_string();
        let existing = brands::Entity::find()
            .filter(brands::Column::Name.eq(name.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!("Brand {name} already exists")));
        }
        Ok(brands::ActiveModel {
            name: Set(name),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?)
    }
}
