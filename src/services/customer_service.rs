use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{customer_entity as customers, order_entity as orders};
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Clone)]
pub struct CustomerService {
    pool: DatabaseConnection,
}

impl CustomerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_customers(
        &self,
        query: &CustomerQuery,
    ) -> AppResult<PaginatedResponse<customers::Model>> {
        let params = query.pagination();
        let mut select = customers::Entity::find();
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(customers::Column::Name.contains(search))
                    .add(customers::Column::Code.contains(search.to_ascii_uppercase())),
            );
        }
        if let Some(tier) = &query.tier {
            select = select.filter(customers::Column::Tier.eq(tier.clone()));
        }
        if let Some(blocked) = query.is_blocked {
            select = select.filter(customers::Column::IsBlocked.eq(blocked));
        }
        if let Some(branch_id) = query.branch_id {
            select = select.filter(customers::Column::BranchId.eq(branch_id));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_asc(customers::Column::Name)
            .order_by_asc(customers::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_customer(&self, id: i32) -> AppResult<customers::Model> {
        customers::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
    }

    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> AppResult<customers::Model> {
        request.validate()?;

        let existing = customers::Entity::find()
            .filter(customers::Column::Code.eq(request.code.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "Customer code {} already exists",
                request.code
            )));
        }

        let now = Utc::now();
        let customer = customers::ActiveModel {
            code: Set(request.code),
            name: Set(request.name.trim().to_string()),
            phone: Set(request.phone),
            email: Set(request.email),
            address: Set(request.address),
            tier: Set(request.tier),
            credit_limit: Set(request.credit_limit),
            credit_days: Set(request.credit_days),
            is_blocked: Set(false),
            branch_id: Set(request.branch_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Customer {} created", customer.code);
        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        id: i32,
        request: UpdateCustomerRequest,
    ) -> AppResult<customers::Model> {
        request.validate()?;
        let mut am = self.get_customer(id).await?.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if request.phone.is_some() {
            am.phone = Set(request.phone);
        }
        if request.email.is_some() {
            am.email = Set(request.email);
        }
        if request.address.is_some() {
            am.address = Set(request.address);
        }
        if let Some(tier) = request.tier {
            am.tier = Set(tier);
        }
        if let Some(limit) = request.credit_limit {
            am.credit_limit = Set(limit);
        }
        if let Some(days) = request.credit_days {
            am.credit_days = Set(days);
        }
        if request.branch_id.is_some() {
            am.branch_id = Set(request.branch_id);
        }
        am.updated_at = Set(Utc::now());
        Ok(am.update(&self.pool).await?)
    }

    /// Customers with order history can only be blocked
    pub async fn delete_customer(&self, id: i32) -> AppResult<()> {
        let customer = self.get_customer(id).await?;
        let order_count = orders::Entity::find()
            .filter(orders::Column::CustomerId.eq(id))
            .count(&self.pool)
            .await?;
        if order_count > 0 {
            return Err(AppError::Conflict(format!(
                "Customer {} has {} orders and cannot be deleted",
                customer.code, order_count
            )));
        }
        customers::Entity::delete_by_id(id).exec(&self.pool).await?;
        log::info!("Customer {} deleted", customer.code);
        Ok(())
    }

    pub async fn toggle_blocked(&self, id: i32) -> AppResult<customers::Model> {
        let customer = self.get_customer(id).await?;
        let blocked = !customer.is_blocked;
        let mut am = customer.into_active_model();
        am.is_blocked = Set(blocked);
        am.updated_at = Set(Utc::now());
        let updated = am.update(&self.pool).await?;
        if updated.is_blocked {
            log::warn!("Customer {} blocked", updated.code);
        } else {
            log::info!("Customer {} unblocked", updated.code);
        }
        Ok(updated)
    }
}
