use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::cash_register_service::open_register_for_branch;
use crate::entities::{
    CashRegisterStatus, PaymentMethod, branch_entity as branches,
    cash_register_entity as registers, expense_entity as expenses,
};
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Clone)]
pub struct ExpenseService {
    pool: DatabaseConnection,
}

impl ExpenseService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_expenses(
        &self,
        query: &ExpenseQuery,
    ) -> AppResult<PaginatedResponse<expenses::Model>> {
        let params = query.pagination();
        let mut select = expenses::Entity::find();
        if let Some(branch_id) = query.branch_id {
            select = select.filter(expenses::Column::BranchId.eq(branch_id));
        }
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            select = select.filter(expenses::Column::Category.eq(category));
        }
        if let Some(from) = query.from {
            select = select.filter(expenses::Column::ExpenseDate.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(expenses::Column::ExpenseDate.lte(to));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_expense(&self, id: i32) -> AppResult<expenses::Model> {
        expenses::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Expense not found".to_string()))
    }

    pub async fn create_expense(
        &self,
        user_id: Option<i32>,
        request: CreateExpenseRequest,
    ) -> AppResult<expenses::Model> {
        request.validate()?;
        branches::Entity::find_by_id(request.branch_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;

        // cash leaves the drawer of the open session
        let cash_register_id = match request.payment_method {
            PaymentMethod::Cash => open_register_for_branch(&self.pool, request.branch_id)
                .await?
                .map(|r| r.id),
            _ => None,
        };

        let expense = expenses::ActiveModel {
            branch_id: Set(request.branch_id),
            category: Set(request.category.trim().to_uppercase()),
            description: Set(request.description.trim().to_string()),
            amount: Set(request.amount),
            payment_method: Set(request.payment_method),
            expense_date: Set(request.expense_date),
            cash_register_id: Set(cash_register_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Expense {} of {} recorded at branch {}",
            expense.id,
            expense.amount,
            expense.branch_id
        );
        Ok(expense)
    }

    pub async fn update_expense(
        &self,
        id: i32,
        request: UpdateExpenseRequest,
    ) -> AppResult<expenses::Model> {
        request.validate()?;
        let current = self.get_expense(id).await?;
        self.ensure_register_open(&current).await?;

        let mut am = current.into_active_model();
        if let Some(category) = request.category {
            am.category = Set(category.trim().to_uppercase());
        }
        if let Some(description) = request.description {
            am.description = Set(description.trim().to_string());
        }
        if let Some(amount) = request.amount {
            am.amount = Set(amount);
        }
        if let Some(date) = request.expense_date {
            am.expense_date = Set(date);
        }
        Ok(am.update(&self.pool).await?)
    }

    pub async fn delete_expense(&self, id: i32) -> AppResult<()> {
        let current = self.get_expense(id).await?;
        self.ensure_register_open(&current).await?;
        expenses::Entity::delete_by_id(id).exec(&self.pool).await?;
        log::info!("Expense {} deleted", id);
        Ok(())
    }

    /// Expenses of a closed session are frozen
    async fn ensure_register_open(&self, expense: &expenses::Model) -> AppResult<()> {
        if let Some(register_id) = expense.cash_register_id {
            let register = registers::Entity::find_by_id(register_id)
                .one(&self.pool)
                .await?;
            if register.is_some_and(|r| r.status == CashRegisterStatus::Closed) {
                return Err(AppError::ValidationError(
                    "Expense belongs to a closed cash register".to_string(),
                ));
            }
        }
        Ok(())
    }
}
