use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{
    CashRegisterStatus, PaymentMethod, branch_entity as branches,
    cash_register_entity as registers, collection_entity as collections,
    expense_entity as expenses,
};
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Clone)]
pub struct CashRegisterService {
    pool: DatabaseConnection,
}

/// The OPEN session of a branch, if any
pub(crate) async fn open_register_for_branch<C: ConnectionTrait>(
    db: &C,
    branch_id: i32,
) -> AppResult<Option<registers::Model>> {
    Ok(registers::Entity::find()
        .filter(registers::Column::BranchId.eq(branch_id))
        .filter(registers::Column::Status.eq(CashRegisterStatus::Open))
        .one(db)
        .await?)
}

/// Cash collected and cash spent against a session
async fn session_totals<C: ConnectionTrait>(db: &C, register_id: i32) -> AppResult<(i64, i64)> {
    let collected: i64 = collections::Entity::find()
        .filter(collections::Column::CashRegisterId.eq(register_id))
        .filter(collections::Column::Method.eq(PaymentMethod::Cash))
        .all(db)
        .await?
        .iter()
        .map(|c| c.amount)
        .sum();
    let spent: i64 = expenses::Entity::find()
        .filter(expenses::Column::CashRegisterId.eq(register_id))
        .filter(expenses::Column::PaymentMethod.eq(PaymentMethod::Cash))
        .all(db)
        .await?
        .iter()
        .map(|e| e.amount)
        .sum();
    Ok((collected, spent))
}

async fn summarize<C: ConnectionTrait>(
    db: &C,
    register: registers::Model,
) -> AppResult<CashRegisterSummary> {
    let (cash_collections, cash_expenses) = session_totals(db, register.id).await?;
    Ok(CashRegisterSummary {
        current_expected: register.opening_amount + cash_collections - cash_expenses,
        register,
        cash_collections,
        cash_expenses,
    })
}

impl CashRegisterService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn open_register(
        &self,
        user_id: Option<i32>,
        request: OpenCashRegisterRequest,
    ) -> AppResult<registers::Model> {
        request.validate()?;

        let txn = self.pool.begin().await?;
        branches::Entity::find_by_id(request.branch_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;
        if open_register_for_branch(&txn, request.branch_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "This branch already has an open cash register".to_string(),
            ));
        }

        let register = registers::ActiveModel {
            branch_id: Set(request.branch_id),
            user_id: Set(user_id),
            status: Set(CashRegisterStatus::Open),
            opening_amount: Set(request.opening_amount),
            expected_amount: Set(None),
            closing_amount: Set(None),
            difference: Set(None),
            notes: Set(request.notes),
            opened_at: Set(Utc::now()),
            closed_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!(
            "Cash register {} opened at branch {} with {}",
            register.id,
            register.branch_id,
            register.opening_amount
        );
        Ok(register)
    }

    pub async fn current_register(&self, branch_id: i32) -> AppResult<CashRegisterSummary> {
        let register = open_register_for_branch(&self.pool, branch_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No open cash register for this branch".to_string())
            })?;
        summarize(&self.pool, register).await
    }

    pub async fn list_registers(
        &self,
        query: &CashRegisterQuery,
    ) -> AppResult<PaginatedResponse<registers::Model>> {
        let params = query.pagination();
        let mut select = registers::Entity::find();
        if let Some(branch_id) = query.branch_id {
            select = select.filter(registers::Column::BranchId.eq(branch_id));
        }
        if let Some(status) = &query.status {
            select = select.filter(registers::Column::Status.eq(status.clone()));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(registers::Column::OpenedAt)
            .order_by_desc(registers::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_register(&self, id: i32) -> AppResult<CashRegisterSummary> {
        let register = registers::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Cash register not found".to_string()))?;
        summarize(&self.pool, register).await
    }

    pub async fn close_register(
        &self,
        id: i32,
        request: CloseCashRegisterRequest,
    ) -> AppResult<registers::Model> {
        request.validate()?;

        let txn = self.pool.begin().await?;
        let register = registers::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Cash register not found".to_string()))?;
        if register.status != CashRegisterStatus::Open {
            return Err(AppError::ValidationError(
                "Cash register is already closed".to_string(),
            ));
        }

        let (collected, spent) = session_totals(&txn, register.id).await?;
        let expected = register.opening_amount + collected - spent;
        let difference = request.closing_amount - expected;

        let mut am = register.into_active_model();
        am.status = Set(CashRegisterStatus::Closed);
        am.expected_amount = Set(Some(expected));
        am.closing_amount = Set(Some(request.closing_amount));
        am.difference = Set(Some(difference));
        if request.notes.is_some() {
            am.notes = Set(request.notes);
        }
        am.closed_at = Set(Some(Utc::now()));
        let closed = am.update(&txn).await?;
        txn.commit().await?;

        if difference != 0 {
            log::warn!(
                "Cash register {} closed with a difference of {}",
                closed.id,
                difference
            );
        } else {
            log::info!("Cash register {} closed", closed.id);
        }
        Ok(closed)
    }
}
