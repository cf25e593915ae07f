use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{
    MovementType, branch_entity as branches, inventory_entity as inventories,
    inventory_movement_entity as movements, product_entity as products,
    stock_rule_entity as stock_rules,
};
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Clone)]
pub struct InventoryService {
    pool: DatabaseConnection,
}

/// A signed stock change applied to one product at one branch.
pub(crate) struct StockChange<'a> {
    pub product_id: i32,
    pub branch_id: i32,
    pub movement_type: MovementType,
    /// Pieces; negative takes stock out
    pub delta: i32,
    /// Balance the change was computed from; set by adjustments
    pub expected: Option<i32>,
    pub reference: Option<&'a str>,
    pub note: Option<&'a str>,
    pub user_id: Option<i32>,
}

fn insufficient(change: &StockChange<'_>, current: i32) -> AppError {
    AppError::ValidationError(format!(
        "Insufficient stock for product {}: {} pieces available, {} requested",
        change.product_id,
        current,
        -(change.delta as i64)
    ))
}

/// Applies a stock change and records it in the movement log.
/// Fails when the resulting balance would be negative. The balance is
/// updated in place with a guarded `UPDATE`, so concurrent changes to the
/// same row cannot take it below zero.
pub(crate) async fn apply_stock_change<C: ConnectionTrait>(
    db: &C,
    change: StockChange<'_>,
) -> AppResult<movements::Model> {
    let now = Utc::now();
    let inventory = inventories::Entity::find()
        .filter(inventories::Column::ProductId.eq(change.product_id))
        .filter(inventories::Column::BranchId.eq(change.branch_id))
        .one(db)
        .await?;

    let current = inventory.as_ref().map(|i| i.quantity).unwrap_or(0);
    let balance = current.checked_add(change.delta).ok_or_else(|| {
        AppError::ValidationError(format!(
            "Stock change of {} pieces for product {} is out of range",
            change.delta, change.product_id
        ))
    })?;
    if balance < 0 {
        return Err(insufficient(&change, current));
    }

    let balance = match inventory {
        Some(inv) => {
            let mut update = inventories::Entity::update_many()
                .col_expr(
                    inventories::Column::Quantity,
                    Expr::col(inventories::Column::Quantity).add(change.delta),
                )
                .col_expr(inventories::Column::UpdatedAt, Expr::value(now))
                .filter(inventories::Column::Id.eq(inv.id));
            update = match change.expected {
                Some(expected) => update.filter(inventories::Column::Quantity.eq(expected)),
                None if change.delta < 0 => {
                    update.filter(inventories::Column::Quantity.gte(-change.delta))
                }
                None => update,
            };
            if update.exec(db).await?.rows_affected != 1 {
                let latest = inventories::Entity::find_by_id(inv.id)
                    .one(db)
                    .await?
                    .map(|i| i.quantity)
                    .unwrap_or(0);
                return Err(match change.expected {
                    Some(_) => AppError::Conflict(format!(
                        "Stock of product {} changed while adjusting; now {} pieces",
                        change.product_id, latest
                    )),
                    None => insufficient(&change, latest),
                });
            }
            inventories::Entity::find_by_id(inv.id)
                .one(db)
                .await?
                .map(|i| i.quantity)
                .unwrap_or(balance)
        }
        None => {
            inventories::ActiveModel {
                product_id: Set(change.product_id),
                branch_id: Set(change.branch_id),
                quantity: Set(balance),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            balance
        }
    };

    let movement = movements::ActiveModel {
        product_id: Set(change.product_id),
        branch_id: Set(change.branch_id),
        movement_type: Set(change.movement_type),
        quantity: Set(change.delta),
        balance_after: Set(balance),
        reference: Set(change.reference.map(str::to_string)),
        note: Set(change.note.map(str::to_string)),
        user_id: Set(change.user_id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(movement)
}

/// Active rules whose stock is below threshold
pub(crate) async fn stock_alerts<C: ConnectionTrait>(
    db: &C,
    branch_id: Option<i32>,
) -> AppResult<Vec<StockAlert>> {
    let mut select = stock_rules::Entity::find().filter(stock_rules::Column::IsActive.eq(true));
    if let Some(branch_id) = branch_id {
        select = select.filter(stock_rules::Column::BranchId.eq(branch_id));
    }
    let rules = select.order_by_asc(stock_rules::Column::Id).all(db).await?;
    if rules.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = rules.iter().map(|r| r.product_id).collect();
    let product_map: HashMap<i32, products::Model> = products::Entity::find()
        .filter(products::Column::Id.is_in(product_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let stock: HashMap<(i32, i32), i32> = inventories::Entity::find()
        .filter(inventories::Column::ProductId.is_in(product_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|i| ((i.product_id, i.branch_id), i.quantity))
        .collect();

    let alerts = rules
        .into_iter()
        .filter_map(|rule| {
            let product = product_map.get(&rule.product_id)?;
            let quantity = stock
                .get(&(rule.product_id, rule.branch_id))
                .copied()
                .unwrap_or(0);
            if !rule.is_triggered(quantity, product.units_per_box) {
                return None;
            }
            let threshold = rule.threshold(product.units_per_box);
            Some(StockAlert {
                rule_id: rule.id,
                product_id: rule.product_id,
                sku: product.sku.clone(),
                product_name: product.name.clone(),
                branch_id: rule.branch_id,
                quantity,
                min_boxes: rule.min_boxes,
                min_pieces: rule.min_pieces,
                threshold,
                missing: threshold - quantity,
            })
        })
        .collect();
    Ok(alerts)
}

fn to_item(inv: inventories::Model, product: Option<&products::Model>) -> InventoryItemResponse {
    let units_per_box = product.map(|p| p.units_per_box).unwrap_or(1).max(1);
    InventoryItemResponse {
        id: inv.id,
        product_id: inv.product_id,
        sku: product.map(|p| p.sku.clone()).unwrap_or_default(),
        product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
        branch_id: inv.branch_id,
        quantity: inv.quantity,
        units_per_box,
        boxes: inv.quantity / units_per_box,
        pieces: inv.quantity % units_per_box,
        updated_at: inv.updated_at,
    }
}

impl InventoryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_inventory(
        &self,
        query: &InventoryQuery,
    ) -> AppResult<PaginatedResponse<InventoryItemResponse>> {
        let params = query.pagination();
        let mut select = inventories::Entity::find();
        if let Some(branch_id) = query.branch_id {
            select = select.filter(inventories::Column::BranchId.eq(branch_id));
        }
        if let Some(product_id) = query.product_id {
            select = select.filter(inventories::Column::ProductId.eq(product_id));
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_asc(inventories::Column::BranchId)
            .order_by_asc(inventories::Column::ProductId)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let product_ids: Vec<i32> = rows.iter().map(|r| r.product_id).collect();
        let product_map: HashMap<i32, products::Model> = products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let items = rows
            .into_iter()
            .map(|inv| {
                let product = product_map.get(&inv.product_id);
                to_item(inv, product)
            })
            .collect();
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_inventory(&self, id: i32) -> AppResult<InventoryItemResponse> {
        let inv = inventories::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Inventory record not found".to_string()))?;
        let product = products::Entity::find_by_id(inv.product_id)
            .one(&self.pool)
            .await?;
        Ok(to_item(inv, product.as_ref()))
    }

    /// Current stock in pieces, zero when the product never had stock at the branch
    pub async fn stock_level(&self, product_id: i32, branch_id: i32) -> AppResult<i32> {
        Ok(inventories::Entity::find()
            .filter(inventories::Column::ProductId.eq(product_id))
            .filter(inventories::Column::BranchId.eq(branch_id))
            .one(&self.pool)
            .await?
            .map(|i| i.quantity)
            .unwrap_or(0))
    }

    pub async fn create_movement(
        &self,
        user_id: Option<i32>,
        request: CreateMovementRequest,
    ) -> AppResult<movements::Model> {
        request.validate()?;

        let txn = self.pool.begin().await?;
        products::Entity::find_by_id(request.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        branches::Entity::find_by_id(request.branch_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;

        let (delta, expected) = match request.movement_type {
            MovementType::Entry => (request.quantity, None),
            MovementType::Exit => (-request.quantity, None),
            _ => {
                let current = inventories::Entity::find()
                    .filter(inventories::Column::ProductId.eq(request.product_id))
                    .filter(inventories::Column::BranchId.eq(request.branch_id))
                    .one(&txn)
                    .await?
                    .map(|i| i.quantity)
                    .unwrap_or(0);
                (request.quantity - current, Some(current))
            }
        };

        let movement = apply_stock_change(
            &txn,
            StockChange {
                product_id: request.product_id,
                branch_id: request.branch_id,
                movement_type: request.movement_type,
                delta,
                expected,
                reference: request.reference.as_deref(),
                note: request.note.as_deref(),
                user_id,
            },
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Inventory movement {:?} for product {} at branch {}: {:+} -> {}",
            movement.movement_type,
            movement.product_id,
            movement.branch_id,
            movement.quantity,
            movement.balance_after
        );
        Ok(movement)
    }

    pub async fn list_movements(
        &self,
        query: &MovementQuery,
    ) -> AppResult<PaginatedResponse<movements::Model>> {
        let params = query.pagination();
        let mut select = movements::Entity::find();
        if let Some(product_id) = query.product_id {
            select = select.filter(movements::Column::ProductId.eq(product_id));
        }
        if let Some(branch_id) = query.branch_id {
            select = select.filter(movements::Column::BranchId.eq(branch_id));
        }
        if let Some(movement_type) = &query.movement_type {
            select = select.filter(movements::Column::MovementType.eq(movement_type.clone()));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(movements::Column::CreatedAt)
            .order_by_desc(movements::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn list_stock_rules(&self, query: &StockRuleQuery) -> AppResult<Vec<stock_rules::Model>> {
        let mut select = stock_rules::Entity::find();
        if let Some(branch_id) = query.branch_id {
            select = select.filter(stock_rules::Column::BranchId.eq(branch_id));
        }
        if let Some(product_id) = query.product_id {
            select = select.filter(stock_rules::Column::ProductId.eq(product_id));
        }
        Ok(select
            .order_by_asc(stock_rules::Column::Id)
            .all(&self.pool)
            .await?)
    }

    pub async fn create_stock_rule(
        &self,
        request: CreateStockRuleRequest,
    ) -> AppResult<stock_rules::Model> {
        request.validate()?;
        products::Entity::find_by_id(request.product_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let existing = stock_rules::Entity::find()
            .filter(stock_rules::Column::ProductId.eq(request.product_id))
            .filter(stock_rules::Column::BranchId.eq(request.branch_id))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "A stock rule already exists for this product and branch".to_string(),
            ));
        }

        let now = Utc::now();
        let rule = stock_rules::ActiveModel {
            product_id: Set(request.product_id),
            branch_id: Set(request.branch_id),
            min_boxes: Set(request.min_boxes),
            min_pieces: Set(request.min_pieces),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(rule)
    }

    pub async fn update_stock_rule(
        &self,
        id: i32,
        request: UpdateStockRuleRequest,
    ) -> AppResult<stock_rules::Model> {
        request.validate()?;
        let mut am = stock_rules::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Stock rule not found".to_string()))?
            .into_active_model();
        if let Some(v) = request.min_boxes {
            am.min_boxes = Set(v);
        }
        if let Some(v) = request.min_pieces {
            am.min_pieces = Set(v);
        }
        if let Some(v) = request.is_active {
            am.is_active = Set(v);
        }
        am.updated_at = Set(Utc::now());
        Ok(am.update(&self.pool).await?)
    }

    pub async fn delete_stock_rule(&self, id: i32) -> AppResult<()> {
        let res = stock_rules::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Stock rule not found".to_string()));
        }
        Ok(())
    }

    pub async fn get_alerts(&self, query: &AlertQuery) -> AppResult<Vec<StockAlert>> {
        stock_alerts(&self.pool, query.branch_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;
    use crate::services::{ProductService, SettingsService};

    async fn stocked(db: &DatabaseConnection, pieces: i32) -> (i32, i32) {
        let branch = SettingsService::new(db.clone())
            .create_branch(CreateBranchRequest {
                code: "NORTE".into(),
                name: "Sucursal Norte".into(),
                address: None,
                phone: None,
                delivery_days: vec!["MON".into()],
            })
            .await
            .unwrap()
            .branch;
        let product = ProductService::new(db.clone())
            .create_product(CreateProductRequest {
                sku: "ARZ-001".into(),
                name: "Arroz 1kg".into(),
                description: None,
                category_id: None,
                brand_id: None,
                units_per_box: 20,
                price_eventual: 3000,
                price_frecuente: 2800,
                price_vip: 2600,
            })
            .await
            .unwrap();
        InventoryService::new(db.clone())
            .create_movement(
                None,
                CreateMovementRequest {
                    product_id: product.id,
                    branch_id: branch.id,
                    movement_type: MovementType::Entry,
                    quantity: pieces,
                    reference: None,
                    note: None,
                },
            )
            .await
            .unwrap();
        (product.id, branch.id)
    }

    fn change(product_id: i32, branch_id: i32, delta: i32, expected: Option<i32>) -> StockChange<'static> {
        StockChange {
            product_id,
            branch_id,
            movement_type: MovementType::Adjustment,
            delta,
            expected,
            reference: None,
            note: None,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_adjustment_from_a_stale_balance_conflicts() {
        let db = memory_pool().await;
        let (product_id, branch_id) = stocked(&db, 40).await;

        // computed against 30 pieces while the row holds 40
        let err = apply_stock_change(&db, change(product_id, branch_id, -5, Some(30)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let movement = apply_stock_change(&db, change(product_id, branch_id, -5, Some(40)))
            .await
            .unwrap();
        assert_eq!(movement.balance_after, 35);
    }

    #[tokio::test]
    async fn test_stock_change_out_of_range() {
        let db = memory_pool().await;
        let (product_id, branch_id) = stocked(&db, 40).await;

        let err = apply_stock_change(&db, change(product_id, branch_id, i32::MAX, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        let err = apply_stock_change(&db, change(product_id, branch_id, -41, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
