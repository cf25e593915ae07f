use std::collections::HashMap;

use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::order_service::transition_order;
use crate::config::LoyaltyConfig;
use crate::entities::{
    OrderStatus, RouteStatus, StopStatus, branch_entity as branches,
    customer_entity as customers, delivery_route_entity as routes,
    delivery_stop_entity as stops, driver_entity as drivers, order_entity as orders,
};
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Clone)]
pub struct DeliveryService {
    pool: DatabaseConnection,
    loyalty: LoyaltyConfig,
}

/// Planned or running route on which the order still has a pending stop
pub(crate) async fn open_route_of<C: ConnectionTrait>(
    db: &C,
    order_id: i32,
) -> AppResult<Option<(stops::Model, routes::Model)>> {
    let pending = stops::Entity::find()
        .filter(stops::Column::OrderId.eq(order_id))
        .filter(stops::Column::Status.eq(StopStatus::Pending))
        .all(db)
        .await?;
    for stop in pending {
        if let Some(route) = routes::Entity::find_by_id(stop.route_id).one(db).await?
            && route.status.is_open()
        {
            return Ok(Some((stop, route)));
        }
    }
    Ok(None)
}

/// Fails when the order already sits on a planned or running route
async fn ensure_not_routed<C: ConnectionTrait>(db: &C, order: &orders::Model) -> AppResult<()> {
    if let Some((_, route)) = open_route_of(db, order.id).await? {
        return Err(AppError::Conflict(format!(
            "Order {} is already on route {}",
            order.order_number, route.id
        )));
    }
    Ok(())
}

/// Takes a cancelled order off the planned route it was waiting on
pub(crate) async fn release_cancelled_order<C: ConnectionTrait>(
    db: &C,
    order: &orders::Model,
) -> AppResult<()> {
    if let Some((stop, route)) = open_route_of(db, order.id).await? {
        let mut am = stop.into_active_model();
        am.status = Set(StopStatus::Failed);
        am.notes = Set(Some(format!("Order {} cancelled", order.order_number)));
        am.update(db).await?;
        log::info!(
            "Order {} cancelled; removed from route {}",
            order.order_number,
            route.id
        );
    }
    Ok(())
}

async fn load_route<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<routes::Model> {
    routes::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Route not found".to_string()))
}

impl DeliveryService {
    pub fn new(pool: DatabaseConnection, loyalty: LoyaltyConfig) -> Self {
        Self { pool, loyalty }
    }

    // ---- drivers ----

    pub async fn list_drivers(
        &self,
        query: &DriverQuery,
    ) -> AppResult<PaginatedResponse<drivers::Model>> {
        let params = query.pagination();
        let mut select = drivers::Entity::find();
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(drivers::Column::Name.contains(search));
        }
        if let Some(active) = query.is_active {
            select = select.filter(drivers::Column::IsActive.eq(active));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_asc(drivers::Column::Name)
            .order_by_asc(drivers::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_driver(&self, id: i32) -> AppResult<drivers::Model> {
        drivers::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))
    }

    pub async fn create_driver(&self, request: CreateDriverRequest) -> AppResult<drivers::Model> {
        request.validate()?;
        let driver = drivers::ActiveModel {
            name: Set(request.name.trim().to_string()),
            phone: Set(request.phone),
            license_number: Set(request.license_number),
            vehicle: Set(request.vehicle),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Driver {} created", driver.id);
        Ok(driver)
    }

    pub async fn update_driver(
        &self,
        id: i32,
        request: UpdateDriverRequest,
    ) -> AppResult<drivers::Model> {
        request.validate()?;
        let mut am = self.get_driver(id).await?.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if request.phone.is_some() {
            am.phone = Set(request.phone);
        }
        if request.license_number.is_some() {
            am.license_number = Set(request.license_number);
        }
        if request.vehicle.is_some() {
            am.vehicle = Set(request.vehicle);
        }
        if let Some(active) = request.is_active {
            am.is_active = Set(active);
        }
        Ok(am.update(&self.pool).await?)
    }

    /// Drivers with route history are deactivated rather than removed
    pub async fn delete_driver(&self, id: i32) -> AppResult<()> {
        let driver = self.get_driver(id).await?;
        let route_count = routes::Entity::find()
            .filter(routes::Column::DriverId.eq(id))
            .count(&self.pool)
            .await?;
        if route_count > 0 {
            return Err(AppError::Conflict(format!(
                "Driver {} has {} routes; deactivate instead",
                driver.name, route_count
            )));
        }
        drivers::Entity::delete_by_id(id).exec(&self.pool).await?;
        Ok(())
    }

    // ---- routes ----

    pub async fn list_routes(
        &self,
        query: &RouteQuery,
    ) -> AppResult<PaginatedResponse<routes::Model>> {
        let params = query.pagination();
        let mut select = routes::Entity::find();
        if let Some(date) = query.route_date {
            select = select.filter(routes::Column::RouteDate.eq(date));
        }
        if let Some(driver_id) = query.driver_id {
            select = select.filter(routes::Column::DriverId.eq(driver_id));
        }
        if let Some(branch_id) = query.branch_id {
            select = select.filter(routes::Column::BranchId.eq(branch_id));
        }
        if let Some(status) = &query.status {
            select = select.filter(routes::Column::Status.eq(status.clone()));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(routes::Column::RouteDate)
            .order_by_desc(routes::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_route(&self, id: i32) -> AppResult<RouteDetail> {
        let route = load_route(&self.pool, id).await?;
        let driver = self.get_driver(route.driver_id).await?;

        let route_stops = stops::Entity::find()
            .filter(stops::Column::RouteId.eq(route.id))
            .order_by_asc(stops::Column::Sequence)
            .all(&self.pool)
            .await?;
        let order_ids: Vec<i32> = route_stops.iter().map(|s| s.order_id).collect();
        let order_map: HashMap<i32, orders::Model> = orders::Entity::find()
            .filter(orders::Column::Id.is_in(order_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();
        let customer_ids: Vec<i32> = order_map.values().map(|o| o.customer_id).collect();
        let customer_names: HashMap<i32, String> = customers::Entity::find()
            .filter(customers::Column::Id.is_in(customer_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let stops = route_stops
            .into_iter()
            .filter_map(|stop| {
                let order = order_map.get(&stop.order_id)?;
                Some(StopDetail {
                    order_number: order.order_number.clone(),
                    order_status: order.status.clone(),
                    customer_name: customer_names
                        .get(&order.customer_id)
                        .cloned()
                        .unwrap_or_default(),
                    total: order.total,
                    stop,
                })
            })
            .collect();

        Ok(RouteDetail {
            route,
            driver,
            stops,
        })
    }

    pub async fn create_route(&self, request: CreateRouteRequest) -> AppResult<RouteDetail> {
        request.validate()?;

        let txn = self.pool.begin().await?;
        let driver = drivers::Entity::find_by_id(request.driver_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;
        if !driver.is_active {
            return Err(AppError::ValidationError(format!(
                "Driver {} is not active",
                driver.name
            )));
        }
        let branch = branches::Entity::find_by_id(request.branch_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;
        let weekday = request.route_date.weekday();
        if !branch.delivers_on(weekday) {
            return Err(AppError::ValidationError(format!(
                "Branch {} does not deliver on {}",
                branch.code, weekday
            )));
        }

        for order_id in &request.order_ids {
            let order = orders::Entity::find_by_id(*order_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Order {order_id} not found")))?;
            if order.branch_id != branch.id {
                return Err(AppError::ValidationError(format!(
                    "Order {} belongs to another branch",
                    order.order_number
                )));
            }
            if order.status != OrderStatus::Preparing {
                return Err(AppError::ValidationError(format!(
                    "Order {} is {}, only PREPARING orders can be routed",
                    order.order_number, order.status
                )));
            }
            ensure_not_routed(&txn, &order).await?;
        }

        let route = routes::ActiveModel {
            branch_id: Set(branch.id),
            driver_id: Set(driver.id),
            route_date: Set(request.route_date),
            vehicle: Set(request.vehicle.or(driver.vehicle)),
            status: Set(RouteStatus::Planned),
            notes: Set(request.notes),
            started_at: Set(None),
            completed_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (idx, order_id) in request.order_ids.iter().enumerate() {
            stops::ActiveModel {
                route_id: Set(route.id),
                order_id: Set(*order_id),
                sequence: Set(idx as i32 + 1),
                status: Set(StopStatus::Pending),
                delivered_at: Set(None),
                notes: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        log::info!(
            "Route {} planned for {} with {} stops",
            route.id,
            route.route_date,
            request.order_ids.len()
        );
        self.get_route(route.id).await
    }

    /// Puts every order on the route IN_ROUTE
    pub async fn start_route(&self, id: i32, user_id: Option<i32>) -> AppResult<RouteDetail> {
        let txn = self.pool.begin().await?;
        let route = load_route(&txn, id).await?;
        if route.status != RouteStatus::Planned {
            return Err(AppError::ValidationError(format!(
                "Route {} cannot be started from {:?}",
                route.id, route.status
            )));
        }

        let pending = stops::Entity::find()
            .filter(stops::Column::RouteId.eq(route.id))
            .filter(stops::Column::Status.eq(StopStatus::Pending))
            .all(&txn)
            .await?;
        for stop in pending {
            let order = orders::Entity::find_by_id(stop.order_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
            if order.status == OrderStatus::Cancelled {
                release_cancelled_order(&txn, &order).await?;
                continue;
            }
            transition_order(&txn, &self.loyalty, order, OrderStatus::InRoute, user_id, None)
                .await?;
        }

        let mut am = route.into_active_model();
        am.status = Set(RouteStatus::InProgress);
        am.started_at = Set(Some(Utc::now()));
        let route = am.update(&txn).await?;
        self.complete_if_done(&txn, route).await?;
        txn.commit().await?;

        log::info!("Route {} started", id);
        self.get_route(id).await
    }

    pub async fn deliver_stop(
        &self,
        route_id: i32,
        stop_id: i32,
        user_id: Option<i32>,
        request: StopUpdateRequest,
    ) -> AppResult<RouteDetail> {
        self.close_stop(route_id, stop_id, user_id, request, StopStatus::Delivered)
            .await
    }

    /// The order goes back to PREPARING so it can be routed again
    pub async fn fail_stop(
        &self,
        route_id: i32,
        stop_id: i32,
        user_id: Option<i32>,
        request: StopUpdateRequest,
    ) -> AppResult<RouteDetail> {
        self.close_stop(route_id, stop_id, user_id, request, StopStatus::Failed)
            .await
    }

    async fn close_stop(
        &self,
        route_id: i32,
        stop_id: i32,
        user_id: Option<i32>,
        request: StopUpdateRequest,
        outcome: StopStatus,
    ) -> AppResult<RouteDetail> {
        let txn = self.pool.begin().await?;
        let route = load_route(&txn, route_id).await?;
        if route.status != RouteStatus::InProgress {
            return Err(AppError::ValidationError(format!(
                "Route {} is not in progress",
                route.id
            )));
        }
        let stop = stops::Entity::find_by_id(stop_id)
            .filter(stops::Column::RouteId.eq(route.id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Stop not found".to_string()))?;
        if stop.status != StopStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Stop {} was already closed",
                stop.id
            )));
        }

        let order = orders::Entity::find_by_id(stop.order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        let next = match outcome {
            StopStatus::Delivered => OrderStatus::Delivered,
            _ => OrderStatus::Preparing,
        };
        transition_order(&txn, &self.loyalty, order, next, user_id, None).await?;

        let mut am = stop.into_active_model();
        if outcome == StopStatus::Delivered {
            am.delivered_at = Set(Some(Utc::now()));
        }
        am.status = Set(outcome);
        if request.notes.is_some() {
            am.notes = Set(request.notes);
        }
        am.update(&txn).await?;

        self.complete_if_done(&txn, route).await?;
        txn.commit().await?;
        self.get_route(route_id).await
    }

    async fn complete_if_done(&self, txn: &DatabaseTransaction, route: routes::Model) -> AppResult<()> {
        let pending = stops::Entity::find()
            .filter(
                Condition::all()
                    .add(stops::Column::RouteId.eq(route.id))
                    .add(stops::Column::Status.eq(StopStatus::Pending)),
            )
            .count(txn)
            .await?;
        if pending > 0 {
            return Ok(());
        }
        let id = route.id;
        let mut am = route.into_active_model();
        am.status = Set(RouteStatus::Completed);
        am.completed_at = Set(Some(Utc::now()));
        am.update(txn).await?;
        log::info!("Route {} completed", id);
        Ok(())
    }

    /// Only planned routes can be cancelled; their orders stay PREPARING
    pub async fn cancel_route(&self, id: i32) -> AppResult<routes::Model> {
        let route = load_route(&self.pool, id).await?;
        if route.status != RouteStatus::Planned {
            return Err(AppError::ValidationError(format!(
                "Route {} cannot be cancelled from {:?}",
                route.id, route.status
            )));
        }
        let mut am = route.into_active_model();
        am.status = Set(RouteStatus::Cancelled);
        let cancelled = am.update(&self.pool).await?;
        log::info!("Route {} cancelled", id);
        Ok(cancelled)
    }
}
