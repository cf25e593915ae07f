use super::{ApiClient, ClientResult, check};
use crate::entities::{inventory_movement_entity, stock_rule_entity};
use crate::models::*;

impl ApiClient {
    pub async fn list_inventory(
        &self,
        query: &InventoryQuery,
    ) -> ClientResult<PaginatedResponse<InventoryItemResponse>> {
        self.get_with("/inventory", query).await
    }

    pub async fn get_inventory(&self, id: i32) -> ClientResult<InventoryItemResponse> {
        self.get(&format!("/inventory/{id}")).await
    }

    pub async fn create_movement(
        &self,
        request: &CreateMovementRequest,
    ) -> ClientResult<inventory_movement_entity::Model> {
        check(request)?;
        self.post("/inventory/movements", request).await
    }

    pub async fn list_movements(
        &self,
        query: &MovementQuery,
    ) -> ClientResult<PaginatedResponse<inventory_movement_entity::Model>> {
        self.get_with("/inventory/movements", query).await
    }

    pub async fn list_stock_rules(
        &self,
        query: &StockRuleQuery,
    ) -> ClientResult<Vec<stock_rule_entity::Model>> {
        self.get_with("/inventory/stock-rules", query).await
    }

    pub async fn create_stock_rule(
        &self,
        request: &CreateStockRuleRequest,
    ) -> ClientResult<stock_rule_entity::Model> {
        check(request)?;
        self.post("/inventory/stock-rules", request).await
    }

    pub async fn update_stock_rule(
        &self,
        id: i32,
        request: &UpdateStockRuleRequest,
    ) -> ClientResult<stock_rule_entity::Model> {
        check(request)?;
        self.put(&format!("/inventory/stock-rules/{id}"), request)
            .await
    }

    pub async fn delete_stock_rule(&self, id: i32) -> ClientResult<()> {
        self.delete(&format!("/inventory/stock-rules/{id}")).await
    }

    pub async fn stock_alerts(&self, query: &AlertQuery) -> ClientResult<Vec<StockAlert>> {
        self.get_with("/inventory/alerts", query).await
    }
}
