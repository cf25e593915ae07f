use super::{ApiClient, ClientResult, check};
use crate::entities::cash_register_entity;
use crate::models::*;

impl ApiClient {
    pub async fn open_register(
        &self,
        request: &OpenCashRegisterRequest,
    ) -> ClientResult<cash_register_entity::Model> {
        check(request)?;
        self.post("/cash-register/open", request).await
    }

    pub async fn current_register(&self, branch_id: i32) -> ClientResult<CashRegisterSummary> {
        self.get_with("/cash-register/current", &CurrentRegisterQuery { branch_id })
            .await
    }

    pub async fn list_registers(
        &self,
        query: &CashRegisterQuery,
    ) -> ClientResult<PaginatedResponse<cash_register_entity::Model>> {
        self.get_with("/cash-register", query).await
    }

    pub async fn get_register(&self, id: i32) -> ClientResult<CashRegisterSummary> {
        self.get(&format!("/cash-register/{id}")).await
    }

    pub async fn close_register(
        &self,
        id: i32,
        request: &CloseCashRegisterRequest,
    ) -> ClientResult<cash_register_entity::Model> {
        check(request)?;
        self.post(&format!("/cash-register/{id}/close"), request)
            .await
    }
}
