use super::{ApiClient, ClientResult, check};
use crate::entities::expense_entity;
use crate::models::*;

impl ApiClient {
    pub async fn list_expenses(
        &self,
        query: &ExpenseQuery,
    ) -> ClientResult<PaginatedResponse<expense_entity::Model>> {
        self.get_with("/expenses", query).await
    }

    pub async fn get_expense(&self, id: i32) -> ClientResult<expense_entity::Model> {
        self.get(&format!("/expenses/{id}")).await
    }

    pub async fn create_expense(
        &self,
        request: &CreateExpenseRequest,
    ) -> ClientResult<expense_entity::Model> {
        check(request)?;
        self.post("/expenses", request).await
    }

    pub async fn update_expense(
        &self,
        id: i32,
        request: &UpdateExpenseRequest,
    ) -> ClientResult<expense_entity::Model> {
        check(request)?;
        self.put(&format!("/expenses/{id}"), request).await
    }

    pub async fn delete_expense(&self, id: i32) -> ClientResult<()> {
        self.delete(&format!("/expenses/{id}")).await
    }
}
