use super::{ApiClient, ClientResult, check};
use crate::entities::{loyalty_transaction_entity, loyalty_wallet_entity};
use crate::models::*;

impl ApiClient {
    pub async fn get_wallet(&self, customer_id: i32) -> ClientResult<loyalty_wallet_entity::Model> {
        self.get(&format!("/loyalty/wallets/{customer_id}")).await
    }

    pub async fn list_loyalty_transactions(
        &self,
        query: &LoyaltyTransactionQuery,
    ) -> ClientResult<PaginatedResponse<loyalty_transaction_entity::Model>> {
        self.get_with("/loyalty/transactions", query).await
    }

    pub async fn earn_points(
        &self,
        request: &EarnPointsRequest,
    ) -> ClientResult<loyalty_transaction_entity::Model> {
        check(request)?;
        self.post("/loyalty/earn", request).await
    }

    /// Rejected locally unless `points > 0`
    pub async fn redeem_points(
        &self,
        request: &RedeemPointsRequest,
    ) -> ClientResult<loyalty_wallet_entity::Model> {
        check(request)?;
        self.post("/loyalty/redeem", request).await
    }

    pub async fn expire_points(&self) -> ClientResult<ExpirePointsResponse> {
        self.post_empty("/loyalty/expire").await
    }
}
