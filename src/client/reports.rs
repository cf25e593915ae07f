use super::{ApiClient, ClientResult, check};
use crate::models::*;

impl ApiClient {
    pub async fn sales_summary(&self, query: &ReportRangeQuery) -> ClientResult<SalesSummary> {
        check(query)?;
        self.get_with("/reports/sales", query).await
    }

    pub async fn sales_by_day(&self, query: &ReportRangeQuery) -> ClientResult<Vec<DailySales>> {
        check(query)?;
        self.get_with("/reports/sales/daily", query).await
    }

    pub async fn top_products(&self, query: &TopProductsQuery) -> ClientResult<Vec<TopProduct>> {
        self.get_with("/reports/top-products", query).await
    }

    pub async fn dashboard(&self, query: &DashboardQuery) -> ClientResult<Dashboard> {
        self.get_with("/reports/dashboard", query).await
    }
}
