//! Report resource accessors.
//!
//! Server-computed reports; the client-side trend aggregation lives in
//! `techstore_core::trends`.

use techstore_core::types::{
    IncomeByCategory, LowStockProduct, PriceVariation, ProductWithoutCategory, TopSellingProduct,
};

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Default threshold for the low-stock report.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone)]
pub struct ReportsService {
    client: ApiClient,
}

impl ReportsService {
    pub fn new(client: ApiClient) -> Self {
        ReportsService { client }
    }

    pub async fn top_selling(&self) -> ApiResult<Vec<TopSellingProduct>> {
        self.client.get("/reports/top-selling").await
    }

    pub async fn products_without_category(&self) -> ApiResult<Vec<ProductWithoutCategory>> {
        self.client.get("/reports/without-category").await
    }

    pub async fn low_stock(&self, threshold: Option<i64>) -> ApiResult<Vec<LowStockProduct>> {
        let threshold = threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        self.client
            .get_query("/reports/low-stock", &[("threshold", threshold)])
            .await
    }

    pub async fn income_by_category(&self) -> ApiResult<Vec<IncomeByCategory>> {
        self.client.get("/reports/income-by-category").await
    }

    pub async fn price_variation(&self) -> ApiResult<Vec<PriceVariation>> {
        self.client.get("/reports/price-variation").await
    }
}
