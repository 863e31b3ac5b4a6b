//! Sale resource accessors.

use techstore_core::types::{CreateSale, Sale, SaleFilter};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct SalesService {
    client: ApiClient,
}

impl SalesService {
    pub fn new(client: ApiClient) -> Self {
        SalesService { client }
    }

    pub async fn get_all(&self) -> ApiResult<Vec<Sale>> {
        self.client.get("/sales").await
    }

    pub async fn get_by_id(&self, id: i64) -> ApiResult<Sale> {
        self.client.get(&format!("/sales/{}", id)).await
    }

    pub async fn create(&self, sale: &CreateSale) -> ApiResult<Sale> {
        self.client.post("/sales", sale).await
    }

    pub async fn filter(&self, filter: &SaleFilter) -> ApiResult<Vec<Sale>> {
        self.client.get_query("/sales/filter", filter).await
    }

    pub async fn get_by_date_range(&self, start: &str, end: &str) -> ApiResult<Vec<Sale>> {
        self.client
            .get_query("/sales/range", &[("start", start), ("end", end)])
            .await
    }

    pub async fn get_by_client(&self, cliente_id: i64) -> ApiResult<Vec<Sale>> {
        self.client.get(&format!("/sales/client/{}", cliente_id)).await
    }
}
