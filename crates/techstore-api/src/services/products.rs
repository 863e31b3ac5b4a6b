//! Product resource accessors.

use serde::Serialize;

use techstore_core::types::{CreateProduct, Product, ProductFilter, UpdateProduct};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct ProductsService {
    client: ApiClient,
}

#[derive(Serialize)]
struct StockUpdate {
    stock: i64,
}

impl ProductsService {
    pub fn new(client: ApiClient) -> Self {
        ProductsService { client }
    }

    pub async fn get_all(&self) -> ApiResult<Vec<Product>> {
        self.client.get("/products").await
    }

    pub async fn get_by_id(&self, id: i64) -> ApiResult<Product> {
        self.client.get(&format!("/products/{}", id)).await
    }

    pub async fn create(&self, product: &CreateProduct) -> ApiResult<Product> {
        self.client.post("/products", product).await
    }

    pub async fn update(&self, id: i64, product: &UpdateProduct) -> ApiResult<Product> {
        self.client.put(&format!("/products/{}", id), product).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&format!("/products/{}", id)).await
    }

    pub async fn search(&self, term: &str) -> ApiResult<Vec<Product>> {
        self.client
            .get_query("/products/search", &[("term", term)])
            .await
    }

    pub async fn filter(&self, filter: &ProductFilter) -> ApiResult<Vec<Product>> {
        self.client.get_query("/products/filter", filter).await
    }

    pub async fn update_stock(&self, id: i64, stock: i64) -> ApiResult<Product> {
        self.client
            .patch(&format!("/products/{}/stock", id), &StockUpdate { stock })
            .await
    }
}
