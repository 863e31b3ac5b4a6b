//! Category resource accessors.

use techstore_core::types::{Category, CreateCategory};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct CategoriesService {
    client: ApiClient,
}

impl CategoriesService {
    pub fn new(client: ApiClient) -> Self {
        CategoriesService { client }
    }

    pub async fn get_all(&self) -> ApiResult<Vec<Category>> {
        self.client.get("/categories").await
    }

    pub async fn get_by_id(&self, id: i64) -> ApiResult<Category> {
        self.client.get(&format!("/categories/{}", id)).await
    }

    pub async fn create(&self, category: &CreateCategory) -> ApiResult<Category> {
        self.client.post("/categories", category).await
    }

    pub async fn update(&self, id: i64, category: &CreateCategory) -> ApiResult<Category> {
        self.client.put(&format!("/categories/{}", id), category).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&format!("/categories/{}", id)).await
    }
}
