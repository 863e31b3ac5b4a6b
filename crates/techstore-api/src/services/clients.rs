//! Client resource accessors.

use techstore_core::types::{Client, CreateClient};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct ClientsService {
    client: ApiClient,
}

impl ClientsService {
    pub fn new(client: ApiClient) -> Self {
        ClientsService { client }
    }

    pub async fn get_all(&self) -> ApiResult<Vec<Client>> {
        self.client.get("/clients").await
    }

    pub async fn get_by_id(&self, id: i64) -> ApiResult<Client> {
        self.client.get(&format!("/clients/{}", id)).await
    }

    pub async fn create(&self, client: &CreateClient) -> ApiResult<Client> {
        self.client.post("/clients", client).await
    }

    pub async fn update(&self, id: i64, client: &CreateClient) -> ApiResult<Client> {
        self.client.put(&format!("/clients/{}", id), client).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&format!("/clients/{}", id)).await
    }
}
