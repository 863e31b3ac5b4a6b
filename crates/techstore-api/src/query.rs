//! # Query Layer
//!
//! Cached reads and optimistic mutations over the domain services - the
//! glue between the cache store and the network.
//!
//! ## Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Query Layer Semantics                             │
//! │                                                                         │
//! │  READ:      cached snapshot if present, else fetch (one bounded         │
//! │             retry), replace the collection, hand back the snapshot      │
//! │                                                                         │
//! │  MUTATION:  service call ──► on success, splice the record into the     │
//! │             cached collection synchronously ──► spawn a background      │
//! │             revalidation whose full replace wins                        │
//! │                                                                         │
//! │  FAILURE:   the normalized error surfaces to the caller; mutations      │
//! │             are never retried automatically                             │
//! │                                                                         │
//! │  No cross-resource transaction: capturing a sale and revalidating       │
//! │  the products cache (stock decremented server-side) are independent     │
//! │  operations with no atomicity between them.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoff;
use tracing::warn;

use techstore_core::enrich::{enrich_sale, EnrichedSale};
use techstore_core::trends::{bucket_sales, Period, TrendBucket};
use techstore_core::types::{
    Category, Client, CreateCategory, CreateClient, CreateProduct, CreateSale, Product,
    ProductFilter, Sale, SaleFilter, UpdateProduct,
};
use techstore_core::validation::{
    ensure_stock, validate_new_client, validate_new_product, validate_new_sale, validate_stock,
};
use techstore_core::CoreError;

use crate::cache::ResourceStore;
use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::services::{
    CategoriesService, ClientsService, ProductsService, ReportsService, SalesService,
};
use crate::session::SessionStore;

/// Cached query handle over every resource.
///
/// Cheap to clone; all clones share the same cache store and session.
#[derive(Debug, Clone)]
pub struct Queries {
    store: Arc<ResourceStore>,
    session: Arc<SessionStore>,
    products: ProductsService,
    clients: ClientsService,
    categories: CategoriesService,
    sales: SalesService,
    reports: ReportsService,
}

impl Queries {
    pub fn new(client: ApiClient, store: Arc<ResourceStore>) -> Self {
        Queries {
            store,
            session: client.session().clone(),
            products: ProductsService::new(client.clone()),
            clients: ClientsService::new(client.clone()),
            categories: CategoriesService::new(client.clone()),
            sales: SalesService::new(client.clone()),
            reports: ReportsService::new(client),
        }
    }

    /// The shared cache store (subscribe, direct snapshots).
    pub fn store(&self) -> &Arc<ResourceStore> {
        &self.store
    }

    /// Server-computed reports (uncached pass-through).
    pub fn reports(&self) -> &ReportsService {
        &self.reports
    }

    // -------------------------------------------------------------------------
    // Read path
    // -------------------------------------------------------------------------

    /// Runs a read with one bounded retry on transient failures.
    ///
    /// Mutations never come through here: a failed write must surface,
    /// not repeat.
    async fn read_with_retry<T, F, Fut>(&self, what: &'static str, op: F) -> ApiResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        // Single-retry window: the elapsed-time cap sits below the
        // retry interval, so the second failure always lands past the
        // cap and the policy gives up. Attempt, wait 250ms, attempt
        // once more, done.
        let policy = ExponentialBackoff {
            initial_interval: Duration::from_millis(250),
            randomization_factor: 0.0,
            multiplier: 1.0,
            max_interval: Duration::from_millis(250),
            max_elapsed_time: Some(Duration::from_millis(200)),
            ..ExponentialBackoff::default()
        };

        backoff::future::retry(policy, || {
            let attempt = op();
            async move {
                attempt.await.map_err(|err| {
                    if err.is_transient() {
                        warn!(what, %err, "read failed, retrying once");
                        backoff::Error::transient(err)
                    } else {
                        backoff::Error::permanent(err)
                    }
                })
            }
        })
        .await
    }

    /// Products: cached snapshot, or fetch-and-fill.
    pub async fn products(&self) -> ApiResult<Arc<Vec<Product>>> {
        if let Some(snapshot) = self.store.products.snapshot() {
            return Ok(snapshot);
        }
        self.fetch_products().await
    }

    /// Products: always refetch, replacing the cache.
    pub async fn fetch_products(&self) -> ApiResult<Arc<Vec<Product>>> {
        let items = self
            .read_with_retry("products", || self.products.get_all())
            .await?;
        Ok(self.store.products.replace(items))
    }

    pub async fn clients(&self) -> ApiResult<Arc<Vec<Client>>> {
        if let Some(snapshot) = self.store.clients.snapshot() {
            return Ok(snapshot);
        }
        self.fetch_clients().await
    }

    pub async fn fetch_clients(&self) -> ApiResult<Arc<Vec<Client>>> {
        let items = self
            .read_with_retry("clients", || self.clients.get_all())
            .await?;
        Ok(self.store.clients.replace(items))
    }

    pub async fn categories(&self) -> ApiResult<Arc<Vec<Category>>> {
        if let Some(snapshot) = self.store.categories.snapshot() {
            return Ok(snapshot);
        }
        self.fetch_categories().await
    }

    pub async fn fetch_categories(&self) -> ApiResult<Arc<Vec<Category>>> {
        let items = self
            .read_with_retry("categories", || self.categories.get_all())
            .await?;
        Ok(self.store.categories.replace(items))
    }

    pub async fn sales(&self) -> ApiResult<Arc<Vec<Sale>>> {
        if let Some(snapshot) = self.store.sales.snapshot() {
            return Ok(snapshot);
        }
        self.fetch_sales().await
    }

    pub async fn fetch_sales(&self) -> ApiResult<Arc<Vec<Sale>>> {
        let mut items = self
            .read_with_retry("sales", || self.sales.get_all())
            .await?;
        apply_document_tags(&mut items, &self.session);
        Ok(self.store.sales.replace(items))
    }

    /// Filtered sales, bypassing the cache (filter results are not a
    /// full collection snapshot).
    pub async fn sales_filtered(&self, filter: &SaleFilter) -> ApiResult<Vec<Sale>> {
        let mut items = self
            .read_with_retry("sales/filter", || self.sales.filter(filter))
            .await?;
        apply_document_tags(&mut items, &self.session);
        Ok(items)
    }

    pub async fn search_products(&self, term: &str) -> ApiResult<Vec<Product>> {
        self.read_with_retry("products/search", || self.products.search(term))
            .await
    }

    /// Server-side filtered products, bypassing the cache.
    pub async fn filter_products(&self, filter: &ProductFilter) -> ApiResult<Vec<Product>> {
        self.read_with_retry("products/filter", || self.products.filter(filter))
            .await
    }

    // -------------------------------------------------------------------------
    // Product mutations
    // -------------------------------------------------------------------------

    pub async fn create_product(&self, payload: &CreateProduct) -> ApiResult<Product> {
        validate_new_product(payload).map_err(CoreError::from)?;

        let created = self.products.create(payload).await?;
        self.store.products.upsert(created.clone());
        self.revalidate_products();
        Ok(created)
    }

    pub async fn update_product(&self, id: i64, payload: &UpdateProduct) -> ApiResult<Product> {
        let updated = self.products.update(id, payload).await?;
        self.store.products.upsert(updated.clone());
        self.revalidate_products();
        Ok(updated)
    }

    pub async fn delete_product(&self, id: i64) -> ApiResult<()> {
        self.products.delete(id).await?;
        self.store.products.remove(id);
        self.revalidate_products();
        Ok(())
    }

    pub async fn update_stock(&self, id: i64, stock: i64) -> ApiResult<Product> {
        validate_stock(stock).map_err(CoreError::from)?;

        let updated = self.products.update_stock(id, stock).await?;
        self.store.products.upsert(updated.clone());
        self.revalidate_products();
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Client mutations
    // -------------------------------------------------------------------------

    pub async fn create_client(&self, payload: &CreateClient) -> ApiResult<Client> {
        validate_new_client(payload).map_err(CoreError::from)?;

        let created = self.clients.create(payload).await?;
        self.store.clients.upsert(created.clone());
        self.revalidate_clients();
        Ok(created)
    }

    pub async fn update_client(&self, id: i64, payload: &CreateClient) -> ApiResult<Client> {
        validate_new_client(payload).map_err(CoreError::from)?;

        let updated = self.clients.update(id, payload).await?;
        self.store.clients.upsert(updated.clone());
        self.revalidate_clients();
        Ok(updated)
    }

    pub async fn delete_client(&self, id: i64) -> ApiResult<()> {
        self.clients.delete(id).await?;
        self.store.clients.remove(id);
        self.revalidate_clients();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Category mutations
    // -------------------------------------------------------------------------

    pub async fn create_category(&self, payload: &CreateCategory) -> ApiResult<Category> {
        let created = self.categories.create(payload).await?;
        self.store.categories.upsert(created.clone());
        self.revalidate_categories();
        Ok(created)
    }

    pub async fn update_category(&self, id: i64, payload: &CreateCategory) -> ApiResult<Category> {
        let updated = self.categories.update(id, payload).await?;
        self.store.categories.upsert(updated.clone());
        self.revalidate_categories();
        Ok(updated)
    }

    pub async fn delete_category(&self, id: i64) -> ApiResult<()> {
        self.categories.delete(id).await?;
        self.store.categories.remove(id);
        self.revalidate_categories();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sale capture
    // -------------------------------------------------------------------------

    /// Captures a sale.
    ///
    /// Order of checks: payload validation, then stock against the
    /// cached product snapshot (stale-prone but saves the round-trip),
    /// then the remote call. On success the chosen document type is
    /// tagged for the new sale, the record is spliced into the sales
    /// cache, and both the sales and products collections revalidate in
    /// the background (server-side stock changed).
    pub async fn create_sale(&self, payload: &CreateSale) -> ApiResult<Sale> {
        validate_new_sale(payload)?;

        if let Some(products) = self.store.products.snapshot() {
            for line in &payload.detalles {
                if let Some(product) = products.iter().find(|p| p.id == line.producto_id) {
                    ensure_stock(product, line.cantidad)?;
                }
            }
        }

        let mut created = self.sales.create(payload).await?;

        let tipo = payload
            .tipo_documento
            .unwrap_or_else(|| self.session.default_document_type());
        if let Err(err) = self.session.tag_sale(created.id, tipo) {
            warn!(sale_id = created.id, %err, "could not persist document tag");
        }
        if created.tipo_documento.is_none() {
            created.tipo_documento = Some(tipo);
        }

        self.store.sales.upsert(created.clone());
        self.revalidate_sales();
        self.revalidate_products();
        Ok(created)
    }

    /// One sale, resolved for rendering: references attached, document
    /// metadata derived, totals computed.
    pub async fn enriched_sale(&self, id: i64) -> ApiResult<EnrichedSale> {
        let sale = match self
            .store
            .sales
            .snapshot()
            .and_then(|sales| sales.iter().find(|s| s.id == id).cloned())
        {
            Some(sale) => sale,
            None => {
                let mut sale = self
                    .read_with_retry("sales/by-id", || self.sales.get_by_id(id))
                    .await?;
                if sale.tipo_documento.is_none() {
                    sale.tipo_documento = self.session.document_type_for(sale.id);
                }
                sale
            }
        };

        let clients = self.clients().await?;
        let products = self.products().await?;
        Ok(enrich_sale(&sale, &clients, &products))
    }

    /// Dashboard buckets over the cached sales collection.
    pub async fn dashboard(&self, period: Period) -> ApiResult<Vec<TrendBucket>> {
        let sales = self.sales().await?;
        Ok(bucket_sales(&sales, period))
    }

    // -------------------------------------------------------------------------
    // Background revalidation
    // -------------------------------------------------------------------------
    // Fire-and-forget refetches. The eventual full replace wins over the
    // optimistic splice; a failure only logs - the splice already keeps
    // the UI coherent until the next read.

    fn revalidate_products(&self) {
        let service = self.products.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            match service.get_all().await {
                Ok(items) => {
                    store.products.replace(items);
                }
                Err(err) => warn!(%err, "background products revalidation failed"),
            }
        });
    }

    fn revalidate_clients(&self) {
        let service = self.clients.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            match service.get_all().await {
                Ok(items) => {
                    store.clients.replace(items);
                }
                Err(err) => warn!(%err, "background clients revalidation failed"),
            }
        });
    }

    fn revalidate_categories(&self) {
        let service = self.categories.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            match service.get_all().await {
                Ok(items) => {
                    store.categories.replace(items);
                }
                Err(err) => warn!(%err, "background categories revalidation failed"),
            }
        });
    }

    fn revalidate_sales(&self) {
        let service = self.sales.clone();
        let store = self.store.clone();
        let session = self.session.clone();
        tokio::spawn(async move {
            match service.get_all().await {
                Ok(mut items) => {
                    apply_document_tags(&mut items, &session);
                    store.sales.replace(items);
                }
                Err(err) => warn!(%err, "background sales revalidation failed"),
            }
        });
    }
}

/// Merges the session's per-sale document tags into fetched records.
/// A type already present on the wire wins.
fn apply_document_tags(sales: &mut [Sale], session: &SessionStore) {
    for sale in sales.iter_mut() {
        if sale.tipo_documento.is_none() {
            sale.tipo_documento = session.document_type_for(sale.id);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use techstore_core::enrich::placeholder_product;
    use techstore_core::types::CreateSaleDetail;

    /// Queries against a dead endpoint: anything that reaches the
    /// network fails with Transport, so these tests prove what gets
    /// rejected *before* the network.
    fn offline_queries() -> (tempfile::TempDir, Queries) {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(SessionStore::open(dir.path().join("session.json")).unwrap());
        let config = ApiConfig::with_base_url("http://127.0.0.1:1/api");
        let client = ApiClient::new(&config, session).unwrap();
        let queries = Queries::new(client, Arc::new(ResourceStore::new()));
        (dir, queries)
    }

    fn sale_payload(producto_id: i64, cantidad: i64) -> CreateSale {
        CreateSale {
            cliente_id: 1,
            metodo_pago: "efectivo".to_string(),
            detalles: vec![CreateSaleDetail {
                producto_id,
                cantidad,
                precio_unitario: 10.0,
            }],
            tipo_documento: None,
        }
    }

    #[tokio::test]
    async fn test_cached_read_skips_network() {
        let (_dir, queries) = offline_queries();
        queries
            .store()
            .products
            .replace(vec![placeholder_product(1, 10.0)]);

        // The endpoint is unreachable, so only the cache can answer.
        let snapshot = queries.products().await.unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_create_sale_rejects_oversell_before_network() {
        let (_dir, queries) = offline_queries();

        let mut product = placeholder_product(1, 10.0);
        product.stock = 2;
        queries.store().products.replace(vec![product]);

        let err = queries.create_sale(&sale_payload(1, 5)).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Core(CoreError::InsufficientStock { requested: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_create_sale_rejects_empty_payload() {
        let (_dir, queries) = offline_queries();
        let payload = CreateSale {
            cliente_id: 1,
            metodo_pago: "efectivo".to_string(),
            detalles: vec![],
            tipo_documento: None,
        };

        let err = queries.create_sale(&payload).await.unwrap_err();
        assert!(matches!(err, ApiError::Core(CoreError::EmptySale)));
    }

    #[tokio::test]
    async fn test_create_product_rejects_invalid_payload_before_network() {
        let (_dir, queries) = offline_queries();
        let payload = CreateProduct {
            categoria_id: None,
            nombre: String::new(),
            marca: "X".to_string(),
            modelo: "Y".to_string(),
            descripcion: String::new(),
            precio: 10.0,
            stock: 1,
            codigo: "C-1".to_string(),
        };

        let err = queries.create_product(&payload).await.unwrap_err();
        assert!(matches!(err, ApiError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_product_in_snapshot_defers_to_server() {
        let (_dir, queries) = offline_queries();
        queries.store().products.replace(vec![]);

        // Product 99 is not in the snapshot: the local check passes and
        // the failure comes from the (dead) network instead.
        let err = queries.create_sale(&sale_payload(99, 1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
