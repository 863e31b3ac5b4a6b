//! Domain services: one module per REST resource.
//!
//! Each service maps 1:1 onto the upstream endpoints and returns typed
//! records. The only client-side transformation is reshaping filter
//! structs into query parameters.

pub mod categories;
pub mod clients;
pub mod products;
pub mod reports;
pub mod sales;

pub use categories::CategoriesService;
pub use clients::ClientsService;
pub use products::ProductsService;
pub use reports::ReportsService;
pub use sales::SalesService;
