//! Command implementations, one module per surface.

pub mod auth;
pub mod categories;
pub mod clients;
pub mod dashboard;
pub mod export;
pub mod products;
pub mod reports;
pub mod sales;
