//! # techstore-core: Pure Business Logic for the TechStore Back-Office
//!
//! This crate is the **heart** of the back-office client. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   TechStore Back-Office Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    CLI (apps/backoffice)                        │   │
//! │  │    login ──► catalog ──► sale capture ──► invoice / dashboard   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            techstore-api / techstore-export                     │   │
//! │  │    REST services, cache store, session • PDF, XLSX, HTML        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ techstore-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌───────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐ │   │
//! │  │  │  types   │ │ documents │ │ trends  │ │ enrich  │ │validat.│ │   │
//! │  │  │ Product  │ │ numbering │ │ buckets │ │ stubs   │ │ rules  │ │   │
//! │  │  │  Sale    │ │ totals    │ │ deltas  │ │ tagging │ │ checks │ │   │
//! │  │  └──────────┘ └───────────┘ └─────────┘ └─────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records mirroring the remote API (Product, Sale, ...)
//! - [`documents`] - Document type, numbering, totals and currency formatting
//! - [`trends`] - Time-bucketed sales aggregation for dashboards
//! - [`enrich`] - Explicit placeholder resolution for partial records
//! - [`validation`] - Field and business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic for a persisted
//!    record - same input = same output
//! 2. **No I/O**: Network and file system access are FORBIDDEN here
//! 3. **Never panic**: the document and trend functions degrade per record
//!    instead of failing wholesale
//! 4. **Explicit Errors**: All errors are typed, never strings

// =============================================================================
// Module Declarations
// =============================================================================

pub mod documents;
pub mod enrich;
pub mod error;
pub mod trends;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use documents::{calculate_totals, determine_document_type, document_number_for_sale, Totals};
pub use enrich::{enrich_sale, EnrichedSale, Resolved};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// IGV (Peruvian VAT) rate applied to every sale.
pub const IGV_RATE: f64 = 0.18;

/// Sales above this amount are always issued a Factura, even for
/// individual consumers without a business RUC.
pub const FACTURA_AMOUNT_THRESHOLD: f64 = 700.0;

/// Length of a personal national ID (DNI).
pub const DNI_LEN: usize = 8;

/// Length of a business tax ID (RUC). An 11-character tax id on the
/// client drives Factura issuance regardless of the amount.
pub const RUC_LEN: usize = 11;

/// Issuing company identity printed on documents and embedded in the
/// QR payload.
pub const COMPANY_NAME: &str = "TECHSTORE PERÚ";
pub const COMPANY_RUC: &str = "20601234567";
pub const COMPANY_ADDRESS: &str = "Av. Tecnología 123, San Isidro, Lima - Perú";
pub const COMPANY_PHONE: &str = "(01) 234-5678";

/// Upper bound accepted for a product price.
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Upper bound accepted for a product stock level.
pub const MAX_STOCK: i64 = 10_000;
