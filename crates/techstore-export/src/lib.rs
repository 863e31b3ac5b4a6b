//! # techstore-export: Document Output
//!
//! Turns in-memory records into the three artifacts the back-office
//! hands to humans:
//!
//! - [`invoice`] - the A4 invoice/receipt PDF for a single sale
//! - [`spreadsheet`] - XLSX export of any tabular view
//! - [`pdf`] - paginated tabular PDF export
//! - [`html`] - print-formatted HTML page
//!
//! Tabular exports are column-driven: callers describe the view once as
//! [`columns::ExportColumn`] definitions (title + field path + optional
//! formatter) and reuse it across all three output formats.

pub mod columns;
pub mod error;
pub mod html;
pub mod invoice;
mod layout;
pub mod pdf;
pub mod spreadsheet;

pub use columns::{rows_from, ExportColumn};
pub use error::{ExportError, ExportResult};
