//! # Domain Types
//!
//! Core domain records mirroring the remote REST API.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Client      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  codigo         │   │  fecha (wire)   │   │  dni_ruc        │       │
//! │  │  precio, stock  │   │  detalles[]     │   │  direccion      │       │
//! │  │  categoria_id   │   │  total          │   │  email          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SaleDetail    │   │  DocumentType   │   │ InvoiceMetadata │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  cantidad       │   │  Boleta         │   │  serie          │       │
//! │  │  precio_unitario│   │  Factura        │   │  numero         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Fidelity
//! Field names serialize to the upstream API's camelCase Spanish names
//! (`clienteId`, `precioUnitario`, `dniRuc`, ...). The sale timestamp is
//! kept as the raw wire string and parsed lazily so one malformed record
//! degrades by itself instead of poisoning a whole collection fetch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Document Type
// =============================================================================

/// The kind of sales document issued for a sale.
///
/// Boleta is the simplified receipt for individual consumers; Factura is
/// the formal tax invoice for business clients with an 11-digit RUC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Boleta,
    Factura,
}

impl DocumentType {
    /// Series letter used in document numbering.
    #[inline]
    pub const fn letter(&self) -> char {
        match self {
            DocumentType::Boleta => 'B',
            DocumentType::Factura => 'F',
        }
    }

    /// Human-readable title printed on rendered documents.
    pub const fn label(&self) -> &'static str {
        match self {
            DocumentType::Boleta => "Boleta de Venta",
            DocumentType::Factura => "Factura Electrónica",
        }
    }

    /// Wire value (`"boleta"` / `"factura"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Boleta => "boleta",
            DocumentType::Factura => "factura",
        }
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        DocumentType::Boleta
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,

    /// Owning category; a product belongs to at most one.
    #[serde(default)]
    pub categoria_id: Option<i64>,

    pub nombre: String,
    pub marca: String,
    pub modelo: String,

    #[serde(default)]
    pub descripcion: String,

    /// Unit price. Never negative for a valid record.
    pub precio: f64,

    /// Units on hand. Never negative for a valid record.
    pub stock: i64,

    /// Unique business code.
    pub codigo: String,

    /// Registration timestamp as sent by the API.
    #[serde(default)]
    pub fecha_registro: String,

    /// Embedded category, when the endpoint expands it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<Category>,
}

impl Product {
    /// Checks whether `cantidad` units can be sold from the cached stock.
    #[inline]
    pub fn can_sell(&self, cantidad: i64) -> bool {
        self.stock >= cantidad
    }
}

/// A product category. Owns zero or more products as a weak
/// back-reference only; deleting a category never cascades.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub nombre: String,

    #[serde(default)]
    pub descripcion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productos: Option<Vec<Product>>,
}

// =============================================================================
// Clients
// =============================================================================

/// A client record.
///
/// `dni_ruc` carries either a personal DNI (8 digits) or a business RUC
/// (11 digits); the length drives invoice-type inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub nombre: String,
    pub dni_ruc: String,

    #[serde(default)]
    pub direccion: String,

    #[serde(default)]
    pub telefono: String,

    #[serde(default)]
    pub email: String,
}

impl Client {
    /// True when the tax id has business RUC length.
    #[inline]
    pub fn has_ruc(&self) -> bool {
        self.dni_ruc.chars().count() == crate::RUC_LEN
    }
}

// =============================================================================
// Sales
// =============================================================================

/// A captured sale.
///
/// The invoice fields (`tipo_documento`, `serie`, `numero_documento`) are
/// derived on the client, never persisted; the remote record is the
/// source of truth for everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub cliente_id: i64,

    /// Sale timestamp as sent by the API. Parse via [`Sale::fecha_parsed`].
    pub fecha: String,

    pub total: f64,
    pub metodo_pago: String,

    #[serde(default)]
    pub detalles: Vec<SaleDetail>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente: Option<Client>,

    /// Derived document classification; an explicit value wins over the
    /// inference rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_documento: Option<DocumentType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serie: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_documento: Option<String>,
}

impl Sale {
    /// Parses the wire timestamp leniently.
    ///
    /// Accepts RFC 3339, the bare `YYYY-MM-DDTHH:MM:SS[.fff]` shape the
    /// upstream API emits, and a plain date. Returns `None` on anything
    /// else; callers skip or fall back per record.
    pub fn fecha_parsed(&self) -> Option<DateTime<Utc>> {
        parse_wire_timestamp(&self.fecha)
    }
}

/// One line item within a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub venta_id: i64,

    pub producto_id: i64,

    /// Units sold. Positive for a valid record.
    pub cantidad: i64,

    /// Unit price snapshot taken at sale time.
    pub precio_unitario: f64,

    /// Persisted line subtotal. Zero or absent means "recompute".
    #[serde(default)]
    pub subtotal: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producto: Option<Product>,
}

impl SaleDetail {
    /// Line subtotal: the persisted value when present and non-zero,
    /// else `cantidad × precio_unitario`.
    #[inline]
    pub fn line_subtotal(&self) -> f64 {
        match self.subtotal {
            Some(s) if s != 0.0 => s,
            _ => self.cantidad as f64 * self.precio_unitario,
        }
    }
}

// =============================================================================
// Invoice Metadata
// =============================================================================

/// Derived document identity for a sale: computed on the client from the
/// sale's id/date/classification, recomputed on every view, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceMetadata {
    pub serie: String,
    pub numero: String,
    pub tipo_documento: DocumentType,
}

// =============================================================================
// Create / Update payloads
// =============================================================================

/// Payload for `POST /products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[serde(default)]
    pub categoria_id: Option<i64>,
    pub nombre: String,
    pub marca: String,
    pub modelo: String,
    #[serde(default)]
    pub descripcion: String,
    pub precio: f64,
    pub stock: i64,
    pub codigo: String,
}

/// Payload for `PUT /products/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modelo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

/// Payload for `POST /clients` and `PUT /clients/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
    pub nombre: String,
    pub dni_ruc: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub email: String,
}

/// Payload for `POST /categories` and `PUT /categories/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

/// One line of a sale being captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleDetail {
    pub producto_id: i64,
    pub cantidad: i64,
    pub precio_unitario: f64,
}

/// Payload for `POST /sales`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSale {
    pub cliente_id: i64,
    pub metodo_pago: String,
    pub detalles: Vec<CreateSaleDetail>,

    /// Explicit document classification chosen at capture time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_documento: Option<DocumentType>,
}

// =============================================================================
// Filters
// =============================================================================

/// Query filter for `GET /products/filter`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

/// Query filter for `GET /sales/filter`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_desde: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_hasta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<i64>,
}

// =============================================================================
// Report rows
// =============================================================================

/// Row of `GET /reports/top-selling`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingProduct {
    pub producto_id: i64,
    pub nombre: String,
    pub unidades_vendidas: i64,
    pub ingresos: f64,
}

/// Row of `GET /reports/low-stock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub producto_id: i64,
    pub nombre: String,
    pub codigo: String,
    pub stock: i64,
}

/// Row of `GET /reports/income-by-category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeByCategory {
    pub categoria_id: i64,
    pub categoria: String,
    pub ingresos: f64,
}

/// Row of `GET /reports/price-variation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceVariation {
    pub producto_id: i64,
    pub nombre: String,
    pub precio_anterior: f64,
    pub precio_actual: f64,
}

/// Row of `GET /reports/without-category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithoutCategory {
    pub producto_id: i64,
    pub nombre: String,
    pub codigo: String,
}

// =============================================================================
// Timestamp parsing
// =============================================================================

/// Lenient wire-timestamp parser shared by sales and documents.
///
/// The upstream API emits naive `YYYY-MM-DDTHH:MM:SS` timestamps; other
/// producers in the chain use RFC 3339. Naive values are taken as UTC so
/// the derived document number is stable across machines.
pub fn parse_wire_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    None
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_wire_values() {
        assert_eq!(
            serde_json::to_string(&DocumentType::Boleta).unwrap(),
            "\"boleta\""
        );
        assert_eq!(
            serde_json::from_str::<DocumentType>("\"factura\"").unwrap(),
            DocumentType::Factura
        );
    }

    #[test]
    fn test_client_has_ruc() {
        let mut client = Client {
            id: 1,
            nombre: "ACME SAC".to_string(),
            dni_ruc: "20601234567".to_string(),
            direccion: String::new(),
            telefono: String::new(),
            email: String::new(),
        };
        assert!(client.has_ruc());

        client.dni_ruc = "12345678".to_string();
        assert!(!client.has_ruc());
    }

    #[test]
    fn test_line_subtotal_prefers_persisted_value() {
        let mut detalle = SaleDetail {
            id: 1,
            venta_id: 1,
            producto_id: 7,
            cantidad: 2,
            precio_unitario: 100.0,
            subtotal: Some(199.0),
            producto: None,
        };
        assert_eq!(detalle.line_subtotal(), 199.0);

        // Zero is treated as absent, mirroring the upstream records that
        // ship uncomputed subtotals as 0.
        detalle.subtotal = Some(0.0);
        assert_eq!(detalle.line_subtotal(), 200.0);

        detalle.subtotal = None;
        assert_eq!(detalle.line_subtotal(), 200.0);
    }

    #[test]
    fn test_parse_wire_timestamp_shapes() {
        assert!(parse_wire_timestamp("2024-03-15T10:30:00").is_some());
        assert!(parse_wire_timestamp("2024-03-15T10:30:00.123").is_some());
        assert!(parse_wire_timestamp("2024-03-15T10:30:00Z").is_some());
        assert!(parse_wire_timestamp("2024-03-15T10:30:00-05:00").is_some());
        assert!(parse_wire_timestamp("2024-03-15").is_some());

        assert!(parse_wire_timestamp("").is_none());
        assert!(parse_wire_timestamp("not-a-date").is_none());
        assert!(parse_wire_timestamp("15/03/2024").is_none());
    }

    #[test]
    fn test_sale_deserializes_wire_shape() {
        let json = r#"{
            "id": 42,
            "clienteId": 7,
            "fecha": "2024-03-15T10:30:00",
            "total": 236.0,
            "metodoPago": "efectivo",
            "detalles": [
                {"id": 1, "ventaId": 42, "productoId": 3, "cantidad": 2, "precioUnitario": 100.0, "subtotal": 200.0}
            ]
        }"#;

        let sale: Sale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.id, 42);
        assert_eq!(sale.cliente_id, 7);
        assert_eq!(sale.detalles.len(), 1);
        assert_eq!(sale.detalles[0].precio_unitario, 100.0);
        assert!(sale.tipo_documento.is_none());
        assert!(sale.fecha_parsed().is_some());
    }
}
