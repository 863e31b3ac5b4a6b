//! # Document Engine
//!
//! Document classification, numbering and totals for sales.
//!
//! ## Where this runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Document Derivation Pipeline                            │
//! │                                                                         │
//! │  Sale (fetched) ──► determine_document_type ──► Boleta / Factura        │
//! │        │                                                                │
//! │        ├──────────► document_number_for_sale ──► serie + numero         │
//! │        │                                                                │
//! │        └──────────► calculate_totals ──► subtotal / IGV / total         │
//! │                                                                         │
//! │  Everything here is a pure function of already-fetched data: no         │
//! │  network, no storage, recomputed on every view.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Numbering model
//! The document number is **derived**, not allocated: it is a pure
//! function of the sale's server-assigned identity and timestamp, so a
//! persisted sale maps to the same serie/numero every time it is
//! recomputed, on any client, with no shared counter. The trade-off is
//! that numbers are not monotonic across sales, and a sale that has not
//! yet received its identity falls back to coarse timestamp digits with
//! a documented collision window.
//!
//! ## Rounding model
//! Totals accumulate unrounded; rounding to 2 decimals happens only at
//! formatting time. Rounding each line first would compound the error
//! across long sales.

use base64::Engine;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DocumentType, InvoiceMetadata, Sale, SaleDetail};
use crate::{COMPANY_RUC, FACTURA_AMOUNT_THRESHOLD, IGV_RATE, RUC_LEN};

// =============================================================================
// Document Classification
// =============================================================================

/// Classifies a sale as Boleta or Factura.
///
/// ## Rules (first match wins)
/// 1. An explicit `tipo_documento` on the sale is honored as-is.
/// 2. A client whose tax id has RUC length (11 characters) always gets a
///    Factura, regardless of the amount.
/// 3. Totals above the Factura threshold (700.0) get a Factura.
/// 4. Everything else is a Boleta.
///
/// ## Example
/// ```rust
/// use techstore_core::documents::determine_document_type;
/// use techstore_core::types::{DocumentType, Sale};
///
/// let sale = Sale {
///     id: 1,
///     cliente_id: 1,
///     fecha: "2024-03-15T10:30:00".to_string(),
///     total: 50.0,
///     metodo_pago: "efectivo".to_string(),
///     detalles: vec![],
///     cliente: None,
///     tipo_documento: None,
///     serie: None,
///     numero_documento: None,
/// };
/// assert_eq!(determine_document_type(&sale), DocumentType::Boleta);
/// ```
pub fn determine_document_type(sale: &Sale) -> DocumentType {
    if let Some(explicit) = sale.tipo_documento {
        return explicit;
    }

    if let Some(cliente) = &sale.cliente {
        if cliente.dni_ruc.chars().count() == RUC_LEN {
            return DocumentType::Factura;
        }
    }

    if sale.total > FACTURA_AMOUNT_THRESHOLD {
        return DocumentType::Factura;
    }

    DocumentType::Boleta
}

// =============================================================================
// Document Numbering
// =============================================================================

/// Derives the serie/numero pair for a sale.
///
/// ## Format
/// ```text
/// serie  = type letter + "001"         →  "F001" / "B001"
/// numero = YYMMDD + type letter + sale id padded to 6 digits
///          "240315" + "F" + "000042"   →  "240315F000042"
/// ```
///
/// ## Determinism
/// For a persisted sale (non-zero id, parseable fecha) the output is
/// byte-identical on every invocation. A sale with no identity yet uses
/// the low-order six digits of the current Unix-millis timestamp; two
/// unsaved sales generated within the same millisecond window can
/// collide. A malformed fecha falls back to today's date. Neither case
/// fails: this function always produces a number.
pub fn document_number_for_sale(sale: &Sale) -> InvoiceMetadata {
    let tipo = determine_document_type(sale);
    let letter = tipo.letter();

    let fecha = sale
        .fecha_parsed()
        .unwrap_or_else(|| {
            tracing::warn!(sale_id = sale.id, fecha = %sale.fecha, "unparseable sale date, numbering from today");
            Utc::now()
        })
        .date_naive();

    let correlative = if sale.id > 0 {
        sale.id
    } else {
        Utc::now().timestamp_millis() % 1_000_000
    };

    InvoiceMetadata {
        serie: format!("{}001", letter),
        numero: format!(
            "{:02}{:02}{:02}{}{:06}",
            fecha.year() % 100,
            fecha.month(),
            fecha.day(),
            letter,
            correlative
        ),
        tipo_documento: tipo,
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Sale totals: net amount, IGV and grand total.
///
/// All three values are unrounded; use [`format_currency`] (or
/// [`round2`]) at the display edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub igv: f64,
    pub total: f64,
}

/// Computes totals over a sale's line items.
///
/// subtotal = Σ line subtotals (persisted value when present and
/// non-zero, else `cantidad × precio_unitario`); igv = subtotal × 18%;
/// total = subtotal + igv. An empty list yields all-zero totals.
///
/// ## Example
/// ```rust
/// use techstore_core::documents::calculate_totals;
/// use techstore_core::types::SaleDetail;
///
/// let detalles = vec![SaleDetail {
///     id: 0,
///     venta_id: 0,
///     producto_id: 1,
///     cantidad: 2,
///     precio_unitario: 100.0,
///     subtotal: None,
///     producto: None,
/// }];
///
/// let totals = calculate_totals(&detalles);
/// assert_eq!(totals.subtotal, 200.0);
/// assert_eq!(totals.igv, 36.0);
/// assert_eq!(totals.total, 236.0);
/// ```
pub fn calculate_totals(detalles: &[SaleDetail]) -> Totals {
    let subtotal: f64 = detalles.iter().map(SaleDetail::line_subtotal).sum();
    let igv = subtotal * IGV_RATE;

    Totals {
        subtotal,
        igv,
        total: subtotal + igv,
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// Rounds to 2 decimal places. Display-edge helper; intermediate math
/// stays unrounded.
#[inline]
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Formats an amount as Peruvian soles: `S/ 1,234.56`.
pub fn format_currency(amount: f64) -> String {
    let rounded = round2(amount);
    let negative = rounded < 0.0;
    let cents = (rounded.abs() * 100.0).round() as i64;
    let (units, fraction) = (cents / 100, cents % 100);

    // Group the integer part in threes.
    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "{}S/ {}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        fraction
    )
}

/// Parses a formatted currency string back to its numeric amount.
///
/// Accepts the output of [`format_currency`] as well as the looser
/// `S/.` prefix used by older documents. Returns `None` when no number
/// remains after stripping the currency decorations.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('-')
        .trim_start_matches("S/.")
        .trim_start_matches("S/")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let value: f64 = cleaned.parse().ok()?;
    Some(if raw.trim_start().starts_with('-') {
        -value
    } else {
        value
    })
}

// =============================================================================
// QR Payload
// =============================================================================

/// Builds the base64 QR payload embedded in rendered documents.
///
/// The payload is a JSON object carrying the issuing RUC, the derived
/// serie/numero, the sale date and total, plus a short opaque hash of
/// the sale identity. It is informational, not a fiscal signature.
pub fn qr_payload(sale: &Sale) -> String {
    let invoice = document_number_for_sale(sale);
    let hash_source = format!("{}-{}", sale.id, sale.fecha);
    let hash: String = base64::engine::general_purpose::STANDARD
        .encode(hash_source)
        .chars()
        .take(20)
        .collect();

    let payload = serde_json::json!({
        "ruc": COMPANY_RUC,
        "tipo": invoice.tipo_documento,
        "serie": invoice.serie,
        "numero": invoice.numero,
        "fecha": sale.fecha,
        "total": sale.total,
        "hash": hash,
    });

    base64::engine::general_purpose::STANDARD.encode(payload.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Client;

    fn test_sale(id: i64, total: f64) -> Sale {
        Sale {
            id,
            cliente_id: 1,
            fecha: "2024-03-15T10:30:00".to_string(),
            total,
            metodo_pago: "efectivo".to_string(),
            detalles: vec![],
            cliente: None,
            tipo_documento: None,
            serie: None,
            numero_documento: None,
        }
    }

    fn test_client(dni_ruc: &str) -> Client {
        Client {
            id: 1,
            nombre: "Cliente Prueba".to_string(),
            dni_ruc: dni_ruc.to_string(),
            direccion: String::new(),
            telefono: String::new(),
            email: String::new(),
        }
    }

    fn detalle(cantidad: i64, precio_unitario: f64) -> SaleDetail {
        SaleDetail {
            id: 0,
            venta_id: 0,
            producto_id: 1,
            cantidad,
            precio_unitario,
            subtotal: None,
            producto: None,
        }
    }

    #[test]
    fn test_explicit_type_is_honored() {
        let mut sale = test_sale(1, 5000.0);
        sale.tipo_documento = Some(DocumentType::Boleta);
        // Amount alone would force Factura, but the explicit tag wins.
        assert_eq!(determine_document_type(&sale), DocumentType::Boleta);
    }

    #[test]
    fn test_ruc_client_always_factura() {
        let mut sale = test_sale(1, 50.0);
        sale.cliente = Some(test_client("20601234567"));
        // 11-char RUC takes precedence over the amount rule.
        assert_eq!(determine_document_type(&sale), DocumentType::Factura);
    }

    #[test]
    fn test_amount_threshold_forces_factura() {
        let mut sale = test_sale(1, 700.01);
        sale.cliente = Some(test_client("12345678"));
        assert_eq!(determine_document_type(&sale), DocumentType::Factura);

        // Exactly at the threshold stays a Boleta.
        sale.total = 700.0;
        assert_eq!(determine_document_type(&sale), DocumentType::Boleta);
    }

    #[test]
    fn test_default_is_boleta() {
        let sale = test_sale(1, 50.0);
        assert_eq!(determine_document_type(&sale), DocumentType::Boleta);
    }

    #[test]
    fn test_number_format() {
        let mut sale = test_sale(42, 50.0);
        sale.tipo_documento = Some(DocumentType::Factura);

        let invoice = document_number_for_sale(&sale);
        assert_eq!(invoice.serie, "F001");
        assert_eq!(invoice.numero, "240315F000042");
        assert_eq!(invoice.tipo_documento, DocumentType::Factura);
    }

    #[test]
    fn test_numbering_is_deterministic() {
        let sale = test_sale(42, 50.0);
        let a = document_number_for_sale(&sale);
        let b = document_number_for_sale(&sale);
        assert_eq!(a, b);
    }

    #[test]
    fn test_numbering_without_identity_still_produces_six_digits() {
        let sale = test_sale(0, 50.0);
        let invoice = document_number_for_sale(&sale);
        // "YYMMDD" + letter + 6 fallback digits
        assert_eq!(invoice.numero.len(), 13);
        assert_eq!(invoice.serie, "B001");
    }

    #[test]
    fn test_totals_empty_sale() {
        let totals = calculate_totals(&[]);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.igv, 0.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn test_totals_single_line() {
        let totals = calculate_totals(&[detalle(2, 100.0)]);
        assert_eq!(totals.subtotal, 200.0);
        assert_eq!(totals.igv, 36.0);
        assert_eq!(totals.total, 236.0);
    }

    #[test]
    fn test_totals_idempotent_and_consistent() {
        let detalles = vec![detalle(3, 19.99), detalle(1, 249.5), detalle(7, 0.35)];

        let a = calculate_totals(&detalles);
        let b = calculate_totals(&detalles);
        assert_eq!(a, b);
        assert!((a.subtotal + a.igv - a.total).abs() < 1e-9);
    }

    #[test]
    fn test_totals_prefer_persisted_subtotal() {
        let mut d = detalle(2, 100.0);
        d.subtotal = Some(150.0);
        let totals = calculate_totals(&[d]);
        assert_eq!(totals.subtotal, 150.0);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "S/ 0.00");
        assert_eq!(format_currency(236.0), "S/ 236.00");
        assert_eq!(format_currency(1234.5), "S/ 1,234.50");
        assert_eq!(format_currency(1234567.891), "S/ 1,234,567.89");
        assert_eq!(format_currency(-5.5), "-S/ 5.50");
    }

    #[test]
    fn test_currency_round_trip() {
        for amount in [0.0, 0.01, 12.34, 700.0, 1234.56, 987654.32] {
            let formatted = format_currency(amount);
            let parsed = parse_currency(&formatted).unwrap();
            assert!((parsed - round2(amount)).abs() < 0.005, "{}", formatted);
        }
    }

    #[test]
    fn test_parse_currency_rejects_garbage() {
        assert!(parse_currency("").is_none());
        assert!(parse_currency("S/ ").is_none());
        assert!(parse_currency("gratis").is_none());
    }

    #[test]
    fn test_qr_payload_decodes_to_document_fields() {
        let mut sale = test_sale(42, 236.0);
        sale.tipo_documento = Some(DocumentType::Factura);

        let encoded = qr_payload(&sale);
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&decoded).unwrap();

        assert_eq!(value["ruc"], COMPANY_RUC);
        assert_eq!(value["serie"], "F001");
        assert_eq!(value["numero"], "240315F000042");
    }
}
