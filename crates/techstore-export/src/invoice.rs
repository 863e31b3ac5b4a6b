//! # Invoice / Receipt Rendering
//!
//! Fixed A4 document for a single sale, mirroring the printed layout
//! the business uses:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               TECHSTORE PERÚ                │  header block
//! │        Av. Tecnología 123, San Isidro       │
//! │        RUC: ... | Teléfono: ...             │
//! │              FACTURA ELECTRÓNICA            │  document title
//! │                                             │
//! │  INFORMACIÓN DEL COMPROBANTE                │  metadata + client
//! │  Serie/Número  F001-240315F000042  Cliente  │
//! │  Fecha         15/03/2024          DNI/RUC  │
//! │  Forma de Pago EFECTIVO            ...      │
//! │                                             │
//! │  CANT.  DESCRIPCIÓN     P. UNITARIO  TOTAL  │  line items
//! │  ...                                        │
//! │                        OP. GRAVADA   S/ ... │  totals block
//! │                        I.G.V. (18%)  S/ ... │
//! │                        TOTAL         S/ ... │
//! │        Representación impresa ...           │  footer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The caller hands in an [`EnrichedSale`] so placeholder client or
//! product stubs are visible here and can be flagged on the output.

use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::debug;

use techstore_core::documents::format_currency;
use techstore_core::enrich::EnrichedSale;
use techstore_core::{COMPANY_ADDRESS, COMPANY_NAME, COMPANY_PHONE, COMPANY_RUC};

use crate::error::{ExportError, ExportResult};
use crate::layout::{centered, clip, hline, right_aligned, text, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};

const ITEM_STEP: f32 = 6.0;
const FOOTER_TOP: f32 = 32.0;

/// Suggested file name for a rendered document: `F001-240315F000042.pdf`.
pub fn invoice_filename(sale: &EnrichedSale) -> String {
    format!("{}-{}.pdf", sale.invoice.serie, sale.invoice.numero)
}

/// Renders the invoice/receipt PDF for a sale.
pub fn render_pdf(sale: &EnrichedSale) -> ExportResult<Vec<u8>> {
    let title = sale.invoice.tipo_documento.label();
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    // ---------------------------------------------------------------------
    // Header block
    // ---------------------------------------------------------------------
    centered(&layer, &bold, COMPANY_NAME, 16.0, y);
    y -= 8.0;
    centered(&layer, &font, COMPANY_ADDRESS, 10.0, y);
    y -= 5.0;
    centered(
        &layer,
        &font,
        &format!("RUC: {} | Teléfono: {}", COMPANY_RUC, COMPANY_PHONE),
        10.0,
        y,
    );
    y -= 10.0;

    centered(&layer, &bold, &title.to_uppercase(), 14.0, y);
    y -= 12.0;

    // ---------------------------------------------------------------------
    // Document + client information
    // ---------------------------------------------------------------------
    text(&layer, &bold, "INFORMACIÓN DEL COMPROBANTE", 11.0, MARGIN, y);
    y -= 7.0;

    let fecha_display = sale
        .sale
        .fecha_parsed()
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| sale.sale.fecha.clone());
    let metodo_pago = if sale.sale.metodo_pago.trim().is_empty() {
        "EFECTIVO".to_string()
    } else {
        sale.sale.metodo_pago.to_uppercase()
    };

    let cliente = sale.cliente.value();
    let mid = PAGE_WIDTH / 2.0;

    let left = [
        ("Serie/Número:", format!("{}-{}", sale.invoice.serie, sale.invoice.numero)),
        ("Fecha:", fecha_display),
        ("Forma de Pago:", metodo_pago),
    ];
    let right = [
        ("Cliente:", clip(&cliente.nombre, 30)),
        ("DNI/RUC:", cliente.dni_ruc.clone()),
        ("Dirección:", clip(&cliente.direccion, 30)),
        (
            "Teléfono:",
            if cliente.telefono.is_empty() {
                "No registrado".to_string()
            } else {
                cliente.telefono.clone()
            },
        ),
    ];

    let block_top = y;
    for (idx, (label, value)) in left.iter().enumerate() {
        let row_y = block_top - idx as f32 * 7.0;
        text(&layer, &font, label, 10.0, MARGIN + 2.0, row_y);
        text(&layer, &font, value, 10.0, MARGIN + 35.0, row_y);
    }
    for (idx, (label, value)) in right.iter().enumerate() {
        let row_y = block_top - idx as f32 * 7.0;
        text(&layer, &font, label, 10.0, mid + 5.0, row_y);
        text(&layer, &font, value, 10.0, mid + 28.0, row_y);
    }
    y = block_top - (right.len() as f32) * 7.0 - 5.0;

    // ---------------------------------------------------------------------
    // Line items
    // ---------------------------------------------------------------------
    let item_headers = |layer: &PdfLayerReference, bold: &IndirectFontRef, y: &mut f32| {
        text(layer, bold, "CANT.", 10.0, MARGIN, *y);
        text(layer, bold, "DESCRIPCIÓN", 10.0, MARGIN + 22.0, *y);
        right_aligned(layer, bold, "P. UNITARIO", 10.0, PAGE_WIDTH - MARGIN - 28.0, *y);
        right_aligned(layer, bold, "TOTAL", 10.0, PAGE_WIDTH - MARGIN, *y);
        *y -= 2.0;
        hline(layer, MARGIN, PAGE_WIDTH - MARGIN, *y);
        *y -= ITEM_STEP;
    };

    item_headers(&layer, &bold, &mut y);

    for line in &sale.lineas {
        if y < FOOTER_TOP + 40.0 {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT - MARGIN;
            item_headers(&layer, &bold, &mut y);
        }

        text(&layer, &font, &line.detalle.cantidad.to_string(), 10.0, MARGIN + 3.0, y);
        text(&layer, &font, &clip(&line.producto.value().nombre, 45), 10.0, MARGIN + 22.0, y);
        right_aligned(
            &layer,
            &font,
            &format_currency(line.detalle.precio_unitario),
            10.0,
            PAGE_WIDTH - MARGIN - 28.0,
            y,
        );
        right_aligned(
            &layer,
            &font,
            &format_currency(line.subtotal),
            10.0,
            PAGE_WIDTH - MARGIN,
            y,
        );
        y -= ITEM_STEP;
    }

    hline(&layer, MARGIN, PAGE_WIDTH - MARGIN, y + ITEM_STEP - 2.0);

    // ---------------------------------------------------------------------
    // Totals block
    // ---------------------------------------------------------------------
    y -= 6.0;
    let label_x = PAGE_WIDTH - MARGIN - 70.0;
    let value_x = PAGE_WIDTH - MARGIN;

    text(&layer, &bold, "OP. GRAVADA:", 11.0, label_x, y);
    right_aligned(&layer, &bold, &format_currency(sale.totals.subtotal), 11.0, value_x, y);
    y -= 7.0;
    text(&layer, &bold, "I.G.V. (18%):", 11.0, label_x, y);
    right_aligned(&layer, &bold, &format_currency(sale.totals.igv), 11.0, value_x, y);
    y -= 3.0;
    hline(&layer, label_x - 2.0, value_x, y);
    y -= 6.0;
    text(&layer, &bold, "TOTAL:", 12.0, label_x, y);
    right_aligned(&layer, &bold, &format_currency(sale.totals.total), 12.0, value_x, y);

    // ---------------------------------------------------------------------
    // Footer
    // ---------------------------------------------------------------------
    let mut footer_y = FOOTER_TOP;
    let generated = Utc::now().format("%d/%m/%Y %H:%M").to_string();
    let mut footer_lines = vec![
        "Representación impresa del comprobante de pago electrónico".to_string(),
        "Autorizado mediante Resolución de Intendencia N° 034-005-0004434/SUNAT".to_string(),
        format!("Documento generado el: {}", generated),
        format!("ID Transacción: {:08}", sale.sale.id),
    ];
    if sale.has_placeholders() {
        footer_lines.push("(*) Incluye datos de cliente o producto no verificados".to_string());
    }

    for line in &footer_lines {
        centered(&layer, &font, line, 8.0, footer_y);
        footer_y -= 4.0;
    }

    debug!(
        serie = %sale.invoice.serie,
        numero = %sale.invoice.numero,
        lineas = sale.lineas.len(),
        "invoice rendered"
    );
    crate::layout::save_bytes(doc)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use techstore_core::enrich::enrich_sale;
    use techstore_core::types::{Sale, SaleDetail};

    fn sale_with_lines(count: usize) -> EnrichedSale {
        let detalles: Vec<SaleDetail> = (0..count)
            .map(|i| SaleDetail {
                id: i as i64,
                venta_id: 42,
                producto_id: i as i64 + 1,
                cantidad: 1 + (i as i64 % 3),
                precio_unitario: 10.0 + i as f64,
                subtotal: None,
                producto: None,
            })
            .collect();

        let sale = Sale {
            id: 42,
            cliente_id: 7,
            fecha: "2024-03-15T10:30:00".to_string(),
            total: 0.0,
            metodo_pago: "efectivo".to_string(),
            detalles,
            cliente: None,
            tipo_documento: None,
            serie: None,
            numero_documento: None,
        };
        enrich_sale(&sale, &[], &[])
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_pdf(&sale_with_lines(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_long_sale_paginates() {
        let bytes = render_pdf(&sale_with_lines(80)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_sale_still_renders() {
        let bytes = render_pdf(&sale_with_lines(0)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_invoice_filename() {
        let sale = sale_with_lines(1);
        assert_eq!(
            invoice_filename(&sale),
            format!("{}-{}.pdf", sale.invoice.serie, sale.invoice.numero)
        );
        assert!(invoice_filename(&sale).starts_with("B001-240315B"));
    }
}
