//! Paginated tabular PDF export.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde_json::Value;
use tracing::debug;

use crate::columns::ExportColumn;
use crate::error::{ExportError, ExportResult};
use crate::layout::{clip, hline, text, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};

const HEADER_SIZE: f32 = 11.0;
const CELL_SIZE: f32 = 9.0;
const ROW_STEP: f32 = 6.0;

/// Renders rows as a paginated A4 table.
pub fn write_table_pdf(
    rows: &[Value],
    columns: &[ExportColumn],
    title: &str,
) -> ExportResult<Vec<u8>> {
    if columns.is_empty() {
        return Err(ExportError::Pdf("no columns to render".to_string()));
    }

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    let col_width = usable / columns.len() as f32;
    // Rough per-column character budget at cell size.
    let max_chars = ((col_width / (CELL_SIZE * 0.5 * 0.3528)) as usize).max(4);

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    let draw_headers = |layer: &printpdf::PdfLayerReference, y: &mut f32, with_title: bool| {
        if with_title {
            text(layer, &bold, title, 14.0, MARGIN, *y);
            *y -= 10.0;
        }
        for (idx, column) in columns.iter().enumerate() {
            let x = MARGIN + idx as f32 * col_width;
            text(layer, &bold, &clip(&column.title, max_chars), HEADER_SIZE, x, *y);
        }
        *y -= 2.0;
        hline(layer, MARGIN, PAGE_WIDTH - MARGIN, *y);
        *y -= ROW_STEP;
    };

    draw_headers(&layer, &mut y, true);

    for row in rows {
        if y < MARGIN + ROW_STEP {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT - MARGIN;
            draw_headers(&layer, &mut y, false);
        }

        for (idx, column) in columns.iter().enumerate() {
            let x = MARGIN + idx as f32 * col_width;
            text(&layer, &font, &clip(&column.render(row), max_chars), CELL_SIZE, x, y);
        }
        y -= ROW_STEP;
    }

    debug!(rows = rows.len(), title, "tabular pdf rendered");
    crate::layout::save_bytes(doc)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<ExportColumn> {
        vec![
            ExportColumn::new("Código", "codigo"),
            ExportColumn::new("Nombre", "nombre"),
            ExportColumn::new("Precio", "precio"),
        ]
    }

    #[test]
    fn test_table_pdf_bytes_look_like_pdf() {
        let rows = vec![json!({"codigo": "LAP-001", "nombre": "Laptop", "precio": 2500.0})];
        let bytes = write_table_pdf(&rows, &columns(), "Productos").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_tables_paginate_without_error() {
        let rows: Vec<Value> = (0..200)
            .map(|i| json!({"codigo": format!("P-{i}"), "nombre": "Item", "precio": 1.0}))
            .collect();
        let bytes = write_table_pdf(&rows, &columns(), "Inventario").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_no_columns_is_an_error() {
        assert!(write_table_pdf(&[], &[], "x").is_err());
    }
}
