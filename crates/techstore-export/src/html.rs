//! Print-formatted HTML page for tabular views.
//!
//! The page is self-contained (inline styles, no scripts) so it can be
//! written to disk and sent straight to a browser's print dialog.

use serde_json::Value;

use crate::columns::ExportColumn;

/// Renders rows as a printable HTML page.
pub fn print_page(rows: &[Value], columns: &[ExportColumn], title: &str) -> String {
    let mut html = String::with_capacity(1024 + rows.len() * columns.len() * 24);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str(
        "<style>\n\
         body { font-family: Helvetica, Arial, sans-serif; margin: 24px; }\n\
         h1 { font-size: 18px; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #999; padding: 6px 8px; font-size: 12px; text-align: left; }\n\
         th { background: #eee; }\n\
         @media print { body { margin: 0; } }\n\
         </style>\n</head>\n<body>\n",
    );

    html.push_str(&format!("<h1>{}</h1>\n<table>\n<thead>\n<tr>", escape(title)));
    for column in columns {
        html.push_str(&format!("<th>{}</th>", escape(&column.title)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in rows {
        html.push_str("<tr>");
        for column in columns {
            html.push_str(&format!("<td>{}</td>", escape(&column.render(row))));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_print_page_contains_headers_and_cells() {
        let rows = vec![json!({"nombre": "Laptop", "precio": 2500.0})];
        let columns = vec![
            ExportColumn::new("Nombre", "nombre"),
            ExportColumn::new("Precio", "precio"),
        ];

        let page = print_page(&rows, &columns, "Productos");
        assert!(page.contains("<title>Productos</title>"));
        assert!(page.contains("<th>Nombre</th>"));
        assert!(page.contains("<td>Laptop</td>"));
        assert!(page.contains("<td>2500.0</td>") || page.contains("<td>2500</td>"));
    }

    #[test]
    fn test_print_page_escapes_markup() {
        let rows = vec![json!({"nombre": "<script>alert(1)</script>"})];
        let columns = vec![ExportColumn::new("Nombre", "nombre")];

        let page = print_page(&rows, &columns, "A & B");
        assert!(!page.contains("<script>alert"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("A &amp; B"));
    }
}
