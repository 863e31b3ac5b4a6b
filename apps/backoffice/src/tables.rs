//! Table rendering helpers.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use techstore_core::documents::format_currency;

/// New table with bold headers and dynamic column widths.
pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

/// Currency cell text.
pub fn money(amount: f64) -> String {
    format_currency(amount)
}

/// Signed percentage cell text for trend deltas.
pub fn percent(delta: f64) -> String {
    format!("{}{:.1}%", if delta >= 0.0 { "+" } else { "" }, delta)
}
