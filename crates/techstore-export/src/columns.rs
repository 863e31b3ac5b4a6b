//! # Column Definitions
//!
//! Tabular views are described once as a list of columns - a title, a
//! dotted field path into the row, and an optional custom formatter -
//! then rendered to XLSX, PDF or print HTML without the callers knowing
//! anything about the output format.
//!
//! Rows travel as `serde_json::Value` so one export path serves every
//! record type. A missing nested field renders as an empty cell, never
//! an error: exports complete with partial data.

use serde::Serialize;
use serde_json::Value;

/// Custom cell formatter: receives the resolved value, returns cell
/// text. Plain function pointer so column sets stay `'static` and
/// cloneable.
pub type Formatter = fn(&Value) -> String;

/// One column of a tabular view.
#[derive(Debug, Clone)]
pub struct ExportColumn {
    /// Header text.
    pub title: String,
    /// Dotted path into the row (`"cliente.nombre"`).
    pub field: String,
    /// Optional custom formatter; defaults to plain rendering.
    pub formatter: Option<Formatter>,
}

impl ExportColumn {
    pub fn new(title: impl Into<String>, field: impl Into<String>) -> Self {
        ExportColumn {
            title: title.into(),
            field: field.into(),
            formatter: None,
        }
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Cell text for a row. Missing fields become empty cells.
    pub fn render(&self, row: &Value) -> String {
        let value = lookup_path(row, &self.field);
        match (value, self.formatter) {
            (Some(value), Some(format)) => format(value),
            (Some(value), None) => plain(value),
            (None, _) => String::new(),
        }
    }

    /// Numeric cell value, when the field resolves to a plain number
    /// and no custom formatter overrides it.
    pub fn numeric(&self, row: &Value) -> Option<f64> {
        if self.formatter.is_some() {
            return None;
        }
        lookup_path(row, &self.field)?.as_f64()
    }
}

/// Resolves a dotted path against a JSON row.
pub fn lookup_path<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = row;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Plain rendering: strings verbatim, numbers/bools via Display,
/// null/containers empty.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Serializes typed records into the JSON row model.
pub fn rows_from<T: Serialize>(items: &[T]) -> Result<Vec<Value>, serde_json::Error> {
    items.iter().map(serde_json::to_value).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> Value {
        json!({
            "id": 42,
            "total": 236.5,
            "cliente": { "nombre": "María", "dniRuc": "45678912" },
        })
    }

    #[test]
    fn test_top_level_and_nested_paths() {
        assert_eq!(ExportColumn::new("Id", "id").render(&row()), "42");
        assert_eq!(
            ExportColumn::new("Cliente", "cliente.nombre").render(&row()),
            "María"
        );
    }

    #[test]
    fn test_missing_fields_render_empty() {
        assert_eq!(ExportColumn::new("X", "nope").render(&row()), "");
        assert_eq!(ExportColumn::new("X", "cliente.nope.deeper").render(&row()), "");
    }

    #[test]
    fn test_custom_formatter() {
        let col = ExportColumn::new("Total", "total")
            .with_formatter(|v| format!("S/ {:.2}", v.as_f64().unwrap_or(0.0)));
        assert_eq!(col.render(&row()), "S/ 236.50");
    }

    #[test]
    fn test_numeric_extraction() {
        assert_eq!(ExportColumn::new("Total", "total").numeric(&row()), Some(236.5));
        assert_eq!(ExportColumn::new("C", "cliente.nombre").numeric(&row()), None);

        let formatted = ExportColumn::new("Total", "total").with_formatter(|_| "x".to_string());
        assert_eq!(formatted.numeric(&row()), None);
    }

    #[test]
    fn test_rows_from_typed_records() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Rec {
            id: i64,
            some_name: String,
        }

        let rows = rows_from(&[Rec {
            id: 1,
            some_name: "a".to_string(),
        }])
        .unwrap();
        assert_eq!(rows[0]["someName"], "a");
    }
}
