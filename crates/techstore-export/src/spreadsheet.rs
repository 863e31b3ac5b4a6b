//! XLSX export of tabular views.

use std::path::Path;

use serde_json::Value;
use tracing::debug;
use xlsxwriter::Workbook;

use crate::columns::ExportColumn;
use crate::error::{ExportError, ExportResult};

/// Writes rows to an XLSX file at `path`.
///
/// Headers land on row 0; each data cell is written as a number when
/// the field resolves to one (so spreadsheet formulas keep working) and
/// as text otherwise.
pub fn write_xlsx(rows: &[Value], columns: &[ExportColumn], path: &Path) -> ExportResult<()> {
    let path_str = path
        .to_str()
        .ok_or_else(|| ExportError::Spreadsheet("non-UTF8 output path".to_string()))?;

    let workbook = Workbook::new(path_str)?;
    let mut sheet = workbook.add_worksheet(None)?;

    for (col_idx, column) in columns.iter().enumerate() {
        sheet.write_string(0, col_idx as u16, &column.title, None)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, column) in columns.iter().enumerate() {
            let cell_row = (row_idx + 1) as u32;
            let cell_col = col_idx as u16;
            match column.numeric(row) {
                Some(number) => sheet.write_number(cell_row, cell_col, number, None)?,
                None => sheet.write_string(cell_row, cell_col, &column.render(row), None)?,
            }
        }
    }

    workbook.close()?;
    debug!(path = %path.display(), rows = rows.len(), "xlsx written");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_xlsx_produces_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("productos.xlsx");

        let rows = vec![
            json!({"codigo": "LAP-001", "nombre": "Laptop", "precio": 2500.0}),
            json!({"codigo": "MOU-002", "nombre": "Mouse", "precio": 49.9}),
        ];
        let columns = vec![
            ExportColumn::new("Código", "codigo"),
            ExportColumn::new("Nombre", "nombre"),
            ExportColumn::new("Precio", "precio"),
        ];

        write_xlsx(&rows, &columns, &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_write_xlsx_empty_rows_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        write_xlsx(&[], &[ExportColumn::new("Id", "id")], &path).unwrap();
        assert!(path.exists());
    }
}
