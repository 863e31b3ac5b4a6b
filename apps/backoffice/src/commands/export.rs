//! Tabular export: any resource to XLSX, PDF or print HTML.

use std::path::PathBuf;

use serde_json::Value;

use techstore_core::documents::format_currency;
use techstore_export::columns::{rows_from, ExportColumn};
use techstore_export::{html, pdf, spreadsheet};

use crate::cli::{FormatArg, ResourceArg};
use crate::context::App;
use crate::error::CliError;

pub async fn run(
    app: &App,
    resource: ResourceArg,
    format: FormatArg,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let (rows, columns, title, stem) = gather(app, resource).await?;

    let extension = match format {
        FormatArg::Xlsx => "xlsx",
        FormatArg::Pdf => "pdf",
        FormatArg::Html => "html",
    };
    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.{}", stem, extension)));

    match format {
        FormatArg::Xlsx => spreadsheet::write_xlsx(&rows, &columns, &path)?,
        FormatArg::Pdf => {
            let bytes = pdf::write_table_pdf(&rows, &columns, title)?;
            std::fs::write(&path, bytes)?;
        }
        FormatArg::Html => {
            let page = html::print_page(&rows, &columns, title);
            std::fs::write(&path, page)?;
        }
    }

    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn currency_cell(value: &Value) -> String {
    format_currency(value.as_f64().unwrap_or(0.0))
}

async fn gather(
    app: &App,
    resource: ResourceArg,
) -> Result<(Vec<Value>, Vec<ExportColumn>, &'static str, &'static str), CliError> {
    match resource {
        ResourceArg::Products => {
            let items = app.queries.products().await?;
            let rows = rows_from(&items).map_err(techstore_export::ExportError::from)?;
            let columns = vec![
                ExportColumn::new("Código", "codigo"),
                ExportColumn::new("Nombre", "nombre"),
                ExportColumn::new("Marca", "marca"),
                ExportColumn::new("Modelo", "modelo"),
                ExportColumn::new("Precio", "precio").with_formatter(currency_cell),
                ExportColumn::new("Stock", "stock"),
            ];
            Ok((rows, columns, "Productos", "productos"))
        }
        ResourceArg::Clients => {
            let items = app.queries.clients().await?;
            let rows = rows_from(&items).map_err(techstore_export::ExportError::from)?;
            let columns = vec![
                ExportColumn::new("Nombre", "nombre"),
                ExportColumn::new("DNI/RUC", "dniRuc"),
                ExportColumn::new("Dirección", "direccion"),
                ExportColumn::new("Teléfono", "telefono"),
                ExportColumn::new("Email", "email"),
            ];
            Ok((rows, columns, "Clientes", "clientes"))
        }
        ResourceArg::Categories => {
            let items = app.queries.categories().await?;
            let rows = rows_from(&items).map_err(techstore_export::ExportError::from)?;
            let columns = vec![
                ExportColumn::new("Id", "id"),
                ExportColumn::new("Nombre", "nombre"),
                ExportColumn::new("Descripción", "descripcion"),
            ];
            Ok((rows, columns, "Categorías", "categorias"))
        }
        ResourceArg::Sales => {
            let items = app.queries.sales().await?;
            let rows = rows_from(&items).map_err(techstore_export::ExportError::from)?;
            let columns = vec![
                ExportColumn::new("Id", "id"),
                ExportColumn::new("Fecha", "fecha"),
                ExportColumn::new("Cliente", "clienteId"),
                ExportColumn::new("Método", "metodoPago"),
                ExportColumn::new("Total", "total").with_formatter(currency_cell),
            ];
            Ok((rows, columns, "Ventas", "ventas"))
        }
    }
}
