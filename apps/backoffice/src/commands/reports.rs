//! Server-computed report commands.

use crate::cli::ReportsCmd;
use crate::context::App;
use crate::error::CliError;
use crate::tables::{money, table};

pub async fn run(app: &App, action: ReportsCmd) -> Result<(), CliError> {
    let reports = app.queries.reports();

    match action {
        ReportsCmd::TopSelling => {
            let rows = reports.top_selling().await?;
            let mut t = table(&["Producto", "Nombre", "Unidades", "Ingresos"]);
            for row in &rows {
                t.add_row(vec![
                    row.producto_id.to_string(),
                    row.nombre.clone(),
                    row.unidades_vendidas.to_string(),
                    money(row.ingresos),
                ]);
            }
            println!("{t}");
        }
        ReportsCmd::LowStock { threshold } => {
            let rows = reports.low_stock(threshold).await?;
            let mut t = table(&["Producto", "Código", "Nombre", "Stock"]);
            for row in &rows {
                t.add_row(vec![
                    row.producto_id.to_string(),
                    row.codigo.clone(),
                    row.nombre.clone(),
                    row.stock.to_string(),
                ]);
            }
            println!("{t}");
        }
        ReportsCmd::IncomeByCategory => {
            let rows = reports.income_by_category().await?;
            let mut t = table(&["Categoría", "Nombre", "Ingresos"]);
            for row in &rows {
                t.add_row(vec![
                    row.categoria_id.to_string(),
                    row.categoria.clone(),
                    money(row.ingresos),
                ]);
            }
            println!("{t}");
        }
        ReportsCmd::PriceVariation => {
            let rows = reports.price_variation().await?;
            let mut t = table(&["Producto", "Nombre", "Precio anterior", "Precio actual"]);
            for row in &rows {
                t.add_row(vec![
                    row.producto_id.to_string(),
                    row.nombre.clone(),
                    money(row.precio_anterior),
                    money(row.precio_actual),
                ]);
            }
            println!("{t}");
        }
        ReportsCmd::WithoutCategory => {
            let rows = reports.products_without_category().await?;
            let mut t = table(&["Producto", "Código", "Nombre"]);
            for row in &rows {
                t.add_row(vec![
                    row.producto_id.to_string(),
                    row.codigo.clone(),
                    row.nombre.clone(),
                ]);
            }
            println!("{t}");
        }
    }
    Ok(())
}
