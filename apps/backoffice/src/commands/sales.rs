//! Sale capture, listing and document rendering.

use std::path::{Path, PathBuf};
use std::process::Command as Process;

use tracing::warn;

use techstore_core::documents::{document_number_for_sale, qr_payload};
use techstore_core::types::{CreateSale, CreateSaleDetail, Sale, SaleFilter};

use techstore_export::invoice::{invoice_filename, render_pdf};

use crate::cli::SalesCmd;
use crate::context::App;
use crate::error::CliError;
use crate::tables::{money, table};

pub async fn run(app: &App, action: SalesCmd) -> Result<(), CliError> {
    match action {
        SalesCmd::List { desde, hasta, cliente } => list(app, desde, hasta, cliente).await,
        SalesCmd::Show { id } => show(app, id).await,
        SalesCmd::Create {
            cliente,
            metodo_pago,
            lineas,
            tipo,
        } => create(app, cliente, metodo_pago, lineas, tipo).await,
        SalesCmd::Invoice {
            id,
            output,
            open,
            print,
        } => invoice(app, id, output, open, print).await,
    }
}

async fn list(
    app: &App,
    desde: Option<String>,
    hasta: Option<String>,
    cliente: Option<i64>,
) -> Result<(), CliError> {
    let filtered = desde.is_some() || hasta.is_some() || cliente.is_some();
    let sales: Vec<Sale> = if filtered {
        app.queries
            .sales_filtered(&SaleFilter {
                fecha_desde: desde,
                fecha_hasta: hasta,
                cliente_id: cliente,
            })
            .await?
    } else {
        app.queries.sales().await?.to_vec()
    };
    let clients = app.queries.clients().await?;

    let mut t = table(&["Id", "Fecha", "Cliente", "Método", "Documento", "Serie-Número", "Total"]);
    for sale in &sales {
        // Attach the client before deriving the document so the RUC
        // rule sees it.
        let mut resolved = sale.clone();
        if resolved.cliente.is_none() {
            resolved.cliente = clients.iter().find(|c| c.id == sale.cliente_id).cloned();
        }
        let invoice = document_number_for_sale(&resolved);

        let cliente = resolved
            .cliente
            .as_ref()
            .map(|c| c.nombre.clone())
            .unwrap_or_else(|| format!("#{}", sale.cliente_id));

        t.add_row(vec![
            sale.id.to_string(),
            sale.fecha.clone(),
            cliente,
            sale.metodo_pago.clone(),
            invoice.tipo_documento.label().to_string(),
            format!("{}-{}", invoice.serie, invoice.numero),
            money(sale.total),
        ]);
    }
    println!("{t}");
    println!("{} sales", sales.len());
    Ok(())
}

async fn show(app: &App, id: i64) -> Result<(), CliError> {
    let enriched = app.queries.enriched_sale(id).await?;
    let cliente = enriched.cliente.value();

    println!("{} {}-{}", enriched.invoice.tipo_documento.label(), enriched.invoice.serie, enriched.invoice.numero);
    println!("Fecha:   {}", enriched.sale.fecha);
    println!("Método:  {}", enriched.sale.metodo_pago);
    println!(
        "Cliente: {} (DNI/RUC {}){}",
        cliente.nombre,
        cliente.dni_ruc,
        if enriched.cliente.is_placeholder() { " [sin registro]" } else { "" }
    );

    let mut t = table(&["Cant.", "Descripción", "P. Unitario", "Subtotal"]);
    for line in &enriched.lineas {
        t.add_row(vec![
            line.detalle.cantidad.to_string(),
            format!(
                "{}{}",
                line.producto.value().nombre,
                if line.producto.is_placeholder() { " *" } else { "" }
            ),
            money(line.detalle.precio_unitario),
            money(line.subtotal),
        ]);
    }
    println!("{t}");

    println!("Op. gravada: {}", money(enriched.totals.subtotal));
    println!("I.G.V. 18%:  {}", money(enriched.totals.igv));
    println!("Total:       {}", money(enriched.totals.total));
    println!("QR: {}", qr_payload(&enriched.sale));
    Ok(())
}

async fn create(
    app: &App,
    cliente: i64,
    metodo_pago: String,
    lineas: Vec<String>,
    tipo: Option<crate::cli::TipoArg>,
) -> Result<(), CliError> {
    // Product snapshot for price defaults and the local stock check.
    let products = app.queries.products().await?;

    let mut detalles = Vec::with_capacity(lineas.len());
    for raw in &lineas {
        let (producto_id, cantidad, precio) = parse_line(raw)?;
        let precio_unitario = match precio {
            Some(precio) => precio,
            None => products
                .iter()
                .find(|p| p.id == producto_id)
                .map(|p| p.precio)
                .ok_or_else(|| {
                    CliError::Input(format!(
                        "product {} not found locally; pass an explicit price as producto:cantidad:precio",
                        producto_id
                    ))
                })?,
        };
        detalles.push(CreateSaleDetail {
            producto_id,
            cantidad,
            precio_unitario,
        });
    }

    let payload = CreateSale {
        cliente_id: cliente,
        metodo_pago,
        detalles,
        tipo_documento: tipo.map(Into::into),
    };

    let created = app.queries.create_sale(&payload).await?;
    let enriched = app.queries.enriched_sale(created.id).await?;
    println!(
        "Captured sale {} → {} {}-{} ({})",
        created.id,
        enriched.invoice.tipo_documento.label(),
        enriched.invoice.serie,
        enriched.invoice.numero,
        money(enriched.totals.total),
    );
    Ok(())
}

/// Parses `producto:cantidad[:precio]`.
fn parse_line(raw: &str) -> Result<(i64, i64, Option<f64>), CliError> {
    let parts: Vec<&str> = raw.split(':').collect();
    let err = || CliError::Input(format!("invalid line item '{}', expected producto:cantidad[:precio]", raw));

    match parts.as_slice() {
        [producto, cantidad] => Ok((
            producto.parse().map_err(|_| err())?,
            cantidad.parse().map_err(|_| err())?,
            None,
        )),
        [producto, cantidad, precio] => Ok((
            producto.parse().map_err(|_| err())?,
            cantidad.parse().map_err(|_| err())?,
            Some(precio.parse().map_err(|_| err())?),
        )),
        _ => Err(err()),
    }
}

async fn invoice(
    app: &App,
    id: i64,
    output: Option<PathBuf>,
    open: bool,
    print: bool,
) -> Result<(), CliError> {
    let enriched = app.queries.enriched_sale(id).await?;
    let bytes = render_pdf(&enriched)?;

    let path = output.unwrap_or_else(|| PathBuf::from(invoice_filename(&enriched)));
    std::fs::write(&path, &bytes)?;
    println!("Wrote {}", path.display());

    if open {
        open_file(&path)?;
    }
    if print {
        print_file(&path);
    }
    Ok(())
}

/// Hands the file to the platform viewer.
fn open_file(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(all(unix, not(target_os = "macos")))]
    let opener = "xdg-open";

    Process::new(opener).arg(path).spawn().map(|_| ())
}

/// Sends the file to the print spooler; a missing spooler only warns.
fn print_file(path: &Path) {
    match Process::new("lp").arg(path).status() {
        Ok(status) if status.success() => println!("Sent to printer."),
        Ok(status) => warn!(%status, "print spooler returned an error"),
        Err(err) => warn!(%err, "could not invoke the print spooler"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("3:2").unwrap(), (3, 2, None));
        assert_eq!(parse_line("3:2:99.5").unwrap(), (3, 2, Some(99.5)));

        assert!(parse_line("3").is_err());
        assert!(parse_line("a:b").is_err());
        assert!(parse_line("1:2:3:4").is_err());
    }
}
