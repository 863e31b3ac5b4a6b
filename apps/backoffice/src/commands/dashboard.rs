//! Sales dashboard: trend buckets and deltas.

use techstore_core::trends::{latest_delta, Period};

use crate::context::App;
use crate::error::CliError;
use crate::tables::{money, percent, table};

pub async fn run(app: &App, period: Period) -> Result<(), CliError> {
    let buckets = app.queries.dashboard(period).await?;

    let mut t = table(&["Período", "Ventas", "Ingresos", "Productos", "Clientes"]);
    for bucket in &buckets {
        t.add_row(vec![
            bucket.label.clone(),
            bucket.sales_count.to_string(),
            money(bucket.revenue),
            bucket.distinct_products.to_string(),
            bucket.distinct_clients.to_string(),
        ]);
    }
    println!("{t}");

    // Trend between the two most recent buckets.
    let revenue_delta = latest_delta(&buckets, |b| b.revenue);
    let sales_delta = latest_delta(&buckets, |b| b.sales_count as f64);
    println!(
        "Trend vs previous {}: revenue {}, sales {}",
        period,
        percent(revenue_delta),
        percent(sales_delta),
    );
    Ok(())
}
