//! Product catalog commands.

use techstore_core::types::{Category, CreateProduct, Product, ProductFilter, UpdateProduct};

use crate::cli::ProductsCmd;
use crate::context::App;
use crate::error::CliError;
use crate::tables::{money, table};

pub async fn run(app: &App, action: ProductsCmd) -> Result<(), CliError> {
    match action {
        ProductsCmd::List => {
            let products = app.queries.products().await?;
            let categories = app.queries.categories().await?;
            render(&products, &categories);
        }
        ProductsCmd::Search { term } => {
            let products = app.queries.search_products(&term).await?;
            let categories = app.queries.categories().await?;
            render(&products, &categories);
        }
        ProductsCmd::Filter {
            categoria,
            min_price,
            max_price,
            term,
        } => {
            let filter = ProductFilter {
                categoria_id: categoria,
                min_price,
                max_price,
                search_term: term,
            };
            let products = app.queries.filter_products(&filter).await?;
            let categories = app.queries.categories().await?;
            render(&products, &categories);
        }
        ProductsCmd::Create {
            nombre,
            marca,
            modelo,
            descripcion,
            precio,
            stock,
            codigo,
            categoria,
        } => {
            let payload = CreateProduct {
                categoria_id: categoria,
                nombre,
                marca,
                modelo,
                descripcion,
                precio,
                stock,
                codigo,
            };
            let created = app.queries.create_product(&payload).await?;
            println!("Created product {} ({})", created.id, created.codigo);
        }
        ProductsCmd::Update {
            id,
            nombre,
            marca,
            modelo,
            descripcion,
            precio,
            stock,
            categoria,
        } => {
            let payload = UpdateProduct {
                id,
                categoria_id: categoria,
                nombre,
                marca,
                modelo,
                descripcion,
                precio,
                stock,
            };
            let updated = app.queries.update_product(id, &payload).await?;
            println!("Updated product {} ({})", updated.id, updated.codigo);
        }
        ProductsCmd::Delete { id, yes } => {
            if !yes {
                let confirmed = inquire::Confirm::new(&format!("Delete product {}?", id))
                    .with_default(false)
                    .prompt()?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            app.queries.delete_product(id).await?;
            println!("Deleted product {}.", id);
        }
        ProductsCmd::Stock { id, stock } => {
            let updated = app.queries.update_stock(id, stock).await?;
            println!("{}: stock {}", updated.codigo, updated.stock);
        }
    }
    Ok(())
}

fn render(products: &[Product], categories: &[Category]) {
    let mut t = table(&["Id", "Código", "Nombre", "Marca", "Modelo", "Categoría", "Precio", "Stock"]);
    for product in products {
        let categoria = product
            .categoria
            .as_ref()
            .map(|c| c.nombre.clone())
            .or_else(|| {
                product.categoria_id.and_then(|id| {
                    categories.iter().find(|c| c.id == id).map(|c| c.nombre.clone())
                })
            })
            .unwrap_or_else(|| "-".to_string());

        t.add_row(vec![
            product.id.to_string(),
            product.codigo.clone(),
            product.nombre.clone(),
            product.marca.clone(),
            product.modelo.clone(),
            categoria,
            money(product.precio),
            product.stock.to_string(),
        ]);
    }
    println!("{t}");
    println!("{} products", products.len());
}
