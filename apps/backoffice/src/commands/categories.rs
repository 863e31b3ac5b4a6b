//! Category commands.

use techstore_core::types::{Category, CreateCategory};

use crate::cli::CategoriesCmd;
use crate::context::App;
use crate::error::CliError;
use crate::tables::table;

pub async fn run(app: &App, action: CategoriesCmd) -> Result<(), CliError> {
    match action {
        CategoriesCmd::List => {
            let categories = app.queries.categories().await?;
            render(&categories);
        }
        CategoriesCmd::Create { nombre, descripcion } => {
            let payload = CreateCategory { nombre, descripcion };
            let created = app.queries.create_category(&payload).await?;
            println!("Created category {} ({})", created.id, created.nombre);
        }
        CategoriesCmd::Update {
            id,
            nombre,
            descripcion,
        } => {
            let payload = CreateCategory { nombre, descripcion };
            let updated = app.queries.update_category(id, &payload).await?;
            println!("Updated category {} ({})", updated.id, updated.nombre);
        }
        CategoriesCmd::Delete { id, yes } => {
            if !yes {
                let confirmed = inquire::Confirm::new(&format!("Delete category {}?", id))
                    .with_default(false)
                    .prompt()?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            app.queries.delete_category(id).await?;
            println!("Deleted category {}.", id);
        }
    }
    Ok(())
}

fn render(categories: &[Category]) {
    let mut t = table(&["Id", "Nombre", "Descripción", "Productos"]);
    for category in categories {
        t.add_row(vec![
            category.id.to_string(),
            category.nombre.clone(),
            category.descripcion.clone().unwrap_or_else(|| "-".to_string()),
            category
                .productos
                .as_ref()
                .map(|p| p.len().to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{t}");
}
