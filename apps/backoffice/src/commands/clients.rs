//! Client record commands.

use techstore_core::types::{Client, CreateClient};

use crate::cli::ClientsCmd;
use crate::context::App;
use crate::error::CliError;
use crate::tables::table;

pub async fn run(app: &App, action: ClientsCmd) -> Result<(), CliError> {
    match action {
        ClientsCmd::List => {
            let clients = app.queries.clients().await?;
            render(&clients);
        }
        ClientsCmd::Create {
            nombre,
            dni_ruc,
            direccion,
            telefono,
            email,
        } => {
            let payload = CreateClient {
                nombre,
                dni_ruc,
                direccion,
                telefono,
                email,
            };
            let created = app.queries.create_client(&payload).await?;
            println!("Created client {} ({})", created.id, created.nombre);
        }
        ClientsCmd::Update {
            id,
            nombre,
            dni_ruc,
            direccion,
            telefono,
            email,
        } => {
            let payload = CreateClient {
                nombre,
                dni_ruc,
                direccion,
                telefono,
                email,
            };
            let updated = app.queries.update_client(id, &payload).await?;
            println!("Updated client {} ({})", updated.id, updated.nombre);
        }
        ClientsCmd::Delete { id, yes } => {
            if !yes {
                let confirmed = inquire::Confirm::new(&format!("Delete client {}?", id))
                    .with_default(false)
                    .prompt()?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            app.queries.delete_client(id).await?;
            println!("Deleted client {}.", id);
        }
    }
    Ok(())
}

fn render(clients: &[Client]) {
    let mut t = table(&["Id", "Nombre", "DNI/RUC", "Tipo", "Dirección", "Teléfono", "Email"]);
    for client in clients {
        t.add_row(vec![
            client.id.to_string(),
            client.nombre.clone(),
            client.dni_ruc.clone(),
            // The 8/11-digit distinction drives invoice-type inference.
            if client.has_ruc() { "Empresa" } else { "Persona" }.to_string(),
            client.direccion.clone(),
            client.telefono.clone(),
            client.email.clone(),
        ]);
    }
    println!("{t}");
    println!("{} clients", clients.len());
}
