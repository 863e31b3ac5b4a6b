//! # TechStore Back-Office CLI
//!
//! Thin orchestration binary: parses the command line, builds the
//! shared context (session, cache store, query layer) and dispatches to
//! the command modules. All business logic lives in the workspace
//! crates.

mod cli;
mod commands;
mod context;
mod error;
mod tables;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::context::App;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise -v raises the level.
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    if let Err(err) = run(cli).await {
        error::report_failure(&err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let app = App::bootstrap()?;

    match cli.command {
        Command::Login { username, password } => commands::auth::login(&app, username, password).await,
        Command::Register { username, password, role } => {
            commands::auth::register(&app, &username, &password, role.as_deref()).await
        }
        Command::Logout => commands::auth::logout(&app),
        Command::Whoami => commands::auth::whoami(&app),
        Command::Theme { theme } => commands::auth::theme(&app, theme),
        Command::Products { action } => commands::products::run(&app, action).await,
        Command::Clients { action } => commands::clients::run(&app, action).await,
        Command::Categories { action } => commands::categories::run(&app, action).await,
        Command::Sales { action } => commands::sales::run(&app, action).await,
        Command::Dashboard { period } => commands::dashboard::run(&app, period.into()).await,
        Command::Reports { action } => commands::reports::run(&app, action).await,
        Command::Export { resource, format, output } => {
            commands::export::run(&app, resource, format, output).await
        }
    }
}
