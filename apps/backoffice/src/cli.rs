//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use techstore_core::trends::Period;
use techstore_core::types::DocumentType;
use techstore_api::session::Theme;

#[derive(Debug, Parser)]
#[command(name = "backoffice", version, about = "TechStore retail back-office client")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and persist the session token
    Login {
        #[arg(short, long)]
        username: Option<String>,
        /// Password (prompted interactively when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Register a new user account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// Account role (defaults to User)
        #[arg(long)]
        role: Option<String>,
    },
    /// Drop the persisted session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show or set the theme preference
    Theme {
        #[arg(value_enum)]
        theme: Option<ThemeArg>,
    },
    /// Product catalog
    Products {
        #[command(subcommand)]
        action: ProductsCmd,
    },
    /// Client records
    Clients {
        #[command(subcommand)]
        action: ClientsCmd,
    },
    /// Product categories
    Categories {
        #[command(subcommand)]
        action: CategoriesCmd,
    },
    /// Sales capture and documents
    Sales {
        #[command(subcommand)]
        action: SalesCmd,
    },
    /// Sales dashboard with trend buckets
    Dashboard {
        #[arg(short, long, value_enum, default_value = "day")]
        period: PeriodArg,
    },
    /// Server-computed reports
    Reports {
        #[command(subcommand)]
        action: ReportsCmd,
    },
    /// Export a tabular view to a file
    Export {
        #[arg(value_enum)]
        resource: ResourceArg,
        #[arg(short, long, value_enum)]
        format: FormatArg,
        /// Output path (defaults to <resource>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductsCmd {
    /// List the catalog
    List,
    /// Full-text search
    Search { term: String },
    /// Server-side filter
    Filter {
        #[arg(long)]
        categoria: Option<i64>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        term: Option<String>,
    },
    /// Create a product
    Create {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        marca: String,
        #[arg(long)]
        modelo: String,
        #[arg(long, default_value = "")]
        descripcion: String,
        #[arg(long)]
        precio: f64,
        #[arg(long)]
        stock: i64,
        #[arg(long)]
        codigo: String,
        #[arg(long)]
        categoria: Option<i64>,
    },
    /// Update fields of a product
    Update {
        id: i64,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        marca: Option<String>,
        #[arg(long)]
        modelo: Option<String>,
        #[arg(long)]
        descripcion: Option<String>,
        #[arg(long)]
        precio: Option<f64>,
        #[arg(long)]
        stock: Option<i64>,
        #[arg(long)]
        categoria: Option<i64>,
    },
    /// Delete a product
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Set the stock level
    Stock { id: i64, stock: i64 },
}

#[derive(Debug, Subcommand)]
pub enum ClientsCmd {
    List,
    Create {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        dni_ruc: String,
        #[arg(long, default_value = "")]
        direccion: String,
        #[arg(long, default_value = "")]
        telefono: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        dni_ruc: String,
        #[arg(long, default_value = "")]
        direccion: String,
        #[arg(long, default_value = "")]
        telefono: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCmd {
    List,
    Create {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        descripcion: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        descripcion: Option<String>,
    },
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SalesCmd {
    /// List sales, optionally filtered
    List {
        #[arg(long)]
        desde: Option<String>,
        #[arg(long)]
        hasta: Option<String>,
        #[arg(long)]
        cliente: Option<i64>,
    },
    /// Show one sale with document metadata and totals
    Show { id: i64 },
    /// Capture a sale
    Create {
        #[arg(long)]
        cliente: i64,
        #[arg(long, default_value = "efectivo")]
        metodo_pago: String,
        /// Line item as producto:cantidad[:precio]; repeatable
        #[arg(long = "linea", required = true)]
        lineas: Vec<String>,
        /// Document type (defaults to the session preference)
        #[arg(long, value_enum)]
        tipo: Option<TipoArg>,
    },
    /// Render the invoice/receipt PDF
    Invoice {
        id: i64,
        /// Output path (defaults to <serie>-<numero>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Open the rendered file with the system viewer
        #[arg(long)]
        open: bool,
        /// Send the rendered file to the print spooler
        #[arg(long)]
        print: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReportsCmd {
    /// Best sellers
    TopSelling,
    /// Products at or under a stock threshold
    LowStock {
        #[arg(long)]
        threshold: Option<i64>,
    },
    /// Revenue grouped by category
    IncomeByCategory,
    /// Recent price changes
    PriceVariation,
    /// Products missing a category
    WithoutCategory,
}

// =============================================================================
// Value enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Day,
    Week,
    Month,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Day => Period::Day,
            PeriodArg::Week => Period::Week,
            PeriodArg::Month => Period::Month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TipoArg {
    Boleta,
    Factura,
}

impl From<TipoArg> for DocumentType {
    fn from(arg: TipoArg) -> Self {
        match arg {
            TipoArg::Boleta => DocumentType::Boleta,
            TipoArg::Factura => DocumentType::Factura,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceArg {
    Products,
    Clients,
    Categories,
    Sales,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Pdf,
    Html,
}
