//! Stackboard - browse the Stackboard Market catalog from the terminal.
//!
//! Sign in once with `stackboard login`; the session is kept on disk and
//! sent with every catalog request until the API rejects it.

mod commands;
mod navigator;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stackboard_core::api::CatalogClient;
use stackboard_core::auth::{FileStore, SessionStore};
use stackboard_core::config::Config;

use commands::Outcome;
use navigator::CliNavigator;

/// Stackboard Market catalog browser
#[derive(Parser, Debug)]
#[command(name = "stackboard")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session
    Login {
        /// Username (defaults to the last one used)
        #[arg(short, long)]
        username: Option<String>,

        /// Remember the password in the OS keychain
        #[arg(long)]
        remember: bool,
    },

    /// End the session
    Logout {
        /// Also forget the remembered password
        #[arg(long)]
        forget: bool,
    },

    /// Show who is signed in
    Status,

    /// Product categories and the product listing together
    Browse,

    /// List product categories
    Categories,

    /// List products
    Products {
        /// Only products in this category (slug, e.g. `smartphones`)
        #[arg(short, long)]
        category: Option<String>,

        /// Show at most this many products
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one product with its reviews
    Product {
        /// Product id
        id: i64,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load()?;

    let session = Arc::new(SessionStore::new(FileStore::new(config.data_dir()?)));
    let navigator = Arc::new(CliNavigator::new());
    let catalog = CatalogClient::from_config(&config, session, navigator)?;
    info!(base_url = catalog.base_url(), "Stackboard starting");

    let outcome = match cli.command {
        Commands::Login { username, remember } => {
            commands::login(&catalog, &mut config, username, remember).await?
        }
        Commands::Logout { forget } => commands::logout(&catalog, &config, forget)?,
        Commands::Status => commands::status(&catalog),
        Commands::Browse => commands::browse(&catalog).await?,
        Commands::Categories => commands::categories(&catalog).await?,
        Commands::Products { category, limit } => {
            commands::products(&catalog, category.as_deref(), limit).await?
        }
        Commands::Product { id } => commands::product(&catalog, id).await?,
    };

    match outcome {
        Outcome::Done => Ok(ExitCode::SUCCESS),
        Outcome::AuthRequired => Ok(ExitCode::from(2)),
    }
}
