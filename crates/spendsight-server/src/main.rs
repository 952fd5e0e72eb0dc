//! Spendsight server binary

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spendsight_core::store::ExpenseStore;
use spendsight_server::{serve, ServerConfig};

#[derive(Parser)]
#[command(name = "spendsight")]
#[command(about = "Personal finance analytics server", long_about = None)]
struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Path to the store file (defaults to the platform data directory)
    #[arg(long)]
    data_file: Option<std::path::PathBuf>,

    /// Keep all data in memory, never touching the filesystem
    #[arg(long)]
    in_memory: bool,

    /// Seed a few sample expenses into an empty store
    #[arg(long)]
    demo: bool,

    /// Allowed CORS origin (repeatable)
    #[arg(long = "allowed-origin")]
    allowed_origins: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let store = if cli.in_memory {
        ExpenseStore::in_memory()
    } else {
        let path = match cli.data_file {
            Some(path) => path,
            None => ExpenseStore::default_path()?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        ExpenseStore::open(path)?
    };

    if cli.demo {
        let added = store.seed_demo_data()?;
        if added > 0 {
            tracing::info!(count = added, "Seeded demo expenses");
        }
    }

    let config = ServerConfig {
        allowed_origins: cli.allowed_origins,
    };

    serve(store, &cli.host, cli.port, config).await
}
