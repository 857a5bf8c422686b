use anyhow::{Context, Result};
use car_search::catalog::{CatalogSource, InMemoryCatalog};
use car_search::config::Config;
use car_search::web::{self, AppState, PageSettings};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Car listing search page: make/model/price filters over a listings catalog.
#[derive(Parser, Debug)]
#[command(name = "car-search", version)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON file with listings (built-in sample data when omitted)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Stack the form fields in a single column
    #[arg(long)]
    single_column: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.data.is_some() {
            config.server.data = self.data;
        }
        if self.single_column {
            config.search.single_column = true;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("car_search=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    let config = Cli::parse().into_config()?;

    let catalog = match &config.server.data {
        Some(path) => InMemoryCatalog::from_file(path).await?,
        None => {
            info!("No listings file configured, using built-in sample data");
            InMemoryCatalog::sample()
        }
    };
    info!(listings = catalog.len(), source = catalog.source_name(), "Catalog ready");

    let state = Arc::new(AppState {
        catalog: Arc::new(catalog),
        settings: PageSettings::from(&config.search),
    });

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.addr()))?;

    web::serve(listener, state).await
}
