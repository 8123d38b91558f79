use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::serve;
use chemsure_chemical_database::ChemicalService;
use chemsure_document_processing::MsdsScanner;
use chemsure_utils::{init_logging, AppConfig};
use tokio::net::TcpListener;
use tracing::{error, info};

mod handlers;
mod metrics;
mod middleware;
mod routes;

use metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub chemicals: ChemicalService,
    pub scanner: Arc<MsdsScanner>,
    pub metrics: Metrics,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, chemicals: ChemicalService, scanner: MsdsScanner) -> Result<Self> {
        Ok(Self {
            chemicals,
            scanner: Arc::new(scanner),
            metrics: Metrics::new().context("failed to register metrics")?,
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting ChemSure API Gateway");

    let chemicals = ChemicalService::from_config(&config.reference);
    info!(path = %config.reference.path, "Loading GADSL reference data");
    if let Err(e) = chemicals.load() {
        if config.reference.require_on_startup {
            return Err(e).context("GADSL reference data is required at startup");
        }
        error!(error = %e, "Failed to load GADSL data at startup, lookups will return 503");
    }

    let scanner = MsdsScanner::from_config(&config.scanner);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server host/port")?;

    let app = routes::create_app(AppState::new(config, chemicals, scanner)?);

    let listener = TcpListener::bind(&addr).await?;
    info!("API Gateway listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
