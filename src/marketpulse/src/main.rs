//! MarketPulse — marketplace-listing admin backend with offer performance
//! analytics and alerting.
//!
//! Main entry point that wires the offer store, the analytics engine, and
//! the REST server together.

use clap::Parser;
use marketpulse_analytics::AnalyticsEngine;
use marketpulse_api::ApiServer;
use marketpulse_core::catalog::{MarketplaceCatalog, OfferTypeLabels, Product, ProductCatalog};
use marketpulse_core::config::AppConfig;
use marketpulse_management::OfferStore;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "marketpulse")]
#[command(about = "Marketplace offer analytics and alerting backend")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "MARKETPULSE__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "MARKETPULSE__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "MARKETPULSE__METRICS__PORT")]
    metrics_port: Option<u16>,
}

/// Demo product catalog matching the seeded offers' linked products.
fn demo_products() -> ProductCatalog {
    let entries = [
        ("prod-101", "Wireless Earbuds Pro", "WEP-220"),
        ("prod-102", "USB-C Charging Dock", "UCD-310"),
        ("prod-103", "Adjustable Laptop Stand", "ALS-415"),
        ("prod-104", "Ceramic Pour-Over Set", "CPS-118"),
        ("prod-105", "Insulated Travel Mug", "ITM-509"),
        ("prod-106", "Cast Iron Skillet 12in", "CIS-712"),
        ("prod-107", "Bamboo Cutting Board", "BCB-204"),
        ("prod-108", "Chef Knife 8in", "CKN-801"),
    ];
    ProductCatalog::from_products(
        entries
            .iter()
            .map(|(id, name, sku)| Product {
                id: (*id).to_string(),
                name: (*name).to_string(),
                sku: (*sku).to_string(),
                image_url: None,
            })
            .collect(),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketpulse=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("MarketPulse starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        "Configuration loaded"
    );

    // Fixed catalogs injected into the engine
    let marketplaces = MarketplaceCatalog::reference()
        .with_default_filter_len(config.engine.default_filter_marketplaces);
    let engine = Arc::new(AnalyticsEngine::new(
        marketplaces,
        demo_products(),
        OfferTypeLabels::default(),
        &config.engine,
    ));

    // Seeded in-memory offer store
    let store = Arc::new(OfferStore::new());

    let api_server = ApiServer::new(config.clone(), store, engine);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("MarketPulse is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
