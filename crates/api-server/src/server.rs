//! API server — assembles the REST router and the metrics exporter.

use crate::rest::{self, AppState};
use axum::routing::get;
use axum::Router;
use marketpulse_analytics::AnalyticsEngine;
use marketpulse_core::config::AppConfig;
use marketpulse_management::OfferStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    store: Arc<OfferStore>,
    engine: Arc<AnalyticsEngine>,
}

impl ApiServer {
    pub fn new(config: AppConfig, store: Arc<OfferStore>, engine: Arc<AnalyticsEngine>) -> Self {
        Self {
            config,
            store,
            engine,
        }
    }

    /// Start the HTTP REST server. Blocks until shutdown.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let state = AppState {
            store: self.store.clone(),
            engine: self.engine.clone(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
        };

        let app = Router::new()
            // Offer CRUD
            .route("/v1/offers", get(rest::list_offers).post(rest::create_offer))
            .route(
                "/v1/offers/:id",
                get(rest::get_offer)
                    .put(rest::update_offer)
                    .delete(rest::delete_offer),
            )
            // Rollups
            .route("/v1/offers/:id/marketplaces", get(rest::marketplace_rollup))
            .route("/v1/offers/:id/products", get(rest::product_rollup))
            // Analytics dashboard
            .route("/v1/analytics/offers", get(rest::offer_analytics))
            .route("/v1/analytics/summary", get(rest::analytics_summary))
            .route("/v1/analytics/alerts", get(rest::analytics_alerts))
            .route("/v1/analytics/ranking", get(rest::analytics_ranking))
            .route("/v1/analytics/distribution", get(rest::analytics_distribution))
            .route("/v1/analytics/trend", get(rest::analytics_trend))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
