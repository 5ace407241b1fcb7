//! REST API handlers for offer management and the analytics dashboard.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use marketpulse_analytics::{
    AnalyticsEngine, ChartEntry, MarketplaceAnalytics, OfferAnalytics, PerformanceAlert,
    ProductAnalytics, RankKey, SummaryMetrics, TableRow, TrendPoint, TypeCount,
};
use marketpulse_core::offer::Offer;
use marketpulse_management::{CreateOfferRequest, OfferStore, UpdateOfferRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Maximum offer name length accepted at the boundary.
const MAX_NAME_LEN: usize = 256;

/// Detail-table rows returned by the ranking endpoint.
const TABLE_RANKING_LEN: usize = 10;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<OfferStore>,
    pub engine: Arc<AnalyticsEngine>,
    pub node_id: String,
    pub start_time: Instant,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "invalid_request".to_string(),
            message: message.to_string(),
        }),
    )
}

// ─── Offer CRUD ─────────────────────────────────────────────────────────────

fn validate_create(req: &CreateOfferRequest) -> Result<(), &'static str> {
    if req.name.trim().is_empty() {
        return Err("offer 'name' must not be empty");
    }
    if req.name.len() > MAX_NAME_LEN {
        return Err("offer 'name' exceeds maximum length");
    }
    if req.start_date >= req.end_date {
        return Err("offer 'start_date' must precede 'end_date'");
    }
    Ok(())
}

pub async fn list_offers(State(state): State<AppState>) -> Json<Vec<Offer>> {
    Json(state.store.list_offers())
}

pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Offer>, StatusCode> {
    state.store.get_offer(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn create_offer(
    State(state): State<AppState>,
    Json(req): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<Offer>), (StatusCode, Json<ErrorResponse>)> {
    if let Err(msg) = validate_create(&req) {
        warn!(error = msg, "Offer create validation failed");
        metrics::counter!("api.validation_errors").increment(1);
        return Err(bad_request(msg));
    }
    let offer = state.store.create_offer(req);
    metrics::counter!("api.offers.created").increment(1);
    Ok((StatusCode::CREATED, Json(offer)))
}

pub async fn update_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOfferRequest>,
) -> Result<Json<Offer>, StatusCode> {
    if let Some(name) = &req.name {
        if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
            return Err(StatusCode::BAD_REQUEST);
        }
    }
    metrics::counter!("api.offers.updated").increment(1);
    state.store.update_offer(&id, req).map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn delete_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    if state.store.delete_offer(&id) {
        metrics::counter!("api.offers.deleted").increment(1);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// ─── Analytics ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// Comma-separated marketplace ids; absent means no filter.
    pub marketplaces: Option<String>,
    pub sort_by: Option<RankKey>,
}

impl AnalyticsQuery {
    fn filter(&self) -> Vec<String> {
        self.marketplaces
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| s.trim().to_string())
            .collect()
    }
}

pub async fn offer_analytics(State(state): State<AppState>) -> Json<Vec<OfferAnalytics>> {
    let offers = state.store.list_offers();
    metrics::counter!("api.analytics.computed").increment(1);
    Json(state.engine.offer_analytics(&offers, Utc::now()))
}

pub async fn analytics_summary(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Json<SummaryMetrics> {
    let offers = state.store.list_offers();
    let now = Utc::now();
    let analytics = state.engine.offer_analytics(&offers, now);
    let filter = query.filter();
    Json(state.engine.summary(&offers, &analytics, &filter, now))
}

pub async fn analytics_alerts(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Json<Vec<PerformanceAlert>> {
    let offers = state.store.list_offers();
    let now = Utc::now();
    let analytics = state.engine.offer_analytics(&offers, now);
    let filter = query.filter();
    let summary = state.engine.summary(&offers, &analytics, &filter, now);
    let alerts = state.engine.alerts(&offers, &analytics, &summary, &filter, now);
    metrics::counter!("api.alerts.computed").increment(alerts.len() as u64);
    Json(alerts)
}

#[derive(Serialize)]
pub struct RankingResponse {
    pub chart: Vec<ChartEntry>,
    pub table: Vec<TableRow>,
}

pub async fn analytics_ranking(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Json<RankingResponse> {
    let offers = state.store.list_offers();
    let now = Utc::now();
    let analytics = state.engine.offer_analytics(&offers, now);
    let filter = query.filter();
    let key = query.sort_by.unwrap_or_default();

    let chart = state.engine.chart_ranking(&offers, &analytics, &filter, key, now);
    let mut table = state.engine.table_ranking(&offers, &analytics, &filter, key, now);
    table.truncate(TABLE_RANKING_LEN);

    Json(RankingResponse { chart, table })
}

pub async fn analytics_distribution(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Json<Vec<TypeCount>> {
    let offers = state.store.list_offers();
    Json(state.engine.type_distribution(&offers, &query.filter()))
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<usize>,
}

pub async fn analytics_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Json<Vec<TrendPoint>> {
    Json(state.engine.revenue_trend(query.days.unwrap_or(14), Utc::now()))
}

// ─── Rollups ────────────────────────────────────────────────────────────────

/// Locate an offer and its stable list index; rollup streams are seeded by
/// position in the snapshot.
fn offer_with_index(store: &OfferStore, id: &str) -> Option<(usize, Offer)> {
    let offers = store.list_offers();
    offers
        .iter()
        .position(|o| o.id == id)
        .map(|i| (i, offers[i].clone()))
}

pub async fn marketplace_rollup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MarketplaceAnalytics>>, StatusCode> {
    let (index, offer) =
        offer_with_index(&state.store, &id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(state.engine.marketplace_rollup(&offer, index)))
}

pub async fn product_rollup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductAnalytics>>, StatusCode> {
    let (index, offer) =
        offer_with_index(&state.store, &id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(state.engine.product_rollup(&offer, index)))
}

// ─── Operational ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub offers: usize,
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        offers: state.store.len(),
    })
}

/// GET /ready — Readiness probe for Kubernetes.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe for Kubernetes.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
