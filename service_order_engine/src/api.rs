//! HTTP API for the Service Order Engine.
//!
//! This module exposes the pricing engine and the order desk over a
//! small REST API built with the [`axum`](https://crates.io/crates/axum)
//! framework.  Clients can price raw job parameters, price a batch of
//! jobs, list the fee schedules and create service orders from the
//! order form.

use crate::config::Settings;
use crate::engine::{compute_job_pricing, price_batch};
use crate::error::OrderError;
use crate::fees::{fee_schedule_registry, FeeSchedule};
use crate::models::{JobPricingInput, JobPricingResult, PricingSummary};
use crate::notify::{Notifier, TracingNotifier};
use crate::order::{check_pricing_input, OrderDesk, ServiceOrder, ServiceOrderDraft};
use anyhow::{bail, Result};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Application state shared across requests.
pub struct AppState {
    pub desk: OrderDesk,
}

/// Response body of `POST /api/pricing`.
#[derive(Debug, Serialize)]
pub struct PricingResponse {
    #[serde(flatten)]
    pub pricing: JobPricingResult,
    pub summary: PricingSummary,
}

/// Build the API router, loading fee schedules from the configured
/// directory.  Fails if the configured default schedule is not among
/// them.  Returns the router and a handle to the state.
pub fn build_router(settings: &Settings) -> Result<(Router, Arc<AppState>)> {
    let schedules = fee_schedule_registry(&settings.fee_schedule_dir)?;
    if !schedules.contains_key(&settings.default_fee_schedule) {
        bail!(
            "default fee schedule {:?} not found in {}",
            settings.default_fee_schedule,
            settings.fee_schedule_dir.display()
        );
    }
    info!(count = schedules.len(), "loaded fee schedules");
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let desk = OrderDesk::new(
        schedules,
        settings.default_fee_schedule.clone(),
        settings.min_shift_hours,
        notifier,
    );
    let state = Arc::new(AppState { desk });
    Ok((router(state.clone()), state))
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/pricing", post(pricing_handler))
        .route("/api/pricing/batch", post(batch_handler))
        .route("/api/fee-schedules", get(fee_schedules_handler))
        .route("/api/jobs/create-service-order", post(create_service_order_handler))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Handler for POST /api/pricing
async fn pricing_handler(
    Json(input): Json<JobPricingInput>,
) -> Result<Json<PricingResponse>, OrderError> {
    check_pricing_input(&input)?;
    let pricing = compute_job_pricing(&input);
    Ok(Json(PricingResponse {
        summary: pricing.summary(),
        pricing,
    }))
}

/// Handler for POST /api/pricing/batch
async fn batch_handler(
    Json(inputs): Json<Vec<JobPricingInput>>,
) -> Result<Json<Vec<JobPricingResult>>, OrderError> {
    for input in &inputs {
        check_pricing_input(input)?;
    }
    Ok(Json(price_batch(&inputs)))
}

/// Handler for GET /api/fee-schedules
async fn fee_schedules_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<FeeSchedule>> {
    Json(app_state.desk.fee_schedules().into_iter().cloned().collect())
}

/// Handler for POST /api/jobs/create-service-order
async fn create_service_order_handler(
    State(app_state): State<Arc<AppState>>,
    Json(draft): Json<ServiceOrderDraft>,
) -> Result<(StatusCode, Json<ServiceOrder>), OrderError> {
    let order = app_state.desk.submit(&draft)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Launch the API server.  This function builds the router from the
/// given settings and binds to the configured address.  It blocks until
/// the server terminates (e.g. when interrupted).
pub async fn serve(settings: Settings) -> Result<()> {
    let (router, _state) = build_router(&settings)?;
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
