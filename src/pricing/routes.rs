//! Pricing API route handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::wizard::FlowConfig;
use crate::AppState;

use super::calculators::compute_quote;
use super::format::render_quote;
use super::leads::LeadRecord;
use super::models::PriceTable;
use super::requests::{Selection, SubmitLeadRequest};
use super::responses::{QuoteBreakdownResponse, QuoteResponse, ReadinessResponse};
use super::validation::{validate, Readiness};

/// Routes mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/table", get(price_table))
        .route("/flows/:name", get(flow))
        .route("/quote", post(quote))
        .route("/validate", post(validate_selection))
        .route("/leads", post(submit_lead))
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// The price table the quotes are computed from
async fn price_table(State(state): State<AppState>) -> Json<PriceTable> {
    Json((*state.prices).clone())
}

/// Step layout of a named wizard flow
async fn flow(Path(name): Path<String>) -> Result<Json<FlowConfig>> {
    FlowConfig::named(&name).map(Json).ok_or(AppError::NotFound)
}

/// Live quote for a (possibly incomplete) selection
async fn quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Selection>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let selection = json_body(payload)?.normalized();
    let policy = &state.config.policy;

    let breakdown = compute_quote(&selection, &state.prices, policy);
    let readiness = validate(&selection, &state.prices, policy);
    tracing::debug!(
        total = %breakdown.total,
        ready = readiness.is_ready(),
        "Quote computed"
    );

    Ok(Json(QuoteResponse {
        breakdown: QuoteBreakdownResponse::from(&breakdown),
        display: render_quote(&breakdown, &selection, policy),
        readiness: ReadinessResponse::from(&readiness),
    }))
}

/// Readiness report without pricing
async fn validate_selection(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Selection>, JsonRejection>,
) -> Result<Json<ReadinessResponse>> {
    let selection = json_body(payload)?.normalized();
    let readiness = validate(&selection, &state.prices, &state.config.policy);
    Ok(Json(ReadinessResponse::from(&readiness)))
}

/// Build the lead record for a finished selection and hand it to the sink
async fn submit_lead(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SubmitLeadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LeadRecord>)> {
    let request = json_body(payload)?;
    let selection = request.selection.normalized();
    let policy = &state.config.policy;

    if let Readiness::NotReady(issues) = validate(&selection, &state.prices, policy) {
        return Err(AppError::Validation(issues));
    }

    let breakdown = compute_quote(&selection, &state.prices, policy);
    let record =
        LeadRecord::from_selection(&selection, &breakdown, &request.consultation, Utc::now())?;
    // A failing sink is an outage, not a problem with the lead.
    state
        .leads
        .submit(&record)
        .map_err(|e| AppError::Internal(format!("lead {} not stored: {}", record.id, e)))?;

    Ok((StatusCode::CREATED, Json(record)))
}
