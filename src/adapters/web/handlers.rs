//! HTTP request handlers for web adapter.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::filter::{
    filter_by_conditions, screen, DefensiveScreen, GrowthScreen, Thresholds,
};
use crate::domain::query;
use crate::domain::record::Match;

use super::{AppState, WebError};

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<usize>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub cagr_min: Option<f64>,
    pub roe_min: Option<f64>,
    pub roi_min: Option<f64>,
    pub sharpe_min: Option<f64>,
    pub volatility_max: Option<f64>,
    pub dividend_min: Option<f64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GrowthParams {
    pub cagr_min: Option<f64>,
    pub roe_min: Option<f64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DefensiveParams {
    pub sharpe_min: Option<f64>,
    pub volatility_max: Option<f64>,
    pub dividend_min: Option<f64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub conditions: Vec<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MultiStockResponse<'a> {
    pub stocks: Vec<Match<'a>>,
}

pub async fn root() -> Response {
    Json(serde_json::json!({ "message": "Welcome to the Stock Data API" })).into_response()
}

pub async fn list_stocks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Response {
    let snapshot = state.store.snapshot();
    let page = query::list(
        &snapshot,
        params.skip.unwrap_or(0),
        params.limit.unwrap_or(state.page_size),
    );
    Json(page).into_response()
}

pub async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Response, WebError> {
    let snapshot = state.store.snapshot();
    let found = query::get(&snapshot, &symbol)?;
    Ok(Json(found).into_response())
}

pub async fn stocks_by_industry(
    State(state): State<Arc<AppState>>,
    Path(industry): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, WebError> {
    let snapshot = state.store.snapshot();
    let page = query::by_industry(
        &snapshot,
        &industry,
        params.skip.unwrap_or(0),
        params.limit.unwrap_or(state.page_size),
    )?;
    Ok(Json(page).into_response())
}

pub async fn filter_stocks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Response {
    let thresholds = Thresholds {
        cagr_min: params.cagr_min,
        roe_min: params.roe_min,
        roi_min: params.roi_min,
        sharpe_min: params.sharpe_min,
        volatility_max: params.volatility_max,
        dividend_min: params.dividend_min,
    };
    let snapshot = state.store.snapshot();
    let matches = screen(
        &snapshot,
        &thresholds.predicates(),
        params.limit.unwrap_or(state.default_limit),
    );
    Json(matches).into_response()
}

pub async fn growth_stocks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GrowthParams>,
) -> Response {
    let defaults = GrowthScreen::default();
    let growth = GrowthScreen {
        cagr_min: params.cagr_min.unwrap_or(defaults.cagr_min),
        roe_min: params.roe_min.unwrap_or(defaults.roe_min),
    };
    let snapshot = state.store.snapshot();
    let matches = screen(
        &snapshot,
        &growth.predicates(),
        params.limit.unwrap_or(state.default_limit),
    );
    Json(matches).into_response()
}

pub async fn defensive_stocks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DefensiveParams>,
) -> Response {
    let defaults = DefensiveScreen::default();
    let defensive = DefensiveScreen {
        sharpe_min: params.sharpe_min.unwrap_or(defaults.sharpe_min),
        volatility_max: params.volatility_max.unwrap_or(defaults.volatility_max),
        dividend_min: params.dividend_min.unwrap_or(defaults.dividend_min),
    };
    let snapshot = state.store.snapshot();
    let matches = screen(
        &snapshot,
        &defensive.predicates(),
        params.limit.unwrap_or(state.default_limit),
    );
    Json(matches).into_response()
}

pub async fn query_stocks(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Response {
    let snapshot = state.store.snapshot();
    let stocks = filter_by_conditions(
        &snapshot,
        &request.conditions,
        request.limit.unwrap_or(state.default_limit),
    );
    tracing::debug!(
        conditions = request.conditions.len(),
        matched = stocks.len(),
        "condition query"
    );
    Json(MultiStockResponse { stocks }).into_response()
}

pub async fn reload_stocks(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    if !state.allow_reload {
        return Err(WebError::forbidden("reload is disabled"));
    }

    let store = Arc::clone(&state.store);
    let source = Arc::clone(&state.source);
    let count = tokio::task::spawn_blocking(move || store.reload(source.as_ref()))
        .await
        .map_err(|e| WebError::internal(format!("reload task failed: {}", e)))??;

    Ok(Json(serde_json::json!({ "records": count })).into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("Not Found")
}
