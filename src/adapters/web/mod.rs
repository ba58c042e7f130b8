//! Web server adapter.
//!
//! Axum JSON API over the shared record store. Every request works on one
//! snapshot taken at the start of the handler.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::filter::DEFAULT_LIMIT;
use crate::domain::query::DEFAULT_PAGE_SIZE;
use crate::domain::store::RecordStore;
use crate::ports::record_source::RecordSource;

pub struct AppState {
    pub store: Arc<RecordStore>,
    pub source: Arc<dyn RecordSource + Send + Sync>,
    pub default_limit: i64,
    pub page_size: i64,
    pub allow_reload: bool,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>, source: Arc<dyn RecordSource + Send + Sync>) -> Self {
        Self {
            store,
            source,
            default_limit: DEFAULT_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            allow_reload: true,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/v1/stocks", get(handlers::list_stocks))
        .route("/api/v1/stocks/", get(handlers::list_stocks))
        .route("/api/v1/stocks/{symbol}", get(handlers::get_stock))
        .route("/api/v1/stocks/industry/{industry}", get(handlers::stocks_by_industry))
        .route("/api/v1/stocks/filter", get(handlers::filter_stocks))
        .route("/api/v1/stocks/filter/", get(handlers::filter_stocks))
        .route("/api/v1/stocks/query", post(handlers::query_stocks))
        .route("/api/v1/stocks/query/growth", get(handlers::growth_stocks))
        .route("/api/v1/stocks/query/defensive", get(handlers::defensive_stocks))
        .route("/api/v1/stocks/reload", post(handlers::reload_stocks))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
