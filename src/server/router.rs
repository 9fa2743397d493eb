use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};

use super::api::api_router;
use super::response::ApiResponse;
use crate::store::Store;
use crate::types::UrlBases;

pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Base URLs new projects derive their read and write URLs from.
    pub url_bases: UrlBases,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, url_bases: UrlBases) -> Self {
        Self { store, url_bases }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("No such endpoint")),
    )
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .fallback(fallback)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
