use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, instrument};

use super::{dto::Snapshot, services};
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/data", get(data))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[instrument(skip_all)]
pub async fn data(State(state): State<AppState>) -> (StatusCode, Json<Snapshot>) {
    match services::snapshot(&state, OffsetDateTime::now_utc()).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)),
        Err(e) => {
            error!(error = %format!("{e:#}"), "public snapshot failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Snapshot::fallback()))
        }
    }
}
