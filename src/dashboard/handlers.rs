use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use time::OffsetDateTime;
use tracing::{error, instrument};

use super::services;
use crate::{auth::CurrentAdmin, flash, state::AppState, views};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/dashboard", get(dashboard))
}

#[instrument(skip_all, fields(user_id = %admin.id))]
pub async fn dashboard(State(state): State<AppState>, admin: CurrentAdmin, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    match services::overview(&state, OffsetDateTime::now_utc()).await {
        Ok(overview) => (jar, views::dashboard(&admin, flash.as_ref(), &overview)).into_response(),
        Err(e) => {
            error!(error = %e, "load dashboard failed");
            views::failure()
        }
    }
}
