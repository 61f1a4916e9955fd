use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, instrument};

use super::{dto::TotalsForm, services};
use crate::{auth::CurrentAdmin, flash, state::AppState, views};

pub fn totals_routes() -> Router<AppState> {
    Router::new().route("/totals", get(totals_page).post(update_totals))
}

#[instrument(skip_all, fields(user_id = %admin.id))]
pub async fn totals_page(State(state): State<AppState>, admin: CurrentAdmin, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    match services::overview(state.classes.as_ref(), state.settings.as_ref()).await {
        Ok(view) => (jar, views::totals(&admin, flash.as_ref(), &view)).into_response(),
        Err(e) => {
            error!(error = %e, "load totals failed");
            views::failure()
        }
    }
}

#[instrument(skip(state, jar), fields(user_id = %admin.id))]
pub async fn update_totals(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    jar: CookieJar,
    Form(form): Form<TotalsForm>,
) -> Response {
    let outcome = services::update_totals(state.settings.as_ref(), &form).await;
    flash::redirect(jar, outcome, "/admin/totals")
}
