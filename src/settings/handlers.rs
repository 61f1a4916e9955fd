use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, instrument};

use super::{dto::DesignForm, services};
use crate::{auth::CurrentAdmin, flash, state::AppState, views};

pub fn design_routes() -> Router<AppState> {
    Router::new().route("/design", get(design_page).post(update_design))
}

#[instrument(skip_all, fields(user_id = %admin.id))]
pub async fn design_page(State(state): State<AppState>, admin: CurrentAdmin, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    match services::design(state.settings.as_ref()).await {
        Ok(design) => (jar, views::design(&admin, flash.as_ref(), &design)).into_response(),
        Err(e) => {
            error!(error = %e, "load design settings failed");
            views::failure()
        }
    }
}

#[instrument(skip(state, jar), fields(user_id = %admin.id))]
pub async fn update_design(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    jar: CookieJar,
    Form(form): Form<DesignForm>,
) -> Response {
    let outcome = services::update_design(state.settings.as_ref(), &form).await;
    flash::redirect(jar, outcome, "/admin/design")
}
