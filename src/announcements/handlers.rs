use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use time::OffsetDateTime;
use tracing::{error, instrument};

use super::{dto::AnnouncementForm, services};
use crate::{auth::CurrentAdmin, flash, state::AppState, views};

pub fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route("/announcements", get(list_announcements).post(add_announcement))
        .route("/announcements/:id", post(update_announcement))
        .route("/announcements/:id/delete", post(delete_announcement))
}

#[instrument(skip_all, fields(user_id = %admin.id))]
pub async fn list_announcements(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    jar: CookieJar,
) -> Response {
    let (jar, flash) = flash::take(jar);
    match services::list_announcements(state.announcements.as_ref()).await {
        Ok(list) => {
            let page = views::announcements(&admin, flash.as_ref(), &list, OffsetDateTime::now_utc());
            (jar, page).into_response()
        }
        Err(e) => {
            error!(error = %e, "list announcements failed");
            views::failure()
        }
    }
}

#[instrument(skip(state, jar), fields(user_id = %admin.id))]
pub async fn add_announcement(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    jar: CookieJar,
    Form(form): Form<AnnouncementForm>,
) -> Response {
    let outcome = services::add_announcement(state.announcements.as_ref(), &form).await;
    flash::redirect(jar, outcome, "/admin/announcements")
}

#[instrument(skip(state, jar), fields(user_id = %admin.id))]
pub async fn update_announcement(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i32>,
    jar: CookieJar,
    Form(form): Form<AnnouncementForm>,
) -> Response {
    let outcome = services::update_announcement(state.announcements.as_ref(), id, &form).await;
    flash::redirect(jar, outcome, "/admin/announcements")
}

#[instrument(skip(state, jar), fields(user_id = %admin.id))]
pub async fn delete_announcement(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i32>,
    jar: CookieJar,
) -> Response {
    let outcome = services::delete_announcement(state.announcements.as_ref(), id).await;
    flash::redirect(jar, outcome, "/admin/announcements")
}
