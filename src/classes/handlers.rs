use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, instrument, warn};

use super::{
    dto::{AmountForm, ClassForm, RenameRequest, RenameResponse},
    services,
};
use crate::{auth::CurrentAdmin, error::AdminError, flash, state::AppState, views};

pub fn class_routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes).post(add_class))
        .route("/classes/:id", post(update_class))
        .route("/classes/:id/edit", post(rename_class))
        .route("/classes/:id/delete", post(delete_class))
        .route("/totals/class/:id", post(update_class_total))
}

#[instrument(skip_all, fields(user_id = %admin.id))]
pub async fn list_classes(State(state): State<AppState>, admin: CurrentAdmin, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    match services::list_classes(state.classes.as_ref()).await {
        Ok(classes) => (jar, views::classes(&admin, flash.as_ref(), &classes)).into_response(),
        Err(e) => {
            error!(error = %e, "list classes failed");
            views::failure()
        }
    }
}

#[instrument(skip(state, jar), fields(user_id = %admin.id))]
pub async fn add_class(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    jar: CookieJar,
    Form(form): Form<ClassForm>,
) -> Response {
    let outcome = services::add_class(state.classes.as_ref(), &form).await;
    flash::redirect(jar, outcome, "/admin/classes")
}

#[instrument(skip(state, jar), fields(user_id = %admin.id))]
pub async fn update_class(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i32>,
    jar: CookieJar,
    Form(form): Form<ClassForm>,
) -> Response {
    let outcome = services::update_class(state.classes.as_ref(), id, &form).await;
    flash::redirect(jar, outcome, "/admin/classes")
}

#[instrument(skip(state, jar), fields(user_id = %admin.id))]
pub async fn update_class_total(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i32>,
    jar: CookieJar,
    Form(form): Form<AmountForm>,
) -> Response {
    let outcome = services::set_class_amount(state.classes.as_ref(), id, &form.rice_bowl_amount).await;
    flash::redirect(jar, outcome, "/admin/totals")
}

#[instrument(skip(state, jar), fields(user_id = %admin.id))]
pub async fn delete_class(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i32>,
    jar: CookieJar,
) -> Response {
    let outcome = services::delete_class(state.classes.as_ref(), id).await;
    flash::redirect(jar, outcome, "/admin/classes")
}

/// Inline rename from the class list; answers with JSON instead of a redirect.
#[instrument(skip(state, payload), fields(user_id = %admin.id))]
pub async fn rename_class(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i32>,
    payload: Option<Json<RenameRequest>>,
) -> (StatusCode, Json<RenameResponse>) {
    let new_name = payload.map(|Json(p)| p.name).unwrap_or_default();
    match services::rename_class(state.classes.as_ref(), id, &new_name).await {
        Ok(name) => (
            StatusCode::OK,
            Json(RenameResponse {
                success: true,
                name: Some(name),
                error: None,
            }),
        ),
        Err(err) => {
            let status = match &err {
                AdminError::NotFound(_) => StatusCode::NOT_FOUND,
                AdminError::Validation(_) => StatusCode::BAD_REQUEST,
                AdminError::Internal(e) => {
                    error!(error = %e, class_id = id, "rename class failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            if status != StatusCode::INTERNAL_SERVER_ERROR {
                warn!(class_id = id, reason = %err, "rename rejected");
            }
            (
                status,
                Json(RenameResponse {
                    success: false,
                    name: None,
                    error: Some(err.user_message().trim_end_matches('.').to_string()),
                }),
            )
        }
    }
}
