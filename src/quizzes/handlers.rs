use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, instrument};

use super::{dto::QuizForm, services};
use crate::{auth::CurrentAdmin, flash, state::AppState, views};

pub fn quiz_routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", get(list_quizzes))
        .route("/quizzes/:week", post(update_quiz))
}

#[instrument(skip_all, fields(user_id = %admin.id))]
pub async fn list_quizzes(State(state): State<AppState>, admin: CurrentAdmin, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    match services::list_weeks(state.quizzes.as_ref()).await {
        Ok(quizzes) => (jar, views::quizzes(&admin, flash.as_ref(), &quizzes)).into_response(),
        Err(e) => {
            error!(error = %e, "list quizzes failed");
            views::failure()
        }
    }
}

#[instrument(skip(state, jar, form), fields(user_id = %admin.id))]
pub async fn update_quiz(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(week): Path<i32>,
    jar: CookieJar,
    Form(form): Form<QuizForm>,
) -> Response {
    let outcome = services::update_week(state.quizzes.as_ref(), week, &form).await;
    flash::redirect(jar, outcome, "/admin/quizzes")
}
