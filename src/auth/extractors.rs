use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, warn};
use uuid::Uuid;

use super::services::{clear_session, fingerprint, SessionKeys, SESSION_COOKIE};
use crate::flash::{self, Flash};
use crate::state::AppState;

/// The administrator behind the current request, resolved once from the
/// session cookie and handed to handlers by parameter.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: Uuid,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let requested = parts
            .extensions
            .get::<OriginalUri>()
            .map(|u| u.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let next = requested
            .path_and_query()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| "/admin/dashboard".into());

        let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
            return Err(login_redirect(jar, &next));
        };

        let keys = SessionKeys::from_ref(state);
        let claims = match keys.verify(&token, &fingerprint(&parts.headers)) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "rejected admin session");
                return Err(login_redirect(clear_session(jar), &next));
            }
        };

        match state.users.find_by_id(claims.sub).await {
            Ok(Some(user)) => Ok(CurrentAdmin {
                id: user.id,
                username: user.username,
            }),
            Ok(None) => {
                warn!(user_id = %claims.sub, "session for deleted user");
                Err(login_redirect(clear_session(jar), &next))
            }
            Err(e) => {
                error!(error = %e, user_id = %claims.sub, "user lookup failed");
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response())
            }
        }
    }
}

fn login_redirect(jar: CookieJar, next: &str) -> Response {
    let query = serde_urlencoded::to_string([("next", next)]).unwrap_or_default();
    let jar = flash::push(jar, Flash::error("Please log in to access the admin panel."));
    (jar, Redirect::to(&format!("/admin/login?{query}"))).into_response()
}
