use axum::{
    extract::{FromRef, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{LoginForm, LoginQuery, PasswordForm},
        extractors::CurrentAdmin,
        services::{authenticate, change_password, clear_session, fingerprint, SessionKeys},
    },
    error::{AdminError, GENERIC_FAILURE},
    flash::{self, Flash},
    forms::safe_next,
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/account", get(account_page).post(update_account))
}

#[instrument(skip_all)]
pub async fn login_page(
    admin: Option<CurrentAdmin>,
    Query(query): Query<LoginQuery>,
    jar: CookieJar,
) -> Response {
    if admin.is_some() {
        return Redirect::to("/admin/dashboard").into_response();
    }
    let (jar, flash) = flash::take(jar);
    (jar, views::login(flash.as_ref(), "", query.next.as_deref())).into_response()
}

#[instrument(skip(state, headers, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = query.next.as_deref();
    let user = match authenticate(state.users.as_ref(), &form).await {
        Ok(u) => u,
        Err(err) => {
            let status = match &err {
                AdminError::Internal(e) => {
                    error!(error = %e, "login failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::OK,
            };
            let page = views::login(Some(&Flash::from(&err)), form.username.trim(), next);
            return (status, page).into_response();
        }
    };

    let keys = SessionKeys::from_ref(&state);
    let token = match keys.sign(user.id, &fingerprint(&headers)) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "session sign failed");
            let page = views::login(Some(&Flash::error(GENERIC_FAILURE)), &user.username, next);
            return (StatusCode::INTERNAL_SERVER_ERROR, page).into_response();
        }
    };

    info!(user_id = %user.id, username = %user.username, "admin logged in");
    let jar = flash::push(jar.add(keys.cookie(token)), Flash::success("Logged in successfully."));
    let to = safe_next(next).unwrap_or("/admin/dashboard");
    (jar, Redirect::to(to)).into_response()
}

#[instrument(skip_all, fields(user_id = %admin.id))]
pub async fn logout(admin: CurrentAdmin, jar: CookieJar) -> Response {
    info!(username = %admin.username, "admin logged out");
    let jar = flash::push(clear_session(jar), Flash::success("You have been logged out."));
    (jar, Redirect::to("/admin/login")).into_response()
}

#[instrument(skip_all, fields(user_id = %admin.id))]
pub async fn account_page(admin: CurrentAdmin, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    (jar, views::account(&admin, flash.as_ref())).into_response()
}

#[instrument(skip(state, jar, form), fields(user_id = %admin.id))]
pub async fn update_account(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    jar: CookieJar,
    Form(form): Form<PasswordForm>,
) -> Response {
    let outcome = change_password(state.users.as_ref(), admin.id, &form).await;
    flash::redirect(jar, outcome, "/admin/account")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{authed, body_string, login_cookie, send, set_cookies, TEST_AGENT};
    use axum::{body::Body, http::Request};

    fn app() -> (AppState, Router) {
        let state = AppState::fake();
        let router = crate::app::build_app(state.clone());
        (state, router)
    }

    #[tokio::test]
    async fn admin_pages_redirect_to_login_with_next() {
        let (_, router) = app();
        let res = send(&router, Request::get("/admin/totals").body(Body::empty()).unwrap()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], "/admin/login?next=%2Fadmin%2Ftotals");
    }

    #[tokio::test]
    async fn login_rejects_bad_password_and_rerenders_form() {
        let (state, router) = app();
        crate::test_support::seed_admin(&state, "lent2026").await;

        let req = Request::post("/admin/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("user-agent", TEST_AGENT)
            .body(Body::from("username=admin&password=wrong"))
            .unwrap();
        let res = send(&router, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get("set-cookie").is_none());
        let body = body_string(res).await;
        assert!(body.contains("Invalid username or password."));
        assert!(body.contains("value=\"admin\""));
    }

    #[tokio::test]
    async fn login_sets_session_and_follows_next() {
        let (state, router) = app();
        crate::test_support::seed_admin(&state, "lent2026").await;

        let req = Request::post("/admin/login?next=%2Fadmin%2Fclasses")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("user-agent", TEST_AGENT)
            .body(Body::from("username=admin&password=lent2026"))
            .unwrap();
        let res = send(&router, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], "/admin/classes");
        assert!(set_cookies(&res).iter().any(|c| c.starts_with("rb_session=")));
    }

    #[tokio::test]
    async fn login_ignores_offsite_next() {
        let (state, router) = app();
        crate::test_support::seed_admin(&state, "lent2026").await;

        let req = Request::post("/admin/login?next=https%3A%2F%2Fevil.example")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("user-agent", TEST_AGENT)
            .body(Body::from("username=admin&password=lent2026"))
            .unwrap();
        let res = send(&router, req).await;
        assert_eq!(res.headers()["location"], "/admin/dashboard");
    }

    #[tokio::test]
    async fn session_from_another_client_is_rejected() {
        let (state, router) = app();
        let cookie = login_cookie(&state).await;

        let req = Request::get("/admin/dashboard")
            .header("cookie", cookie)
            .header("user-agent", "SomeOtherBrowser/1.0")
            .body(Body::empty())
            .unwrap();
        let res = send(&router, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(res.headers()["location"]
            .to_str()
            .unwrap()
            .starts_with("/admin/login"));
    }

    #[tokio::test]
    async fn logged_in_admin_skips_login_page() {
        let (state, router) = app();
        let cookie = login_cookie(&state).await;

        let req = Request::get("/admin/login")
            .header("cookie", cookie)
            .header("user-agent", TEST_AGENT)
            .body(Body::empty())
            .unwrap();
        let res = send(&router, req).await;
        assert_eq!(res.headers()["location"], "/admin/dashboard");
    }

    fn login_request(password: &str) -> Request<Body> {
        Request::post("/admin/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("user-agent", TEST_AGENT)
            .body(Body::from(format!("username=admin&password={password}")))
            .unwrap()
    }

    #[tokio::test]
    async fn changed_password_replaces_the_old_one_at_login() {
        let (state, router) = app();
        let req = authed(&state, "POST", "/admin/account")
            .await
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(
                "current_password=lent2026&new_password=harvest-2026&confirm_password=harvest-2026",
            ))
            .unwrap();
        let res = send(&router, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], "/admin/account");

        let res = send(&router, login_request("lent2026")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(!set_cookies(&res).iter().any(|c| c.starts_with("rb_session=")));
        assert!(body_string(res).await.contains("Invalid username or password."));

        let res = send(&router, login_request("harvest-2026")).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(set_cookies(&res).iter().any(|c| c.starts_with("rb_session=")));
    }

    #[tokio::test]
    async fn wrong_current_password_keeps_the_old_one() {
        let (state, router) = app();
        let req = authed(&state, "POST", "/admin/account")
            .await
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(
                "current_password=nope&new_password=harvest-2026&confirm_password=harvest-2026",
            ))
            .unwrap();
        let res = send(&router, req).await;
        assert_eq!(res.headers()["location"], "/admin/account");

        let res = send(&router, login_request("lent2026")).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn logout_removes_session_cookie() {
        let (state, router) = app();
        let req = authed(&state, "GET", "/admin/logout")
            .await
            .body(Body::empty())
            .unwrap();
        let res = send(&router, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], "/admin/login");

        let cookies = set_cookies(&res);
        let removal = cookies
            .iter()
            .find(|c| c.starts_with("rb_session="))
            .unwrap();
        assert!(removal.starts_with("rb_session=;"));
        assert!(removal.contains("Max-Age=0"));
        assert!(cookies.iter().any(|c| c.starts_with("rb_flash=")));
    }
}
