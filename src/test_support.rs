//! Helpers for driving the router in tests.

use axum::{
    body::Body,
    http::{request::Builder, HeaderMap, Request},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::auth::{
    password::hash_password,
    repo_types::User,
    services::{fingerprint, SessionKeys},
};
use crate::state::AppState;
use axum::extract::FromRef;

pub const TEST_AGENT: &str = "ricebowl-tests/1.0";

pub async fn send(router: &Router, req: Request<Body>) -> Response {
    router.clone().oneshot(req).await.unwrap()
}

pub async fn body_string(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Every `Set-Cookie` header on the response.
pub fn set_cookies(res: &Response) -> Vec<String> {
    res.headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// `name=value` of the flash cookie a redirect carries, for the next request.
pub fn flash_pair(res: &Response) -> String {
    set_cookies(res)
        .into_iter()
        .find(|c| c.starts_with("rb_flash="))
        .and_then(|c| c.split(';').next().map(str::to_string))
        .unwrap()
}

pub async fn seed_admin(state: &AppState, password: &str) -> User {
    let hash = hash_password(password).unwrap();
    state.users.create("admin", &hash).await.unwrap()
}

/// `Cookie` header value for a session of the `admin` user, seeding it if needed.
pub async fn login_cookie(state: &AppState) -> String {
    let user = match state.users.find_by_username("admin").await.unwrap() {
        Some(u) => u,
        None => seed_admin(state, "lent2026").await,
    };
    let mut headers = HeaderMap::new();
    headers.insert("user-agent", TEST_AGENT.parse().unwrap());
    let token = SessionKeys::from_ref(state)
        .sign(user.id, &fingerprint(&headers))
        .unwrap();
    format!("rb_session={token}")
}

/// Request builder carrying a valid admin session.
pub async fn authed(state: &AppState, method: &str, uri: &str) -> Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("cookie", login_cookie(state).await)
        .header("user-agent", TEST_AGENT)
}
