//! One-shot messages carried across a redirect in a cookie.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::{AdminError, AdminResult};

pub const FLASH_COOKIE: &str = "rb_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        Base64UrlUnpadded::encode_string(&json)
    }

    fn decode(raw: &str) -> Option<Self> {
        let bytes = Base64UrlUnpadded::decode_vec(raw).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

impl From<&AdminError> for Flash {
    fn from(err: &AdminError) -> Self {
        Flash::error(err.user_message())
    }
}

pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Reads the pending message, if any, and clears it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(flash) = jar.get(FLASH_COOKIE).map(|c| Flash::decode(c.value())) else {
        return (jar, None);
    };
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
}

/// Ends a form submission: flashes the success message or the error, then
/// redirects to `to`.
pub fn redirect(jar: CookieJar, outcome: AdminResult<String>, to: &str) -> Response {
    let flash = match outcome {
        Ok(message) => Flash::success(message),
        Err(err) => {
            match &err {
                AdminError::Internal(e) => error!(error = %format!("{e:#}"), "admin operation failed"),
                other => warn!(reason = %other, "admin operation rejected"),
            }
            Flash::from(&err)
        }
    };
    (push(jar, flash), Redirect::to(to)).into_response()
}
