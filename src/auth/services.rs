pub(crate) use crate::auth::dto::{Claims, LoginForm, PasswordForm, SessionKeys};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::UserRepo;
use crate::auth::repo_types::User;
use crate::config::{BootstrapConfig, SessionConfig};
use crate::error::{AdminError, AdminResult};
use crate::state::AppState;
use axum::{extract::FromRef, http::HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use std::time::Duration;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "rb_session";
pub const MIN_PASSWORD_LEN: usize = 6;
const INVALID_CREDENTIALS: &str = "Invalid username or password.";

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        SessionKeys::new(&state.config.session, !state.config.debug)
    }
}

impl SessionKeys {
    pub fn new(cfg: &SessionConfig, secure_cookie: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(1) as u64) * 60),
            secure_cookie,
        }
    }

    pub fn sign(&self, user_id: Uuid, fingerprint: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            fp: fingerprint.to_string(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "session signed");
        Ok(token)
    }

    /// Verifies signature, expiry, issuer, audience and the client fingerprint.
    pub fn verify(&self, token: &str, fingerprint: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        if data.claims.fp != fingerprint {
            anyhow::bail!("session fingerprint mismatch");
        }
        debug!(user_id = %data.claims.sub, "session verified");
        Ok(data.claims)
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookie)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::seconds(self.ttl.as_secs() as i64))
            .build()
    }
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Hash of the client identity a session is bound to.
pub fn fingerprint(headers: &HeaderMap) -> String {
    let agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(agent.as_bytes());
    hasher.update(b"\n");
    hasher.update(forwarded.as_bytes());
    hex::encode(hasher.finalize())
}

/// Unknown users and wrong passwords fail with the same message.
pub async fn authenticate(users: &dyn UserRepo, form: &LoginForm) -> AdminResult<User> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Err(AdminError::validation(
            "Please enter both username and password.",
        ));
    }

    let Some(user) = users.find_by_username(username).await? else {
        warn!(%username, "login unknown username");
        return Err(AdminError::validation(INVALID_CREDENTIALS));
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(AdminError::validation(INVALID_CREDENTIALS));
    }
    Ok(user)
}

pub async fn change_password(
    users: &dyn UserRepo,
    user_id: Uuid,
    form: &PasswordForm,
) -> AdminResult<String> {
    if form.current_password.is_empty()
        || form.new_password.is_empty()
        || form.confirm_password.is_empty()
    {
        return Err(AdminError::validation("All password fields are required."));
    }

    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AdminError::not_found("Account not found."))?;

    if !verify_password(&form.current_password, &user.password_hash)? {
        return Err(AdminError::validation("Current password is incorrect."));
    }
    if form.new_password != form.confirm_password {
        return Err(AdminError::validation("New passwords do not match."));
    }
    if form.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AdminError::validation(format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }

    let hash = hash_password(&form.new_password)?;
    if !users.update_password(user_id, &hash).await? {
        return Err(AdminError::not_found("Account not found."));
    }
    info!(user_id = %user_id, "password changed");
    Ok("Password changed successfully.".into())
}

/// Seeds the bootstrap administrator when the users table is empty.
pub async fn ensure_default_admin(
    users: &dyn UserRepo,
    cfg: &BootstrapConfig,
) -> anyhow::Result<bool> {
    if users.count().await? > 0 {
        return Ok(false);
    }
    let hash = hash_password(&cfg.admin_password)?;
    let user = users.create(&cfg.admin_username, &hash).await?;
    warn!(
        user_id = %user.id,
        username = %user.username,
        "created default admin user; change its password"
    );
    Ok(true)
}

#[cfg(test)]
mod session_tests {
    use super::*;

    fn make_keys() -> SessionKeys {
        let state = AppState::fake();
        SessionKeys::from_ref(&state)
    }

    #[test]
    fn sign_and_verify_session() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "fp-1").expect("sign");
        let claims = keys.verify(&token, "fp-1").expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn verify_rejects_changed_fingerprint() {
        let keys = make_keys();
        let token = keys.sign(Uuid::new_v4(), "fp-1").expect("sign");
        let err = keys.verify(&token, "fp-2").unwrap_err();
        assert!(err.to_string().contains("fingerprint"));
    }

    #[test]
    fn verify_rejects_expired_session() {
        let keys = make_keys();
        let past = OffsetDateTime::now_utc() - TimeDuration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: past.unix_timestamp() as usize,
            exp: (past + TimeDuration::minutes(5)).unix_timestamp() as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
            fp: "fp".into(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token, "fp").is_err());
    }

    #[test]
    fn verify_rejects_other_secret() {
        let keys = make_keys();
        let mut cfg = AppState::fake().config.session.clone();
        cfg.secret = "another-secret".into();
        let other = SessionKeys::new(&cfg, false);
        let token = other.sign(Uuid::new_v4(), "fp").unwrap();
        assert!(keys.verify(&token, "fp").is_err());
    }

    #[test]
    fn fingerprint_follows_user_agent_and_first_forwarded_hop() {
        let mut a = HeaderMap::new();
        a.insert("user-agent", "Firefox".parse().unwrap());
        a.insert("x-forwarded-for", "10.0.0.1, 172.16.0.1".parse().unwrap());
        let mut b = a.clone();
        b.insert("x-forwarded-for", "10.0.0.1, 192.168.1.1".parse().unwrap());
        let mut c = a.clone();
        c.insert("user-agent", "curl".parse().unwrap());

        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_ne!(fingerprint(&a), fingerprint(&c));
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = make_keys().cookie("tok".into());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
