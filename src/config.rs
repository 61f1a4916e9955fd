use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

const DEV_SECRET: &str = "ricebowl-dev-secret-change-in-production";

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credentials used to seed the first administrator on an empty database.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub debug: bool,
    pub session: SessionConfig,
    pub bootstrap: BootstrapConfig,
    pub public_dir: String,
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let debug = parse_flag(std::env::var("APP_DEBUG").ok().as_deref());

        let secret = match std::env::var("SECRET_KEY") {
            Ok(s) if !s.trim().is_empty() => s,
            _ if debug => {
                tracing::warn!("SECRET_KEY not set; using development key");
                DEV_SECRET.to_string()
            }
            _ => anyhow::bail!("SECRET_KEY must be set when APP_DEBUG is off"),
        };

        let session = SessionConfig {
            secret,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "ricebowl".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "ricebowl-admin".into()),
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(60 * 24),
        };
        let bootstrap = BootstrapConfig {
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "lent2026".into()),
        };
        let public_dir = std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".into());
        let listen_addr = parse_listen_addr(
            std::env::var("APP_HOST").ok().as_deref(),
            std::env::var("APP_PORT").ok().as_deref(),
        )?;

        Ok(Self {
            database_url,
            debug,
            session,
            bootstrap,
            public_dir,
            listen_addr,
        })
    }
}

fn parse_listen_addr(host: Option<&str>, port: Option<&str>) -> anyhow::Result<SocketAddr> {
    let host = host.map(str::trim).filter(|h| !h.is_empty()).unwrap_or("0.0.0.0");
    let port = port.map(str::trim).filter(|p| !p.is_empty()).unwrap_or("8080");
    format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid APP_HOST/APP_PORT: {host}:{port}"))
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}

#[cfg(test)]
mod tests {
    use super::{parse_flag, parse_listen_addr};

    #[test]
    fn debug_flag_accepts_common_truthy_spellings() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("YES")));
        assert!(parse_flag(Some(" 1 ")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(Some("on")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn listen_addr_defaults_and_overrides() {
        assert_eq!(
            parse_listen_addr(None, None).unwrap(),
            "0.0.0.0:8080".parse().unwrap()
        );
        assert_eq!(
            parse_listen_addr(Some("127.0.0.1"), Some(" 3000 ")).unwrap(),
            "127.0.0.1:3000".parse().unwrap()
        );
        let err = parse_listen_addr(None, Some("eighty")).unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }
}
