use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::auth::services::ensure_default_admin;
use crate::quizzes::services::ensure_weeks_exist;
use crate::state::AppState;

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run migrations")?;
    info!("database migrations applied");
    Ok(())
}

/// Seeds the default administrator and the quiz weeks on a fresh database.
pub async fn bootstrap(state: &AppState) -> anyhow::Result<()> {
    ensure_default_admin(state.users.as_ref(), &state.config.bootstrap)
        .await
        .context("seed default admin")?;
    ensure_weeks_exist(state.quizzes.as_ref())
        .await
        .context("seed quiz weeks")?;
    Ok(())
}
