mod announcements;
mod app;
mod auth;
mod classes;
mod config;
mod dashboard;
mod db;
mod error;
mod flash;
mod forms;
mod public;
mod quizzes;
mod settings;
mod state;
mod totals;
mod views;

#[cfg(test)]
mod memory;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "ricebowl=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;
    db::bootstrap(&state).await?;
    let addr = state.config.listen_addr;
    app::serve(app::build_app(state), addr).await
}
