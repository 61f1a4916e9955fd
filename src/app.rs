use std::net::SocketAddr;

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use crate::{announcements, auth, classes, dashboard, public, quizzes, settings, totals};

pub fn build_app(state: AppState) -> Router {
    let admin = Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(quizzes::router())
        .merge(totals::router())
        .merge(classes::router())
        .merge(announcements::router())
        .merge(settings::router());

    let assets = ServeDir::new(&state.config.public_dir);

    Router::new()
        .nest("/admin", admin)
        .nest("/api", public::router())
        .fallback_service(assets)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
