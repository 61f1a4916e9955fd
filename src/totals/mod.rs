mod dto;
pub mod handlers;
pub mod services;

pub use services::Totals;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::totals_routes()
}
