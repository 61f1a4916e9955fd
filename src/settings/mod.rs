mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use services::{PublicSettings, Settings};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::design_routes()
}
