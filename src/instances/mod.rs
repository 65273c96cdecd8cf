mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::instance_routes()
}

pub fn internal_router() -> Router<AppState> {
    handlers::internal_routes()
}
