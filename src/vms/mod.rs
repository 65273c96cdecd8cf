mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn internal_router() -> Router<AppState> {
    handlers::internal_routes()
}
