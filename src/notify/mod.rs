use crate::state::AppState;
use axum::Router;

pub mod client;
mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    handlers::notify_routes()
}
