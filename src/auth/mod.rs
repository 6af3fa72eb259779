use crate::state::AppState;
use axum::Router;

pub mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
mod password;
mod repo;
pub mod repo_types;
pub mod verifier;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
