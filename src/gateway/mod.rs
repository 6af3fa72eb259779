use axum::Router;

pub mod handlers;
pub mod proxy;
pub mod state;

pub use state::GatewayState;

pub fn router(static_dir: &str) -> Router<GatewayState> {
    handlers::gateway_routes(static_dir)
}
