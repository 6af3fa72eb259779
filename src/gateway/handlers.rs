use std::path::Path;

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
    routing::{any, get},
    Json, Router,
};
use bytes::Bytes;
use tower_http::services::{ServeDir, ServeFile};
use tracing::instrument;

use super::{
    proxy::{forward, Upstream},
    state::GatewayState,
};
use crate::{config::UiTexts, error::AppError};

pub fn gateway_routes(static_dir: &str) -> Router<GatewayState> {
    let index = Path::new(static_dir).join("index.html");
    Router::new()
        .route("/ui-config.json", get(ui_config))
        .route("/api", any(proxy))
        .route("/api/*path", any(proxy))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback_service(ServeFile::new(index))
}

pub async fn ui_config(State(state): State<GatewayState>) -> Json<UiTexts> {
    Json(state.config.ui.clone())
}

#[instrument(skip(state, headers, body))]
pub async fn proxy(
    State(state): State<GatewayState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let api_path = uri.path().strip_prefix("/api/").unwrap_or_default();
    let (upstream, path) =
        Upstream::resolve(api_path).ok_or_else(|| AppError::NotFound("Not Found".into()))?;

    let mut url = format!("{}{}", upstream.base_url(&state.config), path);
    if let Some(query) = uri.query() {
        url.push('?');
        url.push_str(query);
    }
    forward(&state.client, &url, method, &headers, body).await
}
