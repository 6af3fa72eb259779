use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, Method,
    },
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{debug, warn};

use crate::{config::GatewayConfig, error::AppError};

/// Backend service addressed by the first segment under `/api/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Auth,
    Profile,
    Finance,
}

impl Upstream {
    /// Splits `finance/stats/summary` into the owning backend and the path
    /// it serves the request on (`/finance/stats/summary`).
    pub fn resolve(api_path: &str) -> Option<(Upstream, String)> {
        let prefix = api_path.split('/').next().unwrap_or_default();
        let upstream = match prefix {
            "auth" => Upstream::Auth,
            "profile" => Upstream::Profile,
            "finance" => Upstream::Finance,
            _ => return None,
        };
        Some((upstream, format!("/{api_path}")))
    }

    pub fn base_url(self, config: &GatewayConfig) -> &str {
        match self {
            Upstream::Auth => &config.auth_base_url,
            Upstream::Profile => &config.profile_base_url,
            Upstream::Finance => &config.finance_base_url,
        }
    }
}

fn unavailable() -> AppError {
    AppError::UpstreamUnavailable("Service temporarily unavailable".into())
}

/// Sends one request upstream and relays status, content type and body
/// as received. Only `Authorization` and `Content-Type` travel with it.
pub async fn forward(
    client: &reqwest::Client,
    url: &str,
    method: Method,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let mut req = client.request(method, url);
    for name in [AUTHORIZATION, CONTENT_TYPE] {
        if let Some(value) = headers.get(&name) {
            req = req.header(name, value.clone());
        }
    }
    if !body.is_empty() {
        req = req.body(body);
    }

    let upstream = req.send().await.map_err(|e| {
        warn!(error = %e, %url, "upstream request failed");
        unavailable()
    })?;

    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let bytes = upstream.bytes().await.map_err(|e| {
        warn!(error = %e, %url, "upstream body unreadable");
        unavailable()
    })?;
    debug!(%status, %url, "proxied");

    let mut response = (status, bytes).into_response();
    match content_type {
        Some(ct) => {
            response.headers_mut().insert(CONTENT_TYPE, ct);
        }
        None => {
            response.headers_mut().remove(CONTENT_TYPE);
        }
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_prefixes() {
        assert_eq!(
            Upstream::resolve("auth/login"),
            Some((Upstream::Auth, "/auth/login".into()))
        );
        assert_eq!(
            Upstream::resolve("finance/stats/by-day"),
            Some((Upstream::Finance, "/finance/stats/by-day".into()))
        );
        assert_eq!(
            Upstream::resolve("profile/me"),
            Some((Upstream::Profile, "/profile/me".into()))
        );
    }

    #[test]
    fn unknown_prefix_is_none() {
        assert_eq!(Upstream::resolve("billing/invoices"), None);
        assert_eq!(Upstream::resolve(""), None);
        assert_eq!(Upstream::resolve("authx/login"), None);
    }
}
