use std::time::Duration;

use anyhow::Context;
use tracing::{debug, warn};

use super::claims::Identity;
use crate::error::AppError;

/// Client side of the token trust boundary. Profile and finance hold no
/// signing secret: they forward the caller's bearer token to
/// `GET /auth/validate` and trust only what comes back. A rejection, a
/// timeout, a refused connection or a garbled body all end as 401. Results
/// are not cached, so a token stops working on the first request after it
/// expires.
#[derive(Clone)]
pub struct RemoteVerifier {
    client: reqwest::Client,
    validate_url: String,
}

impl RemoteVerifier {
    pub fn new(validate_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build verifier http client")?;
        Ok(Self {
            client,
            validate_url: validate_url.into(),
        })
    }

    pub async fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let response = match self
            .client
            .get(&self.validate_url)
            .bearer_auth(token)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, url = %self.validate_url, "token verifier unreachable");
                return Err(AppError::unauthenticated("Token verification failed"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "token rejected by verifier");
            return Err(AppError::unauthenticated("Invalid token"));
        }

        match response.json::<Identity>().await {
            Ok(identity) => {
                debug!(user_id = %identity.user_id, "token verified remotely");
                Ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "verifier returned an unreadable identity");
                Err(AppError::unauthenticated("Token verification failed"))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        auth::{handlers::validate, jwt::JwtKeys},
        state::AppState,
    };
    use axum::{http::StatusCode, routing::get, Json, Router};
    use std::net::SocketAddr;
    use time::OffsetDateTime;
    use uuid::Uuid;

    pub(crate) async fn spawn(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    /// An address nothing is listening on.
    pub(crate) async fn dead_addr() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    /// Starts the real validate handler and returns its address plus the
    /// keys it trusts.
    async fn spawn_auth_service() -> (SocketAddr, JwtKeys) {
        let state = AppState::fake();
        let keys = state.signing_keys().unwrap().clone();
        let addr = spawn(
            Router::new()
                .route("/auth/validate", get(validate))
                .with_state(state),
        )
        .await;
        (addr, keys)
    }

    fn verifier_for(addr: SocketAddr, timeout: Duration) -> RemoteVerifier {
        RemoteVerifier::new(format!("http://{addr}/auth/validate"), timeout).unwrap()
    }

    #[tokio::test]
    async fn accepts_token_the_issuer_accepts() {
        let (addr, keys) = spawn_auth_service().await;
        let user_id = Uuid::new_v4();
        let issued = keys.issue(user_id, "alice").unwrap();

        let identity = verifier_for(addr, Duration::from_secs(2))
            .verify(&issued.token)
            .await
            .expect("identity");
        assert_eq!(
            identity,
            Identity {
                user_id,
                username: "alice".into()
            }
        );
    }

    #[tokio::test]
    async fn expired_token_is_unauthenticated() {
        let (addr, keys) = spawn_auth_service().await;
        let stale = keys
            .issue_at(
                Uuid::new_v4(),
                "alice",
                OffsetDateTime::now_utc() - time::Duration::minutes(5),
            )
            .unwrap();

        let err = verifier_for(addr, Duration::from_secs(2))
            .verify(&stale.token)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn unreachable_verifier_fails_closed() {
        let addr = dead_addr().await;
        let err = verifier_for(addr, Duration::from_secs(2))
            .verify("whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn hung_verifier_times_out_as_unauthenticated() {
        let app = Router::new().route(
            "/auth/validate",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({"user_id": Uuid::nil(), "username": "late"}))
            }),
        );
        let addr = spawn(app).await;

        let started = std::time::Instant::now();
        let err = verifier_for(addr, Duration::from_millis(200))
            .verify("whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn success_status_with_garbage_body_is_rejected() {
        let app = Router::new().route("/auth/validate", get(|| async { (StatusCode::OK, "ok") }));
        let addr = spawn(app).await;

        let err = verifier_for(addr, Duration::from_secs(2))
            .verify("whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }
}
