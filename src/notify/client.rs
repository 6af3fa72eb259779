use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Body of `POST /notify/log`.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub user_id: Option<Uuid>,
    pub event_type: String,
    pub message: String,
    pub payload: Option<serde_json::Value>,
}

/// Producer side of the notification sink.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    url: String,
}

impl Notifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build notifier http client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fire and forget. Runs on a detached task, is attempted once and
    /// never reports failure to the caller.
    pub fn notify(&self, event: NotificationEvent) {
        let this = self.clone();
        tokio::spawn(async move { this.deliver(event).await });
    }

    async fn deliver(&self, event: NotificationEvent) {
        match self.client.post(&self.url).json(&event).send().await {
            Ok(res) if res.status().is_success() => {
                debug!(event_type = %event.event_type, "notification delivered");
            }
            Ok(res) => {
                warn!(status = %res.status(), event_type = %event.event_type, "notification sink refused event");
            }
            Err(e) => {
                warn!(error = %e, event_type = %event.event_type, "failed to deliver notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verifier::tests::{dead_addr, spawn};
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use tokio::sync::mpsc;

    fn event() -> NotificationEvent {
        NotificationEvent {
            user_id: Some(Uuid::new_v4()),
            event_type: "finance.transaction_created".into(),
            message: "hello".into(),
            payload: Some(serde_json::json!({"amount": "10.00"})),
        }
    }

    #[tokio::test]
    async fn delivers_event_to_sink() {
        let (tx, mut rx) = mpsc::unbounded_channel::<serde_json::Value>();
        let app = Router::new()
            .route(
                "/notify/log",
                post(
                    |State(tx): State<mpsc::UnboundedSender<serde_json::Value>>,
                     Json(body): Json<serde_json::Value>| async move {
                        tx.send(body).unwrap();
                        StatusCode::ACCEPTED
                    },
                ),
            )
            .with_state(tx);
        let addr = spawn(app).await;

        let notifier = Notifier::new(format!("http://{addr}/notify/log"), Duration::from_secs(2)).unwrap();
        notifier.notify(event());

        let got = tokio::time::timeout(Duration::from_secs(3), rx.recv())
            .await
            .expect("event reaches the sink")
            .unwrap();
        assert_eq!(got["event_type"], "finance.transaction_created");
        assert_eq!(got["payload"]["amount"], "10.00");
    }

    #[tokio::test]
    async fn unreachable_sink_is_swallowed() {
        let addr = dead_addr().await;
        let notifier = Notifier::new(format!("http://{addr}/notify/log"), Duration::from_secs(2)).unwrap();
        // returns normally; nothing propagates
        notifier.deliver(event()).await;
        notifier.notify(event());
    }

    #[tokio::test]
    async fn hung_sink_is_bounded_by_timeout() {
        let app = Router::new().route(
            "/notify/log",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                StatusCode::ACCEPTED
            }),
        );
        let addr = spawn(app).await;
        let notifier = Notifier::new(format!("http://{addr}/notify/log"), Duration::from_millis(200)).unwrap();

        tokio::time::timeout(Duration::from_secs(3), notifier.deliver(event()))
            .await
            .expect("delivery gives up after its own timeout");
    }
}
