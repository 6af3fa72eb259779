use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{LoggedResponse, LogsQuery, NotificationLogCreate, NotificationLogsList},
    repo_types::NotificationLog,
};
use crate::{
    error::AppError,
    extract::{JsonBody, QueryParams},
    state::AppState,
};

pub fn notify_routes() -> Router<AppState> {
    Router::new()
        .route("/notify/log", post(log_event))
        .route("/notify/logs", get(list_logs))
}

#[instrument(skip(state, payload))]
pub async fn log_event(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NotificationLogCreate>,
) -> Result<(StatusCode, Json<LoggedResponse>), AppError> {
    let new = payload.into_new()?;
    let row = NotificationLog::insert(&state.db, &new).await?;

    info!(
        id = row.id,
        event_type = %row.event_type,
        user_id = ?row.user_id,
        message = %row.message,
        "event logged"
    );
    Ok((StatusCode::ACCEPTED, Json(LoggedResponse { status: "logged" })))
}

#[instrument(skip(state))]
pub async fn list_logs(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<LogsQuery>,
) -> Result<Json<NotificationLogsList>, AppError> {
    let (limit, offset) = q.resolve(state.config.default_page_size, state.config.max_page_size)?;
    let (items, total) = NotificationLog::list(&state.db, limit, offset).await?;
    Ok(Json(NotificationLogsList {
        items,
        total,
        limit,
        offset,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn rejects_missing_message_with_422() {
        let app = notify_routes().with_state(AppState::fake());
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/notify/log")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"event_type":"x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn rejects_out_of_range_limit_with_422() {
        let app = notify_routes().with_state(AppState::fake());
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/notify/logs?limit=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn log_then_list(db: sqlx::PgPool) {
        let app = notify_routes().with_state(AppState::fake_with_db(db));
        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/notify/log")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"user_id":null,"event_type":"test_event","message":"Hello","payload":{"key":"value"}}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"logged"}"#);

        let res = app
            .oneshot(Request::builder().uri("/notify/logs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let list: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(list["total"], 1);
        assert_eq!(list["items"][0]["event_type"], "test_event");
    }
}
