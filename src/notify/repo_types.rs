use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NotificationLog {
    pub id: i64,
    pub user_id: Option<Uuid>, // set to NULL when the user is deleted
    pub event_type: String,
    pub message: String,
    pub payload: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated input for a new log row.
#[derive(Debug, Clone)]
pub struct NewNotificationLog {
    pub user_id: Option<Uuid>,
    pub event_type: String,
    pub message: String,
    pub payload: Option<serde_json::Value>,
}
