use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{NewNotificationLog, NotificationLog};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct NotificationLogCreate {
    pub user_id: Option<Uuid>,
    #[serde(default = "default_event_type")]
    pub event_type: String,
    pub message: String,
    pub payload: Option<serde_json::Map<String, serde_json::Value>>,
}

fn default_event_type() -> String {
    "event".into()
}

impl NotificationLogCreate {
    pub fn into_new(self) -> Result<NewNotificationLog, AppError> {
        let event_type = self.event_type.trim().to_string();
        if event_type.is_empty() || event_type.chars().count() > 64 {
            return Err(AppError::validation(
                "event_type must be between 1 and 64 characters",
            ));
        }
        if self.message.trim().is_empty() {
            return Err(AppError::validation("message must not be empty"));
        }
        Ok(NewNotificationLog {
            user_id: self.user_id,
            event_type,
            message: self.message,
            payload: self.payload.map(serde_json::Value::Object),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct LoggedResponse {
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}

impl LogsQuery {
    /// Returns `(limit, offset)`. A missing limit uses the configured default;
    /// any limit is clamped to the configured maximum.
    pub fn resolve(&self, default_limit: i64, max_limit: i64) -> Result<(i64, i64), AppError> {
        let limit = match self.limit {
            None => default_limit,
            Some(l) if (1..=500).contains(&l) => l,
            Some(_) => return Err(AppError::validation("limit must be between 1 and 500")),
        };
        if self.offset < 0 {
            return Err(AppError::validation("offset must not be negative"));
        }
        Ok((limit.min(max_limit), self.offset))
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationLogsList {
    pub items: Vec<NotificationLog>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_defaults_and_payload_must_be_object() {
        let parsed: NotificationLogCreate = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(parsed.event_type, "event");
        assert!(parsed.user_id.is_none());

        let not_object: Result<NotificationLogCreate, _> =
            serde_json::from_str(r#"{"message":"hi","payload":[1,2]}"#);
        assert!(not_object.is_err());
    }

    #[test]
    fn empty_message_is_rejected() {
        let parsed: NotificationLogCreate = serde_json::from_str(r#"{"message":"  "}"#).unwrap();
        assert!(parsed.into_new().is_err());
    }

    #[test]
    fn limit_defaults_and_clamps() {
        let q = LogsQuery { limit: None, offset: 0 };
        assert_eq!(q.resolve(50, 500).unwrap(), (50, 0));

        let q = LogsQuery { limit: Some(400), offset: 3 };
        assert_eq!(q.resolve(50, 100).unwrap(), (100, 3));

        assert!(LogsQuery { limit: Some(0), offset: 0 }.resolve(50, 500).is_err());
        assert!(LogsQuery { limit: Some(501), offset: 0 }.resolve(50, 500).is_err());
        assert!(LogsQuery { limit: None, offset: -1 }.resolve(50, 500).is_err());
    }
}
