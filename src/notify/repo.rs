use sqlx::PgPool;

use super::repo_types::{NewNotificationLog, NotificationLog};
use crate::{db::is_foreign_key_violation, error::AppError};

impl NotificationLog {
    /// Append a log row. Rows are never updated or deleted here.
    pub async fn insert(db: &PgPool, new: &NewNotificationLog) -> Result<NotificationLog, AppError> {
        sqlx::query_as::<_, NotificationLog>(
            r#"
            INSERT INTO notification_logs (user_id, event_type, message, payload)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, event_type, message, payload, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(&new.event_type)
        .bind(&new.message)
        .bind(&new.payload)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::validation("user_id does not reference an existing user")
            } else {
                e.into()
            }
        })
    }

    /// Newest first, plus the total row count.
    pub async fn list(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<NotificationLog>, i64), AppError> {
        let rows = sqlx::query_as::<_, NotificationLog>(
            r#"
            SELECT id, user_id, event_type, message, payload, created_at
            FROM notification_logs
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notification_logs")
            .fetch_one(db)
            .await?;

        Ok((rows, total))
    }
}
