use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Profile;
use crate::{
    db::{is_foreign_key_violation, is_unique_violation},
    error::AppError,
};

impl Profile {
    pub async fn find(db: &PgPool, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, full_name, email, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Creates an empty profile on first access. Safe to race: the insert is
    /// a no-op when the row already exists.
    pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> Result<Profile, AppError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                // token outlived the account
                AppError::NotFound("User not found".into())
            } else {
                e.into()
            }
        })?;

        Self::find(db, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".into()))
    }

    /// Only the provided fields change. `None` when the profile does not exist.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET full_name  = COALESCE($2, full_name),
                email      = COALESCE($3, email),
                updated_at = now()
            WHERE user_id = $1
            RETURNING user_id, full_name, email, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already in use".into())
            } else {
                e.into()
            }
        })
    }
}
