use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// 1:1 extension of a user row.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>, // unique across profiles when set
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
