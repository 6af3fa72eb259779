use rust_decimal::Decimal;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{CategorySum, DailySum, NewTransaction, Transaction};
use crate::{db::is_foreign_key_violation, error::AppError};

const TRANSACTION_COLUMNS: &str =
    "id, user_id, type AS kind, amount, category, description, occurred_at, created_at";

impl Transaction {
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        new: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let sql = format!(
            r#"
            INSERT INTO transactions (user_id, type, amount, category, description, occurred_at)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, now()))
            RETURNING {TRANSACTION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Transaction>(&sql)
            .bind(user_id)
            .bind(new.kind.as_str())
            .bind(new.amount)
            .bind(&new.category)
            .bind(&new.description)
            .bind(new.occurred_at)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::NotFound("User not found".into())
                } else {
                    e.into()
                }
            })
    }

    /// Newest business time first, plus the user's total row count.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Transaction>, i64), AppError> {
        let sql = format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE user_id = $1
            ORDER BY occurred_at DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, Transaction>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await?;

        Ok((rows, total))
    }

    /// `(total_income, total_expense)`, zeros when the user has no rows.
    pub async fn totals(db: &PgPool, user_id: Uuid) -> Result<(Decimal, Decimal), AppError> {
        let totals = sqlx::query_as::<_, (Decimal, Decimal)>(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE type = 'income'), 0)  AS total_income,
                COALESCE(SUM(amount) FILTER (WHERE type = 'expense'), 0) AS total_expense
            FROM transactions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(totals)
    }

    pub async fn category_sums(db: &PgPool, user_id: Uuid) -> Result<Vec<CategorySum>, AppError> {
        let rows = sqlx::query_as::<_, CategorySum>(
            r#"
            SELECT type AS kind, category, SUM(amount) AS total
            FROM transactions
            WHERE user_id = $1
            GROUP BY type, category
            ORDER BY type, category
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Buckets by the UTC calendar date of `occurred_at`, oldest first.
    pub async fn daily_sums(
        db: &PgPool,
        user_id: Uuid,
        since: OffsetDateTime,
    ) -> Result<Vec<DailySum>, AppError> {
        let rows = sqlx::query_as::<_, DailySum>(
            r#"
            SELECT
                (occurred_at AT TIME ZONE 'UTC')::date AS day,
                COALESCE(SUM(amount) FILTER (WHERE type = 'income'), 0)  AS income,
                COALESCE(SUM(amount) FILTER (WHERE type = 'expense'), 0) AS expense
            FROM transactions
            WHERE user_id = $1 AND occurred_at >= $2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
