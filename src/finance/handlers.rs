use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::instrument;

use super::{
    dto::{
        CategoryStats, DayStats, DaysQuery, ListQuery, Summary, TransactionCreate,
        TransactionsList,
    },
    repo_types::Transaction,
    services::record_transaction,
};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{JsonBody, QueryParams},
    state::AppState,
};

pub fn finance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/finance/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/finance/stats/summary", get(summary))
        .route("/finance/stats/by-category", get(by_category))
        .route("/finance/stats/by-day", get(by_day))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(payload): JsonBody<TransactionCreate>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let new = payload.validate()?;
    let tx = record_transaction(&state.db, &state.notifier, &identity, new).await?;
    Ok((StatusCode::CREATED, Json(tx)))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    QueryParams(q): QueryParams<ListQuery>,
) -> Result<Json<TransactionsList>, AppError> {
    q.validate()?;
    let (items, total) =
        Transaction::list_by_user(&state.db, identity.user_id, q.limit, q.offset).await?;
    Ok(Json(TransactionsList {
        items,
        total,
        limit: q.limit,
        offset: q.offset,
    }))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Summary>, AppError> {
    let (income, expense) = Transaction::totals(&state.db, identity.user_id).await?;
    Ok(Json(Summary::new(income, expense)))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn by_category(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<CategoryStats>, AppError> {
    let rows = Transaction::category_sums(&state.db, identity.user_id).await?;
    Ok(Json(rows.into_iter().collect()))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn by_day(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    QueryParams(q): QueryParams<DaysQuery>,
) -> Result<Json<DayStats>, AppError> {
    q.validate()?;
    let since = OffsetDateTime::now_utc() - Duration::days(q.days);
    let rows = Transaction::daily_sums(&state.db, identity.user_id, since).await?;
    Ok(Json(DayStats {
        items: rows.into_iter().map(Into::into).collect(),
    }))
}
